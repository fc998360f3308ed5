//! Cross-answer reference detection.
//!
//! A free-text answer may point at other questions ("see Q2", "as in the first
//! question", "my previous answer"). [`ReferenceExtractor`] turns that text into a
//! validated, sorted list of display numbers plus human-readable warnings.
//!
//! # Passes
//!
//! 1. Absolute mentions (`question 3`, `q3`, `ques 3`).
//! 2. Ordinal words (`first` .. `tenth`).
//! 3. Relative phrases, only when the answer's own position is known.
//! 4. Optional semantic refinement through a [`SemanticResolver`]. Absence and
//!    failure of the resolver are the same no-op.
//! 5. Validation against the survey's numbering. Unknown numbers only ever
//!    appear in the warning.
//!
//! Passes 1-3 and 5 are pure; [`extract_references`] runs exactly those.
//!
//! The resolved question ids are persisted per answer as a JSON list (see
//! [`cache`]) and mirrored in memory as a [`ReferenceGraph`].

pub mod cache;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod numbering;
pub mod patterns;
pub mod resolver;
pub mod types;


pub use cache::{decode_reference_ids, encode_reference_ids};
pub use error::ResolveError;
pub use extractor::{ReferenceExtractor, extract_references};
pub use graph::ReferenceGraph;
pub use numbering::{QuestionTextMap, SurveyNumbering};
pub use resolver::{CompletionResolver, ResolveQuery, SemanticResolver, parse_resolver_reply};
pub use types::{ReferenceExtraction, RelativePosition};
