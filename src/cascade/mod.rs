//! Dependency-aware rescoring.
//!
//! When the answer to question Q changes, every other answer by the same
//! respondent that refers to Q must be scored again, because its scoring
//! context embeds Q's text. [`RescoreCascade`] finds those dependents:
//!
//! 1. A dependent whose cached references already list Q is a hit without
//!    running extraction.
//! 2. Anything else (no cache, unreadable cache, or a cache without Q) is
//!    re-extracted from its own text and its cache refreshed. A cached negative
//!    is never trusted.
//! 3. Hits get a rebuilt scoring context and a fresh score.
//!
//! The answer for Q itself is never rescored from here. All writes land in the
//! caller's [`ResponseSheet`](crate::response::ResponseSheet) and are committed
//! (or dropped) together with the triggering edit.

pub mod engine;
pub mod pipeline;
pub mod types;


pub use engine::RescoreCascade;
pub use pipeline::{AnswerAnalysis, AnswerPipeline};
pub use types::{CascadeReport, GuidelineMap};
