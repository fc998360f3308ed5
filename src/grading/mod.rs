//! Answer write path.
//!
//! Every create/update runs extraction, context building and scoring for the
//! written answer, then the rescore cascade for its dependents, all against one
//! [`ResponseSheet`](crate::response::ResponseSheet) that is committed to the
//! store in a single call. Writes for the same respondent are serialized by
//! [`RespondentLocks`]; different respondents never wait on each other.

pub mod error;
pub mod locks;
pub mod service;
pub mod types;


pub use error::GradingError;
pub use locks::RespondentLocks;
pub use service::GradingService;
pub use types::{AnswerChanges, AnswerReceipt, NewAnswer};
