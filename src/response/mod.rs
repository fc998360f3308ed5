//! One respondent's answers within one survey, held in memory for the duration
//! of a write.
//!
//! The write path and the rescore cascade mutate a [`ResponseSheet`] only.
//! [`ResponseSheet::into_changes`] hands back the touched answers, which the
//! store commits in one call. Dropping a sheet without committing discards every
//! change.

pub mod sheet;


pub use sheet::ResponseSheet;
