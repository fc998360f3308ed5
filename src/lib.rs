//! Grader library crate (used by the server binary and integration tests).
//!
//! Free-text survey answers are scored against per-question guidelines. An
//! answer may refer to other answers of the same respondent ("see Q2", "as I
//! said in the previous question"); those references are extracted, cached on
//! the answer, folded into the text that is scored, and used to rescore
//! dependents whenever a referenced answer is edited.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//! - [`GradingService`] - Answer write path (score, cascade, commit)
//! - [`SurveyStore`], [`MemoryStore`] - Persistence boundary
//!
//! ## Grading Pipeline
//! - [`ReferenceExtractor`], [`SurveyNumbering`] - Cross-answer reference extraction
//! - [`build_scoring_context`] - Scoring context assembly
//! - [`GuidelineScorer`], [`ScoreOutcome`] - Semantic scoring with heuristic fallback
//! - [`RescoreCascade`], [`ResponseSheet`] - Dependent rescoring over one respondent
//!
//! ## Completion Service
//! - [`CompletionClient`], [`GenaiCompletionClient`] - Chat completion boundary
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cascade;
pub mod completion;
pub mod config;
pub mod constants;
pub mod context;
pub mod eval;
pub mod gateway;
pub mod grading;
pub mod references;
pub mod response;
pub mod scoring;
pub mod store;

pub use cascade::{AnswerAnalysis, AnswerPipeline, CascadeReport, GuidelineMap, RescoreCascade};
#[cfg(any(test, feature = "mock"))]
pub use completion::MockCompletionClient;
pub use completion::{
    CompletionClient, CompletionConfig, CompletionError, CompletionRequest, GenaiCompletionClient,
};
pub use config::{Config, ConfigError};
pub use context::{ReferencedAnswers, build_scoring_context};
pub use grading::{AnswerChanges, AnswerReceipt, GradingError, GradingService, NewAnswer};
pub use references::{
    CompletionResolver, ReferenceExtraction, ReferenceExtractor, ReferenceGraph, SemanticResolver,
    SurveyNumbering, extract_references,
};
pub use response::ResponseSheet;
pub use scoring::{
    DegradeReason, GuidelineScorer, ScoreOutcome, ScoringConfig, ScoringError, ScoringStatus,
    heuristic_score,
};
pub use store::{
    Answer, MemoryStore, NewQuestion, Question, Respondent, RespondentStatus, StoreError, Survey,
    SurveyStore,
};
