//! HTTP gateway (Axum) for survey administration and answer submission.
//!
//! This module is primarily used by the `grader` server binary. Admin routes
//! talk to the store directly; answer writes go through the grading service so
//! every create/update is scored and cascaded before the response is sent.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::*;
pub use state::HandlerState;

use crate::completion::CompletionClient;
use crate::store::SurveyStore;

pub fn create_router_with_state<C, S>(state: HandlerState<C, S>) -> Router
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/admin/surveys",
            post(create_survey_handler::<C, S>).get(list_surveys_handler::<C, S>),
        )
        .route("/admin/surveys/{survey_id}", delete(delete_survey_handler::<C, S>))
        .route(
            "/admin/surveys/{survey_id}/questions",
            post(add_question_handler::<C, S>),
        )
        .route(
            "/admin/surveys/{survey_id}/detail",
            get(survey_detail_handler::<C, S>),
        )
        .route(
            "/admin/questions/{question_id}",
            delete(delete_question_handler::<C, S>),
        )
        .route(
            "/admin/questions/{question_id}/guideline",
            put(upsert_guideline_handler::<C, S>).delete(delete_guideline_handler::<C, S>),
        )
        .route("/public/respondents", post(create_respondent_handler::<C, S>))
        .route(
            "/public/respondents/{respondent_id}/answers",
            get(list_answers_handler::<C, S>),
        )
        .route("/public/answers", post(create_answer_handler::<C, S>))
        .route(
            "/public/answers/{answer_id}",
            put(update_answer_handler::<C, S>).delete(delete_answer_handler::<C, S>),
        )
        .route("/public/submit", post(submit_handler::<C, S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured browser origins. Origins that are not valid header
/// values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
