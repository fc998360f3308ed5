//! Handler tests driven through the router with `oneshot`.

use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::completion::{CompletionRequest, MockCompletionClient};
use crate::constants::{GRADER_STATUS_HEADER, HEURISTIC_RATIONALE};
use crate::gateway::create_router_with_state;
use crate::gateway::state::HandlerState;
use crate::grading::GradingService;
use crate::scoring::ScoringConfig;
use crate::store::MemoryStore;

fn router_with(client: Option<MockCompletionClient>) -> Router {
    let service = GradingService::new(
        Arc::new(MemoryStore::new()),
        ScoringConfig::default(),
        client.map(Arc::new),
        false,
    );
    create_router_with_state(HandlerState::new(service))
}

fn grading_client() -> MockCompletionClient {
    MockCompletionClient::replying(|request: &CompletionRequest| {
        let score = if request.user.contains("REFERENCED ANSWER Q1:\nbad") {
            1
        } else {
            4
        };
        Ok(format!(r#"{{"score": {score}, "rationale": "graded"}}"#))
    })
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Creates a two-question survey with guidelines and one respondent.
async fn seed(router: &Router) -> (u64, Vec<u64>, u64) {
    let (status, created) = send(
        router,
        "POST",
        "/admin/surveys",
        Some(json!({
            "title": "  Retro  ",
            "questions": [
                {"text": "Why?", "order_index": 1},
                {"text": "   ", "order_index": 2},
                {"text": "How did it go?", "order_index": 0}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let survey_id = created["id"].as_u64().unwrap();

    let (_, detail) = send(router, "GET", &format!("/admin/surveys/{survey_id}/detail"), None).await;
    let question_ids: Vec<u64> = detail["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_u64().unwrap())
        .collect();
    for id in &question_ids {
        let (status, _) = send(
            router,
            "PUT",
            &format!("/admin/questions/{id}/guideline"),
            Some(json!({"content": "be specific"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, respondent) = send(
        router,
        "POST",
        "/public/respondents",
        Some(json!({"survey_id": survey_id, "display_name": " Ada "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        survey_id,
        question_ids,
        respondent["respondent_id"].as_u64().unwrap(),
    )
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = router_with(None);
    let (status, body) = send(&router, "GET", "/healthz", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_create_survey_requires_title() {
    let router = router_with(None);
    let (status, body) = send(&router, "POST", "/admin/surveys", Some(json!({"title": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("Title is required"));
}

#[tokio::test]
async fn test_survey_detail_orders_and_skips_blank_questions() {
    let router = router_with(None);
    let (survey_id, _, _) = seed(&router).await;

    let (status, detail) = send(&router, "GET", &format!("/admin/surveys/{survey_id}/detail"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["survey"]["title"], "Retro");
    let questions = detail["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["text"], "How did it go?");
    assert_eq!(questions[0]["type"], "text");
    assert_eq!(questions[0]["guideline"]["content"], "be specific");
    assert_eq!(questions[1]["order_index"], 1);
}

#[tokio::test]
async fn test_add_question_and_delete_guideline() {
    let router = router_with(None);
    let (survey_id, _, _) = seed(&router).await;

    let (status, created) = send(
        &router,
        "POST",
        &format!("/admin/surveys/{survey_id}/questions"),
        Some(json!({"text": "Anything else?", "order_index": 2, "type": "long_text"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let question_id = created["id"].as_u64().unwrap();

    let uri = format!("/admin/questions/{question_id}/guideline");
    let (_, first) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(first, json!({"ok": true, "deleted": 0}));

    send(&router, "PUT", &uri, Some(json!({"content": "x"}))).await;
    let (_, second) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(second, json!({"ok": true, "deleted": 1}));

    let (status, _) = send(
        &router,
        "POST",
        &format!("/admin/surveys/{survey_id}/questions"),
        Some(json!({"text": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_records_are_not_found() {
    let router = router_with(None);

    let cases = [
        ("GET", "/admin/surveys/77/detail", None),
        ("DELETE", "/admin/surveys/77", None),
        ("DELETE", "/admin/questions/77", None),
        ("PUT", "/admin/questions/77/guideline", Some(json!({"content": "x"}))),
        ("POST", "/public/respondents", Some(json!({"survey_id": 77}))),
        ("DELETE", "/public/answers/77", None),
        ("PUT", "/public/answers/77", Some(json!({"flagged": true}))),
        ("GET", "/public/respondents/77/answers", None),
        ("POST", "/public/submit", Some(json!({"respondent_id": 77}))),
    ];

    for (method, uri, body) in cases {
        let (status, error) = send(&router, method, uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(error["code"], 404);
    }
}

#[tokio::test]
async fn test_answer_edit_cascades_over_http() {
    let router = router_with(Some(grading_client()));
    let (_, questions, respondent) = seed(&router).await;

    let (status, first) = send(
        &router,
        "POST",
        "/public/answers",
        Some(json!({"respondent_id": respondent, "question_id": questions[0], "answer_text": "good"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["score"], 4.0);
    assert_eq!(first["status"], "scored");

    let (_, second) = send(
        &router,
        "POST",
        "/public/answers",
        Some(json!({"respondent_id": respondent, "question_id": questions[1], "answer_text": "see Q1"})),
    )
    .await;
    assert_eq!(second["score"], 4.0);

    let first_id = first["id"].as_u64().unwrap();
    let (status, edited) = send(
        &router,
        "PUT",
        &format!("/public/answers/{first_id}"),
        Some(json!({"answer_text": "bad"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["rescored_question_ids"], json!([questions[1]]));

    let (_, listed) = send(
        &router,
        "GET",
        &format!("/public/respondents/{respondent}/answers"),
        None,
    )
    .await;
    let dependent = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["question_id"] == questions[1])
        .unwrap();
    assert_eq!(dependent["score"], 1.0);
    assert_eq!(dependent["low_quality"], true);
}

#[tokio::test]
async fn test_answer_degrades_without_completion_service() {
    let router = router_with(None);
    let (_, questions, respondent) = seed(&router).await;

    let (status, body) = send(
        &router,
        "POST",
        "/public/answers",
        Some(json!({"respondent_id": respondent, "question_id": questions[1], "answer_text": "as mentioned earlier"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degraded"], "disabled");
    assert_eq!(body["rationale"], HEURISTIC_RATIONALE);
    assert!(body["reference_warning"].is_null());
}

#[tokio::test]
async fn test_answer_for_foreign_question_is_rejected() {
    let router = router_with(None);
    let (_, _, respondent) = seed(&router).await;
    let (_, other_questions, _) = seed(&router).await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/public/answers")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"respondent_id": respondent, "question_id": other_questions[0]})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(GRADER_STATUS_HEADER).unwrap(),
        "invalid_request"
    );
}

#[tokio::test]
async fn test_invalid_schema_is_bad_request() {
    let router = router_with(None);
    let (status, body) = send(
        &router,
        "POST",
        "/public/answers",
        Some(json!({"respondent_id": "one"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid request schema"));
}

#[tokio::test]
async fn test_submit_and_delete_flow() {
    let router = router_with(None);
    let (survey_id, questions, respondent) = seed(&router).await;

    let (status, body) = send(
        &router,
        "POST",
        "/public/submit",
        Some(json!({"respondent_id": respondent})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no answers"));

    let (_, answer) = send(
        &router,
        "POST",
        "/public/answers",
        Some(json!({"respondent_id": respondent, "question_id": questions[0], "answer_text": "done", "flagged": true})),
    )
    .await;
    assert_eq!(answer["flagged"], true);

    let (status, body) = send(
        &router,
        "POST",
        "/public/submit",
        Some(json!({"respondent_id": respondent})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let answer_id = answer["id"].as_u64().unwrap();
    let (status, _) = send(&router, "DELETE", &format!("/public/answers/{answer_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, "DELETE", &format!("/admin/surveys/{survey_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "GET", &format!("/admin/surveys/{survey_id}/detail"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_surveys() {
    let router = router_with(None);
    seed(&router).await;

    let (status, body) = send(&router, "GET", "/admin/surveys", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Retro");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let router = router_with(None).layer(crate::gateway::cors_layer(&[
        "http://localhost:5173".to_string(),
        "bad\norigin".to_string(),
    ]));

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .header("Origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:5173"
    );
}
