mod common;

use common::fixtures::grading_client;
use common::harness::spawn_test_server;
use common::http_client::TestClient;
use serde_json::json;

#[tokio::test]
async fn test_health_over_tcp() {
    let server = spawn_test_server(None).await.unwrap();
    let client = TestClient::new(server.url());

    let (status, body) = client.get("/healthz").await.unwrap();

    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": true}));
    server.shutdown().await;
}

#[tokio::test]
async fn test_survey_lifecycle_with_cascade() {
    let server = spawn_test_server(Some(grading_client())).await.unwrap();
    let client = TestClient::new(server.url());

    let (status, created) = client
        .post(
            "/admin/surveys",
            &json!({
                "title": "Retro",
                "description": "  ",
                "questions": [{"text": "How did it go?"}]
            }),
        )
        .await
        .unwrap();
    assert_eq!(status, 200);
    let survey_id = created["id"].as_u64().unwrap();

    let (_, second) = client
        .post(
            &format!("/admin/surveys/{survey_id}/questions"),
            &json!({"text": "Why?", "order_index": 1}),
        )
        .await
        .unwrap();
    let (_, detail) = client
        .get(&format!("/admin/surveys/{survey_id}/detail"))
        .await
        .unwrap();
    assert!(detail["survey"]["description"].is_null());
    let q1 = detail["questions"][0]["id"].as_u64().unwrap();
    let q2 = second["id"].as_u64().unwrap();

    for question in [q1, q2] {
        client
            .put(
                &format!("/admin/questions/{question}/guideline"),
                &json!({"content": "Give a reason."}),
            )
            .await
            .unwrap();
    }

    let (_, respondent) = client
        .post("/public/respondents", &json!({"survey_id": survey_id}))
        .await
        .unwrap();
    let respondent_id = respondent["respondent_id"].as_u64().unwrap();

    let (_, first) = client
        .post(
            "/public/answers",
            &json!({"respondent_id": respondent_id, "question_id": q1, "answer_text": "good"}),
        )
        .await
        .unwrap();
    let (_, dependent) = client
        .post(
            "/public/answers",
            &json!({"respondent_id": respondent_id, "question_id": q2, "answer_text": "as in my previous answer"}),
        )
        .await
        .unwrap();
    assert_eq!(dependent["score"], 4.0);

    let first_id = first["id"].as_u64().unwrap();
    let (status, edited) = client
        .put(&format!("/public/answers/{first_id}"), &json!({"answer_text": "bad"}))
        .await
        .unwrap();
    assert_eq!(status, 200);
    assert_eq!(edited["rescored_question_ids"], json!([q2]));

    let (_, answers) = client
        .get(&format!("/public/respondents/{respondent_id}/answers"))
        .await
        .unwrap();
    let answers = answers.as_array().unwrap();
    assert_eq!(answers.len(), 2);
    assert!(answers.iter().all(|a| a["score"] == 1.0 && a["low_quality"] == true));

    let (status, _) = client
        .post("/public/submit", &json!({"respondent_id": respondent_id}))
        .await
        .unwrap();
    assert_eq!(status, 200);

    server.shutdown().await;
}

#[tokio::test]
async fn test_error_bodies_carry_status_code() {
    let server = spawn_test_server(None).await.unwrap();
    let client = TestClient::new(server.url());

    let (status, body) = client.get("/admin/surveys/404/detail").await.unwrap();
    assert_eq!(status, 404);
    assert_eq!(body["code"], 404);
    assert_eq!(body["error"], "survey 404 not found");

    let (status, body) = client
        .post("/admin/surveys", &json!({"description": "no title"}))
        .await
        .unwrap();
    assert_eq!(status, 400);
    assert_eq!(body["code"], 400);
}
