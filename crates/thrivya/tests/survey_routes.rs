mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{build_service, read_json_body, router_for, ScriptedAdvisor, UnavailableAdvisor};
use thrivya::survey::{CompletionPolicy, QuestionCatalog};

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request(method, uri, body))
        .await
        .expect("route response");
    let status = response.status();
    (status, read_json_body(response).await)
}

async fn start_session(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/survey/sessions",
        Some(json!({ "organization": { "name": "Acme Studio", "team_size": "11-50" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().expect("session id").to_string()
}

async fn answer_everything(app: &Router, session_id: &str, level: Value) {
    let catalog = QuestionCatalog::bundled().expect("bundled");
    for question in catalog.questions() {
        let (status, _) = send(
            app,
            Method::PUT,
            &format!("/api/v1/survey/sessions/{session_id}/responses/{}", question.id),
            Some(json!({ "level": level.clone() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn category<'a>(scores: &'a Value, name: &str) -> &'a Value {
    scores["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .find(|entry| entry["category"] == name)
        .expect("category entry")
}

#[tokio::test]
async fn questions_are_grouped_by_category() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));

    let (status, body) = send(&app, Method::GET, "/api/v1/survey/questions", None).await;

    assert_eq!(status, StatusCode::OK);
    let sections = body.as_array().expect("sections");
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["category"], "culture");
    let total: usize = sections
        .iter()
        .map(|section| section["questions"].as_array().expect("questions").len())
        .sum();
    assert_eq!(total, 24);
}

#[tokio::test]
async fn partial_answers_score_with_zero_for_untouched_categories() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;

    let (status, view) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/survey/sessions/{session_id}/responses/LV1"),
        Some(json!({ "level": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["answered"], 1);
    assert_eq!(view["remaining"], 23);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/survey/sessions/{session_id}/responses/IB1"),
        Some(json!({ "level": "strongly agree" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, scores) = send(
        &app,
        Method::GET,
        &format!("/api/v1/survey/sessions/{session_id}/scores"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(category(&scores, "culture")["average"], 3.5);
    assert_eq!(category(&scores, "culture")["band"], "excellent");
    assert_eq!(category(&scores, "wellness")["average"], 0.0);
    assert_eq!(category(&scores, "growth")["band"], "needs_improvement");
    assert_eq!(scores["overall"]["score"], 1.17);
    assert_eq!(scores["answered"], 2);
}

#[tokio::test]
async fn overwriting_an_answer_rescoring_uses_latest_level() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;
    let uri = format!("/api/v1/survey/sessions/{session_id}/responses/WB1");

    send(&app, Method::PUT, &uri, Some(json!({ "level": 0 }))).await;
    let (_, view) = send(&app, Method::PUT, &uri, Some(json!({ "level": "Agree" }))).await;
    assert_eq!(view["answered"], 1);

    let (_, scores) = send(
        &app,
        Method::GET,
        &format!("/api/v1/survey/sessions/{session_id}/scores"),
        None,
    )
    .await;
    assert_eq!(category(&scores, "wellness")["average"], 3.0);
}

#[tokio::test]
async fn complete_policy_rejects_scores_until_every_question_is_answered() {
    let app = router_for(build_service(CompletionPolicy::Complete, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;
    send(
        &app,
        Method::PUT,
        &format!("/api/v1/survey/sessions/{session_id}/responses/LV1"),
        Some(json!({ "level": 4 })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/survey/sessions/{session_id}/scores"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["remaining"], 23);
    assert_eq!(
        body["error"],
        "survey error: answer 23 more questions to see results"
    );

    answer_everything(&app, &session_id, json!("Agree")).await;
    let (status, scores) = send(
        &app,
        Method::GET,
        &format!("/api/v1/survey/sessions/{session_id}/scores"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scores["overall"]["band"], "good");
}

#[tokio::test]
async fn unknown_question_and_session_are_not_found() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/survey/sessions/{session_id}/responses/ZZ9"),
        Some(json!({ "level": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/survey/sessions/session-missing/scores",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn out_of_range_levels_are_bad_requests() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;
    let uri = format!("/api/v1/survey/sessions/{session_id}/responses/LV2");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "level": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "level": "Maybe" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("Maybe"));
}

#[tokio::test]
async fn report_includes_generated_narrative() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;
    answer_everything(&app, &session_id, json!(4)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/survey/sessions/{session_id}/report"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["advisory"]["status"], "generated");
    assert_eq!(body["advisory"]["text"], "Pulse Summary: steady.");
    assert_eq!(body["scores"]["overall"]["score"], 4.0);
}

#[tokio::test]
async fn report_survives_generator_failure_with_warning() {
    let app = router_for(build_service(CompletionPolicy::Partial, UnavailableAdvisor));
    let session_id = start_session(&app).await;
    answer_everything(&app, &session_id, json!("Neutral")).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/survey/sessions/{session_id}/report"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["advisory"]["status"], "unavailable");
    assert!(body["advisory"]["warning"]
        .as_str()
        .expect("warning")
        .starts_with("Recommendations unavailable"));
    assert_eq!(body["scores"]["overall"]["score"], 2.0);
}

#[tokio::test]
async fn reset_clears_answers_and_keeps_organization() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;
    answer_everything(&app, &session_id, json!(1)).await;

    let (status, view) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/survey/sessions/{session_id}/responses"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["answered"], 0);
    assert_eq!(view["remaining"], 24);
    assert_eq!(view["organization"]["name"], "Acme Studio");

    let (_, scores) = send(
        &app,
        Method::GET,
        &format!("/api/v1/survey/sessions/{session_id}/scores"),
        None,
    )
    .await;
    assert_eq!(scores["overall"]["score"], 0.0);
}

#[tokio::test]
async fn organization_details_can_be_updated() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;

    let (status, view) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/survey/sessions/{session_id}/organization"),
        Some(json!({ "name": "Acme Labs", "industry": "Design", "years_active": 7 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["organization"]["name"], "Acme Labs");
    assert_eq!(view["organization"]["years_active"], 7);
}

#[tokio::test]
async fn population_results_are_gated_on_complete_submissions() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));

    let partial = start_session(&app).await;
    send(
        &app,
        Method::PUT,
        &format!("/api/v1/survey/sessions/{partial}/responses/LV1"),
        Some(json!({ "level": 4 })),
    )
    .await;
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/survey/sessions/{partial}/submit"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    for round in 0..5 {
        let session_id = start_session(&app).await;
        answer_everything(&app, &session_id, json!(if round % 2 == 0 { 4 } else { 3 })).await;

        let (status, _) = send(&app, Method::GET, "/api/v1/survey/population", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, receipt) = send(
            &app,
            Method::POST,
            &format!("/api/v1/survey/sessions/{session_id}/submit"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(receipt["total_submissions"], round + 1);
    }

    let (status, population) = send(&app, Method::GET, "/api/v1/survey/population", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(population["submissions"], 5);
    // three rounds at 96 points and two at 72 over 5 * 96
    assert_eq!(population["total_score"], 432);
    assert_eq!(population["max_score"], 480);
    assert_eq!(population["percentage"], 90.0);
    assert_eq!(population["band"], "excellent");
}

#[tokio::test]
async fn a_session_counts_once_in_the_population() {
    let app = router_for(build_service(CompletionPolicy::Partial, ScriptedAdvisor::default()));
    let session_id = start_session(&app).await;
    answer_everything(&app, &session_id, json!(4)).await;
    let uri = format!("/api/v1/survey/sessions/{session_id}/submit");

    let (status, receipt) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["total_submissions"], 1);

    for _ in 0..4 {
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("already"));
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/survey/population", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("(1 received)"));
}
