use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use thrivya::survey::{survey_router, ReportGenerator, SessionRepository, SurveyService};

pub(crate) fn with_survey_routes<R, G>(service: Arc<SurveyService<R, G>>) -> axum::Router
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    survey_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionRepository;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use thrivya::config::AdvisorConfig;
    use thrivya::survey::{
        CohereReportGenerator, QuestionCatalog, ScoringEngine, ServiceSettings,
    };
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let generator =
            CohereReportGenerator::from_config(&AdvisorConfig::default()).expect("client builds");
        let service = SurveyService::new(
            Arc::new(QuestionCatalog::bundled().expect("bundled")),
            ScoringEngine::default(),
            Arc::new(InMemorySessionRepository::default()),
            Arc::new(generator),
            ServiceSettings {
                advisor_timeout: Duration::from_secs(1),
                minimum_submissions: 5,
            },
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_survey_routes(Arc::new(service)).layer(Extension(state))
    }

    async fn call(app: axum::Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let (status, body) = call(app(false), Method::GET, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = call(app(true), Method::GET, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn health_and_survey_routes_share_one_router() {
        let (status, body) = call(app(true), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = call(app(true), Method::GET, "/api/v1/survey/questions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().expect("sections").len(), 3);
    }

    #[tokio::test]
    async fn report_without_credentials_still_returns_scores() {
        let router = app(true);
        let (status, session) = call(router.clone(), Method::POST, "/api/v1/survey/sessions").await;
        assert_eq!(status, StatusCode::CREATED);
        let session_id = session["session_id"].as_str().expect("session id").to_string();

        let (status, report) = call(
            router,
            Method::POST,
            &format!("/api/v1/survey/sessions/{session_id}/report"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["advisory"]["status"], "unavailable");
        assert_eq!(
            report["advisory"]["warning"],
            "Recommendations unavailable: report generator credentials are not configured"
        );
        assert_eq!(report["scores"]["overall"]["score"], 0.0);
    }
}
