use crate::cli::ServeArgs;
use crate::infra::{service_settings, AppState, InMemorySessionRepository};
use crate::routes::with_survey_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thrivya::config::AppConfig;
use thrivya::error::AppError;
use thrivya::survey::{load_cached, CohereReportGenerator, ScoringEngine, SurveyService};
use thrivya::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = ScoringEngine::with_policy(config.survey.completion_policy);
    let catalog = load_cached(&config.survey.catalog_source())?;
    catalog.ensure_classified(engine.classifier())?;

    let generator = CohereReportGenerator::from_config(&config.advisor)?;
    if !generator.has_credentials() {
        warn!("COHERE_API_KEY not set; reports will be served without recommendations");
    }

    let survey_service = Arc::new(SurveyService::new(
        catalog,
        engine,
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(generator),
        service_settings(&config),
    ));

    let app = with_survey_routes(survey_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.survey.completion_policy,
        "culture pulse service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
