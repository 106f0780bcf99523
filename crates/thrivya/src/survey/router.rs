use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::advisor::ReportGenerator;
use super::catalog::CatalogSection;
use super::domain::{LikertLevel, QuestionId};
use super::population::PopulationScore;
use super::prompt::OrganizationProfile;
use super::repository::{RepositoryError, SessionRepository};
use super::responses::ResponseError;
use super::scoring::views::ScoreCardSummary;
use super::scoring::ScoringError;
use super::service::{SubmissionReceipt, SurveyReport, SurveyService, SurveyServiceError};
use super::session::{SessionId, SessionView};
use crate::error::AppError;

type SharedService<R, G> = Arc<SurveyService<R, G>>;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartSessionRequest {
    #[serde(default)]
    pub(crate) organization: Option<OrganizationProfile>,
}

/// Slider position (0-4) or level label.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum LevelInput {
    Score(u8),
    Label(String),
}

impl LevelInput {
    fn resolve(&self) -> Result<LikertLevel, ResponseError> {
        match self {
            LevelInput::Score(score) => LikertLevel::from_score(*score)
                .ok_or_else(|| ResponseError::InvalidLevel(score.to_string())),
            LevelInput::Label(label) => LikertLevel::from_label(label)
                .ok_or_else(|| ResponseError::InvalidLevel(label.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordResponseRequest {
    pub(crate) level: LevelInput,
}

/// Router builder exposing the survey session endpoints.
pub fn survey_router<R, G>(service: SharedService<R, G>) -> Router
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    Router::new()
        .route("/api/v1/survey/questions", get(questions_handler::<R, G>))
        .route("/api/v1/survey/sessions", post(start_handler::<R, G>))
        .route(
            "/api/v1/survey/sessions/:session_id",
            get(session_handler::<R, G>),
        )
        .route(
            "/api/v1/survey/sessions/:session_id/organization",
            put(organization_handler::<R, G>),
        )
        .route(
            "/api/v1/survey/sessions/:session_id/responses",
            delete(reset_handler::<R, G>),
        )
        .route(
            "/api/v1/survey/sessions/:session_id/responses/:question_id",
            put(record_handler::<R, G>),
        )
        .route(
            "/api/v1/survey/sessions/:session_id/scores",
            get(scores_handler::<R, G>),
        )
        .route(
            "/api/v1/survey/sessions/:session_id/report",
            post(report_handler::<R, G>),
        )
        .route(
            "/api/v1/survey/sessions/:session_id/submit",
            post(submit_handler::<R, G>),
        )
        .route("/api/v1/survey/population", get(population_handler::<R, G>))
        .with_state(service)
}

pub(crate) async fn questions_handler<R, G>(
    State(service): State<SharedService<R, G>>,
) -> Result<Json<Vec<CatalogSection>>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    Ok(Json(service.sections()?))
}

pub(crate) async fn start_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    let view = service.start(request.organization)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn session_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    let session = service.session(&SessionId(session_id))?;
    Ok(Json(session.view()))
}

pub(crate) async fn organization_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path(session_id): Path<String>,
    Json(organization): Json<OrganizationProfile>,
) -> Result<Json<SessionView>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    let view = service.update_organization(&SessionId(session_id), organization)?;
    Ok(Json(view))
}

pub(crate) async fn record_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path((session_id, question_id)): Path<(String, String)>,
    Json(request): Json<RecordResponseRequest>,
) -> Result<Json<SessionView>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    let level = request.level.resolve()?;
    let view = service.record(&SessionId(session_id), QuestionId(question_id), level)?;
    Ok(Json(view))
}

pub(crate) async fn reset_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    Ok(Json(service.reset(&SessionId(session_id))?))
}

pub(crate) async fn scores_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<ScoreCardSummary>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    Ok(Json(service.scores(&SessionId(session_id))?))
}

pub(crate) async fn report_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SurveyReport>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    Ok(Json(service.report(&SessionId(session_id)).await?))
}

pub(crate) async fn submit_handler<R, G>(
    State(service): State<SharedService<R, G>>,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    let receipt = service.submit(&SessionId(session_id))?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub(crate) async fn population_handler<R, G>(
    State(service): State<SharedService<R, G>>,
) -> Result<Json<PopulationScore>, AppError>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    Ok(Json(service.population()?))
}

pub(crate) fn response_status(err: &ResponseError) -> StatusCode {
    match err {
        ResponseError::UnknownQuestion(_) => StatusCode::NOT_FOUND,
        ResponseError::InvalidLevel(_) => StatusCode::BAD_REQUEST,
        ResponseError::Json(_) | ResponseError::Csv(_) | ResponseError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn scoring_status(err: &ScoringError) -> StatusCode {
    match err {
        ScoringError::Incomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringError::UnknownPillar { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_status(err: &SurveyServiceError) -> StatusCode {
    match err {
        SurveyServiceError::Session(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SurveyServiceError::Session(RepositoryError::Conflict)
        | SurveyServiceError::Session(RepositoryError::AlreadySubmitted) => StatusCode::CONFLICT,
        SurveyServiceError::Session(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SurveyServiceError::Response(err) => response_status(err),
        SurveyServiceError::Scoring(err) => scoring_status(err),
        SurveyServiceError::Population(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SurveyServiceError::Classification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
