use crate::config::ConfigError;
use crate::survey::router::{error_status, response_status, scoring_status};
use crate::survey::{
    CatalogError, CollaboratorError, ResponseError, ScoringError, SurveyServiceError,
};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    Responses(ResponseError),
    Scoring(ScoringError),
    Advisor(CollaboratorError),
    Survey(SurveyServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "question catalog error: {}", err),
            AppError::Responses(err) => write!(f, "response error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Advisor(err) => write!(f, "advisor error: {}", err),
            AppError::Survey(err) => write!(f, "survey error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Responses(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Advisor(err) => Some(err),
            AppError::Survey(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Responses(err) => response_status(err),
            AppError::Scoring(err) => scoring_status(err),
            AppError::Survey(err) => error_status(err),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_)
            | AppError::Advisor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn remaining_answers(&self) -> Option<usize> {
        match self {
            AppError::Scoring(ScoringError::Incomplete { remaining })
            | AppError::Survey(SurveyServiceError::Scoring(ScoringError::Incomplete {
                remaining,
            })) => Some(*remaining),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = match self.remaining_answers() {
            Some(remaining) => json!({ "error": self.to_string(), "remaining": remaining }),
            None => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ResponseError> for AppError {
    fn from(value: ResponseError) -> Self {
        Self::Responses(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<CollaboratorError> for AppError {
    fn from(value: CollaboratorError) -> Self {
        Self::Advisor(value)
    }
}

impl From<SurveyServiceError> for AppError {
    fn from(value: SurveyServiceError) -> Self {
        Self::Survey(value)
    }
}
