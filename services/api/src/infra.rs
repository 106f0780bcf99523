use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use thrivya::config::AppConfig;
use thrivya::survey::{
    CatalogSource, QuestionCatalog, RepositoryError, ServiceSettings, SessionId,
    SessionRepository, SurveySession, TeamSize,
};
use thrivya::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, SurveySession>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: SurveySession) -> Result<SurveySession, RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(session.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id().clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SurveySession>, RepositoryError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn modify<T, F>(&self, id: &SessionId, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut SurveySession) -> T,
    {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        let session = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(change(session))
    }
}

pub(crate) fn service_settings(config: &AppConfig) -> ServiceSettings {
    ServiceSettings {
        advisor_timeout: config.advisor.timeout,
        minimum_submissions: config.survey.minimum_submissions,
    }
}

/// A `--catalog` flag wins over `THRIVYA_QUESTIONS_PATH`.
pub(crate) fn load_catalog(
    override_path: Option<PathBuf>,
    config: &AppConfig,
) -> Result<QuestionCatalog, AppError> {
    let source = match override_path {
        Some(path) => CatalogSource::Path(path),
        None => config.survey.catalog_source(),
    };
    Ok(QuestionCatalog::load(&source)?)
}

pub(crate) fn parse_team_size(raw: &str) -> Result<TeamSize, String> {
    TeamSize::parse(raw).ok_or_else(|| {
        format!("'{raw}' is not a team size (expected one of 1-10, 11-50, 51-200, 201-500, 500+)")
    })
}
