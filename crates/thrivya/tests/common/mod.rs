#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use thrivya::survey::{
    survey_router, CollaboratorError, CompletionPolicy, LikertLevel, Question, QuestionCatalog,
    QuestionId, ReportGenerator, RepositoryError, ResponseSet, ScoringEngine, ServiceSettings,
    SessionId, SessionRepository, SurveyService, SurveySession,
};

pub const PILLARS: [&str; 8] = [
    "Leadership & Vision",
    "Inclusivity & Belonging",
    "Recognition & Motivation",
    "Well-being & Work-Life",
    "Feedback & Communication",
    "Learning & Growth",
    "Team Dynamics & Trust",
    "Autonomy & Empowerment",
];

pub fn question(id: &str, pillar: &str) -> Question {
    Question {
        id: QuestionId::from(id),
        pillar: pillar.to_string(),
        text: format!("Statement for {pillar}"),
    }
}

/// One question per pillar, ids P1..P8 in pillar order.
pub fn one_per_pillar_catalog() -> QuestionCatalog {
    QuestionCatalog::from_questions(
        PILLARS
            .iter()
            .enumerate()
            .map(|(index, pillar)| question(&format!("P{}", index + 1), pillar))
            .collect(),
    )
    .expect("valid catalog")
}

pub fn answer_all(catalog: &QuestionCatalog, level: LikertLevel) -> ResponseSet {
    let mut responses = ResponseSet::new();
    for entry in catalog.questions() {
        responses
            .record(catalog, entry.id.clone(), level)
            .expect("record");
    }
    responses
}

#[derive(Default, Clone)]
pub struct MemorySessions {
    pub sessions: Arc<Mutex<HashMap<SessionId, SurveySession>>>,
}

impl SessionRepository for MemorySessions {
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

/// Generator returning a fixed narrative and remembering the prompts it saw.
#[derive(Default)]
pub struct ScriptedAdvisor {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ReportGenerator for ScriptedAdvisor {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        Ok("Pulse Summary: steady.".to_string())
    }
}

pub struct UnavailableAdvisor;

#[async_trait]
impl ReportGenerator for UnavailableAdvisor {
    async fn generate(&self, _prompt: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Status { status: 503 })
    }
}

pub fn settings() -> ServiceSettings {
    ServiceSettings {
        advisor_timeout: Duration::from_secs(2),
        minimum_submissions: 5,
    }
}

pub fn build_service<G: ReportGenerator + 'static>(
    policy: CompletionPolicy,
    advisor: G,
) -> SurveyService<MemorySessions, G> {
    let catalog = Arc::new(QuestionCatalog::bundled().expect("bundled catalog"));
    SurveyService::new(
        catalog,
        ScoringEngine::with_policy(policy),
        Arc::new(MemorySessions::default()),
        Arc::new(advisor),
        settings(),
    )
}

pub fn router_for<G: ReportGenerator + 'static>(
    service: SurveyService<MemorySessions, G>,
) -> axum::Router {
    survey_router(Arc::new(service))
}

pub async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
