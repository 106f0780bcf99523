use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::advisor::{advise, Advisory, ReportGenerator};
use super::catalog::{CatalogSection, QuestionCatalog};
use super::classifier::UnknownPillar;
use super::domain::{LikertLevel, QuestionId};
use super::population::{PopulationError, PopulationScore, SubmissionLog};
use super::prompt::OrganizationProfile;
use super::repository::{RepositoryError, SessionRepository};
use super::responses::ResponseError;
use super::scoring::views::ScoreCardSummary;
use super::scoring::{ScoringEngine, ScoringError};
use super::session::{SessionId, SessionView, SurveySession};

/// Tunables the service needs beyond the scoring engine itself.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    pub advisor_timeout: Duration,
    pub minimum_submissions: usize,
}

/// Service composing the catalog, scoring engine, session store and advisor.
pub struct SurveyService<R, G> {
    catalog: Arc<QuestionCatalog>,
    engine: Arc<ScoringEngine>,
    sessions: Arc<R>,
    advisor: Arc<G>,
    population: Mutex<PopulationLedger>,
    settings: ServiceSettings,
}

/// Submission log plus the sessions already counted in it.
#[derive(Debug, Default)]
struct PopulationLedger {
    log: SubmissionLog,
    submitted: HashSet<SessionId>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

/// Scores plus the narrative section; the advisory may be a warning.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub session_id: SessionId,
    pub scores: ScoreCardSummary,
    pub advisory: Advisory,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub session_id: SessionId,
    pub sequence: usize,
    pub submitted_at: DateTime<Utc>,
    pub total_submissions: usize,
}

impl<R, G> SurveyService<R, G>
where
    R: SessionRepository + 'static,
    G: ReportGenerator + 'static,
{
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        engine: ScoringEngine,
        sessions: Arc<R>,
        advisor: Arc<G>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            catalog,
            engine: Arc::new(engine),
            sessions,
            advisor,
            population: Mutex::new(PopulationLedger::default()),
            settings,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn sections(&self) -> Result<Vec<CatalogSection>, SurveyServiceError> {
        Ok(self.catalog.sections(self.engine.classifier())?)
    }

    /// Start a new session, optionally seeded with organization details.
    pub fn start(
        &self,
        organization: Option<OrganizationProfile>,
    ) -> Result<SessionView, SurveyServiceError> {
        let session = SurveySession::new(next_session_id(), self.catalog.clone())
            .with_organization(organization.unwrap_or_default());
        let stored = self.sessions.insert(session)?;
        info!(session_id = %stored.id(), "survey session started");
        Ok(stored.view())
    }

    pub fn session(&self, id: &SessionId) -> Result<SurveySession, SurveyServiceError> {
        let session = self.sessions.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(session)
    }

    pub fn update_organization(
        &self,
        id: &SessionId,
        organization: OrganizationProfile,
    ) -> Result<SessionView, SurveyServiceError> {
        let view = self.sessions.modify(id, |session| {
            session.set_organization(organization);
            session.view()
        })?;
        Ok(view)
    }

    /// Record or overwrite a single answer.
    pub fn record(
        &self,
        id: &SessionId,
        question_id: QuestionId,
        level: LikertLevel,
    ) -> Result<SessionView, SurveyServiceError> {
        let view = self.sessions.modify(id, |session| {
            session
                .record(question_id, level)
                .map(|_| session.view())
        })??;
        Ok(view)
    }

    /// Discard all answers so the respondent can retake the assessment.
    pub fn reset(&self, id: &SessionId) -> Result<SessionView, SurveyServiceError> {
        let view = self.sessions.modify(id, |session| {
            session.reset();
            session.view()
        })?;
        info!(session_id = %id, "survey session reset");
        Ok(view)
    }

    /// Full rescoring from the current answers.
    pub fn scores(&self, id: &SessionId) -> Result<ScoreCardSummary, SurveyServiceError> {
        let session = self.session(id)?;
        Ok(session.score(&self.engine)?.summary())
    }

    /// Scores and the advisory narrative; generator failures only add a warning.
    pub async fn report(&self, id: &SessionId) -> Result<SurveyReport, SurveyServiceError> {
        let session = self.session(id)?;
        let card = session.score(&self.engine)?;
        let prompt = session.report_prompt(&card);
        let advisory = advise(self.advisor.as_ref(), &prompt, self.settings.advisor_timeout).await;

        Ok(SurveyReport {
            session_id: id.clone(),
            scores: card.summary(),
            advisory,
        })
    }

    /// Append the session's complete answers to the population log.
    /// Each session counts once; a repeat submission is a conflict.
    pub fn submit(&self, id: &SessionId) -> Result<SubmissionReceipt, SurveyServiceError> {
        let session = self.session(id)?;
        let mut ledger = self
            .population
            .lock()
            .map_err(|_| RepositoryError::Unavailable("submission log poisoned".to_string()))?;
        if ledger.submitted.contains(id) {
            return Err(RepositoryError::AlreadySubmitted.into());
        }

        let (sequence, submitted_at) = ledger
            .log
            .append(&self.catalog, session.responses().clone(), Utc::now())
            .map(|submission| (submission.sequence(), submission.submitted_at()))?;
        ledger.submitted.insert(id.clone());
        let receipt = SubmissionReceipt {
            session_id: id.clone(),
            sequence,
            submitted_at,
            total_submissions: ledger.log.len(),
        };
        info!(
            session_id = %id,
            total = receipt.total_submissions,
            "survey submission recorded"
        );
        Ok(receipt)
    }

    pub fn population(&self) -> Result<PopulationScore, SurveyServiceError> {
        let ledger = self
            .population
            .lock()
            .map_err(|_| RepositoryError::Unavailable("submission log poisoned".to_string()))?;
        Ok(ledger
            .log
            .population_score(&self.catalog, self.settings.minimum_submissions)?)
    }
}

/// Error raised by the survey service.
#[derive(Debug, thiserror::Error)]
pub enum SurveyServiceError {
    #[error(transparent)]
    Session(#[from] RepositoryError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Population(#[from] PopulationError),
    #[error(transparent)]
    Classification(#[from] UnknownPillar),
}
