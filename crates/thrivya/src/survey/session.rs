use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogSection, QuestionCatalog};
use super::classifier::UnknownPillar;
use super::domain::{LikertLevel, QuestionId};
use super::prompt::{build_report_prompt, OrganizationProfile};
use super::responses::{ResponseError, ResponseSet};
use super::scoring::{ScoreCard, ScoringEngine, ScoringError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One respondent's in-progress assessment.
///
/// All state lives here and is passed explicitly into scoring and prompt
/// building; nothing is kept in ambient globals.
#[derive(Debug, Clone)]
pub struct SurveySession {
    id: SessionId,
    catalog: Arc<QuestionCatalog>,
    responses: ResponseSet,
    organization: OrganizationProfile,
}

/// Progress snapshot returned to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub answered: usize,
    pub total_questions: usize,
    pub remaining: usize,
    pub organization: OrganizationProfile,
}

impl SurveySession {
    pub fn new(id: SessionId, catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            id,
            catalog,
            responses: ResponseSet::new(),
            organization: OrganizationProfile::default(),
        }
    }

    pub fn with_organization(mut self, organization: OrganizationProfile) -> Self {
        self.organization = organization;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn organization(&self) -> &OrganizationProfile {
        &self.organization
    }

    pub fn set_organization(&mut self, organization: OrganizationProfile) {
        self.organization = organization;
    }

    /// Records or overwrites one answer, returning the previous level if any.
    pub fn record(
        &mut self,
        question_id: QuestionId,
        level: LikertLevel,
    ) -> Result<Option<LikertLevel>, ResponseError> {
        self.responses.record(&self.catalog, question_id, level)
    }

    /// Replaces all answers, e.g. when an exported set is reloaded.
    pub fn replace_responses(&mut self, responses: ResponseSet) {
        self.responses = responses;
    }

    /// Discards every answer for a retake; organization details are kept.
    pub fn reset(&mut self) {
        self.responses.clear();
    }

    pub fn remaining(&self) -> usize {
        self.responses.unanswered(&self.catalog).len()
    }

    pub fn sections(&self, engine: &ScoringEngine) -> Result<Vec<CatalogSection>, UnknownPillar> {
        self.catalog.sections(engine.classifier())
    }

    pub fn score(&self, engine: &ScoringEngine) -> Result<ScoreCard, ScoringError> {
        engine.score(&self.catalog, &self.responses)
    }

    pub fn report_prompt(&self, card: &ScoreCard) -> String {
        build_report_prompt(&self.organization, card, &self.catalog, &self.responses)
    }

    pub fn view(&self) -> SessionView {
        let remaining = self.remaining();
        SessionView {
            session_id: self.id.clone(),
            answered: self.catalog.len() - remaining,
            total_questions: self.catalog.len(),
            remaining,
            organization: self.organization.clone(),
        }
    }
}
