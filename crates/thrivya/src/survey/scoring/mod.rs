mod card;
pub mod views;

pub use card::{CategoryTally, PillarScores, ScoreCard};

use super::catalog::QuestionCatalog;
use super::classifier::{PillarClassifier, UnknownPillar};
use super::domain::{Category, QuestionId};
use super::responses::ResponseSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// How unanswered questions are treated when scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Unanswered questions contribute nothing to any sum or count.
    #[default]
    Partial,
    /// Every catalog question must be answered before scores are produced.
    Complete,
}

impl CompletionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "partial" => Some(Self::Partial),
            "complete" | "full" => Some(Self::Complete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("question '{question_id}' cannot be scored: {source}")]
    UnknownPillar {
        question_id: QuestionId,
        #[source]
        source: UnknownPillar,
    },
    #[error("answer {remaining} more questions to see results")]
    Incomplete { remaining: usize },
}

impl ScoringError {
    /// Configuration errors point at bad deployment data rather than user input.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScoringError::UnknownPillar { .. })
    }
}

/// Stateless engine turning a response set into a score card.
///
/// Every call rebuilds the per-pillar and per-category accumulators from
/// scratch, so repeated calls on unchanged input give identical results.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    classifier: PillarClassifier,
    policy: CompletionPolicy,
}

impl ScoringEngine {
    pub fn new(classifier: PillarClassifier, policy: CompletionPolicy) -> Self {
        Self { classifier, policy }
    }

    pub fn with_policy(policy: CompletionPolicy) -> Self {
        Self::new(PillarClassifier::standard(), policy)
    }

    pub fn classifier(&self) -> &PillarClassifier {
        &self.classifier
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    pub fn score(
        &self,
        catalog: &QuestionCatalog,
        responses: &ResponseSet,
    ) -> Result<ScoreCard, ScoringError> {
        let mut pillars: Vec<PillarScores> = Vec::new();
        let mut tallies: BTreeMap<Category, CategoryTally> = Category::ordered()
            .into_iter()
            .map(|category| (category, CategoryTally::default()))
            .collect();
        let mut answered = 0;

        for question in catalog.questions() {
            let category = self.classifier.classify(&question.pillar).map_err(|source| {
                ScoringError::UnknownPillar {
                    question_id: question.id.clone(),
                    source,
                }
            })?;

            let index = match pillars
                .iter()
                .position(|entry| entry.pillar == question.pillar)
            {
                Some(index) => index,
                None => {
                    pillars.push(PillarScores::new(question.pillar.clone(), category));
                    pillars.len() - 1
                }
            };

            let Some(level) = responses.get(&question.id) else {
                continue;
            };

            let score = level.score();
            pillars[index].scores.push(score);
            let tally = tallies.entry(category).or_default();
            tally.sum += u32::from(score);
            tally.count += 1;
            answered += 1;
        }

        if self.policy == CompletionPolicy::Complete && answered < catalog.len() {
            return Err(ScoringError::Incomplete {
                remaining: catalog.len() - answered,
            });
        }

        let card = ScoreCard::from_tallies(pillars, tallies, answered, catalog.len());
        debug!(
            answered,
            total = catalog.len(),
            overall = card.overall_score,
            "scored response set"
        );
        Ok(card)
    }
}
