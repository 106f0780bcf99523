//! Population-level aggregation across independent respondents.
//!
//! This is a different unit of aggregation from [`ScoringEngine`]: instead of
//! one respondent's category averages it folds raw scores from many complete
//! submissions into a single percentage of the maximum attainable score.
//!
//! [`ScoringEngine`]: super::scoring::ScoringEngine

use super::catalog::QuestionCatalog;
use super::domain::{round2, Band, LikertLevel};
use super::responses::ResponseSet;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_MINIMUM_SUBMISSIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error("submission is missing {remaining} answers")]
    IncompleteSubmission { remaining: usize },
    #[error("population results need at least {required} submissions ({received} received)")]
    InsufficientSubmissions { required: usize, received: usize },
}

/// Immutable snapshot of one respondent's complete answers.
#[derive(Debug, Clone)]
pub struct Submission {
    sequence: usize,
    submitted_at: DateTime<Utc>,
    responses: ResponseSet,
}

impl Submission {
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }
}

/// Append-only record of submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLog {
    submissions: Vec<Submission>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationScore {
    pub submissions: usize,
    pub total_score: u64,
    pub max_score: u64,
    pub percentage: f64,
    pub band: Band,
    pub band_label: &'static str,
    pub band_icon: &'static str,
}

impl SubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        catalog: &QuestionCatalog,
        responses: ResponseSet,
        submitted_at: DateTime<Utc>,
    ) -> Result<&Submission, PopulationError> {
        let remaining = responses.unanswered(catalog).len();
        if remaining > 0 {
            return Err(PopulationError::IncompleteSubmission { remaining });
        }

        let sequence = self.submissions.len() + 1;
        self.submissions.push(Submission {
            sequence,
            submitted_at,
            responses,
        });
        Ok(&self.submissions[sequence - 1])
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// `100 * sum(scores) / (questions * 4 * submissions)` once the gate is met.
    pub fn population_score(
        &self,
        catalog: &QuestionCatalog,
        minimum_submissions: usize,
    ) -> Result<PopulationScore, PopulationError> {
        let received = self.submissions.len();
        if received < minimum_submissions.max(1) {
            return Err(PopulationError::InsufficientSubmissions {
                required: minimum_submissions.max(1),
                received,
            });
        }

        let total_score: u64 = self
            .submissions
            .iter()
            .map(|submission| {
                catalog
                    .questions()
                    .iter()
                    .filter_map(|question| submission.responses.get(&question.id))
                    .map(|level| u64::from(level.score()))
                    .sum::<u64>()
            })
            .sum();
        let max_score =
            catalog.len() as u64 * u64::from(LikertLevel::MAX_SCORE) * received as u64;

        let percentage = if max_score == 0 {
            0.0
        } else {
            round2(100.0 * total_score as f64 / max_score as f64)
        };
        let band = Band::from_percentage(percentage);

        Ok(PopulationScore {
            submissions: received,
            total_score,
            max_score,
            percentage,
            band,
            band_label: band.label(),
            band_icon: band.icon(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(catalog: &QuestionCatalog, level: LikertLevel) -> ResponseSet {
        let mut responses = ResponseSet::new();
        for question in catalog.questions() {
            responses
                .record(catalog, question.id.clone(), level)
                .expect("record");
        }
        responses
    }

    #[test]
    fn gate_requires_minimum_submissions() {
        let catalog = QuestionCatalog::bundled().expect("bundled");
        let mut log = SubmissionLog::new();
        for _ in 0..4 {
            log.append(&catalog, complete(&catalog, LikertLevel::Agree), Utc::now())
                .expect("append");
        }
        let err = log
            .population_score(&catalog, DEFAULT_MINIMUM_SUBMISSIONS)
            .expect_err("gate");
        assert_eq!(
            err,
            PopulationError::InsufficientSubmissions {
                required: 5,
                received: 4
            }
        );
    }

    #[test]
    fn percentage_folds_all_submissions() {
        let catalog = QuestionCatalog::bundled().expect("bundled");
        let mut log = SubmissionLog::new();
        let levels = [
            LikertLevel::StronglyAgree,
            LikertLevel::StronglyAgree,
            LikertLevel::Agree,
            LikertLevel::Neutral,
            LikertLevel::Disagree,
        ];
        for level in levels {
            log.append(&catalog, complete(&catalog, level), Utc::now())
                .expect("append");
        }

        let score = log
            .population_score(&catalog, DEFAULT_MINIMUM_SUBMISSIONS)
            .expect("score");
        // (4+4+3+2+1) * 24 / (24 * 4 * 5) = 14/20
        assert_eq!(score.total_score, 14 * 24);
        assert_eq!(score.max_score, 24 * 4 * 5);
        assert_eq!(score.percentage, 70.0);
        assert_eq!(score.band, Band::Good);
        assert_eq!(log.submissions()[4].sequence(), 5);
    }

    #[test]
    fn incomplete_submissions_are_refused() {
        let catalog = QuestionCatalog::bundled().expect("bundled");
        let mut log = SubmissionLog::new();
        let mut partial = ResponseSet::new();
        partial
            .record(&catalog, "LV1".into(), LikertLevel::Agree)
            .expect("record");
        let err = log
            .append(&catalog, partial, Utc::now())
            .expect_err("incomplete");
        assert_eq!(err, PopulationError::IncompleteSubmission { remaining: 23 });
        assert!(log.is_empty());
    }
}
