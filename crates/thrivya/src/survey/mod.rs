//! Culture pulse survey: catalog, scoring, population aggregation and reports.

pub mod advisor;
pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod population;
pub mod prompt;
pub mod repository;
pub mod responses;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

pub use advisor::{advise, Advisory, CohereReportGenerator, CollaboratorError, ReportGenerator};
pub use catalog::{load_cached, CatalogError, CatalogSection, CatalogSource, QuestionCatalog};
pub use classifier::{PillarClassifier, UnknownPillar};
pub use domain::{round2, Band, Category, LikertLevel, Question, QuestionId};
pub use population::{
    PopulationError, PopulationScore, Submission, SubmissionLog, DEFAULT_MINIMUM_SUBMISSIONS,
};
pub use prompt::{build_report_prompt, CulturalPriority, OrganizationProfile, TeamSize};
pub use repository::{RepositoryError, SessionRepository};
pub use responses::{ResponseError, ResponseSet};
pub use router::survey_router;
pub use scoring::views::{
    CategoryScoreEntry, OverallScoreView, PillarScoreEntry, ScoreCardSummary,
};
pub use scoring::{
    CategoryTally, CompletionPolicy, PillarScores, ScoreCard, ScoringEngine, ScoringError,
};
pub use service::{
    ServiceSettings, SubmissionReceipt, SurveyReport, SurveyService, SurveyServiceError,
};
pub use session::{SessionId, SessionView, SurveySession};
