use super::session::{SessionId, SurveySession};

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: SurveySession) -> Result<SurveySession, RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SurveySession>, RepositoryError>;

    /// Applies `change` to the stored session while holding the store's lock,
    /// so concurrent writers to one session never overwrite each other.
    fn modify<T, F>(&self, id: &SessionId, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut SurveySession) -> T;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session has already been submitted")]
    AlreadySubmitted,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
