use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found")]
    NotFound,
    #[error("already liked")]
    DuplicateLike,
    #[error("invalid option")]
    InvalidOption,
    #[error("internal error: {0}")]
    Internal(String),
}
