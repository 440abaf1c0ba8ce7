use thiserror::Error;

use crate::profiles::UserProfile;

use super::BoxFuture;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile service unavailable: {0}")]
    Unavailable(String),
    #[error("invalid profile response: {0}")]
    InvalidResponse(String),
}

/// Read-only view of the external user-profile service. Callers are expected
/// to absorb every error into a fallback value; nothing here aborts a request.
pub trait ProfileReader: Send + Sync {
    fn profile(&self, user_id: &str) -> BoxFuture<'_, Result<Option<UserProfile>, ProfileError>>;
}
