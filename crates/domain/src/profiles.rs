use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ports::profiles::ProfileReader;

/// Shown in read projections whenever the profile service cannot supply a
/// display name. A profile failure never fails the request.
pub const UNKNOWN_REPORTER: &str = "Unknown Reporter";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: Option<String>,
    #[serde(default)]
    pub subscribed_region_ids: Vec<String>,
}

pub async fn display_name_or_fallback(
    profiles: &Arc<dyn ProfileReader>,
    user_id: &str,
) -> String {
    if user_id.is_empty() {
        return UNKNOWN_REPORTER.to_string();
    }
    match profiles.profile(user_id).await {
        Ok(Some(profile)) => profile.name.unwrap_or_else(|| UNKNOWN_REPORTER.to_string()),
        Ok(None) => UNKNOWN_REPORTER.to_string(),
        Err(err) => {
            tracing::warn!(user_id, error = %err, "profile lookup failed; using fallback name");
            UNKNOWN_REPORTER.to_string()
        }
    }
}
