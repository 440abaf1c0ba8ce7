use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::Deserialize;
use tokio::sync::RwLock;
use varta_domain::ports::profiles::{ProfileError, ProfileReader};
use varta_domain::ports::BoxFuture;
use varta_domain::profiles::UserProfile;

use crate::config::AppConfig;

const PROFILE_CACHE_PREFIX: &str = "varta:profile";
const PROFILE_LOOKUP_FAILURES_TOTAL: &str = "varta_profile_lookup_failures_total";

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: Option<ProfileUser>,
}

#[derive(Debug, Deserialize)]
struct ProfileUser {
    name: Option<String>,
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

#[derive(Debug, Deserialize)]
struct Subscription {
    region_id: String,
}

/// Profile reads go through Redis with a TTL before hitting the user service.
/// The cache is best effort: a missing or failing Redis only costs the
/// round-trip, never the request.
#[derive(Clone)]
pub struct HttpProfileReader {
    http: reqwest::Client,
    base_url: String,
    cache: Option<ConnectionManager>,
    cache_ttl_secs: u64,
}

impl HttpProfileReader {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.profile_timeout_ms))
            .build()?;
        let cache = match redis::Client::open(config.redis_url.as_str()) {
            Ok(client) => match ConnectionManager::new(client).await {
                Ok(manager) => Some(manager),
                Err(err) => {
                    tracing::warn!(error = %err, "profile cache unavailable; continuing without redis");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "invalid redis url; continuing without profile cache");
                None
            }
        };
        Ok(Self {
            http,
            base_url: config.profile_base_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl_secs: config.profile_cache_ttl_secs,
        })
    }

    fn cache_key(user_id: &str) -> String {
        format!("{PROFILE_CACHE_PREFIX}:{user_id}")
    }

    async fn cache_get(&self, user_id: &str) -> Option<UserProfile> {
        let mut conn = self.cache.clone()?;
        let payload: Option<String> = conn.get(Self::cache_key(user_id)).await.ok()?;
        serde_json::from_str(&payload?).ok()
    }

    async fn cache_put(&self, user_id: &str, profile: &UserProfile) {
        let Some(mut conn) = self.cache.clone() else {
            return;
        };
        let Ok(payload) = serde_json::to_string(profile) else {
            return;
        };
        let result: Result<(), redis::RedisError> = conn
            .set_ex(Self::cache_key(user_id), payload, self.cache_ttl_secs)
            .await;
        if let Err(err) = result {
            tracing::debug!(user_id, error = %err, "profile cache write failed");
        }
    }

    async fn fetch(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileError> {
        let url = format!("{}/api/v1/users/profile/{user_id}", self.base_url);
        let response = self.http.get(&url).send().await.map_err(|err| {
            counter!(PROFILE_LOOKUP_FAILURES_TOTAL, "reason" => "transport").increment(1);
            ProfileError::Unavailable(err.to_string())
        })?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            counter!(PROFILE_LOOKUP_FAILURES_TOTAL, "reason" => "upstream_status").increment(1);
            return Err(ProfileError::Unavailable(format!(
                "profile service returned {}",
                response.status()
            )));
        }
        let body: ProfileResponse = response.json().await.map_err(|err| {
            counter!(PROFILE_LOOKUP_FAILURES_TOTAL, "reason" => "decode").increment(1);
            ProfileError::InvalidResponse(err.to_string())
        })?;
        Ok(body.user.map(|user| UserProfile {
            name: user.name,
            subscribed_region_ids: user
                .subscriptions
                .into_iter()
                .map(|subscription| subscription.region_id)
                .collect(),
        }))
    }
}

impl ProfileReader for HttpProfileReader {
    fn profile(&self, user_id: &str) -> BoxFuture<'_, Result<Option<UserProfile>, ProfileError>> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            if let Some(profile) = self.cache_get(&user_id).await {
                return Ok(Some(profile));
            }
            let profile = self.fetch(&user_id).await?;
            if let Some(profile) = profile.as_ref() {
                self.cache_put(&user_id, profile).await;
            }
            Ok(profile)
        })
    }
}

/// Backing store for tests and the `memory` data backend.
#[derive(Default)]
pub struct InMemoryProfileReader {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl InMemoryProfileReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: impl Into<String>, profile: UserProfile) {
        self.profiles.write().await.insert(user_id.into(), profile);
    }
}

impl ProfileReader for InMemoryProfileReader {
    fn profile(&self, user_id: &str) -> BoxFuture<'_, Result<Option<UserProfile>, ProfileError>> {
        let user_id = user_id.to_string();
        let profiles = self.profiles.clone();
        Box::pin(async move { Ok(profiles.read().await.get(&user_id).cloned()) })
    }
}
