mod events;
mod news;
mod polls;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use varta_domain::auth::Role;
use varta_domain::error::DomainError;
use varta_domain::identity::ActorIdentity;
use varta_domain::region::{RegionRef, RegionType};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::observability;
use crate::state::AppState;
use crate::middleware as app_middleware;

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(news::routes())
        .merge(events::routes())
        .merge(polls::routes())
        .layer(app_middleware::timeout_layer())
        .layer(app_middleware::trace_layer())
        .layer(app_middleware::set_request_id_layer())
        .layer(app_middleware::propagate_request_id_layer())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth_middleware,
        ))
        .layer(middleware::from_fn(
            app_middleware::correlation_id_middleware,
        ))
        .layer(middleware::from_fn(app_middleware::metrics_layer));

    if !state.config.app_env.eq_ignore_ascii_case("test") {
        app = app.layer(app_middleware::rate_limit_layer());
    }

    app.with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "ok";
    let database = match &state.db {
        Some(adapter) => match adapter.health_check().await {
            Ok(()) => Some("ok"),
            Err(err) => {
                tracing::warn!(adapter = adapter.name(), error = %err, "database health check failed");
                status = "degraded";
                Some("unavailable")
            }
        },
        None => None,
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.app_env.clone(),
        database,
    })
}

async fn metrics() -> Response {
    match observability::render_metrics() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

fn actor_identity(auth: &AuthContext) -> Result<ActorIdentity, ApiError> {
    let user_id = auth
        .user_id
        .as_ref()
        .filter(|user_id| !user_id.trim().is_empty())
        .ok_or(ApiError::Unauthorized)?;
    Ok(ActorIdentity {
        user_id: user_id.to_string(),
        username: auth.username.clone().unwrap_or_else(|| user_id.to_string()),
    })
}

/// Engagement is open to any caller who names a user: the request body's
/// `user_id` wins, otherwise the authenticated subject is used.
fn engagement_user_id(
    auth: &AuthContext,
    body_user_id: Option<String>,
) -> Result<String, ApiError> {
    if let Some(user_id) = body_user_id {
        let user_id = user_id.trim().to_string();
        if !user_id.is_empty() {
            return Ok(user_id);
        }
    }
    Ok(actor_identity(auth)?.user_id)
}

/// Create, update, delete, and feature are admin-only.
fn require_admin(auth: &AuthContext) -> Result<ActorIdentity, ApiError> {
    let actor = actor_identity(auth)?;
    if !auth.role.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(actor)
}

/// Moderation decisions are open to moderators as well as admins.
fn require_moderator(auth: &AuthContext) -> Result<ActorIdentity, ApiError> {
    let actor = actor_identity(auth)?;
    if !auth.role.is_admin() && auth.role != Role::Moderator {
        return Err(ApiError::Forbidden);
    }
    Ok(actor)
}

fn parse_region(region_type: &str, region_id: String) -> Result<RegionRef, ApiError> {
    let region_type = RegionType::parse(region_type)
        .ok_or_else(|| ApiError::InvalidInput(format!("invalid region type '{region_type}'")))?;
    Ok(RegionRef::new(region_type, region_id))
}

fn parse_region_update(
    region_type: Option<String>,
    region_id: Option<String>,
) -> Result<Option<RegionRef>, ApiError> {
    match (region_type, region_id) {
        (Some(region_type), Some(region_id)) => Ok(Some(parse_region(&region_type, region_id)?)),
        (None, None) => Ok(None),
        _ => Err(ApiError::Validation(
            "region_type and region_id must be provided together".into(),
        )),
    }
}

fn map_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(message) => ApiError::Validation(message),
        DomainError::InvalidInput(message) => ApiError::InvalidInput(message),
        DomainError::NotFound => ApiError::NotFound,
        DomainError::DuplicateLike => ApiError::DuplicateLike,
        DomainError::InvalidOption => ApiError::InvalidOption,
        DomainError::Internal(message) => {
            tracing::error!(error = %message, "domain operation failed");
            ApiError::Internal
        }
    }
}
