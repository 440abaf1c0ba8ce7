use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use varta_domain::content::CommentEntry;
use varta_domain::events::{Event, EventCreate, EventService, EventUpdate};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::state::AppState;
use crate::validation;

use super::{
    engagement_user_id, map_domain_error, parse_region, parse_region_update, require_admin,
    require_moderator,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events", post(create_event))
        .route(
            "/v1/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/v1/events/:event_id/status", put(moderate_event))
        .route("/v1/events/:event_id/gallery", post(append_gallery))
        .route("/v1/events/:event_id/like", post(like_event))
        .route("/v1/events/:event_id/share", post(share_event))
        .route("/v1/events/:event_id/comment", post(comment_event))
        .route("/v1/events/:event_id/comments", get(list_comments))
        .route("/v1/events/region/:region_id", get(by_region))
        .route("/v1/events/region-type/:region_type", get(by_region_type))
}

fn service(state: &AppState) -> EventService {
    EventService::new(state.event_repo.clone())
}

#[derive(Debug, Deserialize, Validate)]
struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(min = 1))]
    description: String,
    date_ms: i64,
    #[serde(default)]
    images: Vec<String>,
    region_type: String,
    region_id: String,
    reporter_id: Option<String>,
}

async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Response, ApiError> {
    let actor = require_admin(&auth)?;
    validation::validate(&payload)?;
    let region = parse_region(&payload.region_type, payload.region_id)?;

    let input = EventCreate {
        title: payload.title,
        description: payload.description,
        date_ms: payload.date_ms,
        images: payload.images,
        region,
        reporter_id: payload.reporter_id.unwrap_or(actor.user_id),
    };
    let event = service(&state)
        .create(input)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Event created successfully", "event": event })),
    )
        .into_response())
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    title: Option<String>,
    description: Option<String>,
    date_ms: Option<i64>,
    images: Option<Vec<String>>,
    region_type: Option<String>,
    region_id: Option<String>,
}

async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = require_admin(&auth)?;
    validation::validate(&payload)?;
    let region = parse_region_update(payload.region_type, payload.region_id)?;

    let update = EventUpdate {
        title: payload.title,
        description: payload.description,
        date_ms: payload.date_ms,
        images: payload.images,
        region,
        editor_id: Some(actor.user_id),
    };
    let event = service(&state)
        .update(&event_id, update)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(
        json!({ "message": "Event updated successfully", "event": event }),
    ))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    service(&state)
        .delete(&event_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}

#[derive(Debug, Deserialize)]
struct ModerateRequest {
    status: String,
}

async fn moderate_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ModerateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_moderator(&auth)?;
    let event = service(&state)
        .moderate(&event_id, &payload.status)
        .await
        .map_err(map_domain_error)?;
    crate::observability::register_moderation_decision("event", event.status.as_str());
    Ok(Json(
        json!({ "message": "Event status updated successfully", "event": event }),
    ))
}

#[derive(Debug, Deserialize)]
struct GalleryRequest {
    #[serde(default)]
    images: Vec<String>,
}

async fn append_gallery(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<GalleryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let event = service(&state)
        .append_gallery(&event_id, payload.images)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Gallery updated successfully", "event": event }),
    ))
}

#[derive(Debug, Deserialize)]
struct EngagementRequest {
    user_id: Option<String>,
}

async fn like_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    payload: Option<Json<EngagementRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.and_then(|Json(body)| body.user_id))?;
    let event = service(&state)
        .like(&event_id, &user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Event liked successfully", "event": event }),
    ))
}

async fn share_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    payload: Option<Json<EngagementRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.and_then(|Json(body)| body.user_id))?;
    let event = service(&state)
        .share(&event_id, &user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Event shared successfully", "event": event }),
    ))
}

#[derive(Debug, Deserialize)]
struct CommentRequest {
    user_id: Option<String>,
    text: String,
}

async fn comment_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.user_id)?;
    let event = service(&state)
        .comment(&event_id, &user_id, payload.text)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Comment added successfully", "event": event }),
    ))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<CommentEntry>>, ApiError> {
    let comments = service(&state)
        .comments(&event_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(comments))
}

async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = service(&state)
        .get(&event_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(event))
}

async fn by_region(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let items = service(&state)
        .by_region(&region_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(items))
}

async fn by_region_type(
    State(state): State<AppState>,
    Path(region_type): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let items = service(&state)
        .by_region_type(&region_type)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(items))
}
