use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use varta_domain::content::CommentEntry;
use varta_domain::polls::{Poll, PollCreate, PollService, PollUpdate};

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
        .route("/v1/polls", post(create_poll))
        .route("/v1/polls/featured", get(featured_polls))
        .route(
            "/v1/polls/:poll_id",
            get(get_poll).put(update_poll).delete(delete_poll),
        )
        .route("/v1/polls/:poll_id/status", patch(moderate_poll))
        .route("/v1/polls/:poll_id/vote", post(vote_poll))
        .route("/v1/polls/:poll_id/like", post(like_poll))
        .route("/v1/polls/:poll_id/share", post(share_poll))
        .route("/v1/polls/:poll_id/comment", post(comment_poll))
        .route("/v1/polls/:poll_id/comments", get(list_comments))
        .route("/v1/polls/region/:region_id", get(by_region))
        .route("/v1/polls/region-type/:region_type", get(by_region_type))
}

fn service(state: &AppState) -> PollService {
    PollService::new(state.poll_repo.clone())
}

#[derive(Debug, Deserialize, Validate)]
struct CreatePollRequest {
    #[validate(length(min = 1, max = 500))]
    question: String,
    #[validate(length(min = 1, max = 20))]
    options: Vec<String>,
    region_type: String,
    region_id: String,
    reporter_id: Option<String>,
}

async fn create_poll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreatePollRequest>,
) -> Result<Response, ApiError> {
    let actor = require_admin(&auth)?;
    validation::validate(&payload)?;
    let region = parse_region(&payload.region_type, payload.region_id)?;

    let input = PollCreate {
        question: payload.question,
        option_texts: payload.options,
        region,
        reporter_id: payload.reporter_id.unwrap_or(actor.user_id),
    };
    let poll = service(&state)
        .create(input)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Poll created successfully", "poll": poll })),
    )
        .into_response())
}

#[derive(Debug, Deserialize, Validate)]
struct UpdatePollRequest {
    #[validate(length(min = 1, max = 500))]
    question: Option<String>,
    #[validate(length(min = 1, max = 20))]
    options: Option<Vec<String>>,
    region_type: Option<String>,
    region_id: Option<String>,
    featured: Option<bool>,
}

async fn update_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdatePollRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = require_admin(&auth)?;
    validation::validate(&payload)?;
    let region = parse_region_update(payload.region_type, payload.region_id)?;

    let update = PollUpdate {
        question: payload.question,
        option_texts: payload.options,
        region,
        editor_id: Some(actor.user_id),
        featured: payload.featured,
    };
    let poll = service(&state)
        .update(&poll_id, update)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(
        json!({ "message": "Poll updated successfully", "poll": poll }),
    ))
}

async fn delete_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    service(&state)
        .delete(&poll_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(json!({ "message": "Poll deleted successfully" })))
}

#[derive(Debug, Deserialize)]
struct ModerateRequest {
    status: String,
}

async fn moderate_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ModerateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_moderator(&auth)?;
    let poll = service(&state)
        .moderate(&poll_id, &payload.status)
        .await
        .map_err(map_domain_error)?;
    crate::observability::register_moderation_decision("poll", poll.status.as_str());
    Ok(Json(
        json!({ "message": "Poll status updated successfully", "poll": poll }),
    ))
}

#[derive(Debug, Deserialize)]
struct VoteRequest {
    option_index: i64,
}

async fn vote_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let poll = service(&state)
        .vote(&poll_id, payload.option_index)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Vote recorded successfully", "poll": poll }),
    ))
}

#[derive(Debug, Deserialize)]
struct EngagementRequest {
    user_id: Option<String>,
}

async fn like_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    payload: Option<Json<EngagementRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.and_then(|Json(body)| body.user_id))?;
    let poll = service(&state)
        .like(&poll_id, &user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Poll liked successfully", "poll": poll }),
    ))
}

async fn share_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    payload: Option<Json<EngagementRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.and_then(|Json(body)| body.user_id))?;
    let poll = service(&state)
        .share(&poll_id, &user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Poll shared successfully", "poll": poll }),
    ))
}

#[derive(Debug, Deserialize)]
struct CommentRequest {
    user_id: Option<String>,
    text: String,
}

async fn comment_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.user_id)?;
    let poll = service(&state)
        .comment(&poll_id, &user_id, payload.text)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Comment added successfully", "poll": poll }),
    ))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> Result<Json<Vec<CommentEntry>>, ApiError> {
    let comments = service(&state)
        .comments(&poll_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(comments))
}

async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> Result<Json<Poll>, ApiError> {
    let poll = service(&state)
        .get(&poll_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(poll))
}

async fn by_region(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> Result<Json<Vec<Poll>>, ApiError> {
    let items = service(&state)
        .by_region(&region_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(items))
}

async fn by_region_type(
    State(state): State<AppState>,
    Path(region_type): Path<String>,
) -> Result<Json<Vec<Poll>>, ApiError> {
    let items = service(&state)
        .by_region_type(&region_type)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(items))
}

async fn featured_polls(State(state): State<AppState>) -> Result<Json<Vec<Poll>>, ApiError> {
    let items = service(&state)
        .featured()
        .await
        .map_err(map_domain_error)?;
    Ok(Json(items))
}
