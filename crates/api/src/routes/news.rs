use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use varta_domain::content::CommentEntry;
use varta_domain::news::{News, NewsCreate, NewsService, NewsSummary, NewsUpdate};

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::state::AppState;
use crate::validation;

use super::{
    actor_identity, engagement_user_id, map_domain_error, parse_region, parse_region_update,
    require_admin, require_moderator,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/news", post(create_news))
        .route("/v1/news/featured", get(featured_news))
        .route("/v1/news/trending", get(trending_news))
        .route("/v1/news/subscribed", get(subscribed_news))
        .route(
            "/v1/news/:news_id",
            get(get_news).patch(update_news).delete(delete_news),
        )
        .route("/v1/news/:news_id/status", patch(moderate_news))
        .route("/v1/news/:news_id/feature", patch(feature_news))
        .route("/v1/news/:news_id/like", patch(like_news))
        .route("/v1/news/:news_id/share", patch(share_news))
        .route("/v1/news/:news_id/comment", patch(comment_news))
        .route("/v1/news/:news_id/comments", get(list_comments))
        .route("/v1/news/region/:region_id", get(by_region))
        .route("/v1/news/region-type/:region_type", get(by_region_type))
}

fn service(state: &AppState) -> NewsService {
    NewsService::new(state.news_repo.clone(), state.profiles.clone())
}

#[derive(Debug, Deserialize, Validate)]
struct CreateNewsRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(min = 1))]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    date_ms: Option<i64>,
    #[serde(default)]
    images: Vec<String>,
    region_type: String,
    region_id: String,
    reporter_id: Option<String>,
}

async fn create_news(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateNewsRequest>,
) -> Result<Response, ApiError> {
    let actor = require_admin(&auth)?;
    validation::validate(&payload)?;
    let region = parse_region(&payload.region_type, payload.region_id)?;

    let input = NewsCreate {
        title: payload.title,
        description: payload.description,
        tags: payload.tags,
        date_ms: payload.date_ms,
        images: payload.images,
        region,
        reporter_id: payload.reporter_id.unwrap_or(actor.user_id),
    };
    let news = service(&state).create(input).await.map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "News created successfully", "news": news })),
    )
        .into_response())
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateNewsRequest {
    #[validate(length(min = 1, max = 200))]
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    date_ms: Option<i64>,
    images: Option<Vec<String>>,
    region_type: Option<String>,
    region_id: Option<String>,
    trending: Option<bool>,
}

async fn update_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateNewsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = require_admin(&auth)?;
    validation::validate(&payload)?;
    let region = parse_region_update(payload.region_type, payload.region_id)?;

    let update = NewsUpdate {
        title: payload.title,
        description: payload.description,
        tags: payload.tags,
        date_ms: payload.date_ms,
        images: payload.images,
        region,
        editor_id: Some(actor.user_id),
        trending: payload.trending,
    };
    let news = service(&state)
        .update(&news_id, update)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(
        json!({ "message": "News updated successfully", "news": news }),
    ))
}

async fn delete_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    service(&state)
        .delete(&news_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(json!({ "message": "News deleted successfully" })))
}

#[derive(Debug, Deserialize)]
struct ModerateRequest {
    status: String,
}

async fn moderate_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ModerateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_moderator(&auth)?;
    let news = service(&state)
        .moderate(&news_id, &payload.status)
        .await
        .map_err(map_domain_error)?;
    crate::observability::register_moderation_decision("news", news.status.as_str());
    Ok(Json(
        json!({ "message": "News status updated successfully", "news": news }),
    ))
}

#[derive(Debug, Deserialize)]
struct FeatureRequest {
    featured: bool,
}

async fn feature_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<FeatureRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&auth)?;
    let news = service(&state)
        .set_featured(&news_id, payload.featured)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "News updated successfully", "news": news }),
    ))
}

#[derive(Debug, Deserialize)]
struct EngagementRequest {
    user_id: Option<String>,
}

async fn like_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    payload: Option<Json<EngagementRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.and_then(|Json(body)| body.user_id))?;
    let news = service(&state)
        .like(&news_id, &user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "News liked successfully", "news": news }),
    ))
}

async fn share_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    payload: Option<Json<EngagementRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.and_then(|Json(body)| body.user_id))?;
    let news = service(&state)
        .share(&news_id, &user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "News shared successfully", "news": news }),
    ))
}

#[derive(Debug, Deserialize)]
struct CommentRequest {
    user_id: Option<String>,
    text: String,
}

async fn comment_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = engagement_user_id(&auth, payload.user_id)?;
    let news = service(&state)
        .comment(&news_id, &user_id, payload.text)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(
        json!({ "message": "Comment added successfully", "news": news }),
    ))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
) -> Result<Json<Vec<CommentEntry>>, ApiError> {
    let comments = service(&state)
        .comments(&news_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(comments))
}

async fn get_news(
    State(state): State<AppState>,
    Path(news_id): Path<String>,
) -> Result<Json<NewsSummary>, ApiError> {
    let summary = service(&state)
        .get_summary(&news_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summary))
}

async fn by_region(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> Result<Json<Vec<NewsSummary>>, ApiError> {
    let summaries = service(&state)
        .by_region(&region_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summaries))
}

async fn by_region_type(
    State(state): State<AppState>,
    Path(region_type): Path<String>,
) -> Result<Json<Vec<News>>, ApiError> {
    let items = service(&state)
        .by_region_type(&region_type)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(items))
}

async fn featured_news(State(state): State<AppState>) -> Result<Json<Vec<NewsSummary>>, ApiError> {
    let summaries = service(&state)
        .featured()
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summaries))
}

async fn trending_news(State(state): State<AppState>) -> Result<Json<Vec<NewsSummary>>, ApiError> {
    let summaries = service(&state)
        .trending()
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summaries))
}

#[derive(Debug, Deserialize)]
struct SubscribedQuery {
    user_id: Option<String>,
}

async fn subscribed_news(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<SubscribedQuery>,
) -> Result<Json<Vec<NewsSummary>>, ApiError> {
    let user_id = match query.user_id {
        Some(user_id) if !user_id.trim().is_empty() => user_id,
        _ => actor_identity(&auth)?.user_id,
    };
    let summaries = service(&state)
        .for_subscriber(&user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summaries))
}
