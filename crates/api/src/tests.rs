use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceExt;

use varta_domain::profiles::UserProfile;
use varta_infra::config::AppConfig;
use varta_infra::profiles::InMemoryProfileReader;
use varta_infra::repositories::{
    InMemoryEventRepository, InMemoryNewsRepository, InMemoryPollRepository,
};

use crate::routes;
use crate::state::AppState;

#[derive(Serialize)]
struct Claims {
    sub: String,
    role: String,
    exp: usize,
}

fn test_config() -> AppConfig {
    AppConfig {
        app_env: "test".to_string(),
        port: 0,
        log_level: "info".to_string(),
        data_backend: "memory".to_string(),
        surreal_endpoint: "ws://127.0.0.1:8000".to_string(),
        surreal_ns: "varta".to_string(),
        surreal_db: "content".to_string(),
        surreal_user: "root".to_string(),
        surreal_pass: "root".to_string(),
        redis_url: "redis://127.0.0.1:6379".to_string(),
        jwt_secret: "test-secret".to_string(),
        profile_base_url: "http://127.0.0.1:5001".to_string(),
        profile_timeout_ms: 1_000,
        profile_cache_ttl_secs: 60,
    }
}

fn test_token(role: &str, sub: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_secs();
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: (now + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret("test-secret".as_bytes()),
    )
    .expect("token")
}

fn admin_token() -> String {
    test_token("admin", "admin-1")
}

fn user_token() -> String {
    test_token("user", "user-1")
}

fn test_app() -> (axum::Router, Arc<InMemoryProfileReader>) {
    let profiles = Arc::new(InMemoryProfileReader::new());
    let state = AppState::with_repositories(
        test_config(),
        Arc::new(InMemoryNewsRepository::new()),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(InMemoryPollRepository::new()),
        profiles.clone(),
    );
    (routes::router(state), profiles)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn news_body(title: &str, region_id: &str) -> Value {
    json!({
        "title": title,
        "description": "Body of the article",
        "region_type": "City",
        "region_id": region_id,
    })
}

fn event_body(title: &str, region_id: &str) -> Value {
    json!({
        "title": title,
        "description": "An event happening soon",
        "date_ms": 1_756_000_000_000i64,
        "region_type": "District",
        "region_id": region_id,
    })
}

fn poll_body(question: &str, region_id: &str) -> Value {
    json!({
        "question": question,
        "options": ["Yes", "No"],
        "region_type": "State",
        "region_id": region_id,
    })
}

async fn create_news(app: &axum::Router, title: &str, region_id: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/v1/news",
            Some(&admin_token()),
            Some(news_body(title, region_id)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create news: {body}");
    body["news"].clone()
}

async fn create_event(app: &axum::Router, title: &str, region_id: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/v1/events",
            Some(&admin_token()),
            Some(event_body(title, region_id)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event: {body}");
    body["event"].clone()
}

async fn create_poll(app: &axum::Router, question: &str, region_id: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/v1/polls",
            Some(&admin_token()),
            Some(poll_body(question, region_id)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create poll: {body}");
    body["poll"].clone()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = test_app();
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn create_news_is_admin_only() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        request("POST", "/v1/news", None, Some(news_body("A", "r1"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/v1/news",
            Some(&user_token()),
            Some(news_body("A", "r1")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn news_is_approved_at_creation_and_listed_by_region() {
    let (app, _) = test_app();
    let news = create_news(&app, "Flyover opens", "r1").await;
    assert_eq!(news["status"], "approved");

    let (status, body) = send(&app, request("GET", "/v1/news/region/r1", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
    assert_eq!(body[0]["title"], "Flyover opens");
}

#[tokio::test]
async fn duplicate_news_title_is_rejected() {
    let (app, _) = test_app();
    create_news(&app, "Budget session", "r1").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/v1/news",
            Some(&admin_token()),
            Some(news_body("Budget session", "r2")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn events_stay_pending_until_approved() {
    let (app, _) = test_app();
    let event = create_event(&app, "Book fair", "d1").await;
    assert_eq!(event["status"], "pending");
    let event_id = event["event_id"].as_str().expect("id").to_string();

    let (status, _) = send(&app, request("GET", "/v1/events/region/d1", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/events/{event_id}/status"),
            Some(&admin_token()),
            Some(json!({ "status": "approved" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["status"], "approved");

    let (status, body) = send(&app, request("GET", "/v1/events/region/d1", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn rejected_events_stay_out_of_listings() {
    let (app, _) = test_app();
    let event = create_event(&app, "Night market", "d2").await;
    let event_id = event["event_id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/events/{event_id}/status"),
            Some(&admin_token()),
            Some(json!({ "status": "rejected" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", "/v1/events/region/d2", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moderation_rejects_unknown_status_values() {
    let (app, _) = test_app();
    let event = create_event(&app, "Marathon", "d3").await;
    let event_id = event["event_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/events/{event_id}/status"),
            Some(&admin_token()),
            Some(json!({ "status": "published" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn moderator_role_can_moderate_but_not_create() {
    let (app, _) = test_app();
    let event = create_event(&app, "Fair", "d4").await;
    let event_id = event["event_id"].as_str().expect("id").to_string();
    let moderator = test_token("moderator", "mod-1");

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/v1/events",
            Some(&moderator),
            Some(event_body("Another", "d4")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/events/{event_id}/status"),
            Some(&moderator),
            Some(json!({ "status": "approved" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["status"], "approved");
}

#[tokio::test]
async fn second_like_from_same_user_is_rejected() {
    let (app, _) = test_app();
    let news = create_news(&app, "Metro update", "r1").await;
    let news_id = news["news_id"].as_str().expect("id").to_string();
    let token = user_token();

    let (status, body) = send(
        &app,
        request("PATCH", &format!("/v1/news/{news_id}/like"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["news"]["likes"].as_array().expect("likes").len(), 1);

    let (status, body) = send(
        &app,
        request("PATCH", &format!("/v1/news/{news_id}/like"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "duplicate_like");
}

#[tokio::test]
async fn repeat_shares_accumulate() {
    let (app, _) = test_app();
    let news = create_news(&app, "Monsoon alert", "r1").await;
    let news_id = news["news_id"].as_str().expect("id").to_string();
    let token = user_token();

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            request(
                "PATCH",
                &format!("/v1/news/{news_id}/share"),
                Some(&token),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/v1/news/{news_id}/share"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(body["news"]["shares"].as_array().expect("shares").len(), 3);
}

#[tokio::test]
async fn comments_append_and_list_in_order() {
    let (app, _) = test_app();
    let poll = create_poll(&app, "New bus routes?", "s1").await;
    let poll_id = poll["poll_id"].as_str().expect("id").to_string();

    for text in ["first", "second"] {
        let (status, _) = send(
            &app,
            request(
                "POST",
                &format!("/v1/polls/{poll_id}/comment"),
                Some(&user_token()),
                Some(json!({ "text": text })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        request("GET", &format!("/v1/polls/{poll_id}/comments"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body.as_array().expect("comments");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "first");
    assert_eq!(comments[1]["text"], "second");
}

#[tokio::test]
async fn engagement_without_any_user_id_is_unauthorized() {
    let (app, _) = test_app();
    let news = create_news(&app, "Water supply", "r1").await;
    let news_id = news["news_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request("PATCH", &format!("/v1/news/{news_id}/like"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn engagement_accepts_user_id_from_body_without_a_token() {
    let (app, _) = test_app();
    let news = create_news(&app, "Bridge reopens", "r1").await;
    let news_id = news["news_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/v1/news/{news_id}/like"),
            None,
            Some(json!({ "user_id": "u-9" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let likes = body["news"]["likes"].as_array().expect("likes");
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0]["user_id"], "u-9");

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/v1/news/{news_id}/like"),
            None,
            Some(json!({ "user_id": "u-9" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "duplicate_like");

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/v1/news/{news_id}/comment"),
            None,
            Some(json!({ "user_id": "u-9", "text": "good news" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["news"]["comments"].as_array().expect("comments");
    assert_eq!(comments[0]["user_id"], "u-9");
}

#[tokio::test]
async fn body_user_id_overrides_the_authenticated_subject() {
    let (app, _) = test_app();
    let poll = create_poll(&app, "New cycle lanes?", "s1").await;
    let poll_id = poll["poll_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/v1/polls/{poll_id}/share"),
            Some(&user_token()),
            Some(json!({ "user_id": "u-42" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let shares = body["poll"]["shares"].as_array().expect("shares");
    assert_eq!(shares[0]["user_id"], "u-42");
}

#[tokio::test]
async fn vote_checks_option_bounds() {
    let (app, _) = test_app();
    let poll = create_poll(&app, "Extend park hours?", "s1").await;
    let poll_id = poll["poll_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/v1/polls/{poll_id}/vote"),
            None,
            Some(json!({ "option_index": 5 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_option");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/v1/polls/{poll_id}/vote"),
            None,
            Some(json!({ "option_index": -1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_option");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/v1/polls/{poll_id}/vote"),
            None,
            Some(json!({ "option_index": 1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poll"]["options"][1]["vote_count"], 1);
    assert_eq!(body["poll"]["options"][0]["vote_count"], 0);
}

#[tokio::test]
async fn featured_news_is_capped_at_four() {
    let (app, _) = test_app();
    for index in 0..5 {
        let news = create_news(&app, &format!("Story {index}"), "r1").await;
        let news_id = news["news_id"].as_str().expect("id").to_string();
        let (status, _) = send(
            &app,
            request(
                "PATCH",
                &format!("/v1/news/{news_id}/feature"),
                Some(&admin_token()),
                Some(json!({ "featured": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, request("GET", "/v1/news/featured", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 4);
}

#[tokio::test]
async fn direct_lookup_ignores_moderation_status() {
    let (app, _) = test_app();
    let event = create_event(&app, "Pending expo", "d9").await;
    let event_id = event["event_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request("GET", &format!("/v1/events/{event_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn reporter_name_falls_back_when_profile_missing() {
    let (app, profiles) = test_app();
    let news = create_news(&app, "Harvest report", "r1").await;
    let news_id = news["news_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request("GET", &format!("/v1/news/{news_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reporter"], "Unknown Reporter");

    profiles
        .insert(
            "admin-1",
            UserProfile {
                name: Some("Asha Rao".to_string()),
                subscribed_region_ids: vec![],
            },
        )
        .await;

    let (_, body) = send(
        &app,
        request("GET", &format!("/v1/news/{news_id}"), None, None),
    )
    .await;
    assert_eq!(body["reporter"], "Asha Rao");
}

#[tokio::test]
async fn subscribed_feed_follows_profile_subscriptions() {
    let (app, profiles) = test_app();
    create_news(&app, "Local story", "r1").await;
    create_news(&app, "Other story", "r2").await;

    profiles
        .insert(
            "user-1",
            UserProfile {
                name: Some("Dev".to_string()),
                subscribed_region_ids: vec!["r1".to_string()],
            },
        )
        .await;

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/v1/news/subscribed",
            Some(&user_token()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Local story");
}

#[tokio::test]
async fn subscribed_feed_without_subscriptions_is_not_found() {
    let (app, _) = test_app();
    create_news(&app, "Any story", "r1").await;

    let (status, _) = send(
        &app,
        request(
            "GET",
            "/v1/news/subscribed?user_id=stranger",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gallery_append_requires_files_and_valid_urls() {
    let (app, _) = test_app();
    let event = create_event(&app, "Art walk", "d1").await;
    let event_id = event["event_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/v1/events/{event_id}/gallery"),
            Some(&admin_token()),
            Some(json!({ "images": [] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/v1/events/{event_id}/gallery"),
            Some(&admin_token()),
            Some(json!({ "images": ["https://cdn.example.com/a.jpg"] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["event"]["images"].as_array().expect("images").len(),
        1
    );
}

#[tokio::test]
async fn region_type_listings_validate_the_type() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        request("GET", "/v1/news/region-type/Village", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");

    create_news(&app, "City story", "c1").await;
    let (status, body) = send(
        &app,
        request("GET", "/v1/news/region-type/City", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn empty_region_listing_is_not_found() {
    let (app, _) = test_app();
    let (status, body) = send(&app, request("GET", "/v1/polls/region/nowhere", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn featured_polls_must_also_be_approved() {
    let (app, _) = test_app();
    let poll = create_poll(&app, "Weekend closures?", "s1").await;
    let poll_id = poll["poll_id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/polls/{poll_id}"),
            Some(&admin_token()),
            Some(json!({ "featured": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", "/v1/polls/featured", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/v1/polls/{poll_id}/status"),
            Some(&admin_token()),
            Some(json!({ "status": "approved" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, request("GET", "/v1/polls/featured", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn update_never_touches_moderation_status() {
    let (app, _) = test_app();
    let poll = create_poll(&app, "Original question?", "s1").await;
    let poll_id = poll["poll_id"].as_str().expect("id").to_string();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/polls/{poll_id}"),
            Some(&admin_token()),
            Some(json!({ "question": "Edited question?" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poll"]["question"], "Edited question?");
    assert_eq!(body["poll"]["status"], "pending");
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (app, _) = test_app();
    let news = create_news(&app, "Ephemeral", "r1").await;
    let news_id = news["news_id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/v1/news/{news_id}"),
            Some(&admin_token()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request("GET", &format!("/v1/news/{news_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/v1/news/{news_id}"),
            Some(&admin_token()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
