use std::sync::Arc;

use serde::{Deserialize, Serialize};
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use varta_domain::content::{CommentEntry, ContentStatus, Engagement, LikeEntry, ShareEntry};
use varta_domain::error::DomainError;
use varta_domain::events::Event;
use varta_domain::news::News;
use varta_domain::polls::{Poll, PollOption};
use varta_domain::ports::events::EventRepository;
use varta_domain::ports::news::NewsRepository;
use varta_domain::ports::polls::PollRepository;
use varta_domain::ports::BoxFuture;
use varta_domain::region::{RegionRef, RegionType};
use varta_domain::DomainResult;

use crate::db::DbConfig;

pub async fn connect(config: &DbConfig) -> anyhow::Result<Arc<Surreal<Client>>> {
    let client = Surreal::new::<Ws>(config.endpoint.as_str()).await?;
    client
        .signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await?;
    client
        .use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await?;
    Ok(Arc::new(client))
}

fn map_surreal_error(err: surrealdb::Error) -> DomainError {
    DomainError::Internal(format!("surrealdb error: {err}"))
}

fn parse_status(value: &str) -> DomainResult<ContentStatus> {
    ContentStatus::parse(value)
        .ok_or_else(|| DomainError::Internal(format!("stored status '{value}' is not valid")))
}

fn parse_region(region_type: &str, region_id: String) -> DomainResult<RegionRef> {
    let region_type = RegionType::parse(region_type).ok_or_else(|| {
        DomainError::Internal(format!("stored region type '{region_type}' is not valid"))
    })?;
    Ok(RegionRef::new(region_type, region_id))
}

#[derive(Debug, Serialize, Deserialize)]
struct NewsRow {
    news_id: String,
    title: String,
    description: String,
    tags: Vec<String>,
    date_ms: i64,
    images: Vec<String>,
    status: String,
    region_type: String,
    region_id: String,
    reporter_id: String,
    editor_id: Option<String>,
    featured: bool,
    trending: bool,
    #[serde(default)]
    likes: Vec<LikeEntry>,
    #[serde(default)]
    shares: Vec<ShareEntry>,
    #[serde(default)]
    comments: Vec<CommentEntry>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl NewsRow {
    fn from_news(news: &News) -> Self {
        Self {
            news_id: news.news_id.clone(),
            title: news.title.clone(),
            description: news.description.clone(),
            tags: news.tags.clone(),
            date_ms: news.date_ms,
            images: news.images.clone(),
            status: news.status.as_str().to_string(),
            region_type: news.region.region_type().as_str().to_string(),
            region_id: news.region.region_id().to_string(),
            reporter_id: news.reporter_id.clone(),
            editor_id: news.editor_id.clone(),
            featured: news.featured,
            trending: news.trending,
            likes: news.engagement.likes.clone(),
            shares: news.engagement.shares.clone(),
            comments: news.engagement.comments.clone(),
            created_at_ms: news.created_at_ms,
            updated_at_ms: news.updated_at_ms,
        }
    }

    fn into_news(self) -> DomainResult<News> {
        Ok(News {
            status: parse_status(&self.status)?,
            region: parse_region(&self.region_type, self.region_id)?,
            news_id: self.news_id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            date_ms: self.date_ms,
            images: self.images,
            reporter_id: self.reporter_id,
            editor_id: self.editor_id,
            featured: self.featured,
            trending: self.trending,
            engagement: Engagement {
                likes: self.likes,
                shares: self.shares,
                comments: self.comments,
            },
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

pub struct SurrealNewsRepository {
    client: Arc<Surreal<Client>>,
}

impl SurrealNewsRepository {
    pub fn with_client(client: Arc<Surreal<Client>>) -> Self {
        Self { client }
    }

    pub async fn new(config: &DbConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(connect(config).await?))
    }
}

impl NewsRepository for SurrealNewsRepository {
    fn create(&self, news: &News) -> BoxFuture<'_, DomainResult<News>> {
        let row = NewsRow::from_news(news);
        Box::pin(async move {
            let mut response = self
                .client
                .query("CREATE type::record('news', $news_id) CONTENT $row RETURN AFTER")
                .bind(("news_id", row.news_id.clone()))
                .bind(("row", row))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .ok_or_else(|| DomainError::Internal("create returned no record".to_string()))?
                .into_news()
        })
    }

    fn get(&self, news_id: &str) -> BoxFuture<'_, DomainResult<Option<News>>> {
        let news_id = news_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("SELECT * FROM news WHERE news_id = $news_id LIMIT 1")
                .bind(("news_id", news_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().next().map(NewsRow::into_news).transpose()
        })
    }

    fn find_by_title(&self, title: &str) -> BoxFuture<'_, DomainResult<Option<News>>> {
        let title = title.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("SELECT * FROM news WHERE title = $title LIMIT 1")
                .bind(("title", title))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().next().map(NewsRow::into_news).transpose()
        })
    }

    fn update(&self, news: &News) -> BoxFuture<'_, DomainResult<News>> {
        let row = NewsRow::from_news(news);
        Box::pin(async move {
            let mut response = self
                .client
                .query("UPDATE type::record('news', $news_id) CONTENT $row RETURN AFTER")
                .bind(("news_id", row.news_id.clone()))
                .bind(("row", row))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .ok_or(DomainError::NotFound)?
                .into_news()
        })
    }

    fn delete(&self, news_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let news_id = news_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("DELETE type::record('news', $news_id) RETURN BEFORE")
                .bind(("news_id", news_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            Ok(!rows.is_empty())
        })
    }

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let region_id = region_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM news WHERE region_id = $region_id AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_id", region_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(NewsRow::into_news).collect()
        })
    }

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let region_type = region_type.as_str().to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM news WHERE region_type = $region_type AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_type", region_type))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(NewsRow::into_news).collect()
        })
    }

    fn list_approved_in_regions(
        &self,
        region_ids: &[String],
    ) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let region_ids = region_ids.to_vec();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM news WHERE region_id IN $region_ids AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_ids", region_ids))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(NewsRow::into_news).collect()
        })
    }

    fn list_featured(&self, limit: usize) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let limit = limit as i64;
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM news WHERE featured = true \
                     ORDER BY created_at_ms DESC LIMIT $limit",
                )
                .bind(("limit", limit))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(NewsRow::into_news).collect()
        })
    }

    fn list_trending(&self, limit: usize) -> BoxFuture<'_, DomainResult<Vec<News>>> {
        let limit = limit as i64;
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM news WHERE trending = true \
                     ORDER BY created_at_ms DESC LIMIT $limit",
                )
                .bind(("limit", limit))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<NewsRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(NewsRow::into_news).collect()
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EventRow {
    event_id: String,
    title: String,
    description: String,
    date_ms: i64,
    images: Vec<String>,
    status: String,
    region_type: String,
    region_id: String,
    reporter_id: String,
    editor_id: Option<String>,
    featured: bool,
    #[serde(default)]
    likes: Vec<LikeEntry>,
    #[serde(default)]
    shares: Vec<ShareEntry>,
    #[serde(default)]
    comments: Vec<CommentEntry>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl EventRow {
    fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.event_id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            date_ms: event.date_ms,
            images: event.images.clone(),
            status: event.status.as_str().to_string(),
            region_type: event.region.region_type().as_str().to_string(),
            region_id: event.region.region_id().to_string(),
            reporter_id: event.reporter_id.clone(),
            editor_id: event.editor_id.clone(),
            featured: event.featured,
            likes: event.engagement.likes.clone(),
            shares: event.engagement.shares.clone(),
            comments: event.engagement.comments.clone(),
            created_at_ms: event.created_at_ms,
            updated_at_ms: event.updated_at_ms,
        }
    }

    fn into_event(self) -> DomainResult<Event> {
        Ok(Event {
            status: parse_status(&self.status)?,
            region: parse_region(&self.region_type, self.region_id)?,
            event_id: self.event_id,
            title: self.title,
            description: self.description,
            date_ms: self.date_ms,
            images: self.images,
            reporter_id: self.reporter_id,
            editor_id: self.editor_id,
            featured: self.featured,
            engagement: Engagement {
                likes: self.likes,
                shares: self.shares,
                comments: self.comments,
            },
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

pub struct SurrealEventRepository {
    client: Arc<Surreal<Client>>,
}

impl SurrealEventRepository {
    pub fn with_client(client: Arc<Surreal<Client>>) -> Self {
        Self { client }
    }

    pub async fn new(config: &DbConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(connect(config).await?))
    }
}

impl EventRepository for SurrealEventRepository {
    fn create(&self, event: &Event) -> BoxFuture<'_, DomainResult<Event>> {
        let row = EventRow::from_event(event);
        Box::pin(async move {
            let mut response = self
                .client
                .query("CREATE type::record('event', $event_id) CONTENT $row RETURN AFTER")
                .bind(("event_id", row.event_id.clone()))
                .bind(("row", row))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<EventRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .ok_or_else(|| DomainError::Internal("create returned no record".to_string()))?
                .into_event()
        })
    }

    fn get(&self, event_id: &str) -> BoxFuture<'_, DomainResult<Option<Event>>> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("SELECT * FROM event WHERE event_id = $event_id LIMIT 1")
                .bind(("event_id", event_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<EventRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .map(EventRow::into_event)
                .transpose()
        })
    }

    fn update(&self, event: &Event) -> BoxFuture<'_, DomainResult<Event>> {
        let row = EventRow::from_event(event);
        Box::pin(async move {
            let mut response = self
                .client
                .query("UPDATE type::record('event', $event_id) CONTENT $row RETURN AFTER")
                .bind(("event_id", row.event_id.clone()))
                .bind(("row", row))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<EventRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .ok_or(DomainError::NotFound)?
                .into_event()
        })
    }

    fn delete(&self, event_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("DELETE type::record('event', $event_id) RETURN BEFORE")
                .bind(("event_id", event_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<EventRow> = response.take(0).map_err(map_surreal_error)?;
            Ok(!rows.is_empty())
        })
    }

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<Event>>> {
        let region_id = region_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM event WHERE region_id = $region_id AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_id", region_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<EventRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(EventRow::into_event).collect()
        })
    }

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<Event>>> {
        let region_type = region_type.as_str().to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM event WHERE region_type = $region_type AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_type", region_type))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<EventRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(EventRow::into_event).collect()
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PollRow {
    poll_id: String,
    question: String,
    options: Vec<PollOption>,
    status: String,
    region_type: String,
    region_id: String,
    reporter_id: String,
    editor_id: Option<String>,
    featured: bool,
    #[serde(default)]
    likes: Vec<LikeEntry>,
    #[serde(default)]
    shares: Vec<ShareEntry>,
    #[serde(default)]
    comments: Vec<CommentEntry>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl PollRow {
    fn from_poll(poll: &Poll) -> Self {
        Self {
            poll_id: poll.poll_id.clone(),
            question: poll.question.clone(),
            options: poll.options.clone(),
            status: poll.status.as_str().to_string(),
            region_type: poll.region.region_type().as_str().to_string(),
            region_id: poll.region.region_id().to_string(),
            reporter_id: poll.reporter_id.clone(),
            editor_id: poll.editor_id.clone(),
            featured: poll.featured,
            likes: poll.engagement.likes.clone(),
            shares: poll.engagement.shares.clone(),
            comments: poll.engagement.comments.clone(),
            created_at_ms: poll.created_at_ms,
            updated_at_ms: poll.updated_at_ms,
        }
    }

    fn into_poll(self) -> DomainResult<Poll> {
        Ok(Poll {
            status: parse_status(&self.status)?,
            region: parse_region(&self.region_type, self.region_id)?,
            poll_id: self.poll_id,
            question: self.question,
            options: self.options,
            reporter_id: self.reporter_id,
            editor_id: self.editor_id,
            featured: self.featured,
            engagement: Engagement {
                likes: self.likes,
                shares: self.shares,
                comments: self.comments,
            },
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

pub struct SurrealPollRepository {
    client: Arc<Surreal<Client>>,
}

impl SurrealPollRepository {
    pub fn with_client(client: Arc<Surreal<Client>>) -> Self {
        Self { client }
    }

    pub async fn new(config: &DbConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(connect(config).await?))
    }
}

impl PollRepository for SurrealPollRepository {
    fn create(&self, poll: &Poll) -> BoxFuture<'_, DomainResult<Poll>> {
        let row = PollRow::from_poll(poll);
        Box::pin(async move {
            let mut response = self
                .client
                .query("CREATE type::record('poll', $poll_id) CONTENT $row RETURN AFTER")
                .bind(("poll_id", row.poll_id.clone()))
                .bind(("row", row))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .ok_or_else(|| DomainError::Internal("create returned no record".to_string()))?
                .into_poll()
        })
    }

    fn get(&self, poll_id: &str) -> BoxFuture<'_, DomainResult<Option<Poll>>> {
        let poll_id = poll_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("SELECT * FROM poll WHERE poll_id = $poll_id LIMIT 1")
                .bind(("poll_id", poll_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(PollRow::into_poll).next().transpose()
        })
    }

    fn update(&self, poll: &Poll) -> BoxFuture<'_, DomainResult<Poll>> {
        let row = PollRow::from_poll(poll);
        Box::pin(async move {
            let mut response = self
                .client
                .query("UPDATE type::record('poll', $poll_id) CONTENT $row RETURN AFTER")
                .bind(("poll_id", row.poll_id.clone()))
                .bind(("row", row))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter()
                .next()
                .ok_or(DomainError::NotFound)?
                .into_poll()
        })
    }

    fn delete(&self, poll_id: &str) -> BoxFuture<'_, DomainResult<bool>> {
        let poll_id = poll_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query("DELETE type::record('poll', $poll_id) RETURN BEFORE")
                .bind(("poll_id", poll_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            Ok(!rows.is_empty())
        })
    }

    fn list_approved_by_region(&self, region_id: &str) -> BoxFuture<'_, DomainResult<Vec<Poll>>> {
        let region_id = region_id.to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM poll WHERE region_id = $region_id AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_id", region_id))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(PollRow::into_poll).collect()
        })
    }

    fn list_approved_by_region_type(
        &self,
        region_type: RegionType,
    ) -> BoxFuture<'_, DomainResult<Vec<Poll>>> {
        let region_type = region_type.as_str().to_string();
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM poll WHERE region_type = $region_type AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .bind(("region_type", region_type))
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(PollRow::into_poll).collect()
        })
    }

    fn list_featured_approved(&self) -> BoxFuture<'_, DomainResult<Vec<Poll>>> {
        Box::pin(async move {
            let mut response = self
                .client
                .query(
                    "SELECT * FROM poll WHERE featured = true AND status = 'approved' \
                     ORDER BY created_at_ms DESC",
                )
                .await
                .map_err(map_surreal_error)?;
            let rows: Vec<PollRow> = response.take(0).map_err(map_surreal_error)?;
            rows.into_iter().map(PollRow::into_poll).collect()
        })
    }
}
