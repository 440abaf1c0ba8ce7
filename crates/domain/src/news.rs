use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::content::{CommentEntry, ContentStatus, Engagement, ModerationDecision};
use crate::error::DomainError;
use crate::ports::news::NewsRepository;
use crate::ports::profiles::ProfileReader;
use crate::profiles::display_name_or_fallback;
use crate::region::{RegionRef, RegionType};
use crate::util::{format_ms_rfc3339, now_ms};
use crate::DomainResult;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5_000;
const MAX_TAGS: usize = 20;
const FEATURED_LIMIT: usize = 4;
const TRENDING_LIMIT: usize = 5;

/// Shown when an article has no gallery image.
pub const FALLBACK_IMAGE: &str = "https://via.placeholder.com/300x200";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct News {
    pub news_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date_ms: i64,
    pub images: Vec<String>,
    pub status: ContentStatus,
    pub region: RegionRef,
    pub reporter_id: String,
    pub editor_id: Option<String>,
    pub featured: bool,
    pub trending: bool,
    #[serde(flatten)]
    pub engagement: Engagement,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct NewsCreate {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date_ms: Option<i64>,
    pub images: Vec<String>,
    pub region: RegionRef,
    pub reporter_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct NewsUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub date_ms: Option<i64>,
    pub images: Option<Vec<String>>,
    pub region: Option<RegionRef>,
    pub editor_id: Option<String>,
    pub trending: Option<bool>,
}

/// Read projection for listing endpoints. Skips the engagement ledger and
/// resolves the reporter's display name where the endpoint asks for it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewsSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    pub date_ms: i64,
    pub date: String,
    pub image_src: String,
}

impl NewsSummary {
    fn from_news(news: &News, reporter: Option<String>) -> Self {
        Self {
            id: news.news_id.clone(),
            title: news.title.clone(),
            description: news.description.clone(),
            reporter,
            date_ms: news.date_ms,
            date: format_ms_rfc3339(news.date_ms),
            image_src: news
                .images
                .first()
                .cloned()
                .unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct NewsService {
    repository: Arc<dyn NewsRepository>,
    profiles: Arc<dyn ProfileReader>,
}

impl NewsService {
    pub fn new(repository: Arc<dyn NewsRepository>, profiles: Arc<dyn ProfileReader>) -> Self {
        Self {
            repository,
            profiles,
        }
    }

    pub async fn create(&self, input: NewsCreate) -> DomainResult<News> {
        let payload = validate_news_create(&input)?;
        if self
            .repository
            .find_by_title(&payload.title)
            .await?
            .is_some()
        {
            return Err(DomainError::Validation(
                "news with this title already exists".into(),
            ));
        }
        let now = now_ms();
        let news = News {
            news_id: crate::util::uuid_v7_without_dashes(),
            title: payload.title,
            description: payload.description,
            tags: payload.tags,
            date_ms: payload.date_ms.unwrap_or(now),
            images: payload.images,
            // News skips the moderation queue at creation; Event and Poll
            // start out pending.
            status: ContentStatus::Approved,
            region: payload.region,
            reporter_id: payload.reporter_id,
            editor_id: None,
            featured: false,
            trending: false,
            engagement: Engagement::default(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.repository.create(&news).await
    }

    async fn load(&self, news_id: &str) -> DomainResult<News> {
        self.repository
            .get(news_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Direct lookup ignores moderation status.
    pub async fn get_summary(&self, news_id: &str) -> DomainResult<NewsSummary> {
        let news = self.load(news_id).await?;
        let reporter = display_name_or_fallback(&self.profiles, &news.reporter_id).await;
        Ok(NewsSummary::from_news(&news, Some(reporter)))
    }

    pub async fn update(&self, news_id: &str, update: NewsUpdate) -> DomainResult<News> {
        let mut news = self.load(news_id).await?;
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::Validation("title cannot be empty".into()));
            }
            news.title = title;
        }
        if let Some(description) = update.description {
            news.description = description;
        }
        if let Some(tags) = update.tags {
            news.tags = tags;
        }
        if let Some(date_ms) = update.date_ms {
            news.date_ms = date_ms;
        }
        if let Some(images) = update.images {
            validate_image_urls(&images)?;
            news.images = images;
        }
        if let Some(region) = update.region {
            news.region = region;
        }
        if let Some(editor_id) = update.editor_id {
            news.editor_id = Some(editor_id);
        }
        if let Some(trending) = update.trending {
            news.trending = trending;
        }
        news.updated_at_ms = now_ms();
        self.repository.update(&news).await
    }

    pub async fn delete(&self, news_id: &str) -> DomainResult<()> {
        if self.repository.delete(news_id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub async fn moderate(&self, news_id: &str, status_value: &str) -> DomainResult<News> {
        let decision = ModerationDecision::parse(status_value)?;
        let mut news = self.load(news_id).await?;
        news.status = decision.as_status();
        news.updated_at_ms = now_ms();
        self.repository.update(&news).await
    }

    pub async fn set_featured(&self, news_id: &str, featured: bool) -> DomainResult<News> {
        let mut news = self.load(news_id).await?;
        news.featured = featured;
        news.updated_at_ms = now_ms();
        self.repository.update(&news).await
    }

    pub async fn like(&self, news_id: &str, user_id: &str) -> DomainResult<News> {
        let mut news = self.load(news_id).await?;
        news.engagement.like(user_id, now_ms())?;
        news.updated_at_ms = now_ms();
        self.repository.update(&news).await
    }

    pub async fn share(&self, news_id: &str, user_id: &str) -> DomainResult<News> {
        let mut news = self.load(news_id).await?;
        news.engagement.share(user_id, now_ms());
        news.updated_at_ms = now_ms();
        self.repository.update(&news).await
    }

    pub async fn comment(&self, news_id: &str, user_id: &str, text: String) -> DomainResult<News> {
        let mut news = self.load(news_id).await?;
        news.engagement.comment(user_id, text, now_ms());
        news.updated_at_ms = now_ms();
        self.repository.update(&news).await
    }

    pub async fn comments(&self, news_id: &str) -> DomainResult<Vec<CommentEntry>> {
        let news = self.load(news_id).await?;
        Ok(news.engagement.comments)
    }

    pub async fn by_region(&self, region_id: &str) -> DomainResult<Vec<NewsSummary>> {
        let items = self.repository.list_approved_by_region(region_id).await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(self.enriched_summaries(&items).await)
    }

    pub async fn by_region_type(&self, region_type_value: &str) -> DomainResult<Vec<News>> {
        let region_type = RegionType::parse(region_type_value).ok_or_else(|| {
            DomainError::InvalidInput(format!("invalid region type '{region_type_value}'"))
        })?;
        let items = self
            .repository
            .list_approved_by_region_type(region_type)
            .await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(items)
    }

    pub async fn featured(&self) -> DomainResult<Vec<NewsSummary>> {
        let items = self.repository.list_featured(FEATURED_LIMIT).await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(self.enriched_summaries(&items).await)
    }

    pub async fn trending(&self) -> DomainResult<Vec<NewsSummary>> {
        let items = self.repository.list_trending(TRENDING_LIMIT).await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(self.enriched_summaries(&items).await)
    }

    /// Approved news across the regions the subscriber follows. Unlike name
    /// enrichment, the subscription lookup has no useful fallback, so a
    /// profile-service failure surfaces as an internal error here.
    pub async fn for_subscriber(&self, user_id: &str) -> DomainResult<Vec<NewsSummary>> {
        let profile = self
            .profiles
            .profile(user_id)
            .await
            .map_err(|err| DomainError::Internal(format!("profile lookup failed: {err}")))?;
        let region_ids = profile
            .map(|profile| profile.subscribed_region_ids)
            .unwrap_or_default();
        if region_ids.is_empty() {
            return Err(DomainError::NotFound);
        }
        let items = self.repository.list_approved_in_regions(&region_ids).await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(items
            .iter()
            .map(|news| NewsSummary::from_news(news, None))
            .collect())
    }

    /// Reporter names are resolved concurrently, one independent profile call
    /// per article; any failure degrades to the fallback name.
    async fn enriched_summaries(&self, items: &[News]) -> Vec<NewsSummary> {
        let names = join_all(
            items
                .iter()
                .map(|news| display_name_or_fallback(&self.profiles, &news.reporter_id)),
        )
        .await;
        items
            .iter()
            .zip(names)
            .map(|(news, name)| NewsSummary::from_news(news, Some(name)))
            .collect()
    }
}

fn validate_news_create(input: &NewsCreate) -> DomainResult<NewsCreate> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::Validation(format!(
            "title exceeds max length of {MAX_TITLE_LENGTH}"
        )));
    }
    let description = input.description.trim();
    if description.is_empty() {
        return Err(DomainError::Validation("description is required".into()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::Validation(format!(
            "description exceeds max length of {MAX_DESCRIPTION_LENGTH}"
        )));
    }
    if input.reporter_id.trim().is_empty() {
        return Err(DomainError::Validation("reporter_id is required".into()));
    }
    if input.tags.len() > MAX_TAGS {
        return Err(DomainError::Validation(format!(
            "tags exceeds max of {MAX_TAGS}"
        )));
    }
    validate_image_urls(&input.images)?;
    Ok(NewsCreate {
        title: title.to_string(),
        description: description.to_string(),
        tags: input.tags.clone(),
        date_ms: input.date_ms,
        images: input.images.clone(),
        region: input.region.clone(),
        reporter_id: input.reporter_id.trim().to_string(),
    })
}

/// Image entries are URLs handed back by the object-storage service; the core
/// only checks that each one is well formed.
pub(crate) fn validate_image_urls(images: &[String]) -> DomainResult<()> {
    for image in images {
        if url::Url::parse(image).is_err() {
            return Err(DomainError::Validation(format!(
                "invalid image url '{image}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionType;

    fn create_input() -> NewsCreate {
        NewsCreate {
            title: "Road repairs announced".to_string(),
            description: "The corporation will resurface 12 streets".to_string(),
            tags: vec!["infrastructure".to_string()],
            date_ms: None,
            images: vec![],
            region: RegionRef::new(RegionType::City, "city-1"),
            reporter_id: "user-9".to_string(),
        }
    }

    #[test]
    fn create_requires_title_description_and_reporter() {
        let mut input = create_input();
        input.title = "   ".to_string();
        assert!(matches!(
            validate_news_create(&input),
            Err(DomainError::Validation(_))
        ));

        let mut input = create_input();
        input.description = String::new();
        assert!(matches!(
            validate_news_create(&input),
            Err(DomainError::Validation(_))
        ));

        let mut input = create_input();
        input.reporter_id = " ".to_string();
        assert!(matches!(
            validate_news_create(&input),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_malformed_image_urls() {
        let mut input = create_input();
        input.images = vec!["https://cdn.example.com/a.jpg".to_string()];
        assert!(validate_news_create(&input).is_ok());

        input.images = vec!["not a url".to_string()];
        assert!(matches!(
            validate_news_create(&input),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn summary_falls_back_to_placeholder_image() {
        let input = validate_news_create(&create_input()).expect("valid");
        let news = News {
            news_id: "n-1".to_string(),
            title: input.title,
            description: input.description,
            tags: input.tags,
            date_ms: 0,
            images: vec![],
            status: ContentStatus::Approved,
            region: input.region,
            reporter_id: input.reporter_id,
            editor_id: None,
            featured: false,
            trending: false,
            engagement: Engagement::default(),
            created_at_ms: 0,
            updated_at_ms: 0,
        };
        let summary = NewsSummary::from_news(&news, None);
        assert_eq!(summary.image_src, FALLBACK_IMAGE);
    }
}
