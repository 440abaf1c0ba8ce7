use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::{CommentEntry, ContentStatus, Engagement, ModerationDecision};
use crate::error::DomainError;
use crate::news::validate_image_urls;
use crate::ports::events::EventRepository;
use crate::region::{RegionRef, RegionType};
use crate::util::now_ms;
use crate::DomainResult;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub date_ms: i64,
    pub images: Vec<String>,
    pub status: ContentStatus,
    pub region: RegionRef,
    pub reporter_id: String,
    pub editor_id: Option<String>,
    pub featured: bool,
    #[serde(flatten)]
    pub engagement: Engagement,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct EventCreate {
    pub title: String,
    pub description: String,
    pub date_ms: i64,
    pub images: Vec<String>,
    pub region: RegionRef,
    pub reporter_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_ms: Option<i64>,
    pub images: Option<Vec<String>>,
    pub region: Option<RegionRef>,
    pub editor_id: Option<String>,
}

#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: EventCreate) -> DomainResult<Event> {
        let payload = validate_event_create(&input)?;
        let now = now_ms();
        let event = Event {
            event_id: crate::util::uuid_v7_without_dashes(),
            title: payload.title,
            description: payload.description,
            date_ms: payload.date_ms,
            images: payload.images,
            status: ContentStatus::Pending,
            region: payload.region,
            reporter_id: payload.reporter_id,
            editor_id: None,
            featured: false,
            engagement: Engagement::default(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.repository.create(&event).await
    }

    async fn load(&self, event_id: &str) -> DomainResult<Event> {
        self.repository
            .get(event_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Direct lookup ignores moderation status.
    pub async fn get(&self, event_id: &str) -> DomainResult<Event> {
        self.load(event_id).await
    }

    pub async fn update(&self, event_id: &str, update: EventUpdate) -> DomainResult<Event> {
        let mut event = self.load(event_id).await?;
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::Validation("title cannot be empty".into()));
            }
            event.title = title;
        }
        if let Some(description) = update.description {
            event.description = description;
        }
        if let Some(date_ms) = update.date_ms {
            event.date_ms = date_ms;
        }
        if let Some(images) = update.images {
            validate_image_urls(&images)?;
            event.images = images;
        }
        if let Some(region) = update.region {
            event.region = region;
        }
        if let Some(editor_id) = update.editor_id {
            event.editor_id = Some(editor_id);
        }
        event.updated_at_ms = now_ms();
        self.repository.update(&event).await
    }

    pub async fn delete(&self, event_id: &str) -> DomainResult<()> {
        if self.repository.delete(event_id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub async fn moderate(&self, event_id: &str, status_value: &str) -> DomainResult<Event> {
        let decision = ModerationDecision::parse(status_value)?;
        let mut event = self.load(event_id).await?;
        event.status = decision.as_status();
        event.updated_at_ms = now_ms();
        self.repository.update(&event).await
    }

    /// Appends object-storage URLs to the gallery. The binary upload happens
    /// upstream; the core only ever sees the resulting URL strings.
    pub async fn append_gallery(&self, event_id: &str, urls: Vec<String>) -> DomainResult<Event> {
        if urls.is_empty() {
            return Err(DomainError::Validation("no files uploaded".into()));
        }
        validate_image_urls(&urls)?;
        let mut event = self.load(event_id).await?;
        event.images.extend(urls);
        event.updated_at_ms = now_ms();
        self.repository.update(&event).await
    }

    pub async fn like(&self, event_id: &str, user_id: &str) -> DomainResult<Event> {
        let mut event = self.load(event_id).await?;
        event.engagement.like(user_id, now_ms())?;
        event.updated_at_ms = now_ms();
        self.repository.update(&event).await
    }

    pub async fn share(&self, event_id: &str, user_id: &str) -> DomainResult<Event> {
        let mut event = self.load(event_id).await?;
        event.engagement.share(user_id, now_ms());
        event.updated_at_ms = now_ms();
        self.repository.update(&event).await
    }

    pub async fn comment(
        &self,
        event_id: &str,
        user_id: &str,
        text: String,
    ) -> DomainResult<Event> {
        let mut event = self.load(event_id).await?;
        event.engagement.comment(user_id, text, now_ms());
        event.updated_at_ms = now_ms();
        self.repository.update(&event).await
    }

    pub async fn comments(&self, event_id: &str) -> DomainResult<Vec<CommentEntry>> {
        let event = self.load(event_id).await?;
        Ok(event.engagement.comments)
    }

    pub async fn by_region(&self, region_id: &str) -> DomainResult<Vec<Event>> {
        let items = self.repository.list_approved_by_region(region_id).await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(items)
    }

    pub async fn by_region_type(&self, region_type_value: &str) -> DomainResult<Vec<Event>> {
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
}

fn validate_event_create(input: &EventCreate) -> DomainResult<EventCreate> {
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
    validate_image_urls(&input.images)?;
    Ok(EventCreate {
        title: title.to_string(),
        description: description.to_string(),
        date_ms: input.date_ms,
        images: input.images.clone(),
        region: input.region.clone(),
        reporter_id: input.reporter_id.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionType;

    #[test]
    fn create_rejects_missing_required_fields() {
        let input = EventCreate {
            title: String::new(),
            description: "Annual fair".to_string(),
            date_ms: 1_714_521_600_000,
            images: vec![],
            region: RegionRef::new(RegionType::City, "city-1"),
            reporter_id: "user-1".to_string(),
        };
        assert!(matches!(
            validate_event_create(&input),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_trims_title_and_reporter() {
        let input = EventCreate {
            title: "  Fair  ".to_string(),
            description: "Annual fair".to_string(),
            date_ms: 1_714_521_600_000,
            images: vec![],
            region: RegionRef::new(RegionType::City, "city-1"),
            reporter_id: " user-1 ".to_string(),
        };
        let payload = validate_event_create(&input).expect("valid");
        assert_eq!(payload.title, "Fair");
        assert_eq!(payload.reporter_id, "user-1");
    }
}
