use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::{CommentEntry, ContentStatus, Engagement, ModerationDecision};
use crate::error::DomainError;
use crate::ports::polls::PollRepository;
use crate::region::{RegionRef, RegionType};
use crate::util::now_ms;
use crate::DomainResult;

const MAX_QUESTION_LENGTH: usize = 500;
const MAX_OPTIONS: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    pub vote_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Poll {
    pub poll_id: String,
    pub question: String,
    pub options: Vec<PollOption>,
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
pub struct PollCreate {
    pub question: String,
    pub option_texts: Vec<String>,
    pub region: RegionRef,
    pub reporter_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct PollUpdate {
    pub question: Option<String>,
    /// Replacing the option list resets every vote count.
    pub option_texts: Option<Vec<String>>,
    pub region: Option<RegionRef>,
    pub editor_id: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Clone)]
pub struct PollService {
    repository: Arc<dyn PollRepository>,
}

impl PollService {
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: PollCreate) -> DomainResult<Poll> {
        let payload = validate_poll_create(&input)?;
        let now = now_ms();
        let poll = Poll {
            poll_id: crate::util::uuid_v7_without_dashes(),
            question: payload.question,
            options: new_options(payload.option_texts),
            status: ContentStatus::Pending,
            region: payload.region,
            reporter_id: payload.reporter_id,
            editor_id: None,
            featured: false,
            engagement: Engagement::default(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        self.repository.create(&poll).await
    }

    async fn load(&self, poll_id: &str) -> DomainResult<Poll> {
        self.repository
            .get(poll_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Direct lookup ignores moderation status.
    pub async fn get(&self, poll_id: &str) -> DomainResult<Poll> {
        self.load(poll_id).await
    }

    pub async fn update(&self, poll_id: &str, update: PollUpdate) -> DomainResult<Poll> {
        let mut poll = self.load(poll_id).await?;
        if let Some(question) = update.question {
            let question = question.trim().to_string();
            if question.is_empty() {
                return Err(DomainError::Validation("question cannot be empty".into()));
            }
            poll.question = question;
        }
        if let Some(option_texts) = update.option_texts {
            validate_option_texts(&option_texts)?;
            poll.options = new_options(option_texts);
        }
        if let Some(region) = update.region {
            poll.region = region;
        }
        if let Some(editor_id) = update.editor_id {
            poll.editor_id = Some(editor_id);
        }
        if let Some(featured) = update.featured {
            poll.featured = featured;
        }
        poll.updated_at_ms = now_ms();
        self.repository.update(&poll).await
    }

    pub async fn delete(&self, poll_id: &str) -> DomainResult<()> {
        if self.repository.delete(poll_id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub async fn moderate(&self, poll_id: &str, status_value: &str) -> DomainResult<Poll> {
        let decision = ModerationDecision::parse(status_value)?;
        let mut poll = self.load(poll_id).await?;
        poll.status = decision.as_status();
        poll.updated_at_ms = now_ms();
        self.repository.update(&poll).await
    }

    /// Increments exactly one option's count. There is deliberately no
    /// per-user duplicate-vote guard.
    pub async fn vote(&self, poll_id: &str, option_index: i64) -> DomainResult<Poll> {
        let mut poll = self.load(poll_id).await?;
        if option_index < 0 || option_index as usize >= poll.options.len() {
            return Err(DomainError::InvalidOption);
        }
        poll.options[option_index as usize].vote_count += 1;
        poll.updated_at_ms = now_ms();
        self.repository.update(&poll).await
    }

    pub async fn like(&self, poll_id: &str, user_id: &str) -> DomainResult<Poll> {
        let mut poll = self.load(poll_id).await?;
        poll.engagement.like(user_id, now_ms())?;
        poll.updated_at_ms = now_ms();
        self.repository.update(&poll).await
    }

    pub async fn share(&self, poll_id: &str, user_id: &str) -> DomainResult<Poll> {
        let mut poll = self.load(poll_id).await?;
        poll.engagement.share(user_id, now_ms());
        poll.updated_at_ms = now_ms();
        self.repository.update(&poll).await
    }

    pub async fn comment(&self, poll_id: &str, user_id: &str, text: String) -> DomainResult<Poll> {
        let mut poll = self.load(poll_id).await?;
        poll.engagement.comment(user_id, text, now_ms());
        poll.updated_at_ms = now_ms();
        self.repository.update(&poll).await
    }

    pub async fn comments(&self, poll_id: &str) -> DomainResult<Vec<CommentEntry>> {
        let poll = self.load(poll_id).await?;
        Ok(poll.engagement.comments)
    }

    pub async fn by_region(&self, region_id: &str) -> DomainResult<Vec<Poll>> {
        let items = self.repository.list_approved_by_region(region_id).await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(items)
    }

    pub async fn by_region_type(&self, region_type_value: &str) -> DomainResult<Vec<Poll>> {
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

    /// Featured AND approved; a featured poll still pending moderation stays
    /// out of this list.
    pub async fn featured(&self) -> DomainResult<Vec<Poll>> {
        let items = self.repository.list_featured_approved().await?;
        if items.is_empty() {
            return Err(DomainError::NotFound);
        }
        Ok(items)
    }
}

fn new_options(texts: Vec<String>) -> Vec<PollOption> {
    texts
        .into_iter()
        .map(|text| PollOption {
            text,
            vote_count: 0,
        })
        .collect()
}

fn validate_poll_create(input: &PollCreate) -> DomainResult<PollCreate> {
    let question = input.question.trim();
    if question.is_empty() {
        return Err(DomainError::Validation("question is required".into()));
    }
    if question.chars().count() > MAX_QUESTION_LENGTH {
        return Err(DomainError::Validation(format!(
            "question exceeds max length of {MAX_QUESTION_LENGTH}"
        )));
    }
    if input.reporter_id.trim().is_empty() {
        return Err(DomainError::Validation("reporter_id is required".into()));
    }
    validate_option_texts(&input.option_texts)?;
    Ok(PollCreate {
        question: question.to_string(),
        option_texts: input.option_texts.clone(),
        region: input.region.clone(),
        reporter_id: input.reporter_id.trim().to_string(),
    })
}

fn validate_option_texts(texts: &[String]) -> DomainResult<()> {
    if texts.is_empty() {
        return Err(DomainError::Validation(
            "at least one option is required".into(),
        ));
    }
    if texts.len() > MAX_OPTIONS {
        return Err(DomainError::Validation(format!(
            "options exceed max of {MAX_OPTIONS}"
        )));
    }
    if texts.iter().any(|text| text.trim().is_empty()) {
        return Err(DomainError::Validation(
            "option text cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionType;

    fn create_input() -> PollCreate {
        PollCreate {
            question: "Best market day?".to_string(),
            option_texts: vec!["Saturday".to_string(), "Sunday".to_string()],
            region: RegionRef::new(RegionType::Locality, "loc-3"),
            reporter_id: "user-2".to_string(),
        }
    }

    #[test]
    fn create_requires_question_and_options() {
        let mut input = create_input();
        input.question = "  ".to_string();
        assert!(matches!(
            validate_poll_create(&input),
            Err(DomainError::Validation(_))
        ));

        let mut input = create_input();
        input.option_texts = vec![];
        assert!(matches!(
            validate_poll_create(&input),
            Err(DomainError::Validation(_))
        ));

        let mut input = create_input();
        input.option_texts = vec!["Saturday".to_string(), "  ".to_string()];
        assert!(matches!(
            validate_poll_create(&input),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn new_options_start_with_zero_votes() {
        let options = new_options(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|option| option.vote_count == 0));
    }
}
