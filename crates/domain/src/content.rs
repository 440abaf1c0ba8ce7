use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::DomainResult;

/// Moderation workflow gating public visibility of a content item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ContentStatus::Pending),
            "approved" => Some(ContentStatus::Approved),
            "rejected" => Some(ContentStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Approved => "approved",
            ContentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A moderation action may only approve or reject. There is no guard on the
/// current status: a rejected item can be re-approved and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationDecision {
    Approved,
    Rejected,
}

impl ModerationDecision {
    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "approved" => Ok(ModerationDecision::Approved),
            "rejected" => Ok(ModerationDecision::Rejected),
            other => Err(DomainError::InvalidInput(format!(
                "invalid status '{other}'"
            ))),
        }
    }

    pub fn as_status(self) -> ContentStatus {
        match self {
            ModerationDecision::Approved => ContentStatus::Approved,
            ModerationDecision::Rejected => ContentStatus::Rejected,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeEntry {
    pub user_id: String,
    pub liked_at_ms: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareEntry {
    pub user_id: String,
    pub shared_at_ms: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentEntry {
    pub user_id: String,
    pub text: String,
    pub commented_at_ms: i64,
}

/// Append-only interaction ledger embedded in every content item.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Engagement {
    #[serde(default)]
    pub likes: Vec<LikeEntry>,
    #[serde(default)]
    pub shares: Vec<ShareEntry>,
    #[serde(default)]
    pub comments: Vec<CommentEntry>,
}

impl Engagement {
    /// At most one like per user. The lookup is a linear scan over the
    /// current ledger.
    pub fn like(&mut self, user_id: &str, now_ms: i64) -> DomainResult<()> {
        if self.likes.iter().any(|like| like.user_id == user_id) {
            return Err(DomainError::DuplicateLike);
        }
        self.likes.push(LikeEntry {
            user_id: user_id.to_string(),
            liked_at_ms: now_ms,
        });
        Ok(())
    }

    /// Repeated shares by the same user are all recorded.
    pub fn share(&mut self, user_id: &str, now_ms: i64) {
        self.shares.push(ShareEntry {
            user_id: user_id.to_string(),
            shared_at_ms: now_ms,
        });
    }

    /// Comments are never edited or deleted once appended.
    pub fn comment(&mut self, user_id: &str, text: impl Into<String>, now_ms: i64) {
        self.comments.push(CommentEntry {
            user_id: user_id.to_string(),
            text: text.into(),
            commented_at_ms: now_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_like_by_same_user_is_rejected_and_ledger_unchanged() {
        let mut engagement = Engagement::default();
        engagement.like("user-1", 1).expect("first like");
        let err = engagement.like("user-1", 2).expect_err("duplicate like");
        assert!(matches!(err, DomainError::DuplicateLike));
        assert_eq!(engagement.likes.len(), 1);
        assert_eq!(engagement.likes[0].liked_at_ms, 1);
    }

    #[test]
    fn distinct_users_may_each_like_once() {
        let mut engagement = Engagement::default();
        engagement.like("user-1", 1).expect("like");
        engagement.like("user-2", 2).expect("like");
        assert_eq!(engagement.likes.len(), 2);
    }

    #[test]
    fn shares_are_never_deduplicated() {
        let mut engagement = Engagement::default();
        for n in 0..3 {
            engagement.share("user-1", n);
        }
        assert_eq!(engagement.shares.len(), 3);
    }

    #[test]
    fn comments_append_in_order_even_when_empty() {
        let mut engagement = Engagement::default();
        engagement.comment("user-1", "first", 1);
        engagement.comment("user-1", "", 2);
        assert_eq!(engagement.comments.len(), 2);
        assert_eq!(engagement.comments[1].text, "");
    }

    #[test]
    fn moderation_decision_parses_only_approved_and_rejected() {
        assert!(ModerationDecision::parse("approved").is_ok());
        assert!(ModerationDecision::parse("rejected").is_ok());
        for value in ["pending", "published", "Approved", ""] {
            let err = ModerationDecision::parse(value).expect_err("must fail");
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }
}
