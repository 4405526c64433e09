use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of content item. Serialised the way the content API exposes it
/// (`"NOTE"`, `"IMAGE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Note,
    Image,
    Video,
    Article,
}

/// A content item eligible for ranking.
///
/// Materialised up front by the candidate source; the ranking core never
/// reaches back into the store while reading these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCandidate {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content_type: ContentType,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub bookmark_count: u64,
    #[serde(default)]
    pub share_count: u64,
    pub created_at: DateTime<Utc>,
}

impl ContentCandidate {
    pub fn new(
        id: Uuid,
        author_id: Uuid,
        content_type: ContentType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            content_type,
            category_id: None,
            like_count: 0,
            comment_count: 0,
            bookmark_count: 0,
            share_count: 0,
            created_at,
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set all four engagement counters (likes, comments, bookmarks, shares).
    pub fn with_counts(mut self, likes: u64, comments: u64, bookmarks: u64, shares: u64) -> Self {
        self.like_count = likes;
        self.comment_count = comments;
        self.bookmark_count = bookmarks;
        self.share_count = shares;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Bookmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn like(user_id: Uuid, content_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            content_id,
            kind: InteractionKind::Like,
            created_at,
        }
    }

    pub fn bookmark(user_id: Uuid, content_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            content_id,
            kind: InteractionKind::Bookmark,
            created_at,
        }
    }
}

/// Per-request summary of what a user engages with.
///
/// Both lists are in rank order (most frequent first) and never exceed the
/// configured caps. Computed fresh for every feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffinityProfile {
    pub top_categories: Vec<Uuid>,
    pub top_content_types: Vec<ContentType>,
}

impl AffinityProfile {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains_category(&self, category_id: &Uuid) -> bool {
        self.top_categories.contains(category_id)
    }

    pub fn contains_content_type(&self, content_type: ContentType) -> bool {
        self.top_content_types.contains(&content_type)
    }

    pub fn is_empty(&self) -> bool {
        self.top_categories.is_empty() && self.top_content_types.is_empty()
    }
}

/// The three factors multiplied into a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub engagement: f64,
    pub decay: f64,
    pub boost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: ContentCandidate,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    pub fn id(&self) -> Uuid {
        self.candidate.id
    }
}

/// One page of a user's feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage {
    pub user_id: Uuid,
    pub page: i64,
    pub size: i64,
    pub items: Vec<Uuid>,
    pub total_candidates: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_wire_format() {
        let json = serde_json::to_string(&ContentType::Article).unwrap();
        assert_eq!(json, "\"ARTICLE\"");

        let parsed: ContentType = serde_json::from_str("\"IMAGE\"").unwrap();
        assert_eq!(parsed, ContentType::Image);
    }

    #[test]
    fn test_candidate_counters_default_to_zero() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "author_id": "00000000-0000-0000-0000-000000000002",
            "content_type": "NOTE",
            "created_at": "2026-01-01T00:00:00Z"
        }"#;

        let candidate: ContentCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.category_id, None);
        assert_eq!(candidate.like_count, 0);
        assert_eq!(candidate.share_count, 0);
    }

    #[test]
    fn test_empty_profile() {
        let profile = AffinityProfile::empty();
        assert!(profile.is_empty());
        assert!(!profile.contains_category(&Uuid::new_v4()));
        assert!(!profile.contains_content_type(ContentType::Note));
    }
}
