/// Store Module
///
/// Read-only contracts the ranking core needs from the content and
/// interaction stores. Persistence, counter mutation and retries live on the
/// other side of these traits.
mod memory;

pub use memory::{InMemoryContentStore, StoreSnapshot};

use crate::models::{ContentCandidate, InteractionEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store query failed: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Source of rankable content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Every item created strictly after `cutoff`, in no particular order.
    /// An empty window is `Ok(vec![])`.
    async fn fetch_candidates_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ContentCandidate>>;

    /// Single-item lookup for interaction targets older than the window.
    /// Deleted or unknown content is `Ok(None)`.
    async fn fetch_candidate_by_id(&self, id: Uuid) -> Result<Option<ContentCandidate>>;
}

/// Source of a user's like and bookmark history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionSource: Send + Sync {
    async fn fetch_likes_by_user(&self, user_id: Uuid) -> Result<Vec<InteractionEvent>>;

    async fn fetch_bookmarks_by_user(&self, user_id: Uuid) -> Result<Vec<InteractionEvent>>;
}
