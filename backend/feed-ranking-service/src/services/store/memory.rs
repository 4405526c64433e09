use super::{CandidateSource, InteractionSource, Result, StoreError};
use crate::models::{ContentCandidate, InteractionEvent, InteractionKind};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use uuid::Uuid;

/// Serialised store contents, used to seed [`InMemoryContentStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub candidates: Vec<ContentCandidate>,
    /// Likes and bookmarks in the order they were recorded.
    #[serde(default)]
    pub interactions: Vec<InteractionEvent>,
}

impl StoreSnapshot {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }
}

/// In-process content + interaction store.
///
/// Backs the binary and the tests. Reads can be switched off with
/// [`set_available`](Self::set_available) to exercise outage handling.
pub struct InMemoryContentStore {
    candidates: DashMap<Uuid, ContentCandidate>,
    likes: DashMap<Uuid, Vec<InteractionEvent>>,
    bookmarks: DashMap<Uuid, Vec<InteractionEvent>>,
    available: AtomicBool,
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            candidates: DashMap::new(),
            likes: DashMap::new(),
            bookmarks: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        for candidate in snapshot.candidates {
            store.insert_candidate(candidate);
        }
        for event in snapshot.interactions {
            store.record_interaction(event);
        }
        store
    }

    pub fn insert_candidate(&self, candidate: ContentCandidate) {
        self.candidates.insert(candidate.id, candidate);
    }

    /// Drop a content item while leaving any interactions that point at it.
    pub fn remove_candidate(&self, id: Uuid) -> Option<ContentCandidate> {
        self.candidates.remove(&id).map(|(_, candidate)| candidate)
    }

    pub fn record_like(&self, user_id: Uuid, content_id: Uuid, created_at: DateTime<Utc>) {
        self.record_interaction(InteractionEvent::like(user_id, content_id, created_at));
    }

    pub fn record_bookmark(&self, user_id: Uuid, content_id: Uuid, created_at: DateTime<Utc>) {
        self.record_interaction(InteractionEvent::bookmark(user_id, content_id, created_at));
    }

    pub fn record_interaction(&self, event: InteractionEvent) {
        let log = match event.kind {
            InteractionKind::Like => &self.likes,
            InteractionKind::Bookmark => &self.bookmarks,
        };
        log.entry(event.user_id).or_default().push(event);
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ))
        }
    }
}

#[async_trait]
impl CandidateSource for InMemoryContentStore {
    async fn fetch_candidates_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ContentCandidate>> {
        self.ensure_available()?;

        let candidates: Vec<ContentCandidate> = self
            .candidates
            .iter()
            .filter(|entry| entry.value().created_at > cutoff)
            .map(|entry| entry.value().clone())
            .collect();

        debug!(
            cutoff = %cutoff,
            candidate_count = candidates.len(),
            "Fetched candidates from memory"
        );

        Ok(candidates)
    }

    async fn fetch_candidate_by_id(&self, id: Uuid) -> Result<Option<ContentCandidate>> {
        self.ensure_available()?;
        Ok(self.candidates.get(&id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl InteractionSource for InMemoryContentStore {
    async fn fetch_likes_by_user(&self, user_id: Uuid) -> Result<Vec<InteractionEvent>> {
        self.ensure_available()?;
        Ok(self
            .likes
            .get(&user_id)
            .map(|events| events.value().clone())
            .unwrap_or_default())
    }

    async fn fetch_bookmarks_by_user(&self, user_id: Uuid) -> Result<Vec<InteractionEvent>> {
        self.ensure_available()?;
        Ok(self
            .bookmarks
            .get(&user_id)
            .map(|events| events.value().clone())
            .unwrap_or_default())
    }
}
