// ============================================
// Affinity Profile Builder
// ============================================
//
// Derives a per-request affinity profile from a user's like and bookmark
// history:
// - top categories: counted over liked + bookmarked items
// - top content types: counted over liked items only
//
// Interaction targets inside the candidate window are resolved from the
// in-memory candidate set; older targets are looked up individually and
// concurrently. Targets that no longer exist are skipped.

mod frequency_counter;

pub use frequency_counter::FrequencyCounter;

use crate::config::RankingConfig;
use crate::metrics;
use crate::models::{AffinityProfile, ContentCandidate, ContentType, InteractionEvent};
use crate::services::store::{CandidateSource, InteractionSource, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

pub struct AffinityAggregator {
    max_top_categories: usize,
    max_top_content_types: usize,
    max_concurrent_lookups: usize,
}

impl AffinityAggregator {
    pub fn new(config: &RankingConfig, max_concurrent_lookups: usize) -> Self {
        Self {
            max_top_categories: config.max_top_categories,
            max_top_content_types: config.max_top_content_types,
            max_concurrent_lookups: max_concurrent_lookups.max(1),
        }
    }

    /// Build the affinity profile for `user_id`.
    ///
    /// A user without interactions gets an empty profile. Store failures
    /// propagate; dangling references to deleted content do not.
    pub async fn build_profile(
        &self,
        user_id: Uuid,
        candidates: &[ContentCandidate],
        candidate_source: &dyn CandidateSource,
        interaction_source: &dyn InteractionSource,
    ) -> Result<AffinityProfile> {
        let (likes, bookmarks) = tokio::try_join!(
            interaction_source.fetch_likes_by_user(user_id),
            interaction_source.fetch_bookmarks_by_user(user_id),
        )?;

        if likes.is_empty() && bookmarks.is_empty() {
            debug!(user_id = %user_id, "No interactions, using empty affinity profile");
            return Ok(AffinityProfile::empty());
        }

        let in_window: HashMap<Uuid, &ContentCandidate> =
            candidates.iter().map(|c| (c.id, c)).collect();

        let outside_window = self
            .resolve_outside_window(&likes, &bookmarks, &in_window, candidate_source)
            .await?;

        let liked = resolve_all(&likes, &in_window, &outside_window);
        let bookmarked = resolve_all(&bookmarks, &in_window, &outside_window);

        let skipped = likes.len() + bookmarks.len() - liked.len() - bookmarked.len();
        if skipped > 0 {
            warn!(
                user_id = %user_id,
                skipped,
                "Skipped interactions referencing missing content"
            );
        }

        let profile = self.aggregate(&liked, &bookmarked);

        debug!(
            user_id = %user_id,
            like_count = likes.len(),
            bookmark_count = bookmarks.len(),
            top_categories = profile.top_categories.len(),
            top_content_types = profile.top_content_types.len(),
            "Built affinity profile"
        );

        Ok(profile)
    }

    /// Count categories over liked then bookmarked items, content types over
    /// liked items only.
    pub fn aggregate(
        &self,
        liked: &[&ContentCandidate],
        bookmarked: &[&ContentCandidate],
    ) -> AffinityProfile {
        let categories: FrequencyCounter<Uuid> = liked
            .iter()
            .chain(bookmarked.iter())
            .filter_map(|c| c.category_id)
            .collect();

        let content_types: FrequencyCounter<ContentType> =
            liked.iter().map(|c| c.content_type).collect();

        AffinityProfile {
            top_categories: categories.top(self.max_top_categories),
            top_content_types: content_types.top(self.max_top_content_types),
        }
    }

    /// Look up interaction targets that are not in the candidate set.
    ///
    /// Lookups run with bounded concurrency; the result is keyed by content
    /// id so completion order does not matter.
    async fn resolve_outside_window(
        &self,
        likes: &[InteractionEvent],
        bookmarks: &[InteractionEvent],
        in_window: &HashMap<Uuid, &ContentCandidate>,
        candidate_source: &dyn CandidateSource,
    ) -> Result<HashMap<Uuid, ContentCandidate>> {
        let mut seen = HashSet::new();
        let missing: Vec<Uuid> = likes
            .iter()
            .chain(bookmarks.iter())
            .map(|event| event.content_id)
            .filter(|id| !in_window.contains_key(id) && seen.insert(*id))
            .collect();

        if missing.is_empty() {
            return Ok(HashMap::new());
        }

        let lookups: Vec<(Uuid, Option<ContentCandidate>)> = stream::iter(missing)
            .map(|id| async move {
                candidate_source
                    .fetch_candidate_by_id(id)
                    .await
                    .map(|found| (id, found))
            })
            .buffer_unordered(self.max_concurrent_lookups)
            .try_collect()
            .await?;

        let found: HashMap<Uuid, ContentCandidate> = lookups
            .into_iter()
            .filter_map(|(id, candidate)| candidate.map(|c| (id, c)))
            .collect();

        metrics::record_fallback_lookups(found.len(), seen.len() - found.len());

        Ok(found)
    }
}

fn resolve_all<'a>(
    events: &[InteractionEvent],
    in_window: &HashMap<Uuid, &'a ContentCandidate>,
    outside_window: &'a HashMap<Uuid, ContentCandidate>,
) -> Vec<&'a ContentCandidate> {
    events
        .iter()
        .filter_map(|event| {
            in_window
                .get(&event.content_id)
                .copied()
                .or_else(|| outside_window.get(&event.content_id))
        })
        .collect()
}
