/// Feed Module
///
/// One-shot, side-effect-free feed pipeline:
///
/// candidates (7-day window) -> affinity profile -> scores -> sort -> page
///
/// Each request is independent. Nothing is cached between requests and the
/// stores are only read.
use crate::config::{PipelineConfig, RankingConfig};
use crate::metrics;
use crate::models::{AffinityProfile, ContentCandidate, FeedPage, ScoredCandidate};
use crate::services::profile::AffinityAggregator;
use crate::services::ranking::{sort_scored, PageRequest, RankingError, Scorer};
use crate::services::store::{CandidateSource, InteractionSource, StoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] StoreError),

    #[error("Feed computation exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RankingError> for FeedError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::InvalidArgument(msg) => FeedError::InvalidArgument(msg),
        }
    }
}

impl FeedError {
    fn status_label(&self) -> &'static str {
        match self {
            FeedError::InvalidArgument(_) => "invalid_argument",
            FeedError::Retrieval(_) => "retrieval_error",
            FeedError::Timeout(_) => "timeout",
            FeedError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

pub struct FeedService {
    candidate_source: Arc<dyn CandidateSource>,
    interaction_source: Arc<dyn InteractionSource>,
    scorer: Arc<Scorer>,
    aggregator: AffinityAggregator,
    pipeline: PipelineConfig,
}

impl FeedService {
    pub fn new(
        candidate_source: Arc<dyn CandidateSource>,
        interaction_source: Arc<dyn InteractionSource>,
        ranking: RankingConfig,
        pipeline: PipelineConfig,
    ) -> Self {
        let aggregator = AffinityAggregator::new(&ranking, pipeline.max_concurrent_lookups);
        Self {
            candidate_source,
            interaction_source,
            scorer: Arc::new(Scorer::new(ranking)),
            aggregator,
            pipeline,
        }
    }

    /// Ordered content ids for one page of `user_id`'s feed, evaluated now.
    pub async fn get_feed(&self, user_id: Uuid, page: i64, size: i64) -> Result<Vec<Uuid>> {
        self.get_feed_at(user_id, page, size, Utc::now()).await
    }

    /// Same as [`get_feed`](Self::get_feed) at a fixed evaluation instant.
    pub async fn get_feed_at(
        &self,
        user_id: Uuid,
        page: i64,
        size: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>> {
        let feed_page = self.get_feed_page_at(user_id, page, size, now).await?;
        Ok(feed_page.items)
    }

    pub async fn get_feed_page_at(
        &self,
        user_id: Uuid,
        page: i64,
        size: i64,
        now: DateTime<Utc>,
    ) -> Result<FeedPage> {
        let result = self.page_with_deadline(user_id, page, size, now).await;

        match &result {
            Ok(feed_page) => {
                metrics::record_request("success");
                info!(
                    user_id = %user_id,
                    page,
                    size,
                    returned = feed_page.items.len(),
                    total_candidates = feed_page.total_candidates,
                    "Feed computed"
                );
            }
            Err(e) => {
                metrics::record_request(e.status_label());
                warn!(user_id = %user_id, page, size, error = %e, "Feed request failed");
            }
        }

        result
    }

    async fn page_with_deadline(
        &self,
        user_id: Uuid,
        page: i64,
        size: i64,
        now: DateTime<Utc>,
    ) -> Result<FeedPage> {
        // 先驗參數，避免無謂的 store 讀取
        let request = PageRequest::new(page, size)?;

        let ranked = match self.pipeline.request_timeout() {
            Some(deadline) => tokio::time::timeout(deadline, self.rank_feed_at(user_id, now))
                .await
                .map_err(|_| FeedError::Timeout(deadline))??,
            None => self.rank_feed_at(user_id, now).await?,
        };

        let started = Instant::now();
        let items: Vec<Uuid> = request.slice(&ranked).iter().map(|s| s.id()).collect();
        metrics::record_stage_duration("pagination", started.elapsed());

        Ok(FeedPage {
            user_id,
            page,
            size,
            items,
            total_candidates: ranked.len(),
        })
    }

    /// The full ranked sequence for `user_id` at `now`, before pagination.
    pub async fn rank_feed_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredCandidate>> {
        let cutoff = self
            .scorer
            .config()
            .candidate_window()
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                FeedError::InvalidArgument(format!(
                    "candidate window of {} days is out of range at {}",
                    self.scorer.config().candidate_window_days,
                    now
                ))
            })?;

        let started = Instant::now();
        let candidates = self.candidate_source.fetch_candidates_since(cutoff).await?;
        metrics::record_stage_duration("candidates", started.elapsed());

        if candidates.is_empty() {
            debug!(user_id = %user_id, cutoff = %cutoff, "No candidates in window");
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let profile = self
            .aggregator
            .build_profile(
                user_id,
                &candidates,
                self.candidate_source.as_ref(),
                self.interaction_source.as_ref(),
            )
            .await?;
        metrics::record_stage_duration("profile", started.elapsed());

        let started = Instant::now();
        let candidate_count = candidates.len();
        let mut scored = self.score(candidates, profile, now).await?;
        metrics::record_stage_duration("scoring", started.elapsed());
        metrics::record_candidates_scored(candidate_count);

        let started = Instant::now();
        sort_scored(&mut scored);
        metrics::record_stage_duration("ranking", started.elapsed());

        debug!(
            user_id = %user_id,
            candidate_count,
            top_score = scored.first().map(|s| s.score),
            "Ranking complete"
        );

        Ok(scored)
    }

    async fn score(
        &self,
        candidates: Vec<ContentCandidate>,
        profile: AffinityProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredCandidate>> {
        if candidates.len() < self.pipeline.parallel_scoring_threshold {
            return Ok(self.scorer.score_all(&candidates, &profile, now));
        }

        debug!(candidate_count = candidates.len(), "Scoring on rayon pool");

        let scorer = Arc::clone(&self.scorer);
        tokio::task::spawn_blocking(move || scorer.score_all_parallel(&candidates, &profile, now))
            .await
            .map_err(|e| FeedError::Internal(format!("scoring task failed: {}", e)))
    }
}
