/// Candidate Scoring
///
/// score = engagement * decay * boost
///
/// - engagement = shares * w_s + comments * w_c + bookmarks * w_b + likes * w_l + base
/// - decay      = 0.5 ^ (age_hours / half_life)
/// - boost      = category_boost (if top category) * content_type_boost (if top type)
use crate::config::RankingConfig;
use crate::models::{AffinityProfile, ContentCandidate, ScoreBreakdown, ScoredCandidate};
use crate::utils::{age_hours, half_life_decay};
use chrono::{DateTime, Utc};
use rayon::prelude::*;

/// Pure scoring function over (candidate, profile, now).
#[derive(Debug, Clone)]
pub struct Scorer {
    config: RankingConfig,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl Scorer {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn engagement_score(&self, candidate: &ContentCandidate) -> f64 {
        candidate.share_count as f64 * self.config.share_weight
            + candidate.comment_count as f64 * self.config.comment_weight
            + candidate.bookmark_count as f64 * self.config.bookmark_weight
            + candidate.like_count as f64 * self.config.like_weight
            + self.config.base_score
    }

    /// In (0, 1]; exactly 1.0 for content created at or after `now`.
    pub fn time_decay(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        half_life_decay(age_hours(created_at, now), self.config.half_life_hours)
    }

    pub fn personalization_boost(
        &self,
        candidate: &ContentCandidate,
        profile: &AffinityProfile,
    ) -> f64 {
        let mut boost = 1.0;

        if let Some(category_id) = candidate.category_id {
            if profile.contains_category(&category_id) {
                boost *= self.config.category_boost;
            }
        }

        if profile.contains_content_type(candidate.content_type) {
            boost *= self.config.content_type_boost;
        }

        boost
    }

    pub fn score(
        &self,
        candidate: &ContentCandidate,
        profile: &AffinityProfile,
        now: DateTime<Utc>,
    ) -> ScoredCandidate {
        let breakdown = ScoreBreakdown {
            engagement: self.engagement_score(candidate),
            decay: self.time_decay(candidate.created_at, now),
            boost: self.personalization_boost(candidate, profile),
        };

        ScoredCandidate {
            candidate: candidate.clone(),
            score: breakdown.engagement * breakdown.decay * breakdown.boost,
            breakdown,
        }
    }

    pub fn score_all(
        &self,
        candidates: &[ContentCandidate],
        profile: &AffinityProfile,
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate> {
        candidates
            .iter()
            .map(|candidate| self.score(candidate, profile, now))
            .collect()
    }

    /// Same output as [`score_all`](Self::score_all), fanned out over the rayon pool.
    pub fn score_all_parallel(
        &self,
        candidates: &[ContentCandidate],
        profile: &AffinityProfile,
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate> {
        candidates
            .par_iter()
            .map(|candidate| self.score(candidate, profile, now))
            .collect()
    }
}
