use serde::Deserialize;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid ranking config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Longest accepted candidate window.
pub const MAX_CANDIDATE_WINDOW_DAYS: i64 = 3650;

/// Half-lives a candidate may age inside the window. 0.5^n stays a normal
/// positive f64 well past this point.
pub const MAX_HALF_LIVES_IN_WINDOW: f64 = 1000.0;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub ranking: RankingConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub snapshot_path: String,
}

/// Weights, decay and caps for one ranking pass.
///
/// Loaded once and shared read-only by the scorer and the aggregator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_share_weight")]
    pub share_weight: f64,
    #[serde(default = "default_comment_weight")]
    pub comment_weight: f64,
    #[serde(default = "default_bookmark_weight")]
    pub bookmark_weight: f64,
    #[serde(default = "default_like_weight")]
    pub like_weight: f64,
    /// Added to every engagement score so fresh zero-engagement content is still rankable.
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    #[serde(default = "default_half_life_hours")]
    pub half_life_hours: f64,
    #[serde(default = "default_category_boost")]
    pub category_boost: f64,
    #[serde(default = "default_content_type_boost")]
    pub content_type_boost: f64,
    #[serde(default = "default_candidate_window_days")]
    pub candidate_window_days: i64,
    #[serde(default = "default_max_top_categories")]
    pub max_top_categories: usize,
    #[serde(default = "default_max_top_content_types")]
    pub max_top_content_types: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            share_weight: default_share_weight(),
            comment_weight: default_comment_weight(),
            bookmark_weight: default_bookmark_weight(),
            like_weight: default_like_weight(),
            base_score: default_base_score(),
            half_life_hours: default_half_life_hours(),
            category_boost: default_category_boost(),
            content_type_boost: default_content_type_boost(),
            candidate_window_days: default_candidate_window_days(),
            max_top_categories: default_max_top_categories(),
            max_top_content_types: default_max_top_content_types(),
        }
    }
}

impl RankingConfig {
    /// `None` when the window does not fit a `chrono::Duration`.
    pub fn candidate_window(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_days(self.candidate_window_days)
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("share_weight", self.share_weight),
            ("comment_weight", self.comment_weight),
            ("bookmark_weight", self.bookmark_weight),
            ("like_weight", self.like_weight),
            ("base_score", self.base_score),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let positives = [
            ("half_life_hours", self.half_life_hours),
            ("category_boost", self.category_boost),
            ("content_type_boost", self.content_type_boost),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.candidate_window_days <= 0 || self.candidate_window_days > MAX_CANDIDATE_WINDOW_DAYS
        {
            return Err(ConfigError::Invalid(format!(
                "candidate_window_days must be in 1..={}, got {}",
                MAX_CANDIDATE_WINDOW_DAYS, self.candidate_window_days
            )));
        }

        // 窗口內最舊的候選 decay 仍須 > 0
        let half_lives = self.candidate_window_days as f64 * 24.0 / self.half_life_hours;
        if half_lives > MAX_HALF_LIVES_IN_WINDOW {
            return Err(ConfigError::Invalid(format!(
                "candidate window spans {:.0} half-lives, at most {} allowed",
                half_lives, MAX_HALF_LIVES_IN_WINDOW
            )));
        }

        if self.max_top_categories == 0 || self.max_top_content_types == 0 {
            return Err(ConfigError::Invalid(
                "top category and content type caps must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    /// Upper bound on concurrent by-id lookups for interactions outside the window.
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
    /// Candidate count at which scoring moves onto the rayon pool.
    #[serde(default = "default_parallel_scoring_threshold")]
    pub parallel_scoring_threshold: usize,
    /// 0 disables the deadline.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
            parallel_scoring_threshold: default_parallel_scoring_threshold(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "default_page_size must be positive, got {}",
                self.default_page_size
            )));
        }
        if self.max_concurrent_lookups == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "feed-ranking-service".to_string()),
                snapshot_path: env::var("FEED_SNAPSHOT_PATH")
                    .unwrap_or_else(|_| "fixtures/sample_snapshot.json".to_string()),
            },
            ranking: envy::prefixed("RANKING_").from_env::<RankingConfig>()?,
            pipeline: envy::prefixed("FEED_").from_env::<PipelineConfig>()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.ranking.validate()?;
        self.pipeline.validate()
    }
}

fn default_share_weight() -> f64 {
    20.0
}

fn default_comment_weight() -> f64 {
    13.5
}

fn default_bookmark_weight() -> f64 {
    10.0
}

fn default_like_weight() -> f64 {
    0.5
}

fn default_base_score() -> f64 {
    1.0
}

fn default_half_life_hours() -> f64 {
    6.0
}

fn default_category_boost() -> f64 {
    1.5
}

fn default_content_type_boost() -> f64 {
    1.3
}

fn default_candidate_window_days() -> i64 {
    7
}

fn default_max_top_categories() -> usize {
    5
}

fn default_max_top_content_types() -> usize {
    3
}

fn default_page_size() -> i64 {
    20
}

fn default_max_concurrent_lookups() -> usize {
    16
}

fn default_parallel_scoring_threshold() -> usize {
    2048
}

fn default_request_timeout_ms() -> u64 {
    5000
}
