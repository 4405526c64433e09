// Utility functions for feed-ranking-service

use chrono::{DateTime, Utc};

/// Age in hours between `created_at` and `now`, from whole seconds.
///
/// Timestamps in the future yield 0.
pub fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - created_at).num_seconds().max(0);
    seconds as f64 / 3600.0
}

/// Half-life decay: 1.0 at age 0, 0.5 after one half-life.
///
/// Never reaches 0, so engagement still orders very old content.
pub fn half_life_decay(age_hours: f64, half_life_hours: f64) -> f64 {
    0.5_f64
        .powf(age_hours.max(0.0) / half_life_hours)
        .max(f64::MIN_POSITIVE)
}
