//! Feed Ranking Metrics
//!
//! Prometheus metrics for the feed ranking pipeline

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Encoder, Histogram,
    HistogramVec, IntCounterVec, TextEncoder,
};
use std::time::Duration;

static FEED_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feed_requests_total",
        "Total feed ranking requests by outcome",
        &["status"]
    )
    .expect("Failed to register feed requests metric")
});

static FEED_STAGE_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "feed_stage_duration_seconds",
        "Duration of feed ranking stages",
        &["stage"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("Failed to register feed stage duration metric")
});

static FEED_CANDIDATES_SCORED: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "feed_candidates_scored",
        "Number of candidates scored per feed request",
        vec![0.0, 10.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0, 50000.0]
    )
    .expect("Failed to register feed candidates scored metric")
});

static FEED_FALLBACK_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feed_fallback_lookups_total",
        "By-id lookups for interaction targets outside the candidate window",
        &["outcome"]
    )
    .expect("Failed to register feed fallback lookups metric")
});

/// Record feed request result (success/invalid_argument/retrieval_error/timeout/internal)
pub fn record_request(status: &str) {
    FEED_REQUESTS_TOTAL.with_label_values(&[status]).inc();
}

/// Record duration of one pipeline stage (candidates/profile/scoring/ranking)
pub fn record_stage_duration(stage: &str, duration: Duration) {
    FEED_STAGE_DURATION_SECONDS
        .with_label_values(&[stage])
        .observe(duration.as_secs_f64());
}

pub fn record_candidates_scored(count: usize) {
    FEED_CANDIDATES_SCORED.observe(count as f64);
}

/// Record fallback lookup outcomes (found / missing)
pub fn record_fallback_lookups(found: usize, missing: usize) {
    FEED_FALLBACK_LOOKUPS_TOTAL
        .with_label_values(&["found"])
        .inc_by(found as u64);
    FEED_FALLBACK_LOOKUPS_TOTAL
        .with_label_values(&["missing"])
        .inc_by(missing as u64);
}

/// Render the default registry in the Prometheus text format.
pub fn gather_text() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_are_exposed() {
        record_request("success");
        record_stage_duration("scoring", Duration::from_millis(3));
        record_candidates_scored(42);
        record_fallback_lookups(2, 1);

        let text = gather_text();
        assert!(text.contains("feed_requests_total"));
        assert!(text.contains("feed_stage_duration_seconds"));
        assert!(text.contains("feed_candidates_scored"));
        assert!(text.contains("feed_fallback_lookups_total"));
    }
}
