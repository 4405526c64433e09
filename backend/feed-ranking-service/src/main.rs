//! `feed-ranking` computes one feed page from a JSON store snapshot.
//!
//! Environment:
//! - `FEED_SNAPSHOT_PATH` snapshot file (default `fixtures/sample_snapshot.json`)
//! - `FEED_USER_ID` requesting user (required)
//! - `FEED_PAGE` / `FEED_SIZE` zero-based page and page size
//! - `FEED_NOW` RFC 3339 evaluation instant, defaults to the current time
//! - `RANKING_*` / `FEED_*` weight and pipeline overrides, see `config`
//!
//! Only content newer than the candidate window (7 days by default) before
//! the evaluation instant is ranked. The bundled fixture is dated around
//! 2026-10-18, so pin `FEED_NOW=2026-10-18T12:00:00Z` to get a non-empty
//! page from it once that date has passed.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use feed_ranking_service::metrics;
use feed_ranking_service::services::store::StoreSnapshot;
use feed_ranking_service::{Config, FeedService, InMemoryContentStore};
use std::env;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load config")?;

    info!(
        "Starting {} with snapshot {}",
        config.service.service_name, config.service.snapshot_path
    );

    let snapshot = StoreSnapshot::from_json_file(&config.service.snapshot_path)?;
    let store = Arc::new(InMemoryContentStore::from_snapshot(snapshot));
    info!(candidates = store.candidate_count(), "Snapshot loaded");

    let user_id: Uuid = env::var("FEED_USER_ID")
        .context("FEED_USER_ID must be set")?
        .parse()
        .context("FEED_USER_ID must be a valid UUID")?;
    let page: i64 = env::var("FEED_PAGE")
        .unwrap_or_else(|_| "0".to_string())
        .parse()
        .context("FEED_PAGE must be a valid i64")?;
    let size: i64 = match env::var("FEED_SIZE") {
        Ok(raw) => raw.parse().context("FEED_SIZE must be a valid i64")?,
        Err(_) => config.pipeline.default_page_size,
    };
    let now: DateTime<Utc> = match env::var("FEED_NOW") {
        Ok(raw) => DateTime::parse_from_rfc3339(&raw)
            .context("FEED_NOW must be an RFC 3339 timestamp")?
            .with_timezone(&Utc),
        Err(_) => Utc::now(),
    };

    let service = FeedService::new(
        store.clone(),
        store,
        config.ranking.clone(),
        config.pipeline.clone(),
    );

    let feed_page = service
        .get_feed_page_at(user_id, page, size, now)
        .await
        .context("Failed to compute feed")?;

    println!("{}", serde_json::to_string_pretty(&feed_page)?);

    debug!(metrics = %metrics::gather_text(), "Final metrics");

    Ok(())
}

fn init_tracing() {
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout 留給 feed 輸出
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
