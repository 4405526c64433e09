use chrono::{DateTime, Duration, TimeZone, Utc};
use feed_ranking_service::models::{AffinityProfile, ContentCandidate, ContentType, ScoredCandidate};
use feed_ranking_service::services::ranking::sort_scored;
use feed_ranking_service::{
    FeedService, InMemoryContentStore, PageRequest, PipelineConfig, RankingConfig, Scorer,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

fn arb_content_type() -> impl Strategy<Value = ContentType> {
    prop_oneof![
        Just(ContentType::Note),
        Just(ContentType::Image),
        Just(ContentType::Video),
        Just(ContentType::Article),
    ]
}

/// (likes, comments, bookmarks, shares, age in seconds, type)
fn arb_candidate_parts() -> impl Strategy<Value = (u64, u64, u64, u64, i64, ContentType)> {
    (
        0u64..5_000,
        0u64..500,
        0u64..500,
        0u64..200,
        0i64..604_800,
        arb_content_type(),
    )
}

fn build(index: usize, parts: (u64, u64, u64, u64, i64, ContentType)) -> ContentCandidate {
    let (likes, comments, bookmarks, shares, age_secs, content_type) = parts;
    ContentCandidate::new(
        Uuid::from_u128(index as u128 + 1),
        Uuid::nil(),
        content_type,
        now() - Duration::seconds(age_secs),
    )
    .with_counts(likes, comments, bookmarks, shares)
}

fn ranked(candidates: &[ContentCandidate], profile: &AffinityProfile) -> Vec<ScoredCandidate> {
    let mut scored = Scorer::default().score_all(candidates, profile, now());
    sort_scored(&mut scored);
    scored
}

// ── Decay stays in (0, 1] and strictly decreases with age ───────────────

proptest! {
    #[test]
    fn decay_bounded_and_strictly_decreasing(
        age_secs in 0i64..2_592_000,
        delta_secs in 1i64..86_400,
    ) {
        let scorer = Scorer::default();
        let younger = scorer.time_decay(now() - Duration::seconds(age_secs), now());
        let older = scorer.time_decay(now() - Duration::seconds(age_secs + delta_secs), now());

        prop_assert!(younger > 0.0 && younger <= 1.0);
        prop_assert!(older > 0.0 && older <= 1.0);
        prop_assert!(older < younger, "decay({}) = {} >= decay({}) = {}",
            age_secs + delta_secs, older, age_secs, younger);
    }
}

// ── Engagement is non-decreasing in each counter ─────────────────────────

proptest! {
    #[test]
    fn engagement_monotone_per_counter(
        parts in arb_candidate_parts(),
        counter in 0usize..4,
        bump in 1u64..10_000,
    ) {
        let scorer = Scorer::default();
        let base = build(0, parts);
        let mut bumped = base.clone();
        match counter {
            0 => bumped.like_count += bump,
            1 => bumped.comment_count += bump,
            2 => bumped.bookmark_count += bump,
            _ => bumped.share_count += bump,
        }

        prop_assert!(scorer.engagement_score(&bumped) >= scorer.engagement_score(&base));
    }
}

// ── Top-category membership is exactly a 1.5x boost ──────────────────────

proptest! {
    #[test]
    fn category_membership_is_exact_boost(parts in arb_candidate_parts()) {
        let scorer = Scorer::default();
        let category = Uuid::new_v4();
        let candidate = build(0, parts).with_category(category);

        let member = AffinityProfile {
            top_categories: vec![category],
            top_content_types: vec![],
        };
        let outsider = AffinityProfile {
            top_categories: vec![Uuid::new_v4()],
            top_content_types: vec![],
        };

        let boosted = scorer.score(&candidate, &member, now()).score;
        let plain = scorer.score(&candidate, &outsider, now()).score;
        prop_assert_eq!(boosted, plain * 1.5);
    }
}

// ── Concatenated pages reproduce the full ranking ────────────────────────

proptest! {
    #[test]
    fn pages_concatenate_to_full_ranking(
        parts in prop::collection::vec(arb_candidate_parts(), 0..60),
        size in 1i64..12,
    ) {
        let candidates: Vec<ContentCandidate> =
            parts.into_iter().enumerate().map(|(i, p)| build(i, p)).collect();
        let full = ranked(&candidates, &AffinityProfile::empty());

        let mut collected: Vec<Uuid> = Vec::new();
        for page in 0.. {
            let request = PageRequest::new(page, size).unwrap();
            let slice = request.slice(&full);
            if slice.is_empty() {
                break;
            }
            prop_assert!(slice.len() as i64 <= size);
            collected.extend(slice.iter().map(|s| s.id()));
        }

        let expected: Vec<Uuid> = full.iter().map(|s| s.id()).collect();
        prop_assert_eq!(collected.iter().collect::<HashSet<_>>().len(), candidates.len());
        prop_assert_eq!(collected, expected);
    }
}

// ── Ranking ignores input order ──────────────────────────────────────────

proptest! {
    #[test]
    fn ranking_independent_of_input_order(
        parts in prop::collection::vec(arb_candidate_parts(), 1..40),
    ) {
        let candidates: Vec<ContentCandidate> =
            parts.into_iter().enumerate().map(|(i, p)| build(i, p)).collect();
        let profile = AffinityProfile {
            top_categories: vec![],
            top_content_types: vec![ContentType::Video],
        };

        let forward: Vec<Uuid> = ranked(&candidates, &profile).iter().map(|s| s.id()).collect();

        let mut reversed_input = candidates.clone();
        reversed_input.reverse();
        let backward: Vec<Uuid> = ranked(&reversed_input, &profile).iter().map(|s| s.id()).collect();

        prop_assert_eq!(forward, backward);
    }
}

// ── GetFeed is idempotent at a fixed instant ─────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn get_feed_idempotent(
        parts in prop::collection::vec(arb_candidate_parts(), 0..30),
        liked in prop::collection::vec(0usize..30, 0..10),
        size in 1i64..8,
    ) {
        let store = Arc::new(InMemoryContentStore::new());
        let user = Uuid::new_v4();
        let categories: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

        let candidates: Vec<ContentCandidate> = parts
            .into_iter()
            .enumerate()
            .map(|(i, p)| build(i, p).with_category(categories[i % categories.len()]))
            .collect();
        for candidate in &candidates {
            store.insert_candidate(candidate.clone());
        }
        for index in liked {
            if let Some(candidate) = candidates.get(index) {
                store.record_like(user, candidate.id, now());
            }
        }

        let feed = FeedService::new(
            store.clone(),
            store,
            RankingConfig::default(),
            PipelineConfig::default(),
        );

        let (first, second) = tokio_test::block_on(async {
            let first = feed.get_feed_at(user, 0, size, now()).await.unwrap();
            let second = feed.get_feed_at(user, 0, size, now()).await.unwrap();
            (first, second)
        });

        prop_assert!(first.len() as i64 <= size);
        prop_assert_eq!(first, second);
    }
}
