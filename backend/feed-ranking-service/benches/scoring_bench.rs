use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feed_ranking_service::models::{AffinityProfile, ContentCandidate, ContentType};
use feed_ranking_service::services::ranking::sort_scored;
use feed_ranking_service::Scorer;
use uuid::Uuid;

fn candidates(count: usize) -> Vec<ContentCandidate> {
    let now = Utc::now();
    let types = [
        ContentType::Note,
        ContentType::Image,
        ContentType::Video,
        ContentType::Article,
    ];
    (0..count)
        .map(|i| {
            ContentCandidate::new(
                Uuid::from_u128(i as u128),
                Uuid::nil(),
                types[i % types.len()],
                now - Duration::seconds((i * 97 % 604_800) as i64),
            )
            .with_counts((i % 211) as u64, (i % 37) as u64, (i % 19) as u64, (i % 7) as u64)
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let scorer = Scorer::default();
    let profile = AffinityProfile {
        top_categories: vec![],
        top_content_types: vec![ContentType::Video, ContentType::Note],
    };
    let now = Utc::now();

    let mut group = c.benchmark_group("score_and_sort");
    for size in [1_000usize, 10_000, 50_000] {
        let input = candidates(size);

        group.bench_with_input(BenchmarkId::new("sequential", size), &input, |b, input| {
            b.iter(|| {
                let mut scored = scorer.score_all(black_box(input), &profile, now);
                sort_scored(&mut scored);
                scored
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &input, |b, input| {
            b.iter(|| {
                let mut scored = scorer.score_all_parallel(black_box(input), &profile, now);
                sort_scored(&mut scored);
                scored
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
