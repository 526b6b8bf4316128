//! Performance benchmarks for quickrank.
//!
//! Run with: cargo bench
//!
//! Ranking runs once per keystroke, so a full pass over a few hundred
//! candidates should stay well under a millisecond.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quickrank::core::candidate::PageVisits;
use quickrank::config::MatchConfig;
use quickrank::core::matching::fuzzy;
use quickrank::{Candidate, CandidateKind, QuickAnswerKind, RankingEngine};

const NOW: f64 = 1_700_000_000_000.0;
const DAY_MS: f64 = 86_400_000.0;

/// A candidate mix similar to what the overlay collects for one query.
fn candidate_set(size: usize) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(size + 4);

    for i in 0..size {
        let candidate = match i % 4 {
            0 => Candidate::new(
                CandidateKind::Tab {
                    pinned: i % 20 == 0,
                    last_accessed: Some(NOW - i as f64 * 1000.0),
                },
                format!("Project {} - Issue tracker", i),
            )
            .with_url(format!("https://tracker.example/issues/{}", i)),
            1 => Candidate::new(
                CandidateKind::History(PageVisits {
                    freq: (i % 17) as u32,
                    last: Some(NOW - (i % 60) as f64 * DAY_MS),
                }),
                format!("Rust documentation page {}", i),
            )
            .with_url(format!("https://doc.rust-lang.org/std/{}", i)),
            2 => Candidate::new(
                CandidateKind::Bookmark(PageVisits {
                    freq: (i % 5) as u32,
                    last: Some(NOW - (i % 90) as f64 * DAY_MS),
                }),
                format!("Benchmark results {}", i),
            )
            .with_url(format!("https://bench.example/{}", i)),
            _ => Candidate::new(
                CandidateKind::Navigation {
                    domain: format!("site{}.example", i),
                    autofill: false,
                    open_count: (i % 3) as u32,
                    visit_count: (i % 40) as u32,
                    last_visit: Some(NOW - (i % 10) as f64 * DAY_MS),
                },
                format!("site{}.example", i),
            ),
        };
        candidates.push(candidate);
    }

    candidates.push(Candidate::new(CandidateKind::Google, "Search the web"));
    candidates.push(Candidate::new(CandidateKind::Ai, "Ask AI"));
    candidates.push(
        Candidate::new(CandidateKind::QuickAnswer(QuickAnswerKind::Calculator), "").with_text("= 4"),
    );
    candidates
}

/// Benchmark a full ranking pass per query.
fn bench_rank(c: &mut Criterion) {
    let engine = RankingEngine::in_memory();
    let candidates = candidate_set(400);

    let queries = ["r", "rust doc", "site1", "how do i read a file in rust?", ""];

    let mut group = c.benchmark_group("rank");

    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, query| {
            b.iter(|| black_box(engine.rank_at(black_box(&candidates), query, NOW)))
        });
    }

    group.finish();
}

/// Benchmark fuzzy similarity, mostly the edit-distance fallback.
fn bench_fuzzy(c: &mut Criterion) {
    let cfg = MatchConfig::default();
    let mut group = c.benchmark_group("fuzzy");

    let pairs = [
        ("short", "rust", "rusty"),
        ("title", "The Rust Programming Language", "rust programing"),
        (
            "url",
            "https://doc.rust-lang.org/std/collections/struct.HashMap.html",
            "hashmap docs",
        ),
    ];

    for (name, a, b) in pairs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(a, b), |bench, (a, b)| {
            bench.iter(|| black_box(fuzzy(black_box(a), black_box(b), &cfg)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rank, bench_fuzzy);

criterion_main!(benches);
