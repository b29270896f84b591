use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use refsuggest_core::locale::CountryScope;
use refsuggest_core::model::{InstitutionRecord, LocationRecord};
use refsuggest_core::search::{FuzzyMatcher, DEFAULT_LIMIT};
use std::hint::black_box;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton",
    "Fairview", "Salem", "Madison", "Georgetown", "Zürich", "München",
];
const COUNTRIES: &[&str] = &["US", "DE", "CH", "FR"];

fn generate_locations(n: usize) -> Vec<LocationRecord> {
    (0..n)
        .map(|i| {
            LocationRecord::new(
                format!("{:05}", 10_000 + i),
                format!("{} {}", CITIES[i % CITIES.len()], i / CITIES.len()),
                "ST",
                COUNTRIES[i % COUNTRIES.len()],
            )
        })
        .collect()
}

fn generate_institutions(n: usize) -> Vec<InstitutionRecord> {
    (0..n)
        .map(|i| InstitutionRecord::new(format!("{} State University {i}", CITIES[i % CITIES.len()]), "US"))
        .collect()
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn bench_score_text(c: &mut Criterion) {
    let m = FuzzyMatcher::default();
    let mut group = c.benchmark_group("score_text");
    group.bench_function("prefix", |b| {
        b.iter(|| m.score_text(black_box("Springfield"), black_box("spr")));
    });
    group.bench_function("typo", |b| {
        b.iter(|| m.score_text(black_box("Springfield"), black_box("sprnigfield")));
    });
    group.bench_function("miss", |b| {
        b.iter(|| m.score_text(black_box("Georgetown University"), black_box("xylophone")));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Search over datasets
// ---------------------------------------------------------------------------

fn bench_search(c: &mut Criterion) {
    let m = FuzzyMatcher::default();
    let mut group = c.benchmark_group("search");

    for size in [1_000usize, 10_000, 50_000] {
        let locations = generate_locations(size);
        let scope = CountryScope::new("US");
        group.bench_with_input(BenchmarkId::new("locations_scoped", size), &locations, |b, data| {
            b.iter(|| m.search_scoped(data, black_box("fairv"), DEFAULT_LIMIT, scope.as_ref()));
        });

        let institutions = generate_institutions(size);
        group.bench_with_input(BenchmarkId::new("institutions", size), &institutions, |b, data| {
            b.iter(|| m.search(data, black_box("madisn state"), DEFAULT_LIMIT));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_score_text, bench_search);
criterion_main!(benches);
