//! Latency benchmarks for the deterministic classification stage
//!
//! Normalization runs every rewrite rule over the query, so its cost grows
//! with the rule table. These benchmarks keep an eye on that cost for
//! typical patient phrasings.
//!
//! Run with: cargo bench -p examcode-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use examcode_classifiers::{ExamTypeClassifier, Normalizer, RuleSet};

fn benchmark_normalizer(c: &mut Criterion) {
    let rules = RuleSet::default();
    let normalizer = Normalizer::new(&rules.normalization).expect("default rules compile");

    let test_cases = vec![
        ("short_plain", "Bonjour"),
        ("short_abbreviation", "TOGD demain"),
        ("medium_plain", "J'ai besoin d'un scanner du genou suite à une chute au ski"),
        (
            "medium_compound",
            "Mon médecin demande un arthro-scanner et une echographie endovaginale",
        ),
    ];

    let mut group = c.benchmark_group("Normalizer");
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("normalize", name), &text, |b, text| {
            b.iter(|| normalizer.normalize(black_box(text)));
        });
    }

    group.finish();
}

fn benchmark_classifier(c: &mut Criterion) {
    let classifier =
        ExamTypeClassifier::new(&RuleSet::default()).expect("default rules compile");

    let test_cases = vec![
        ("no_match", "bonjour, je voudrais un rendez-vous"),
        ("first_category", "radio du poignet gauche"),
        ("last_category", "centre d'imagerie le plus proche"),
        ("after_rewrite", "doppler des membres inférieurs"),
    ];

    let mut group = c.benchmark_group("ExamTypeClassifier");
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("classify", name), &text, |b, text| {
            b.iter(|| classifier.classify(black_box(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_normalizer, benchmark_classifier);
criterion_main!(benches);
