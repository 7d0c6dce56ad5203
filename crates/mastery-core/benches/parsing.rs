use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mastery_core::parser::{parse_progress_str, validate_progress_set};

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    // Generate progress files of various sizes
    let small_toml = generate_progress_toml(5);
    let medium_toml = generate_progress_toml(50);
    let large_toml = generate_progress_toml(200);

    group.bench_function("5_subtopics", |b| {
        b.iter(|| parse_progress_str(black_box(&small_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("50_subtopics", |b| {
        b.iter(|| parse_progress_str(black_box(&medium_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_subtopics", |b| {
        b.iter(|| parse_progress_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let toml = generate_progress_toml(200);
    let set = parse_progress_str(&toml, "bench.toml".as_ref()).expect("bench input parses");

    c.bench_function("validate_200_subtopics", |b| {
        b.iter(|| validate_progress_set(black_box(&set)))
    });
}

fn generate_progress_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[learner]
id = "bench"
name = "Benchmark"
"#,
    );
    for i in 0..n {
        let a = 4 + i % 16;
        s.push_str(&format!(
            r#"
[[subtopics]]
id = "subtopic_{i}"
baseline_completed = true
last_practiced = "2026-01-01T00:00:00Z"
easy = {{ attempted = {a}, correct = {} }}
medium = {{ attempted = {a}, correct = {} }}
hard = {{ attempted = {a}, correct = {} }}
core = {{ attempted = {a}, correct = {} }}
"#,
            a * 3 / 4,
            a / 2,
            a / 4,
            a / 2,
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_validation);
criterion_main!(benches);
