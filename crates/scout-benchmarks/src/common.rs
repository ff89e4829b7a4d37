//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};
use serde_json::{json, Value};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

fn cli_entry(i: usize) -> Value {
    json!({
        "name": format!("package-{}", i),
        "version": format!("{}.{}.0", i % 7, i % 13),
        "description": format!("Benchmark fixture package number {}", i),
        "keywords": ["bench", "fixture", format!("k{}", i % 5)],
        "date": "2024-01-15T10:30:00.000Z",
        "links": {
            "npm": format!("https://www.npmjs.com/package/package-{}", i),
            "homepage": format!("https://example.com/package-{}", i),
            "repository": format!("https://github.com/example/package-{}", i)
        },
        "author": { "name": "Bench Author", "email": "bench@example.com" },
        "maintainers": [{ "username": "bench", "email": "bench@example.com" }]
    })
}

/// `npm search --json` stdout with `count` entries
pub fn cli_json_output(count: usize) -> String {
    Value::Array((0..count).map(cli_entry).collect()).to_string()
}

/// Tab-separated `npm search` stdout with `count` lines
pub fn cli_text_output(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                "package-{}\t1.{}.0\tBenchmark fixture package number {}\t=bench\t2024-01-15",
                i,
                i % 10,
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Registry `/-/v1/search` response body with `count` objects
pub fn api_response_body(count: usize) -> String {
    let objects: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "package": cli_entry(i),
                "downloads": { "weekly": i * 100, "monthly": i * 400 },
                "score": {
                    "final": 0.5,
                    "detail": { "quality": 0.6, "popularity": 0.4, "maintenance": 0.9 }
                }
            })
        })
        .collect();

    json!({ "objects": objects, "total": count * 10 }).to_string()
}
