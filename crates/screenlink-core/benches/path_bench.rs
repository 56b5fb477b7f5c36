//! Criterion benchmarks for overlay path construction.
//!
//! The rebuild task runs every few milliseconds in every window, so building
//! and serializing the path must stay cheap even with many peers.
//!
//! Run with:
//! ```bash
//! cargo bench --package screenlink-core --bench path_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use screenlink_core::{connect_centers, decode_value, ScreenEntry};

/// Creates `n` windows laid out left to right, one per 1920-wide display.
fn build_entries(n: usize) -> Vec<ScreenEntry> {
    (0..n)
        .map(|i| ScreenEntry {
            screen_x: 1920 * i as i32 + 37,
            screen_y: 120,
            screen_width: 1920,
            screen_height: 1080,
            width: 801,
            height: 603,
            last_updated: 1_700_000_000_000,
        })
        .collect()
}

fn bench_connect_centers(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_centers");
    for n in [1usize, 4, 16, 64] {
        let entries = build_entries(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &entries, |b, entries| {
            b.iter(|| connect_centers(black_box(entries)).serialize())
        });
    }
    group.finish();
}

fn bench_decode_entry(c: &mut Criterion) {
    let text = r#"{"screenX":37,"screenY":120,"screenWidth":1920,"screenHeight":1080,"width":801,"height":603,"lastUpdated":1700000000000}"#;
    c.bench_function("decode_screen_entry", |b| {
        b.iter(|| decode_value::<ScreenEntry>(black_box(text)))
    });
}

criterion_group!(benches, bench_connect_centers, bench_decode_entry);
criterion_main!(benches);
