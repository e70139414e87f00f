//! Benchmark suite for ATEX container decoding
//!
//! Measures the full decode pipeline over synthetic containers that
//! exercise the two extreme input shapes: run-compressed data (Huffman
//! loop bound) and raw bulk data (copy bound).
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gw2tex_benches::{generate_bulk_dxt5, generate_white_dxt1, sizes};
use gw2tex_types::file::atex;
use std::hint::black_box;

/// Benchmark decoding of run-compressed DXT1 containers
fn bench_decode_white_runs(c: &mut Criterion) {
	let mut group = c.benchmark_group("atex_decode_white_runs");

	for (name, (width, height)) in [
		("tiny", sizes::TINY),
		("small", sizes::SMALL),
		("medium", sizes::MEDIUM),
		("large", sizes::LARGE),
	] {
		let data = generate_white_dxt1(width, height);

		let pixels = u64::from(width) * u64::from(height);
		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| {
				let result = atex::decode(black_box(data), width, height);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark decoding of bulk-copied DXT5 containers
fn bench_decode_bulk(c: &mut Criterion) {
	let mut group = c.benchmark_group("atex_decode_bulk");

	for (name, (width, height)) in [
		("tiny", sizes::TINY),
		("small", sizes::SMALL),
		("medium", sizes::MEDIUM),
	] {
		let data = generate_bulk_dxt5(width, height);

		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| {
				let result = atex::decode(black_box(data), width, height);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark header parsing separately
fn bench_header_parsing(c: &mut Criterion) {
	let mut group = c.benchmark_group("atex_header");

	let data = generate_white_dxt1(sizes::SMALL.0, sizes::SMALL.1);

	group.bench_function("parse_header", |b| {
		b.iter(|| {
			let result = atex::Header::from_bytes(black_box(&data));
			black_box(result)
		});
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_decode_white_runs,
	bench_decode_bulk,
	bench_header_parsing,
);

criterion_main!(benches);
