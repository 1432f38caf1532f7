use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fixture_cases::cases::BASIC_NULLABLE;
use parquet_fixtures::encoder::{record_batch, EncodeRequest, EncoderAdapter, ParquetEncoder};
use parquet_fixtures::expand::{page_sizing, tile_prefix, BENCH_TILE_ROWS};
use parquet_fixtures::matrix::{MatrixConfig, MatrixDriver};
use parquet_fixtures::{Compression, PageLayout, PageVersion};
use tempfile::TempDir;

const SIZES: [usize; 3] = [1 << 10, 1 << 14, 1 << 18];

fn bench_tile(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile");
    let case = BASIC_NULLABLE.build();

    for rows in SIZES {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("basic_nullable", rows), &rows, |b, &rows| {
            b.iter(|| tile_prefix(&case, BENCH_TILE_ROWS, rows).unwrap())
        });
    }

    group.finish();
}

fn bench_record_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_batch");
    let case = BASIC_NULLABLE.build();

    for rows in SIZES {
        let tiled = tile_prefix(&case, BENCH_TILE_ROWS, rows).unwrap();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("basic_nullable", rows), &tiled, |b, tiled| {
            b.iter(|| record_batch(&tiled.schema, &tiled.columns).unwrap())
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.sample_size(20);
    let case = BASIC_NULLABLE.build();
    let encoder = ParquetEncoder::new();

    for (label, layout, compression) in [
        ("single_none", PageLayout::Single, Compression::None),
        ("multi_none", PageLayout::Multi, Compression::None),
        ("single_snappy", PageLayout::Single, Compression::Snappy),
    ] {
        let rows = 1 << 14;
        let tiled = tile_prefix(&case, BENCH_TILE_ROWS, rows).unwrap();
        let sizing = page_sizing(layout, rows).unwrap();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(BenchmarkId::new(label, rows), |b| {
            b.iter_with_setup(
                || TempDir::new().unwrap(),
                |temp_dir| {
                    let path = temp_dir.path().join("bench.parquet");
                    let request = EncodeRequest {
                        schema: &tiled.schema,
                        columns: &tiled.columns,
                        path: &path,
                        page_version: PageVersion::V1,
                        dictionary: false,
                        compression,
                        data_page_size: sizing.data_page_size,
                        data_page_row_limit: sizing.data_page_row_limit,
                        write_statistics: true,
                    };
                    encoder.encode(&request).unwrap();
                },
            )
        });
    }

    group.finish();
}

fn bench_full_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_matrix");
    group.sample_size(10);

    group.bench_function("60_files", |b| {
        b.iter_with_setup(
            || TempDir::new().unwrap(),
            |temp_dir| {
                let mut config = MatrixConfig::with_output(temp_dir.path());
                config.benchmarks.enabled = false;
                MatrixDriver::new(config, ParquetEncoder::new())
                    .run()
                    .unwrap()
            },
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tile,
    bench_record_batch,
    bench_encode,
    bench_full_matrix
);
criterion_main!(benches);
