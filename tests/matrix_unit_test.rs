//! Matrix driver behaviour checked through the recording encoder.

use parquet_fixtures::encoder::RecordingEncoder;
use parquet_fixtures::expand::{MULTI_PAGE_SIZE, SINGLE_PAGE_SIZE};
use parquet_fixtures::manifest::portable_path;
use parquet_fixtures::matrix::{MatrixConfig, MatrixDriver};
use parquet_fixtures::{Compression, FixtureError, PageLayout, PageVersion};
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;

fn relative(root: &Path, path: &Path) -> String {
    portable_path(path.strip_prefix(root).unwrap())
}

#[test]
fn test_full_matrix_requests_sixty_files() {
    let dir = TempDir::new().unwrap();
    let encoder = RecordingEncoder::new();
    let driver = MatrixDriver::new(MatrixConfig::with_output(dir.path()), &encoder);

    let summary = driver.run_full_matrix().unwrap();
    assert_eq!(summary.jobs, 60);
    assert!(summary.artifacts.is_empty());

    let calls = encoder.calls();
    assert_eq!(calls.len(), 60);
    let paths: HashSet<_> = calls.iter().map(|c| relative(dir.path(), &c.path)).collect();
    assert_eq!(paths.len(), 60);

    for expected in [
        "v1/basic_nullable_10.parquet",
        "v1/dict/basic_required_10.parquet",
        "v2/lz4/nested_nullable_10.parquet",
        "v2/dict/snappy/struct_nullable_10.parquet",
        "v1/dict/lz4/nested_edge_nullable_10.parquet",
    ] {
        assert!(paths.contains(expected), "missing {}", expected);
    }

    // Recording encoder never touches the filesystem
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_full_matrix_requests_carry_profile() {
    let dir = TempDir::new().unwrap();
    let encoder = RecordingEncoder::new();
    MatrixDriver::new(MatrixConfig::with_output(dir.path()), &encoder)
        .run_full_matrix()
        .unwrap();

    let calls = encoder.calls();
    let call = calls
        .iter()
        .find(|c| relative(dir.path(), &c.path) == "v2/dict/snappy/basic_nullable_10.parquet")
        .unwrap();
    assert_eq!(call.page_version, PageVersion::V2);
    assert!(call.dictionary);
    assert_eq!(call.compression, Compression::Snappy);
    assert_eq!(call.data_page_size, SINGLE_PAGE_SIZE);
    assert_eq!(call.data_page_row_limit, None);
    assert!(call.write_statistics);
    assert_eq!(call.rows, 10);
    assert_eq!(call.fields.len(), 14);

    let edge = calls
        .iter()
        .find(|c| c.path.ends_with("nested_edge_nullable_10.parquet"))
        .unwrap();
    assert_eq!(edge.rows, 1);
    assert_eq!(edge.fields, vec!["simple", "null"]);
}

#[test]
fn test_configured_codecs_shape_the_matrix() {
    let dir = TempDir::new().unwrap();
    let mut config = MatrixConfig::with_output(dir.path());
    config.page_versions = vec![PageVersion::V2];
    config.dictionary = vec![false];
    config.codecs = vec![Compression::Zstd, Compression::Lz4Raw];

    let encoder = RecordingEncoder::new();
    let summary = MatrixDriver::new(config, &encoder).run_full_matrix().unwrap();
    assert_eq!(summary.jobs, 5 * 2);
    assert!(encoder
        .calls()
        .iter()
        .all(|c| c.page_version == PageVersion::V2 && !c.dictionary));
}

#[test]
fn test_benchmark_rows_match_size() {
    let dir = TempDir::new().unwrap();
    let mut config = MatrixConfig::with_output(dir.path());
    config.benchmarks.sizes = vec![1024, 4096];

    let encoder = RecordingEncoder::new();
    let summary = MatrixDriver::new(config, &encoder).run_benchmarks().unwrap();
    assert_eq!(summary.jobs, 12);
    assert_eq!(summary.rows, 6 * (1024 + 4096));

    for call in encoder.calls() {
        let name = call.path.file_name().unwrap().to_string_lossy().into_owned();
        let size: usize = name
            .trim_end_matches(".parquet")
            .rsplit('_')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(call.rows, size, "{}", name);
        assert_eq!(call.page_version, PageVersion::V1);
    }
}

#[test]
fn test_benchmark_multi_page_requests() {
    let dir = TempDir::new().unwrap();
    let mut config = MatrixConfig::with_output(dir.path());
    config.benchmarks.sizes = vec![1024];

    let encoder = RecordingEncoder::new();
    MatrixDriver::new(config, &encoder).run_benchmarks().unwrap();

    let calls = encoder.calls();
    let multi: Vec<_> = calls
        .iter()
        .filter(|c| relative(dir.path(), &c.path).contains("/multi/"))
        .collect();
    assert_eq!(multi.len(), 2);
    for call in multi {
        assert_eq!(call.data_page_size, MULTI_PAGE_SIZE);
        assert_eq!(call.data_page_row_limit, Some(512));
    }

    let required = calls
        .iter()
        .find(|c| c.path.ends_with("benches_required_1024.parquet"))
        .unwrap();
    assert_eq!(required.fields.len(), 9);
}

#[test]
fn test_indivisible_size_fails_before_encoding() {
    let dir = TempDir::new().unwrap();
    let mut config = MatrixConfig::with_output(dir.path());
    config.benchmarks.sizes = vec![1024, 1020];

    let encoder = RecordingEncoder::new();
    let err = MatrixDriver::new(config, &encoder).run().unwrap_err();
    assert!(err.is_config(), "{}", err);
    assert!(err.to_string().contains("1020"));
    assert_eq!(encoder.call_count(), 0);
}

#[test]
fn test_adapter_failure_aborts_with_context() {
    let dir = TempDir::new().unwrap();
    let encoder = RecordingEncoder::failing_on("nested_nullable_10.parquet");
    let err = MatrixDriver::new(MatrixConfig::with_output(dir.path()), &encoder)
        .run_full_matrix()
        .unwrap_err();

    match &err {
        FixtureError::Adapter {
            case,
            profile,
            path,
            ..
        } => {
            assert_eq!(case, "nested");
            assert_eq!(profile.page_version, PageVersion::V1);
            assert_eq!(profile.layout, PageLayout::Single);
            assert!(path.ends_with("nested_nullable_10.parquet"));
        }
        other => panic!("expected adapter error, got {}", other),
    }
    assert!(err.to_string().contains("nested"));

    // basic-nullable and basic-required ran for all 12 profiles first
    assert_eq!(encoder.call_count(), 24);
}

#[test]
fn test_progress_callback_sees_every_job() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let dir = TempDir::new().unwrap();
    let mut config = MatrixConfig::with_output(dir.path());
    config.benchmarks.sizes = vec![16];

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let encoder = RecordingEncoder::new();
    MatrixDriver::new(config, &encoder)
        .with_progress(move |done, total, _job| seen_clone.borrow_mut().push((done, total)))
        .run()
        .unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 66);
    assert_eq!(seen.first(), Some(&(1, 66)));
    assert_eq!(seen.last(), Some(&(66, 66)));
}
