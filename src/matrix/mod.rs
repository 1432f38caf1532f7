//! Matrix driver.
//!
//! Enumerates (case, profile) jobs, expands each case for its profile, hands
//! it to the injected [`EncoderAdapter`] and records what was written. Two
//! passes exist:
//!
//! - the full matrix: every canonical case × page version × dictionary ×
//!   codec, single page;
//! - benchmarks: the nullable and required basic cases tiled to each
//!   configured size under six fixed profiles.
//!
//! The first failing job aborts the run. Files written before it stay on
//! disk.

mod config;

pub use config::{BenchConfig, MatrixConfig, DEFAULT_OUTPUT, MAX_BENCH_EXPONENT};

use crate::encoder::{EncodeRequest, EncoderAdapter};
use crate::error::{FixtureError, Result};
use crate::expand::{page_sizing, tile_prefix, BENCH_TILE_ROWS};
use crate::manifest::{portable_path, sha256_file, ArtifactRecord, Manifest};
use crate::profile::{Compression, PageLayout, PageVersion, PhysicalProfile};
use fixture_cases::cases::{BASIC_NULLABLE, BASIC_REQUIRED};
use fixture_cases::{CaseDescriptor, FixtureCase, CANONICAL_CASES};
use std::fs;
use std::path::{Path, PathBuf};

/// Source data of a benchmark file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchVariant {
    Nullable,
    Required,
}

impl BenchVariant {
    pub fn descriptor(&self) -> &'static CaseDescriptor {
        match self {
            BenchVariant::Nullable => &BASIC_NULLABLE,
            BenchVariant::Required => &BASIC_REQUIRED,
        }
    }

    pub fn stem(&self, rows: usize) -> String {
        match self {
            BenchVariant::Nullable => format!("benches_{}", rows),
            BenchVariant::Required => format!("benches_required_{}", rows),
        }
    }
}

/// Where a job's rows come from
#[derive(Debug, Clone, Copy)]
pub enum JobSource {
    Canonical(&'static CaseDescriptor),
    Bench { variant: BenchVariant, rows: usize },
}

/// One file to generate
#[derive(Debug, Clone)]
pub struct Job {
    pub source: JobSource,
    pub profile: PhysicalProfile,
    pub file_name: String,
}

impl Job {
    fn canonical(descriptor: &'static CaseDescriptor, profile: PhysicalProfile) -> Self {
        Self {
            source: JobSource::Canonical(descriptor),
            profile,
            file_name: descriptor.file_name.to_string(),
        }
    }

    fn bench(variant: BenchVariant, rows: usize, profile: PhysicalProfile) -> Self {
        Self {
            source: JobSource::Bench { variant, rows },
            profile,
            file_name: format!("{}.parquet", variant.stem(rows)),
        }
    }

    /// Case id for canonical jobs, file stem for benchmark jobs
    pub fn label(&self) -> String {
        match self.source {
            JobSource::Canonical(descriptor) => descriptor.id.to_string(),
            JobSource::Bench { variant, rows } => variant.stem(rows),
        }
    }

    pub fn rows(&self) -> usize {
        match self.source {
            JobSource::Canonical(descriptor) => descriptor.rows,
            JobSource::Bench { rows, .. } => rows,
        }
    }

    /// Path below the output root: `v{n}[/dict][/multi][/{codec}]/{file}`
    pub fn relative_path(&self) -> PathBuf {
        self.profile.relative_dir().join(&self.file_name)
    }

    /// Build the case data this job encodes.
    pub fn build_case(&self) -> Result<FixtureCase> {
        let case = match self.source {
            JobSource::Canonical(descriptor) => descriptor.build(),
            JobSource::Bench { variant, rows } => {
                let base = variant.descriptor().build();
                tile_prefix(&base, BENCH_TILE_ROWS, rows).map_err(|e| {
                    FixtureError::config(self.label(), e).with_profile(self.profile)
                })?
            }
        };
        case.validate()
            .map_err(|e| FixtureError::config(self.label(), e).with_profile(self.profile))?;
        Ok(case)
    }
}

/// Profiles of the benchmark pass, in generation order
pub fn bench_profiles() -> [(BenchVariant, PhysicalProfile); 6] {
    use BenchVariant::{Nullable, Required};
    use Compression::{None as Plain, Snappy};
    use PageLayout::{Multi, Single};
    let v1 = PageVersion::V1;
    [
        (Nullable, PhysicalProfile::new(v1, true, Single, Plain)),
        (Nullable, PhysicalProfile::new(v1, false, Single, Plain)),
        (Required, PhysicalProfile::new(v1, false, Single, Plain)),
        (Nullable, PhysicalProfile::new(v1, false, Multi, Plain)),
        (Nullable, PhysicalProfile::new(v1, false, Multi, Snappy)),
        (Nullable, PhysicalProfile::new(v1, false, Single, Snappy)),
    ]
}

/// Totals of one driver run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub jobs: usize,
    pub rows: u64,
    pub bytes: u64,
    /// Written artifacts; empty when the encoder does not write files
    pub artifacts: Vec<ArtifactRecord>,
    pub manifest: Option<PathBuf>,
}

/// Generates fixtures for a [`MatrixConfig`] through an injected encoder
pub struct MatrixDriver<E: EncoderAdapter> {
    config: MatrixConfig,
    encoder: E,
    progress_fn: Option<Box<dyn Fn(usize, usize, &Job)>>,
}

impl<E: EncoderAdapter> MatrixDriver<E> {
    pub fn new(config: MatrixConfig, encoder: E) -> Self {
        Self {
            config,
            encoder,
            progress_fn: None,
        }
    }

    /// Called after each job with (completed, total, job).
    pub fn with_progress<F: Fn(usize, usize, &Job) + 'static>(mut self, f: F) -> Self {
        self.progress_fn = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn output(&self) -> &Path {
        &self.config.output
    }

    /// Every canonical case under every configured single-page profile.
    pub fn plan_full_matrix(&self) -> Vec<Job> {
        let mut jobs = Vec::new();
        for descriptor in CANONICAL_CASES {
            for &version in &self.config.page_versions {
                for &dictionary in &self.config.dictionary {
                    for &codec in &self.config.codecs {
                        let profile =
                            PhysicalProfile::new(version, dictionary, PageLayout::Single, codec);
                        jobs.push(Job::canonical(descriptor, profile));
                    }
                }
            }
        }
        jobs
    }

    /// Six jobs per configured size. Fails if any size is not a whole
    /// number of replication units, before anything is encoded.
    pub fn plan_benchmarks(&self) -> Result<Vec<Job>> {
        let sizes = self.config.benchmarks.sizes();
        let [(first_variant, first_profile), ..] = bench_profiles();
        for &rows in &sizes {
            if rows == 0 || rows % BENCH_TILE_ROWS != 0 {
                return Err(FixtureError::config(
                    first_variant.stem(rows),
                    format!(
                        "benchmark size {} is not a positive multiple of {} rows",
                        rows, BENCH_TILE_ROWS
                    ),
                )
                .with_profile(first_profile));
            }
        }

        let mut jobs = Vec::with_capacity(sizes.len() * 6);
        for rows in sizes {
            for (variant, profile) in bench_profiles() {
                jobs.push(Job::bench(variant, rows, profile));
            }
        }
        Ok(jobs)
    }

    /// Jobs of every enabled pass.
    pub fn plan(&self) -> Result<Vec<Job>> {
        let mut jobs = Vec::new();
        if self.config.matrix {
            jobs.extend(self.plan_full_matrix());
        }
        if self.config.benchmarks.enabled {
            jobs.extend(self.plan_benchmarks()?);
        }
        Ok(jobs)
    }

    /// Run the full matrix pass only. No manifest is written.
    pub fn run_full_matrix(&self) -> Result<RunSummary> {
        self.config.validate()?;
        let jobs = self.plan_full_matrix();
        self.execute(&jobs)
    }

    /// Run the benchmark pass only. No manifest is written.
    pub fn run_benchmarks(&self) -> Result<RunSummary> {
        self.config.validate()?;
        let jobs = self.plan_benchmarks()?;
        self.execute(&jobs)
    }

    /// Run every enabled pass, then write the manifest.
    ///
    /// Both passes are planned before the first job runs, so a bad benchmark
    /// size fails before anything is written.
    pub fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;
        let jobs = self.plan()?;
        let mut summary = self.execute(&jobs)?;

        if self.encoder.writes_files() {
            fs::create_dir_all(&self.config.output)
                .map_err(|e| FixtureError::io(&self.config.output, e))?;
            let manifest = Manifest::new(summary.artifacts.clone());
            summary.manifest = Some(manifest.write(&self.config.output)?);
        }
        Ok(summary)
    }

    fn execute(&self, jobs: &[Job]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (i, job) in jobs.iter().enumerate() {
            let rows = self.generate(job, &mut summary)?;
            summary.jobs += 1;
            summary.rows += rows as u64;
            if let Some(ref cb) = self.progress_fn {
                cb(i + 1, jobs.len(), job);
            }
        }
        Ok(summary)
    }

    /// Build, expand and encode one job. Returns the number of rows encoded.
    fn generate(&self, job: &Job, summary: &mut RunSummary) -> Result<usize> {
        let case = job.build_case()?;
        let rows = case.num_rows();
        let sizing = page_sizing(job.profile.layout, rows)
            .map_err(|e| FixtureError::config(job.label(), e).with_profile(job.profile))?;

        let relative = job.relative_path();
        let path = self.config.output.join(&relative);
        let writes_files = self.encoder.writes_files();
        if writes_files {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| FixtureError::io(parent, e))?;
            }
        }

        let request = EncodeRequest {
            schema: &case.schema,
            columns: &case.columns,
            path: &path,
            page_version: job.profile.page_version,
            dictionary: job.profile.dictionary,
            compression: job.profile.compression,
            data_page_size: sizing.data_page_size,
            data_page_row_limit: sizing.data_page_row_limit,
            write_statistics: true,
        };
        self.encoder
            .encode(&request)
            .map_err(|source| FixtureError::Adapter {
                case: job.label(),
                profile: job.profile,
                path: path.clone(),
                source,
            })?;

        if writes_files {
            let (sha256, bytes) = sha256_file(&path).map_err(|e| FixtureError::io(&path, e))?;
            summary.bytes += bytes;
            summary.artifacts.push(ArtifactRecord {
                path: portable_path(&relative),
                case: job.label(),
                file_name: job.file_name.clone(),
                profile: job.profile,
                rows,
                bytes,
                sha256,
            });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::RecordingEncoder;

    fn driver(config: MatrixConfig) -> MatrixDriver<RecordingEncoder> {
        MatrixDriver::new(config, RecordingEncoder::new())
    }

    #[test]
    fn test_full_matrix_has_sixty_jobs() {
        let jobs = driver(MatrixConfig::default()).plan_full_matrix();
        assert_eq!(jobs.len(), 60);
        assert!(jobs.iter().all(|j| j.profile.layout == PageLayout::Single));
    }

    #[test]
    fn test_full_matrix_paths_are_unique() {
        let jobs = driver(MatrixConfig::default()).plan_full_matrix();
        let mut paths: Vec<_> = jobs.iter().map(|j| j.relative_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 60);
        assert!(paths.contains(&PathBuf::from("v2/dict/lz4/nested_nullable_10.parquet")));
        assert!(paths.contains(&PathBuf::from("v1/basic_required_10.parquet")));
    }

    #[test]
    fn test_bench_plan_order_and_names() {
        let mut config = MatrixConfig::default();
        config.benchmarks.sizes = vec![1024];
        let jobs = driver(config).plan_benchmarks().unwrap();
        let paths: Vec<_> = jobs.iter().map(|j| portable_path(&j.relative_path())).collect();
        assert_eq!(
            paths,
            vec![
                "v1/dict/benches_1024.parquet",
                "v1/benches_1024.parquet",
                "v1/benches_required_1024.parquet",
                "v1/multi/benches_1024.parquet",
                "v1/multi/snappy/benches_1024.parquet",
                "v1/snappy/benches_1024.parquet",
            ]
        );
        assert!(jobs.iter().all(|j| j.rows() == 1024));
    }

    #[test]
    fn test_bench_plan_rejects_indivisible_size() {
        let mut config = MatrixConfig::default();
        config.benchmarks.sizes = vec![1024, 1020];
        let err = driver(config).plan_benchmarks().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("1020"));
        match err {
            FixtureError::Config { case, profile, .. } => {
                assert_eq!(case, "benches_1020");
                assert_eq!(profile, Some(bench_profiles()[0].1));
            }
            other => panic!("expected config error, got {}", other),
        }
    }

    #[test]
    fn test_every_entry_point_validates_config() {
        let mut config = MatrixConfig::default();
        config.codecs.clear();
        config.benchmarks.sizes = vec![16];
        let matrix = driver(config);
        assert!(matrix.run_full_matrix().unwrap_err().is_config());
        assert!(matrix.run().unwrap_err().is_config());
        assert_eq!(matrix.encoder().call_count(), 0);

        let mut config = MatrixConfig::default();
        config.benchmarks.sizes = vec![16, 16];
        let bench = driver(config);
        assert!(bench.run_benchmarks().unwrap_err().is_config());
        assert_eq!(bench.encoder().call_count(), 0);
    }

    #[test]
    fn test_run_with_duplicate_codecs_encodes_nothing() {
        let mut config = MatrixConfig::default();
        config.codecs = vec![Compression::Lz4, Compression::Lz4];
        config.page_versions = vec![PageVersion::V1, PageVersion::V1];
        let matrix = driver(config);
        assert!(matrix.run().unwrap_err().is_config());
        assert_eq!(matrix.encoder().call_count(), 0);
    }

    #[test]
    fn test_build_case_tiles_bench_rows() {
        let job = Job::bench(BenchVariant::Required, 64, PhysicalProfile::default());
        let case = job.build_case().unwrap();
        assert_eq!(case.num_rows(), 64);
        assert_eq!(case.schema.nullable_count(), 0);
    }

    #[test]
    fn test_plan_respects_pass_flags() {
        let mut config = MatrixConfig::default();
        config.matrix = false;
        config.benchmarks.sizes = vec![16];
        assert_eq!(driver(config.clone()).plan().unwrap().len(), 6);

        config.benchmarks.enabled = false;
        assert!(driver(config).plan().unwrap().is_empty());
    }
}
