use crate::encoder::{EncoderAdapter, ParquetEncoder, RecordingEncoder};
use crate::matrix::{Job, MatrixConfig, MatrixDriver, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

pub(crate) struct GenerateOptions {
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub skip_matrix: bool,
    pub skip_bench: bool,
    pub progress: bool,
    pub verbose: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// JSON output for generate
#[derive(Serialize, JsonSchema)]
pub(crate) struct GenerateJsonOutput {
    output_dir: String,
    dry_run: bool,
    statistics: GenerateStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<String>,
    files: Vec<GeneratedFile>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct GenerateStatistics {
    jobs: usize,
    rows_written: u64,
    bytes_written: u64,
    elapsed_secs: f64,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct GeneratedFile {
    path: String,
    case: String,
    profile: String,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

pub fn run(opts: GenerateOptions) -> anyhow::Result<()> {
    let mut config = match &opts.config {
        Some(path) => MatrixConfig::from_file(path)?,
        None => MatrixConfig::default(),
    };
    if let Some(output) = opts.output.clone() {
        config.output = output;
    }
    if opts.skip_matrix {
        config.matrix = false;
    }
    if opts.skip_bench {
        config.benchmarks.enabled = false;
    }
    config.validate()?;

    if !opts.json {
        if opts.dry_run {
            eprintln!("Dry run: planning fixtures for {}", config.output.display());
        } else {
            eprintln!("Generating fixtures into {}", config.output.display());
        }
    }

    let start = Instant::now();
    if opts.dry_run {
        let driver = MatrixDriver::new(config, RecordingEncoder::new());
        let jobs = driver.plan()?;
        let outcome = execute(driver, &jobs, &opts)?;
        report(&outcome, &jobs, start, &opts)
    } else {
        let driver = MatrixDriver::new(config, ParquetEncoder::new());
        let jobs = driver.plan()?;
        let outcome = execute(driver, &jobs, &opts)?;
        report(&outcome, &jobs, start, &opts)
    }
}

fn execute<E: EncoderAdapter>(
    mut driver: MatrixDriver<E>,
    jobs: &[Job],
    opts: &GenerateOptions,
) -> anyhow::Result<(RunSummary, PathBuf)> {
    let output = driver.output().to_path_buf();

    let pb = if opts.progress && !opts.json {
        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}",
            )?
            .progress_chars("█▓▒░  ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let pb_clone = pb.clone();
    let verbose = opts.verbose && !opts.json;
    driver = driver.with_progress(move |done, total, job| {
        if let Some(ref pb) = pb_clone {
            pb.set_position(done as u64);
            pb.set_message(job.relative_path().display().to_string());
        }
        if verbose {
            let line = format!(
                "  [{}/{}] {} ({} rows, {})",
                done,
                total,
                job.relative_path().display(),
                job.rows(),
                job.profile
            );
            match pb_clone {
                Some(ref pb) => pb.println(line),
                None => eprintln!("{}", line),
            }
        }
    });

    let result = driver.run();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok((result?, output))
}

fn report(
    outcome: &(RunSummary, PathBuf),
    jobs: &[Job],
    start: Instant,
    opts: &GenerateOptions,
) -> anyhow::Result<()> {
    let (summary, output) = outcome;
    let elapsed = start.elapsed();

    if opts.json {
        let files = if opts.dry_run {
            jobs.iter()
                .map(|job| GeneratedFile {
                    path: crate::manifest::portable_path(&job.relative_path()),
                    case: job.label(),
                    profile: job.profile.to_string(),
                    rows: job.rows(),
                    bytes: None,
                    sha256: None,
                })
                .collect()
        } else {
            summary
                .artifacts
                .iter()
                .map(|a| GeneratedFile {
                    path: a.path.clone(),
                    case: a.case.clone(),
                    profile: a.profile.to_string(),
                    rows: a.rows,
                    bytes: Some(a.bytes),
                    sha256: Some(a.sha256.clone()),
                })
                .collect()
        };
        let output_json = GenerateJsonOutput {
            output_dir: output.display().to_string(),
            dry_run: opts.dry_run,
            statistics: GenerateStatistics {
                jobs: summary.jobs,
                rows_written: summary.rows,
                bytes_written: summary.bytes,
                elapsed_secs: elapsed.as_secs_f64(),
            },
            manifest: summary.manifest.as_ref().map(|p| p.display().to_string()),
            files,
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
        return Ok(());
    }

    if opts.dry_run {
        println!("\n✓ Dry run completed!");
        println!("\nWould generate:");
    } else {
        println!("\n✓ Generation completed!");
        println!("\nStatistics:");
    }
    println!("  Files: {}", summary.jobs);
    println!("  Rows: {}", summary.rows);
    if !opts.dry_run {
        println!(
            "  Bytes written: {:.2} MB",
            summary.bytes as f64 / (1024.0 * 1024.0)
        );
    }
    println!("  Elapsed time: {:.3?}", elapsed);
    if let Some(ref manifest) = summary.manifest {
        println!("  Manifest: {}", manifest.display());
    }
    Ok(())
}
