use crate::encoder::RecordingEncoder;
use crate::matrix::{MatrixConfig, MatrixDriver};
use fixture_cases::CANONICAL_CASES;
use schemars::JsonSchema;
use serde::Serialize;

/// JSON output for list
#[derive(Serialize, JsonSchema)]
pub(crate) struct ListJsonOutput {
    cases: Vec<CaseSummary>,
    matrix_jobs: usize,
    benchmark_jobs: usize,
    benchmark_sizes: Vec<usize>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct CaseSummary {
    id: String,
    file_name: String,
    rows: usize,
    fields: usize,
    nullable_fields: usize,
    leaf_columns: usize,
    description: String,
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let config = MatrixConfig::default();
    let sizes = config.benchmarks.sizes();
    let driver = MatrixDriver::new(config, RecordingEncoder::new());
    let matrix_jobs = driver.plan_full_matrix().len();
    let benchmark_jobs = driver.plan_benchmarks()?.len();

    let cases: Vec<CaseSummary> = CANONICAL_CASES
        .iter()
        .map(|d| {
            let case = d.build();
            CaseSummary {
                id: d.id.to_string(),
                file_name: d.file_name.to_string(),
                rows: case.num_rows(),
                fields: case.schema.fields.len(),
                nullable_fields: case.schema.nullable_count(),
                leaf_columns: case.schema.leaf_count(),
                description: d.description.to_string(),
            }
        })
        .collect();

    if json {
        let output = ListJsonOutput {
            cases,
            matrix_jobs,
            benchmark_jobs,
            benchmark_sizes: sizes,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Canonical cases:");
    for case in &cases {
        println!(
            "  {:<16} {:<34} {:>3} rows  {:>2} fields  {}",
            case.id, case.file_name, case.rows, case.fields, case.description
        );
    }
    println!();
    println!("Default run:");
    println!("  Full matrix: {} files", matrix_jobs);
    println!(
        "  Benchmarks: {} files ({} sizes: {})",
        benchmark_jobs,
        sizes.len(),
        sizes
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
