mod generate;
mod list;
mod show;
mod verify;

pub(crate) use generate::GenerateJsonOutput;
pub(crate) use list::ListJsonOutput;
pub(crate) use show::ShowJsonOutput;
pub(crate) use verify::VerifyJsonOutput;

use crate::matrix::DEFAULT_OUTPUT;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parquet-fixtures")]
#[command(version)]
#[command(about = "Generate a deterministic matrix of Parquet conformance fixtures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the full fixture matrix and the benchmark files
    Generate {
        /// Output root (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML config file selecting page versions, codecs and benchmark sizes
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the canonical case × profile pass
        #[arg(long)]
        skip_matrix: bool,

        /// Skip the benchmark pass
        #[arg(long)]
        skip_bench: bool,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Print every artifact as it is written
        #[arg(short, long)]
        verbose: bool,

        /// Plan and validate every job without writing files
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// List the canonical cases and the jobs a default run plans
    List {
        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Print the schema and rows of one canonical case
    Show {
        /// Case id, e.g. basic-nullable or nested-edge
        case: String,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Re-hash generated fixtures against manifest.json
    Verify {
        /// Output root containing manifest.json
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for manifest.json and the --json outputs
    Schema {
        /// Only print the schema with this name (e.g. manifest, generate)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            output,
            config,
            skip_matrix,
            skip_bench,
            progress,
            verbose,
            dry_run,
            json,
        } => generate::run(generate::GenerateOptions {
            output,
            config,
            skip_matrix,
            skip_bench,
            progress,
            verbose,
            dry_run,
            json,
        }),
        Commands::List { json } => list::run(json),
        Commands::Show { case, json } => show::run(&case, json),
        Commands::Verify { output, json } => verify::run(output, json),
        Commands::Schema { name } => {
            let json = match name {
                Some(name) => {
                    let schema = crate::json_schema::get_schema(&name).ok_or_else(|| {
                        anyhow::anyhow!(
                            "Unknown schema: {}. Valid options: {}",
                            name,
                            crate::json_schema::schema_names().join(", ")
                        )
                    })?;
                    serde_json::to_string_pretty(&schema)?
                }
                None => serde_json::to_string_pretty(&crate::json_schema::all_schemas())?,
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "parquet-fixtures",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
