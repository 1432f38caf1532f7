use crate::manifest::{self, ChecksumMismatch};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// JSON output for verify
#[derive(Serialize, JsonSchema)]
pub(crate) struct VerifyJsonOutput {
    output_dir: String,
    ok: bool,
    checked: usize,
    verified: usize,
    missing: Vec<String>,
    mismatched: Vec<ChecksumMismatch>,
    stray: Vec<String>,
}

pub fn run(output: PathBuf, json: bool) -> anyhow::Result<()> {
    let report = manifest::verify(&output)?;
    let ok = report.is_clean();

    if json {
        let output_json = VerifyJsonOutput {
            output_dir: output.display().to_string(),
            ok,
            checked: report.checked,
            verified: report.verified,
            missing: report.missing,
            mismatched: report.mismatched,
            stray: report.stray,
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else {
        println!("Verifying fixtures in {}", output.display());
        println!("  Checked: {}", report.checked);
        println!("  Verified: {}", report.verified);
        for path in &report.missing {
            println!("  ✗ missing: {}", path);
        }
        for m in &report.mismatched {
            println!(
                "  ✗ checksum mismatch: {} (expected {}, found {})",
                m.path, m.expected, m.actual
            );
        }
        for path in &report.stray {
            println!("  ⚠ not in manifest: {}", path);
        }
        if ok {
            println!("\n✓ All fixtures match the manifest");
        }
    }

    if !ok {
        anyhow::bail!("fixture verification failed for {}", output.display());
    }
    Ok(())
}
