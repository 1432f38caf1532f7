//! Artifact manifest and checksum verification.
//!
//! Every real run leaves `manifest.json` at the output root listing each
//! artifact with its profile, row count, size and SHA-256. The manifest holds
//! no timestamps, so regenerating into the same root yields the same bytes.

use crate::error::{FixtureError, Result};
use crate::profile::PhysicalProfile;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Manifest layout version
pub const MANIFEST_VERSION: u32 = 1;

/// One file written by the matrix driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactRecord {
    /// Path relative to the output root, `/`-separated
    pub path: String,
    pub case: String,
    pub file_name: String,
    pub profile: PhysicalProfile,
    pub rows: usize,
    pub bytes: u64,
    pub sha256: String,
}

/// Every artifact of a run, sorted by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    pub version: u32,
    pub artifacts: Vec<ArtifactRecord>,
}

impl Manifest {
    /// Records sorted by path. A later record replaces an earlier one with the
    /// same path, as the later write replaced the file.
    pub fn new(artifacts: Vec<ArtifactRecord>) -> Self {
        let by_path: BTreeMap<String, ArtifactRecord> = artifacts
            .into_iter()
            .map(|a| (a.path.clone(), a))
            .collect();
        Self {
            version: MANIFEST_VERSION,
            artifacts: by_path.into_values().collect(),
        }
    }

    pub fn find(&self, path: &str) -> Option<&ArtifactRecord> {
        self.artifacts
            .binary_search_by(|a| a.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.artifacts[i])
    }

    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }

    /// Write `manifest.json` below `root` and return its path.
    pub fn write(&self, root: &Path) -> Result<std::path::PathBuf> {
        let path = root.join(MANIFEST_FILE);
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| FixtureError::config(MANIFEST_FILE, e))?;
        json.push('\n');
        fs::write(&path, json).map_err(|e| FixtureError::io(&path, e))?;
        Ok(path)
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|e| FixtureError::io(&path, e))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .map_err(|e| FixtureError::config(path.display().to_string(), e))?;
        // Older or hand-edited manifests may not be sorted
        Ok(Manifest::new(manifest.artifacts))
    }
}

/// SHA-256 hex digest and byte length of a file.
pub fn sha256_file(path: &Path) -> io::Result<(String, u64)> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let bytes = io::copy(&mut file, &mut hasher)?;
    Ok((hex::encode(hasher.finalize()), bytes))
}

/// `/`-separated form of a relative path, independent of the host separator.
pub fn portable_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Artifact whose bytes no longer match the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ChecksumMismatch {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

/// Outcome of re-hashing an output root against its manifest
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct VerifyReport {
    pub checked: usize,
    pub verified: usize,
    pub missing: Vec<String>,
    pub mismatched: Vec<ChecksumMismatch>,
    /// Parquet files on disk the manifest does not list
    pub stray: Vec<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty() && self.stray.is_empty()
    }
}

/// Re-hash every artifact listed in `root/manifest.json`.
pub fn verify(root: &Path) -> Result<VerifyReport> {
    let manifest = Manifest::load(root)?;
    let mut report = VerifyReport::default();

    for artifact in &manifest.artifacts {
        report.checked += 1;
        let path = root.join(&artifact.path);
        if !path.is_file() {
            report.missing.push(artifact.path.clone());
            continue;
        }
        let (actual, _) = sha256_file(&path).map_err(|e| FixtureError::io(&path, e))?;
        if actual == artifact.sha256 {
            report.verified += 1;
        } else {
            report.mismatched.push(ChecksumMismatch {
                path: artifact.path.clone(),
                expected: artifact.sha256.clone(),
                actual,
            });
        }
    }

    let listed: HashSet<&str> = manifest.artifacts.iter().map(|a| a.path.as_str()).collect();
    for path in parquet_files(root)? {
        let relative = portable_path(path.strip_prefix(root).unwrap_or(&path));
        if !listed.contains(relative.as_str()) {
            report.stray.push(relative);
        }
    }
    report.stray.sort();

    Ok(report)
}

/// All `*.parquet` files below `root`, sorted.
pub fn parquet_files(root: &Path) -> Result<Vec<std::path::PathBuf>> {
    let pattern = format!(
        "{}/**/*.parquet",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let entries =
        glob::glob(&pattern).map_err(|e| FixtureError::config(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(FixtureError::io(path, e.into()));
            }
        }
    }
    files.sort();
    Ok(files)
}
