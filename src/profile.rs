//! Physical encoding dimensions and their on-disk addressing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Data page header format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "u8", into = "u8")]
pub enum PageVersion {
    V1,
    V2,
}

impl PageVersion {
    pub const ALL: [PageVersion; 2] = [PageVersion::V1, PageVersion::V2];

    pub fn number(&self) -> u8 {
        match self {
            PageVersion::V1 => 1,
            PageVersion::V2 => 2,
        }
    }
}

impl TryFrom<u8> for PageVersion {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(PageVersion::V1),
            2 => Ok(PageVersion::V2),
            _ => Err(format!("Unknown page version: {}. Use 1 or 2", n)),
        }
    }
}

impl From<PageVersion> for u8 {
    fn from(v: PageVersion) -> Self {
        v.number()
    }
}

impl std::str::FromStr for PageVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        let n: u8 = trimmed
            .split('.')
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| format!("Unknown page version: {}. Use 1 or 2", s))?;
        PageVersion::try_from(n)
    }
}

impl fmt::Display for PageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Whether values are spread over one data page or several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageLayout {
    #[default]
    Single,
    Multi,
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLayout::Single => write!(f, "single"),
            PageLayout::Multi => write!(f, "multi"),
        }
    }
}

/// Page compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    None,
    Snappy,
    Lz4,
    Lz4Raw,
    Zstd,
    Gzip,
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Snappy => "snappy",
            Compression::Lz4 => "lz4",
            Compression::Lz4Raw => "lz4_raw",
            Compression::Zstd => "zstd",
            Compression::Gzip => "gzip",
        }
    }

    /// Directory segment, absent for uncompressed output
    pub fn dir_name(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            other => Some(other.name()),
        }
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "uncompressed" | "" => Ok(Compression::None),
            "snappy" => Ok(Compression::Snappy),
            "lz4" => Ok(Compression::Lz4),
            "lz4_raw" | "lz4-raw" => Ok(Compression::Lz4Raw),
            "zstd" => Ok(Compression::Zstd),
            "gzip" | "gz" => Ok(Compression::Gzip),
            _ => Err(format!(
                "Unknown compression: {}. Valid options: none, snappy, lz4, lz4_raw, zstd, gzip",
                s
            )),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One combination of encoding dimensions applied to a fixture case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PhysicalProfile {
    pub page_version: PageVersion,
    pub dictionary: bool,
    pub layout: PageLayout,
    pub compression: Compression,
}

impl PhysicalProfile {
    pub fn new(
        page_version: PageVersion,
        dictionary: bool,
        layout: PageLayout,
        compression: Compression,
    ) -> Self {
        Self {
            page_version,
            dictionary,
            layout,
            compression,
        }
    }

    /// Relative directory in fixed order: version, dict, multi, codec.
    ///
    /// A missing segment means the dimension's default (plain, single page,
    /// uncompressed), so every profile maps to a distinct directory.
    pub fn relative_dir(&self) -> PathBuf {
        let mut dir = PathBuf::from(self.page_version.to_string());
        if self.dictionary {
            dir.push("dict");
        }
        if self.layout == PageLayout::Multi {
            dir.push("multi");
        }
        if let Some(codec) = self.compression.dir_name() {
            dir.push(codec);
        }
        dir
    }
}

impl Default for PhysicalProfile {
    fn default() -> Self {
        Self::new(PageVersion::V1, false, PageLayout::Single, Compression::None)
    }
}

impl fmt::Display for PhysicalProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.page_version,
            if self.dictionary { "dict" } else { "plain" },
            self.layout,
            self.compression
        )
    }
}
