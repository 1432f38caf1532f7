//! Errors raised while generating the fixture matrix.

use crate::encoder::EncodeError;
use crate::profile::PhysicalProfile;
use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FixtureError>;

/// Generation failure with the case and profile it happened on
#[derive(Debug)]
pub enum FixtureError {
    /// The matrix definition itself is wrong (bad tile size, invalid case,
    /// unsupported decimal width, bad config value). Raised before the
    /// encoder is called for the offending job.
    Config {
        case: String,
        profile: Option<PhysicalProfile>,
        message: String,
    },
    /// The encoder rejected or failed on one job
    Adapter {
        case: String,
        profile: PhysicalProfile,
        path: PathBuf,
        source: EncodeError,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FixtureError {
    pub fn config(case: impl Into<String>, message: impl fmt::Display) -> Self {
        FixtureError::Config {
            case: case.into(),
            profile: None,
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixtureError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn with_profile(self, profile: PhysicalProfile) -> Self {
        match self {
            FixtureError::Config { case, message, .. } => FixtureError::Config {
                case,
                profile: Some(profile),
                message,
            },
            other => other,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, FixtureError::Config { .. })
    }

    pub fn is_adapter(&self) -> bool {
        matches!(self, FixtureError::Adapter { .. })
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Config {
                case,
                profile: Some(profile),
                message,
            } => write!(f, "configuration error in {} [{}]: {}", case, profile, message),
            FixtureError::Config {
                case,
                profile: None,
                message,
            } => write!(f, "configuration error in {}: {}", case, message),
            FixtureError::Adapter {
                case,
                profile,
                path,
                source,
            } => write!(
                f,
                "failed to encode {} [{}] to {}: {}",
                case,
                profile,
                path.display(),
                source
            ),
            FixtureError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Config { .. } => None,
            FixtureError::Adapter { source, .. } => Some(source),
            FixtureError::Io { source, .. } => Some(source),
        }
    }
}
