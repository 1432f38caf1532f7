//! Encoder adapter boundary.
//!
//! The matrix driver hands every job to an [`EncoderAdapter`] and treats it as
//! a black box: the adapter owns all binary layout decisions and writes
//! exactly one file per call.
//!
//! - [`ParquetEncoder`] writes real files through the `parquet` crate's Arrow
//!   writer.
//! - [`RecordingEncoder`] records requests without touching the filesystem,
//!   for dry runs and tests.

mod arrays;
mod recording;
mod writer;

pub use arrays::{arrow_field, arrow_schema, build_array, record_batch};
pub use recording::{RecordedCall, RecordingEncoder};
pub use writer::{writer_properties, ParquetEncoder, MAX_ROW_GROUP_SIZE};

use crate::profile::{Compression, PageVersion};
use fixture_cases::{Column, Schema};
use std::fmt;
use std::path::Path;

/// Everything the encoder needs to write one fixture file
#[derive(Debug, Clone, Copy)]
pub struct EncodeRequest<'a> {
    pub schema: &'a Schema,
    /// Columns in schema order, equal lengths
    pub columns: &'a [Column],
    pub path: &'a Path,
    pub page_version: PageVersion,
    pub dictionary: bool,
    pub compression: Compression,
    pub data_page_size: usize,
    pub data_page_row_limit: Option<usize>,
    pub write_statistics: bool,
}

impl EncodeRequest<'_> {
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }
}

/// Writes one encoded file per request
pub trait EncoderAdapter {
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), EncodeError>;

    /// Whether `encode` leaves a file at `request.path`
    fn writes_files(&self) -> bool {
        true
    }
}

impl<E: EncoderAdapter + ?Sized> EncoderAdapter for &E {
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), EncodeError> {
        (**self).encode(request)
    }

    fn writes_files(&self) -> bool {
        (**self).writes_files()
    }
}

/// Encoder failure for a single file
#[derive(Debug)]
pub enum EncodeError {
    /// Type, codec or version combination the encoder cannot write
    Unsupported(String),
    /// Value that does not fit the declared type
    ValueMismatch { column: String, message: String },
    Arrow(arrow::error::ArrowError),
    Parquet(parquet::errors::ParquetError),
    Io(std::io::Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Unsupported(msg) => write!(f, "unsupported: {}", msg),
            EncodeError::ValueMismatch { column, message } => {
                write!(f, "column '{}': {}", column, message)
            }
            EncodeError::Arrow(e) => write!(f, "arrow: {}", e),
            EncodeError::Parquet(e) => write!(f, "parquet: {}", e),
            EncodeError::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Arrow(e) => Some(e),
            EncodeError::Parquet(e) => Some(e),
            EncodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<arrow::error::ArrowError> for EncodeError {
    fn from(e: arrow::error::ArrowError) -> Self {
        EncodeError::Arrow(e)
    }
}

impl From<parquet::errors::ParquetError> for EncodeError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        EncodeError::Parquet(e)
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> Self {
        EncodeError::Io(e)
    }
}
