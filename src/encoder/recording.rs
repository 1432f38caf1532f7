use super::{EncodeError, EncodeRequest, EncoderAdapter};
use crate::profile::{Compression, PageVersion};
use std::cell::RefCell;
use std::path::PathBuf;

/// Snapshot of one encode request
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub path: PathBuf,
    pub fields: Vec<String>,
    pub rows: usize,
    pub page_version: PageVersion,
    pub dictionary: bool,
    pub compression: Compression,
    pub data_page_size: usize,
    pub data_page_row_limit: Option<usize>,
    pub write_statistics: bool,
}

/// Encoder that remembers requests instead of writing files
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    calls: RefCell<Vec<RecordedCall>>,
    fail_on: Option<String>,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every request whose file name equals `file_name`.
    pub fn failing_on(file_name: impl Into<String>) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(file_name.into()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl EncoderAdapter for RecordingEncoder {
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), EncodeError> {
        let file_name = request
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_on.as_deref() == Some(file_name.as_str()) {
            return Err(EncodeError::Unsupported(format!(
                "recording encoder configured to reject {}",
                file_name
            )));
        }

        self.calls.borrow_mut().push(RecordedCall {
            path: request.path.to_path_buf(),
            fields: request
                .schema
                .fields
                .iter()
                .map(|f| f.name.clone())
                .collect(),
            rows: request.num_rows(),
            page_version: request.page_version,
            dictionary: request.dictionary,
            compression: request.compression,
            data_page_size: request.data_page_size,
            data_page_row_limit: request.data_page_row_limit,
            write_statistics: request.write_statistics,
        });
        Ok(())
    }

    fn writes_files(&self) -> bool {
        false
    }
}
