use super::{arrays, EncodeError, EncodeRequest, EncoderAdapter};
use crate::profile::{Compression, PageVersion};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression as ParquetCompression, GzipLevel, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties, WriterVersion};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Row group cap large enough that every fixture is a single row group
pub const MAX_ROW_GROUP_SIZE: usize = 1 << 40;

/// Rows handed to the column writers per mini-batch. Page limits are only
/// checked between mini-batches, so small page hints need small batches.
const DEFAULT_WRITE_BATCH_SIZE: usize = 1024;

/// Reference encoder backed by the `parquet` crate's Arrow writer
#[derive(Debug, Clone)]
pub struct ParquetEncoder {
    max_row_group_size: usize,
}

impl ParquetEncoder {
    pub fn new() -> Self {
        Self {
            max_row_group_size: MAX_ROW_GROUP_SIZE,
        }
    }

    pub fn with_max_row_group_size(mut self, rows: usize) -> Self {
        self.max_row_group_size = rows.max(1);
        self
    }
}

impl Default for ParquetEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderAdapter for ParquetEncoder {
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<(), EncodeError> {
        let batch = arrays::record_batch(request.schema, request.columns)?;
        let props = writer_properties(request, self.max_row_group_size);

        let file = File::create(request.path)?;
        let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))?;
        writer.write(&batch)?;
        let mut out = writer.into_inner()?;
        out.flush()?;
        Ok(())
    }
}

/// Writer properties realising the request's physical profile.
pub fn writer_properties(request: &EncodeRequest<'_>, max_row_group_size: usize) -> WriterProperties {
    let statistics = if request.write_statistics {
        EnabledStatistics::Page
    } else {
        EnabledStatistics::None
    };

    let mut builder = WriterProperties::builder()
        .set_writer_version(writer_version(request.page_version))
        .set_dictionary_enabled(request.dictionary)
        .set_compression(codec(request.compression))
        .set_data_page_size_limit(request.data_page_size)
        .set_max_row_group_size(max_row_group_size)
        .set_statistics_enabled(statistics);

    match request.data_page_row_limit {
        Some(limit) => {
            let limit = limit.max(1);
            builder = builder
                .set_data_page_row_count_limit(limit)
                .set_write_batch_size(limit.min(DEFAULT_WRITE_BATCH_SIZE));
        }
        None => {
            builder = builder
                .set_data_page_row_count_limit(usize::MAX)
                .set_write_batch_size(DEFAULT_WRITE_BATCH_SIZE);
        }
    }

    builder.build()
}

fn writer_version(version: PageVersion) -> WriterVersion {
    match version {
        PageVersion::V1 => WriterVersion::PARQUET_1_0,
        PageVersion::V2 => WriterVersion::PARQUET_2_0,
    }
}

fn codec(compression: Compression) -> ParquetCompression {
    match compression {
        Compression::None => ParquetCompression::UNCOMPRESSED,
        Compression::Snappy => ParquetCompression::SNAPPY,
        Compression::Lz4 => ParquetCompression::LZ4,
        Compression::Lz4Raw => ParquetCompression::LZ4_RAW,
        Compression::Zstd => ParquetCompression::ZSTD(ZstdLevel::default()),
        Compression::Gzip => ParquetCompression::GZIP(GzipLevel::default()),
    }
}
