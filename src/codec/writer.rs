use std::io::Write;
use std::path::Path;

use super::format::{
    DictionaryKind, FLAG_SUCCESS, MAGIC, SampleFileHeader, TAG_DICTIONARY, TAG_METADATA,
    TAG_SAMPLES, VERSION,
};
use super::varint::{put_i32, put_i64, put_str, put_u32, put_u64};
use super::Sample;
use crate::error::{CodecError, CodecResult};
use crate::output::{AtomicOutput, CommitError};

const WRITE_CONTEXT: &str = "writing samples";

/// Streaming writer for the `.lls` container.
///
/// The header goes out on construction; exactly `metadata.row_count`
/// samples must follow before [`SampleWriter::finish`].
#[derive(Debug)]
pub struct SampleWriter<W: Write> {
    inner: W,
    expected: u64,
    written: u64,
    buf: Vec<u8>,
}

impl<W: Write> SampleWriter<W> {
    /// Write the magic, metadata and dictionaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn new(mut inner: W, header: &SampleFileHeader) -> CodecResult<Self> {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(&MAGIC);
        buf.push(VERSION);

        buf.push(TAG_METADATA);
        put_i64(&mut buf, header.metadata.earliest_millis);
        put_i64(&mut buf, header.metadata.latest_millis);
        put_u64(&mut buf, header.metadata.row_count);

        for kind in DictionaryKind::ALL {
            let Some(entries) = header.dictionaries.get(kind) else {
                continue;
            };
            buf.push(TAG_DICTIONARY);
            put_str(&mut buf, kind.name());
            put_u64(&mut buf, u64::try_from(entries.len()).unwrap_or(u64::MAX));
            for entry in entries {
                put_str(&mut buf, entry);
            }
        }
        buf.push(TAG_SAMPLES);

        inner
            .write_all(&buf)
            .map_err(|err| CodecError::Stream {
                context: "writing sample file header",
                source: err,
            })?;
        buf.clear();

        Ok(Self {
            inner,
            expected: header.metadata.row_count,
            written: 0,
            buf,
        })
    }

    /// Append one sample.
    ///
    /// # Errors
    ///
    /// Returns an error if more samples are written than the header declared
    /// or the underlying writer fails.
    pub fn write(&mut self, sample: &Sample) -> CodecResult<()> {
        if self.written >= self.expected {
            return Err(CodecError::RowCountMismatch {
                expected: self.expected,
                actual: self.written.saturating_add(1),
            });
        }
        self.buf.clear();
        put_i64(&mut self.buf, sample.offset_millis);
        put_i64(&mut self.buf, sample.duration_millis);
        put_u32(&mut self.buf, sample.label_ref);
        put_u32(&mut self.buf, sample.thread_name_ref);
        put_u32(&mut self.buf, sample.url_ref);
        put_i32(&mut self.buf, sample.status_ref.raw());
        self.buf.push(if sample.success { FLAG_SUCCESS } else { 0 });
        put_i64(&mut self.buf, sample.response_bytes);
        put_i32(&mut self.buf, sample.total_threads);
        self.inner
            .write_all(&self.buf)
            .map_err(|err| CodecError::Stream {
                context: WRITE_CONTEXT,
                source: err,
            })?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }

    /// Check the row count, flush and hand back the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer samples were written than declared or the
    /// flush fails.
    pub fn finish(mut self) -> CodecResult<W> {
        if self.written != self.expected {
            return Err(CodecError::RowCountMismatch {
                expected: self.expected,
                actual: self.written,
            });
        }
        self.inner.flush().map_err(|err| CodecError::Stream {
            context: WRITE_CONTEXT,
            source: err,
        })?;
        Ok(self.inner)
    }
}

/// Write a whole sample file atomically and return its SHA-256.
///
/// # Errors
///
/// Returns an error if the destination cannot be written or the sample count
/// disagrees with the header.
pub fn write_sample_file<'samples, I>(
    path: &Path,
    header: &SampleFileHeader,
    samples: I,
) -> CodecResult<String>
where
    I: IntoIterator<Item = &'samples Sample>,
{
    let output = AtomicOutput::create(path).map_err(|err| CodecError::Io {
        context: "creating sample file",
        path: path.to_path_buf(),
        source: err,
    })?;
    let mut writer = SampleWriter::new(output, header)?;
    for sample in samples {
        writer.write(sample)?;
    }
    let output = writer.finish()?;
    output.commit().map_err(|err| match err {
        CommitError::Flush(source) => CodecError::Io {
            context: "flushing sample file",
            path: path.to_path_buf(),
            source,
        },
        CommitError::Persist(source) => CodecError::Persist {
            path: path.to_path_buf(),
            source,
        },
    })
}
