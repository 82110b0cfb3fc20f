use std::io::Read;
use std::path::Path;

use super::dictionary::resolve;
use super::format::{FileMetadata, SampleFileHeader, SideDictionaries};
use super::{Sample, SampleReader, StatusCodeLookup, StatusRef};
use crate::error::CodecResult;

const MAX_PREALLOCATED_SAMPLES: usize = 1_048_576;

/// A sample file decoded into memory, with reference resolution.
#[derive(Debug, Clone)]
pub struct SampleLog {
    header: SampleFileHeader,
    samples: Vec<Sample>,
    statuses: StatusCodeLookup,
}

impl SampleLog {
    /// # Errors
    ///
    /// Returns an error when the status dictionaries are inconsistent.
    pub fn new(header: SampleFileHeader, samples: Vec<Sample>) -> CodecResult<Self> {
        let statuses = StatusCodeLookup::from_dictionaries(
            header.dictionaries.codes.clone(),
            header.dictionaries.messages.clone(),
        )?;
        Ok(Self {
            header,
            samples,
            statuses,
        })
    }

    /// Decode the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded.
    pub fn read(path: &Path) -> CodecResult<Self> {
        Self::from_reader(SampleReader::open(path)?)
    }

    /// Drain a reader into memory.
    ///
    /// # Errors
    ///
    /// Returns the first decode error of the stream.
    pub fn from_reader<R: Read>(mut reader: SampleReader<R>) -> CodecResult<Self> {
        let capacity = usize::try_from(reader.metadata().row_count)
            .unwrap_or(0)
            .min(MAX_PREALLOCATED_SAMPLES);
        let mut samples = Vec::with_capacity(capacity);
        for sample in reader.by_ref() {
            samples.push(sample?);
        }
        Self::new(reader.into_header(), samples)
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub const fn header(&self) -> &SampleFileHeader {
        &self.header
    }

    #[must_use]
    pub const fn metadata(&self) -> &FileMetadata {
        &self.header.metadata
    }

    #[must_use]
    pub const fn dictionaries(&self) -> &SideDictionaries {
        &self.header.dictionaries
    }

    #[must_use]
    pub const fn statuses(&self) -> &StatusCodeLookup {
        &self.statuses
    }

    /// Label dictionary in reference order; empty when none was recorded.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        self.header.dictionaries.labels.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn label(&self, reference: u32) -> Option<&str> {
        resolve(self.header.dictionaries.labels.as_deref(), reference)
    }

    /// # Errors
    ///
    /// Returns an error when the reference has no entry.
    pub fn status_code(&self, status: StatusRef) -> CodecResult<&str> {
        self.statuses.code(status)
    }

    /// # Errors
    ///
    /// Returns an error when the reference has no entry.
    pub fn status_message(&self, status: StatusRef) -> CodecResult<&str> {
        self.statuses.message(status)
    }
}
