use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::fields::{RenderContext, SampleScan};
use super::text::text_writer;
use super::{ConversionSummary, JtlField};
use crate::codec::{SampleReader, StatusCodeLookup};
use crate::error::{ConvertError, ConvertResult};
use crate::output::{AtomicOutput, CommitError};

/// Renders a sample file as comma-separated text.
///
/// Opening scans the file once to learn which optional columns carry data;
/// each [`TextExporter::write_to`] call streams the samples a second time.
#[derive(Debug)]
pub struct TextExporter {
    source: PathBuf,
    fields: Vec<JtlField>,
    context: RenderContext,
}

impl TextExporter {
    /// # Errors
    ///
    /// Returns an error if the sample file cannot be read.
    pub fn open(source: &Path) -> ConvertResult<Self> {
        let mut reader = SampleReader::open(source)?;
        let mut scan = SampleScan::default();
        for sample in reader.by_ref() {
            scan.observe(&sample?);
        }
        let header = reader.into_header();
        let fields = JtlField::OUTPUT_ORDER
            .into_iter()
            .filter(|field| field.is_used(&header, &scan))
            .collect();
        let statuses = StatusCodeLookup::from_dictionaries(
            header.dictionaries.codes.clone(),
            header.dictionaries.messages.clone(),
        )?;
        Ok(Self {
            source: source.to_path_buf(),
            fields,
            context: RenderContext { header, statuses },
        })
    }

    #[must_use]
    pub const fn row_count(&self) -> u64 {
        self.context.header.metadata.row_count
    }

    /// Stream the header row and every sample into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample file cannot be decoded or `out` fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> ConvertResult<()> {
        let mut writer = text_writer(out);
        writer
            .write_record(self.fields.iter().map(|field| field.header_name()))
            .map_err(write_error)?;

        let mut rendered = Vec::with_capacity(self.fields.len());
        for sample in SampleReader::open(&self.source)? {
            let sample = sample?;
            rendered.clear();
            for field in &self.fields {
                rendered.push(field.render(&sample, &self.context)?);
            }
            writer
                .write_record(rendered.iter().map(|text| text.as_bytes()))
                .map_err(write_error)?;
        }
        writer.flush().map_err(|err| ConvertError::Stream {
            context: "writing text log",
            source: err,
        })
    }
}

fn write_error(err: csv::Error) -> ConvertError {
    ConvertError::Csv {
        context: "writing text log",
        source: err,
    }
}

/// Convert a sample file back into a comma-separated log.
///
/// # Errors
///
/// Returns an error if the source cannot be decoded or the destination
/// cannot be written.
pub fn binary_to_text(source: &Path, dest: &Path) -> ConvertResult<ConversionSummary> {
    let started = Instant::now();
    let exporter = TextExporter::open(source)?;
    let mut output = AtomicOutput::create(dest).map_err(|err| ConvertError::Io {
        context: "creating text log",
        path: dest.to_path_buf(),
        source: err,
    })?;
    exporter.write_to(&mut output)?;
    let sha256 = output.commit().map_err(|err| match err {
        CommitError::Flush(source) => ConvertError::Io {
            context: "flushing text log",
            path: dest.to_path_buf(),
            source,
        },
        CommitError::Persist(source) => ConvertError::Persist {
            path: dest.to_path_buf(),
            source,
        },
    })?;
    tracing::debug!(
        "Exported {} rows from {} to {} in {:?}.",
        exporter.row_count(),
        source.display(),
        dest.display(),
        started.elapsed()
    );
    let metadata = &exporter.context.header.metadata;
    Ok(ConversionSummary {
        rows: metadata.row_count,
        earliest_millis: metadata.earliest_millis,
        latest_millis: metadata.latest_millis,
        sha256,
    })
}
