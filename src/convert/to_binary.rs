use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use csv::StringRecord;

use super::header::HeaderLayout;
use super::text::text_reader;
use super::{ConversionSummary, JtlField};
use crate::codec::{
    Dictionary, FileMetadata, Sample, SampleFileHeader, SideDictionaries, StatusCodeLookup,
    UNKNOWN_BYTES, write_sample_file,
};
use crate::error::{ConvertError, ConvertResult};

/// One parsed text row, before dictionary encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextRow {
    pub timestamp: i64,
    pub elapsed: i64,
    pub label: Option<String>,
    pub thread_name: Option<String>,
    pub response_bytes: i64,
    pub code: Option<String>,
    pub message: Option<String>,
    pub success: bool,
    pub all_threads: i32,
    pub url: Option<String>,
}

impl TextRow {
    fn chronological(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.elapsed.cmp(&other.elapsed))
            .then_with(|| self.label.cmp(&other.label))
            .then_with(|| self.thread_name.cmp(&other.thread_name))
            .then_with(|| self.response_bytes.cmp(&other.response_bytes))
            .then_with(|| self.code.cmp(&other.code))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| other.success.cmp(&self.success))
            .then_with(|| self.all_threads.cmp(&other.all_threads))
            .then_with(|| self.url.cmp(&other.url))
    }
}

/// Column positions of the fields the binary format keeps.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    width: usize,
    timestamp: usize,
    elapsed: usize,
    label: Option<usize>,
    thread_name: Option<usize>,
    bytes: Option<usize>,
    code: Option<usize>,
    message: Option<usize>,
    success: Option<usize>,
    all_threads: Option<usize>,
    url: Option<usize>,
}

impl ColumnMap {
    fn new(columns: &[Option<JtlField>]) -> ConvertResult<Self> {
        let position = |wanted: JtlField| columns.iter().position(|column| *column == Some(wanted));
        let required = |wanted: JtlField| {
            position(wanted).ok_or(ConvertError::MissingColumn {
                column: wanted.header_name(),
            })
        };
        Ok(Self {
            width: columns.len(),
            timestamp: required(JtlField::TimeStamp)?,
            elapsed: required(JtlField::Elapsed)?,
            label: position(JtlField::Label),
            thread_name: position(JtlField::ThreadName),
            bytes: position(JtlField::Bytes),
            code: position(JtlField::ResponseCode),
            message: position(JtlField::ResponseMessage),
            success: position(JtlField::Success),
            all_threads: position(JtlField::AllThreads),
            url: position(JtlField::Url),
        })
    }

    fn parse(&self, row: u64, record: &StringRecord) -> ConvertResult<TextRow> {
        if record.len() != self.width {
            return Err(ConvertError::ColumnCount {
                row,
                expected: self.width,
                found: record.len(),
            });
        }
        let text = |idx: Option<usize>| {
            idx.and_then(|pos| record.get(pos))
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let required_number = |idx: usize, field: JtlField| -> ConvertResult<i64> {
            let value = record
                .get(idx)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or(ConvertError::EmptyValue {
                    row,
                    column: field.header_name(),
                })?;
            parse_number(row, field, value)
        };

        let response_bytes: i64 = match text(self.bytes) {
            Some(value) => parse_number(row, JtlField::Bytes, value.trim())?,
            None => UNKNOWN_BYTES,
        };
        let all_threads: i32 = match text(self.all_threads) {
            Some(value) => parse_number(row, JtlField::AllThreads, value.trim())?,
            None => 0,
        };
        let success = text(self.success)
            .is_none_or(|value| value.trim().eq_ignore_ascii_case("true"));

        Ok(TextRow {
            timestamp: required_number(self.timestamp, JtlField::TimeStamp)?,
            elapsed: required_number(self.elapsed, JtlField::Elapsed)?,
            label: text(self.label),
            thread_name: text(self.thread_name),
            response_bytes,
            code: text(self.code),
            message: text(self.message),
            success,
            all_threads,
            url: text(self.url),
        })
    }
}

fn parse_number<T>(row: u64, field: JtlField, value: &str) -> ConvertResult<T>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    value
        .parse::<T>()
        .map_err(|err| ConvertError::InvalidNumber {
            row,
            column: field.header_name(),
            value: value.to_owned(),
            source: err,
        })
}

fn csv_error(err: csv::Error) -> ConvertError {
    ConvertError::Csv {
        context: "reading text log",
        source: err,
    }
}

/// Parse every row of a text log, sorted chronologically.
pub(crate) fn read_rows<R: Read>(input: R, path: &Path) -> ConvertResult<Vec<TextRow>> {
    let mut reader = text_reader(input);
    let mut records = (1u64..).zip(reader.records());
    let Some((first_row, first)) = records.next() else {
        return Err(ConvertError::EmptySource {
            path: path.to_path_buf(),
        });
    };
    let first = first.map_err(csv_error)?;
    let names: Vec<String> = first.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    let columns = match HeaderLayout::detect(&names) {
        HeaderLayout::Named(columns) => {
            for (name, column) in names.iter().zip(&columns) {
                if column.is_none() {
                    tracing::warn!("Ignoring unknown column '{}' in {}.", name, path.display());
                }
            }
            ColumnMap::new(&columns)?
        }
        HeaderLayout::Headerless(columns) => {
            tracing::warn!(
                "{} has no header row; assuming the default JMeter layout.",
                path.display()
            );
            let map = ColumnMap::new(&columns)?;
            rows.push(map.parse(first_row, &first)?);
            map
        }
        HeaderLayout::Unrecognized => {
            tracing::error!("Rejecting {}: unrecognised header row.", path.display());
            return Err(ConvertError::UnrecognizedHeader {
                path: path.to_path_buf(),
            });
        }
    };

    for (row, record) in records {
        rows.push(columns.parse(row, &record.map_err(csv_error)?)?);
    }
    rows.sort_by(TextRow::chronological);
    Ok(rows)
}

/// Dictionary-encode sorted rows into a header and samples.
pub(crate) fn encode_rows(rows: &[TextRow]) -> (SampleFileHeader, Vec<Sample>) {
    let earliest = rows.iter().map(|row| row.timestamp).min().unwrap_or(0);
    let latest = rows
        .iter()
        .map(|row| row.timestamp.saturating_add(row.elapsed))
        .max()
        .unwrap_or(0);

    let mut labels = Dictionary::new();
    let mut thread_names = Dictionary::new();
    let mut urls = Dictionary::new();
    let mut statuses = StatusCodeLookup::new();
    let samples = rows
        .iter()
        .map(|row| Sample {
            offset_millis: row.timestamp.saturating_sub(earliest),
            duration_millis: row.elapsed,
            label_ref: labels.intern(row.label.as_deref()),
            thread_name_ref: thread_names.intern(row.thread_name.as_deref()),
            url_ref: urls.intern(row.url.as_deref()),
            status_ref: statuses.get_ref(row.code.as_deref(), row.message.as_deref()),
            success: row.success,
            response_bytes: row.response_bytes,
            total_threads: row.all_threads,
        })
        .collect::<Vec<_>>();

    let (codes, messages) = statuses.into_dictionaries();
    let header = SampleFileHeader {
        metadata: FileMetadata {
            earliest_millis: earliest,
            latest_millis: latest,
            row_count: u64::try_from(samples.len()).unwrap_or(u64::MAX),
        },
        dictionaries: SideDictionaries {
            labels: labels.into_entries(),
            thread_names: thread_names.into_entries(),
            urls: urls.into_entries(),
            codes,
            messages,
        },
    };
    (header, samples)
}

/// Convert a comma-separated log into a sample file.
///
/// Nothing is written unless every row parses; the destination is replaced
/// atomically.
///
/// # Errors
///
/// Returns an error if the source cannot be read or parsed, or the
/// destination cannot be written.
pub fn text_to_binary(source: &Path, dest: &Path) -> ConvertResult<ConversionSummary> {
    let started = Instant::now();
    let file = File::open(source).map_err(|err| ConvertError::Io {
        context: "opening text log",
        path: source.to_path_buf(),
        source: err,
    })?;
    let rows = read_rows(BufReader::new(file), source)?;
    let (header, samples) = encode_rows(&rows);
    drop(rows);

    let sha256 = write_sample_file(dest, &header, &samples)?;
    tracing::debug!(
        "Converted {} rows from {} to {} in {:?}.",
        samples.len(),
        source.display(),
        dest.display(),
        started.elapsed()
    );
    Ok(ConversionSummary {
        rows: header.metadata.row_count,
        earliest_millis: header.metadata.earliest_millis,
        latest_millis: header.metadata.latest_millis,
        sha256,
    })
}
