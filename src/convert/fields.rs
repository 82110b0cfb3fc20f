use std::borrow::Cow;

use crate::codec::{Sample, SampleFileHeader, StatusCodeLookup, UNKNOWN_BYTES, resolve};
use crate::error::ConvertResult;

/// Columns a JMeter result log may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JtlField {
    TimeStamp,
    Elapsed,
    Label,
    ResponseCode,
    ResponseMessage,
    ThreadName,
    DataType,
    Success,
    FailureMessage,
    Bytes,
    SentBytes,
    GrpThreads,
    AllThreads,
    Url,
    Filename,
    Latency,
    Connect,
    Encoding,
    SampleCount,
    ErrorCount,
    Hostname,
    IdleTime,
    Variables,
}

impl JtlField {
    pub const ALL: [Self; 23] = [
        Self::TimeStamp,
        Self::Elapsed,
        Self::Label,
        Self::ResponseCode,
        Self::ResponseMessage,
        Self::ThreadName,
        Self::DataType,
        Self::Success,
        Self::FailureMessage,
        Self::Bytes,
        Self::SentBytes,
        Self::GrpThreads,
        Self::AllThreads,
        Self::Url,
        Self::Filename,
        Self::Latency,
        Self::Connect,
        Self::Encoding,
        Self::SampleCount,
        Self::ErrorCount,
        Self::Hostname,
        Self::IdleTime,
        Self::Variables,
    ];

    /// Columns written when converting back to text, in output order.
    pub const OUTPUT_ORDER: [Self; 10] = [
        Self::TimeStamp,
        Self::Elapsed,
        Self::Label,
        Self::ResponseCode,
        Self::ResponseMessage,
        Self::ThreadName,
        Self::Success,
        Self::Bytes,
        Self::AllThreads,
        Self::Url,
    ];

    /// Layout JMeter writes when it is told to omit the header row.
    pub const HEADERLESS_LAYOUT: [Self; 12] = [
        Self::TimeStamp,
        Self::Elapsed,
        Self::Label,
        Self::ResponseCode,
        Self::ResponseMessage,
        Self::ThreadName,
        Self::DataType,
        Self::Success,
        Self::Bytes,
        Self::GrpThreads,
        Self::AllThreads,
        Self::Latency,
    ];

    #[must_use]
    pub const fn header_name(self) -> &'static str {
        match self {
            Self::TimeStamp => "timeStamp",
            Self::Elapsed => "elapsed",
            Self::Label => "label",
            Self::ResponseCode => "responseCode",
            Self::ResponseMessage => "responseMessage",
            Self::ThreadName => "threadName",
            Self::DataType => "dataType",
            Self::Success => "success",
            Self::FailureMessage => "failureMessage",
            Self::Bytes => "bytes",
            Self::SentBytes => "sentBytes",
            Self::GrpThreads => "grpThreads",
            Self::AllThreads => "allThreads",
            Self::Url => "URL",
            Self::Filename => "Filename",
            Self::Latency => "Latency",
            Self::Connect => "connect",
            Self::Encoding => "encoding",
            Self::SampleCount => "SampleCount",
            Self::ErrorCount => "ErrorCount",
            Self::Hostname => "Hostname",
            Self::IdleTime => "IdleTime",
            Self::Variables => "Variables",
        }
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn from_header(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.header_name().eq_ignore_ascii_case(trimmed))
    }

    /// Whether any sample in a file needs this column to be written.
    ///
    /// `seen` reports what a scan over the samples found.
    #[must_use]
    pub const fn is_used(self, header: &SampleFileHeader, seen: &SampleScan) -> bool {
        match self {
            Self::TimeStamp | Self::Elapsed | Self::Success => true,
            Self::Label => header.dictionaries.labels.is_some(),
            Self::ThreadName => header.dictionaries.thread_names.is_some(),
            Self::Url => header.dictionaries.urls.is_some(),
            Self::ResponseCode | Self::ResponseMessage => seen.any_status,
            Self::Bytes => seen.any_bytes,
            Self::AllThreads => seen.any_threads,
            Self::DataType
            | Self::FailureMessage
            | Self::SentBytes
            | Self::GrpThreads
            | Self::Filename
            | Self::Latency
            | Self::Connect
            | Self::Encoding
            | Self::SampleCount
            | Self::ErrorCount
            | Self::Hostname
            | Self::IdleTime
            | Self::Variables => false,
        }
    }

    /// Text for this column of `sample`.
    ///
    /// # Errors
    ///
    /// Returns an error when the sample's status reference has no entry.
    pub fn render<'ctx>(self, sample: &Sample, ctx: &'ctx RenderContext) -> ConvertResult<Cow<'ctx, str>> {
        let dictionaries = &ctx.header.dictionaries;
        let text = match self {
            Self::TimeStamp => Cow::Owned(
                ctx.header
                    .metadata
                    .earliest_millis
                    .saturating_add(sample.offset_millis)
                    .to_string(),
            ),
            Self::Elapsed => Cow::Owned(sample.duration_millis.to_string()),
            Self::Label => text_ref(dictionaries.labels.as_deref(), sample.label_ref),
            Self::ThreadName => text_ref(dictionaries.thread_names.as_deref(), sample.thread_name_ref),
            Self::Url => text_ref(dictionaries.urls.as_deref(), sample.url_ref),
            Self::ResponseCode => Cow::Borrowed(ctx.statuses.code(sample.status_ref)?),
            Self::ResponseMessage => Cow::Borrowed(ctx.statuses.message(sample.status_ref)?),
            Self::Success => Cow::Borrowed(if sample.success { "true" } else { "false" }),
            Self::Bytes => Cow::Owned(sample.response_bytes.to_string()),
            Self::AllThreads => Cow::Owned(sample.total_threads.to_string()),
            Self::DataType
            | Self::FailureMessage
            | Self::SentBytes
            | Self::GrpThreads
            | Self::Filename
            | Self::Latency
            | Self::Connect
            | Self::Encoding
            | Self::SampleCount
            | Self::ErrorCount
            | Self::Hostname
            | Self::IdleTime
            | Self::Variables => Cow::Borrowed(""),
        };
        Ok(text)
    }
}

fn text_ref(entries: Option<&[String]>, reference: u32) -> Cow<'_, str> {
    Cow::Borrowed(resolve(entries, reference).unwrap_or_default())
}

/// What a pass over the samples of a file found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleScan {
    pub any_status: bool,
    pub any_bytes: bool,
    pub any_threads: bool,
}

impl SampleScan {
    pub const fn observe(&mut self, sample: &Sample) {
        self.any_status |= sample.status_ref.is_recorded();
        self.any_bytes |= sample.response_bytes != UNKNOWN_BYTES;
        self.any_threads |= sample.total_threads > 0;
    }
}

/// File-level state needed to render rows as text.
#[derive(Debug)]
pub struct RenderContext {
    pub header: SampleFileHeader,
    pub statuses: StatusCodeLookup,
}
