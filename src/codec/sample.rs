use super::StatusRef;

/// Response size recorded when the log did not carry one.
pub const UNKNOWN_BYTES: i64 = -1;

/// One logged request/response event.
///
/// Text-valued fields are 1-based references into the side dictionaries of
/// the file the sample came from; 0 means the value was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sample {
    /// Milliseconds since the earliest sample of the log.
    pub offset_millis: i64,
    pub duration_millis: i64,
    pub label_ref: u32,
    pub thread_name_ref: u32,
    pub url_ref: u32,
    pub status_ref: StatusRef,
    pub success: bool,
    /// [`UNKNOWN_BYTES`] when unknown.
    pub response_bytes: i64,
    /// Zero or less when unknown.
    pub total_threads: i32,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            offset_millis: 0,
            duration_millis: 0,
            label_ref: 0,
            thread_name_ref: 0,
            url_ref: 0,
            status_ref: StatusRef::UNRECORDED,
            success: true,
            response_bytes: UNKNOWN_BYTES,
            total_threads: 0,
        }
    }
}
