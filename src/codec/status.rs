use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{CodecError, CodecResult};

/// Codes every status lookup knows without a per-file dictionary.
const WELL_KNOWN: [(&str, &str); 64] = [
    ("0", "Unspecified"),
    ("100", "Continue"),
    ("101", "Switching Protocols"),
    ("102", "Processing"),
    ("200", "OK"),
    ("201", "Created"),
    ("202", "Accepted"),
    ("203", "Non-authoritative Information"),
    ("204", "No Content"),
    ("205", "Reset Content"),
    ("206", "Partial Content"),
    ("207", "Multi-Status"),
    ("208", "Already Reported"),
    ("226", "IM Used"),
    ("300", "Multiple Choices"),
    ("301", "Moved Permanently"),
    ("302", "Found"),
    ("303", "See Other"),
    ("304", "Not Modified"),
    ("305", "Use Proxy"),
    ("307", "Temporary Redirect"),
    ("308", "Permanent Redirect"),
    ("400", "Bad Request"),
    ("401", "Unauthorized"),
    ("402", "Payment Required"),
    ("403", "Forbidden"),
    ("404", "Not Found"),
    ("405", "Method Not Allowed"),
    ("406", "Not Acceptable"),
    ("407", "Proxy Authentication Required"),
    ("408", "Request Timeout"),
    ("409", "Conflict"),
    ("410", "Gone"),
    ("411", "Length Required"),
    ("412", "Precondition Failed"),
    ("413", "Payload Too Large"),
    ("414", "Request-URI Too Long"),
    ("415", "Unsupported Media Type"),
    ("416", "Requested Range Not Satisfiable"),
    ("417", "Expectation Failed"),
    ("418", "I'm a teapot"),
    ("421", "Misdirected Request"),
    ("422", "Unprocessable Entity"),
    ("423", "Locked"),
    ("424", "Failed Dependency"),
    ("426", "Upgrade Required"),
    ("428", "Precondition Required"),
    ("429", "Too Many Requests"),
    ("431", "Request Header Fields Too Large"),
    ("444", "Connection Closed Without Response"),
    ("451", "Unavailable For Legal Reasons"),
    ("499", "Client Closed Request"),
    ("500", "Internal Server Error"),
    ("501", "Not Implemented"),
    ("502", "Bad Gateway"),
    ("503", "Service Unavailable"),
    ("504", "Gateway Timeout"),
    ("505", "HTTP Version Not Supported"),
    ("506", "Variant Also Negotiates"),
    ("507", "Insufficient Storage"),
    ("508", "Loop Detected"),
    ("510", "Not Extended"),
    ("511", "Network Authentication Required"),
    ("599", "Network Connect Timeout Error"),
];

static CODE_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    WELL_KNOWN
        .iter()
        .enumerate()
        .map(|(idx, (code, _))| (*code, idx))
        .collect()
});

static MESSAGE_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    WELL_KNOWN
        .iter()
        .enumerate()
        .map(|(idx, (_, message))| (*message, idx))
        .collect()
});

/// Compact reference to a (code, message) pair.
///
/// Stored as a signed integer: negative values address the well-known table,
/// positive values the per-file custom dictionary, and zero means the sample
/// recorded no status at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusRef(i32);

/// Decoded view of a [`StatusRef`]. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Unrecorded,
    WellKnown(usize),
    Custom(usize),
}

impl StatusRef {
    pub const UNRECORDED: Self = Self(0);

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_recorded(self) -> bool {
        self.0 != 0
    }

    #[must_use]
    pub fn kind(self) -> StatusKind {
        match self.0 {
            0 => StatusKind::Unrecorded,
            raw if raw < 0 => {
                let idx = raw.checked_neg().and_then(|value| value.checked_sub(1));
                idx.and_then(|value| usize::try_from(value).ok())
                    .map_or(StatusKind::Unrecorded, StatusKind::WellKnown)
            }
            raw => usize::try_from(raw.saturating_sub(1))
                .map_or(StatusKind::Unrecorded, StatusKind::Custom),
        }
    }

    fn well_known(idx: usize) -> Self {
        let raw = i32::try_from(idx)
            .ok()
            .and_then(|value| value.checked_add(1))
            .and_then(i32::checked_neg)
            .unwrap_or(0);
        Self(raw)
    }

    fn custom(idx: usize) -> Option<Self> {
        i32::try_from(idx)
            .ok()
            .and_then(|value| value.checked_add(1))
            .map(Self)
    }
}

/// Interns status (code, message) pairs for one conversion pass.
#[derive(Debug, Clone, Default)]
pub struct StatusCodeLookup {
    codes: Vec<String>,
    messages: Vec<String>,
    index: HashMap<(String, String), StatusRef>,
}

impl StatusCodeLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a lookup from the custom dictionaries of a sample file.
    ///
    /// # Errors
    ///
    /// Returns an error when exactly one dictionary is present or when the two
    /// dictionaries have different lengths.
    pub fn from_dictionaries(
        codes: Option<Vec<String>>,
        messages: Option<Vec<String>>,
    ) -> CodecResult<Self> {
        let (codes, messages) = match (codes, messages) {
            (None, None) => return Ok(Self::new()),
            (Some(codes), Some(messages)) => (codes, messages),
            (Some(codes), None) => (codes, Vec::new()),
            (None, Some(messages)) => (Vec::new(), messages),
        };
        if codes.len() != messages.len() {
            return Err(CodecError::UnevenStatusDictionaries {
                codes: codes.len(),
                messages: messages.len(),
            });
        }
        let mut index = HashMap::with_capacity(codes.len());
        for (idx, pair) in codes.iter().zip(messages.iter()).enumerate() {
            if let Some(status) = StatusRef::custom(idx) {
                index
                    .entry((pair.0.clone(), pair.1.clone()))
                    .or_insert(status);
            }
        }
        Ok(Self {
            codes,
            messages,
            index,
        })
    }

    /// Resolve a reference for the pair, allocating a custom slot on first sight.
    pub fn get_ref(&mut self, code: Option<&str>, message: Option<&str>) -> StatusRef {
        let resolved_code = match (code, message) {
            (None, None) => return StatusRef::UNRECORDED,
            (Some(code), _) => code,
            (None, Some(message)) => MESSAGE_INDEX
                .get(message)
                .and_then(|idx| WELL_KNOWN.get(*idx))
                .map_or("", |entry| entry.0),
        };

        if let Some(idx) = CODE_INDEX.get(resolved_code).copied() {
            let standard = WELL_KNOWN.get(idx).map(|entry| entry.1);
            if message.is_none() || message == standard {
                return StatusRef::well_known(idx);
            }
        }

        let resolved_message = message.unwrap_or_default();
        let key = (resolved_code.to_owned(), resolved_message.to_owned());
        if let Some(existing) = self.index.get(&key) {
            return *existing;
        }
        let Some(status) = StatusRef::custom(self.codes.len()) else {
            return StatusRef::UNRECORDED;
        };
        self.codes.push(key.0.clone());
        self.messages.push(key.1.clone());
        self.index.insert(key, status);
        status
    }

    /// Code text for a reference; empty when unrecorded.
    ///
    /// # Errors
    ///
    /// Returns an error when the reference points past either table.
    pub fn code(&self, status: StatusRef) -> CodecResult<&str> {
        match status.kind() {
            StatusKind::Unrecorded => Some(""),
            StatusKind::WellKnown(idx) => WELL_KNOWN.get(idx).map(|entry| entry.0),
            StatusKind::Custom(idx) => self.codes.get(idx).map(String::as_str),
        }
        .ok_or(CodecError::UnknownStatusRef { raw: status.raw() })
    }

    /// Message text for a reference; empty when unrecorded.
    ///
    /// # Errors
    ///
    /// Returns an error when the reference points past either table.
    pub fn message(&self, status: StatusRef) -> CodecResult<&str> {
        match status.kind() {
            StatusKind::Unrecorded => Some(""),
            StatusKind::WellKnown(idx) => WELL_KNOWN.get(idx).map(|entry| entry.1),
            StatusKind::Custom(idx) => self.messages.get(idx).map(String::as_str),
        }
        .ok_or(CodecError::UnknownStatusRef { raw: status.raw() })
    }

    #[must_use]
    pub fn custom_codes(&self) -> &[String] {
        &self.codes
    }

    /// Custom dictionaries in file form; `None` when no custom pair was seen.
    #[must_use]
    pub fn into_dictionaries(self) -> (Option<Vec<String>>, Option<Vec<String>>) {
        if self.codes.is_empty() {
            return (None, None);
        }
        (Some(self.codes), Some(self.messages))
    }
}
