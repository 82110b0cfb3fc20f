//! Layout constants and header types of the `.lls` sample container.

pub(crate) const MAGIC: [u8; 4] = *b"LLS1";
pub(crate) const VERSION: u8 = 1;

pub(crate) const TAG_METADATA: u8 = 0x01;
pub(crate) const TAG_DICTIONARY: u8 = 0x02;
pub(crate) const TAG_SAMPLES: u8 = 0x03;

pub(crate) const FLAG_SUCCESS: u8 = 0x01;

/// File extension used for converted logs.
pub const SAMPLE_FILE_EXTENSION: &str = "lls";

/// Scalar metadata stored ahead of the samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileMetadata {
    /// Epoch millis of the earliest sample start.
    pub earliest_millis: i64,
    /// Epoch millis of the latest sample end.
    pub latest_millis: i64,
    pub row_count: u64,
}

/// Names of the side dictionaries a file may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryKind {
    Labels,
    ThreadNames,
    Urls,
    Codes,
    Messages,
}

impl DictionaryKind {
    pub const ALL: [Self; 5] = [
        Self::Labels,
        Self::ThreadNames,
        Self::Urls,
        Self::Codes,
        Self::Messages,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Labels => "labels",
            Self::ThreadNames => "threadNames",
            Self::Urls => "urls",
            Self::Codes => "codes",
            Self::Messages => "messages",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Side dictionaries of a file. A dictionary that was never populated is
/// `None`, never an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideDictionaries {
    pub labels: Option<Vec<String>>,
    pub thread_names: Option<Vec<String>>,
    pub urls: Option<Vec<String>>,
    pub codes: Option<Vec<String>>,
    pub messages: Option<Vec<String>>,
}

impl SideDictionaries {
    #[must_use]
    pub fn get(&self, kind: DictionaryKind) -> Option<&[String]> {
        match kind {
            DictionaryKind::Labels => self.labels.as_deref(),
            DictionaryKind::ThreadNames => self.thread_names.as_deref(),
            DictionaryKind::Urls => self.urls.as_deref(),
            DictionaryKind::Codes => self.codes.as_deref(),
            DictionaryKind::Messages => self.messages.as_deref(),
        }
    }

    pub(crate) const fn slot(&mut self, kind: DictionaryKind) -> &mut Option<Vec<String>> {
        match kind {
            DictionaryKind::Labels => &mut self.labels,
            DictionaryKind::ThreadNames => &mut self.thread_names,
            DictionaryKind::Urls => &mut self.urls,
            DictionaryKind::Codes => &mut self.codes,
            DictionaryKind::Messages => &mut self.messages,
        }
    }
}

/// Everything a reader knows before the first sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleFileHeader {
    pub metadata: FileMetadata,
    pub dictionaries: SideDictionaries,
}
