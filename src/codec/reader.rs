use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::format::{
    DictionaryKind, FLAG_SUCCESS, FileMetadata, MAGIC, SampleFileHeader, SideDictionaries,
    TAG_DICTIONARY, TAG_METADATA, TAG_SAMPLES, VERSION,
};
use super::varint::{get_i32, get_i64, get_len, get_str, get_u8, get_u32, get_u64, try_get_u8};
use super::{Sample, StatusRef};
use crate::error::{CodecError, CodecResult};

/// Forward-only reader for the `.lls` container.
///
/// The header is decoded eagerly; samples are decoded one at a time through
/// the [`Iterator`] impl, which stops after the first error.
#[derive(Debug)]
pub struct SampleReader<R: Read> {
    inner: R,
    header: SampleFileHeader,
    remaining: u64,
    done: bool,
}

impl SampleReader<BufReader<File>> {
    /// Open a sample file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is invalid.
    pub fn open(path: &Path) -> CodecResult<Self> {
        let file = File::open(path).map_err(|err| CodecError::Io {
            context: "opening sample file",
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> SampleReader<R> {
    /// Decode the header of a sample stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the magic, version or header records are invalid.
    pub fn new(mut inner: R) -> CodecResult<Self> {
        let mut magic = [0u8; 4];
        for slot in &mut magic {
            *slot = get_u8(&mut inner, "magic")?;
        }
        if magic != MAGIC {
            return Err(CodecError::BadMagic { found: magic });
        }
        let version = get_u8(&mut inner, "version")?;
        if version != VERSION {
            return Err(CodecError::UnsupportedVersion { version });
        }

        let tag = get_u8(&mut inner, "metadata tag")?;
        if tag != TAG_METADATA {
            return Err(CodecError::UnexpectedRecord {
                expected: "metadata",
                tag,
            });
        }
        let metadata = FileMetadata {
            earliest_millis: get_i64(&mut inner, "earliest")?,
            latest_millis: get_i64(&mut inner, "latest")?,
            row_count: get_u64(&mut inner, "row count")?,
        };

        let mut dictionaries = SideDictionaries::default();
        loop {
            let tag = get_u8(&mut inner, "record tag")?;
            match tag {
                TAG_DICTIONARY => read_dictionary(&mut inner, &mut dictionaries)?,
                TAG_SAMPLES => break,
                other => {
                    return Err(CodecError::UnexpectedRecord {
                        expected: "dictionary or samples",
                        tag: other,
                    });
                }
            }
        }

        Ok(Self {
            inner,
            remaining: metadata.row_count,
            header: SampleFileHeader {
                metadata,
                dictionaries,
            },
            done: false,
        })
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

    /// Give up the decoded header, e.g. once all samples are consumed.
    #[must_use]
    pub fn into_header(self) -> SampleFileHeader {
        self.header
    }

    fn read_sample(&mut self) -> CodecResult<Sample> {
        let reader = &mut self.inner;
        Ok(Sample {
            offset_millis: get_i64(reader, "offset")?,
            duration_millis: get_i64(reader, "duration")?,
            label_ref: get_u32(reader, "label ref")?,
            thread_name_ref: get_u32(reader, "thread name ref")?,
            url_ref: get_u32(reader, "url ref")?,
            status_ref: StatusRef::from_raw(get_i32(reader, "status ref")?),
            success: get_u8(reader, "flags")? & FLAG_SUCCESS != 0,
            response_bytes: get_i64(reader, "response bytes")?,
            total_threads: get_i32(reader, "total threads")?,
        })
    }

    fn next_sample(&mut self) -> CodecResult<Option<Sample>> {
        if self.remaining == 0 {
            return match try_get_u8(&mut self.inner, "end of samples")? {
                None => Ok(None),
                Some(_) => Err(CodecError::TrailingBytes),
            };
        }
        let sample = self.read_sample()?;
        self.remaining = self.remaining.saturating_sub(1);
        Ok(Some(sample))
    }
}

impl<R: Read> Iterator for SampleReader<R> {
    type Item = CodecResult<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_sample() {
            Ok(Some(sample)) => Some(Ok(sample)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn read_dictionary<R: Read>(reader: &mut R, dictionaries: &mut SideDictionaries) -> CodecResult<()> {
    let name = get_str(reader, "dictionary name")?;
    let count = get_len(reader, "dictionary size")?;
    let mut entries = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        entries.push(get_str(reader, "dictionary entry")?);
    }
    match DictionaryKind::from_name(&name) {
        Some(kind) => {
            *dictionaries.slot(kind) = Some(entries);
        }
        None => tracing::debug!("Skipping unknown dictionary '{}'.", name),
    }
    Ok(())
}
