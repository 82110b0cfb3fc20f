//! Atomic, digest-tracking file output shared by the converters and exports.
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::{NamedTempFile, PersistError};

/// `Write` adapter that hashes every byte passed through it.
#[derive(Debug)]
pub struct HashingWriter<W: Write> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Lowercase hex SHA-256 of everything written so far.
    #[must_use]
    pub fn finish(self) -> (W, String) {
        (self.inner, hex::encode(self.hasher.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if let Some(chunk) = buf.get(..written) {
            self.hasher.update(chunk);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Failure while finishing an [`AtomicOutput`].
#[derive(Debug)]
pub enum CommitError {
    Flush(io::Error),
    Persist(PersistError),
}

/// Output written to a temporary sibling of `path` and renamed over it on
/// [`AtomicOutput::commit`]. Dropping it without committing leaves `path`
/// untouched.
#[derive(Debug)]
pub struct AtomicOutput {
    path: PathBuf,
    writer: HashingWriter<BufWriter<NamedTempFile>>,
}

impl AtomicOutput {
    /// Create the temporary file next to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn create(path: &Path) -> io::Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: HashingWriter::new(BufWriter::new(temp)),
        })
    }

    /// Flush, sync and move the temporary file into place.
    ///
    /// Returns the lowercase hex SHA-256 of the committed bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when flushing or renaming fails.
    pub fn commit(self) -> Result<String, CommitError> {
        let (buffered, digest) = self.writer.finish();
        let temp = buffered
            .into_inner()
            .map_err(|err| CommitError::Flush(err.into_error()))?;
        temp.as_file().sync_all().map_err(CommitError::Flush)?;
        temp.persist(&self.path).map_err(CommitError::Persist)?;
        Ok(digest)
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
