use std::io::{self, Read, Write};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use super::TextExporter;
use crate::error::{ConvertError, ConvertResult};

/// Default number of chunks buffered between producer and consumer.
pub const DEFAULT_STREAM_CAPACITY: usize = 8;

/// Bytes accumulated before a chunk is sent.
const CHUNK_BYTES: usize = 65_536;

type Chunk = ConvertResult<Vec<u8>>;

/// Text rendering of a sample file produced on a background thread.
///
/// Read it through [`Read`] or pull whole chunks through [`Iterator`].
/// Dropping the stream closes the channel; the producer stops at its next
/// send and is joined.
#[derive(Debug)]
pub struct TextStream {
    receiver: mpsc::Receiver<Chunk>,
    current: Vec<u8>,
    position: usize,
    finished: bool,
    producer: Option<JoinHandle<()>>,
}

impl TextStream {
    /// Start rendering `exporter` on a new thread.
    ///
    /// Must not be read from inside an async context; use a blocking task.
    ///
    /// # Errors
    ///
    /// Returns an error if the producer thread cannot be spawned.
    pub fn spawn(exporter: TextExporter, capacity: usize) -> ConvertResult<Self> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let producer = std::thread::Builder::new()
            .name("loglens-text-stream".to_owned())
            .spawn(move || produce(&exporter, &sender))
            .map_err(|err| ConvertError::Stream {
                context: "spawning text stream producer",
                source: err,
            })?;
        Ok(Self {
            receiver,
            current: Vec::new(),
            position: 0,
            finished: false,
            producer: Some(producer),
        })
    }

    fn next_chunk(&mut self) -> Option<Chunk> {
        if self.finished {
            return None;
        }
        let chunk = self.receiver.blocking_recv();
        if !matches!(chunk, Some(Ok(_))) {
            self.finished = true;
        }
        if chunk.is_none() && !self.join_producer() {
            return Some(Err(ConvertError::ProducerGone));
        }
        chunk
    }

    /// Wait for the producer; false when it panicked.
    fn join_producer(&mut self) -> bool {
        self.producer
            .take()
            .is_none_or(|producer| producer.join().is_ok())
    }
}

fn produce(exporter: &TextExporter, sender: &mpsc::Sender<Chunk>) {
    let mut writer = ChannelWriter {
        sender,
        buffer: Vec::with_capacity(CHUNK_BYTES),
    };
    let result = exporter
        .write_to(&mut writer)
        .and_then(|()| writer.send_buffer().map_err(stream_error));
    if let Err(err) = result {
        if sender.is_closed() {
            tracing::debug!("Text stream consumer went away; stopping producer.");
        } else if sender.blocking_send(Err(err)).is_err() {
            tracing::debug!("Text stream consumer went away before the error was delivered.");
        }
    }
}

fn stream_error(err: io::Error) -> ConvertError {
    ConvertError::Stream {
        context: "sending text chunk",
        source: err,
    }
}

struct ChannelWriter<'chan> {
    sender: &'chan mpsc::Sender<Chunk>,
    buffer: Vec<u8>,
}

impl ChannelWriter<'_> {
    fn send_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::replace(&mut self.buffer, Vec::with_capacity(CHUNK_BYTES));
        self.sender
            .blocking_send(Ok(chunk))
            .map_err(|_err| io::Error::new(io::ErrorKind::BrokenPipe, "text stream closed"))
    }
}

impl Write for ChannelWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        if self.buffer.len() >= CHUNK_BYTES {
            self.send_buffer()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Iterator for TextStream {
    type Item = ConvertResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position < self.current.len() {
            let rest = self.current.split_off(self.position);
            self.current.clear();
            self.position = 0;
            return Some(Ok(rest));
        }
        self.next_chunk()
    }
}

impl Read for TextStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.position >= self.current.len() {
            match self.next_chunk() {
                Some(Ok(chunk)) => {
                    self.current = chunk;
                    self.position = 0;
                }
                Some(Err(err)) => return Err(io::Error::other(err)),
                None => return Ok(0),
            }
        }
        let available = self.current.get(self.position..).unwrap_or_default();
        let count = available.len().min(buf.len());
        if let (Some(dest), Some(src)) = (buf.get_mut(..count), available.get(..count)) {
            dest.copy_from_slice(src);
        }
        self.position = self.position.saturating_add(count);
        Ok(count)
    }
}

impl Drop for TextStream {
    fn drop(&mut self) {
        self.receiver.close();
        // Drain so a producer blocked on a full channel observes the close.
        while self.receiver.try_recv().is_ok() {}
        if !self.join_producer() {
            tracing::warn!("Text stream producer panicked.");
        }
    }
}
