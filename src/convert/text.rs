//! Shared CSV reader and writer settings for text logs and exports.
use std::io::{Read, Write};

use csv::{Reader, ReaderBuilder, Terminator, Writer, WriterBuilder};

/// Reader over a comma-separated stream. The first record is returned like
/// any other so callers can decide whether it is a header. Rows of differing
/// width are passed through for the caller to report.
pub fn text_reader<R: Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

/// Writer producing `\n`-terminated records, quoting only where needed.
pub fn text_writer<W: Write>(out: W) -> Writer<W> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out)
}
