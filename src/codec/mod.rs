//! Binary sample container: dictionaries, status lookup, reader and writer.
mod dictionary;
mod format;
mod log;
mod reader;
mod sample;
mod status;
mod varint;
mod writer;


pub use dictionary::{Dictionary, resolve};
pub use format::{
    DictionaryKind, FileMetadata, SAMPLE_FILE_EXTENSION, SampleFileHeader, SideDictionaries,
};
pub use log::SampleLog;
pub use reader::SampleReader;
pub use sample::{Sample, UNKNOWN_BYTES};
pub use status::{StatusCodeLookup, StatusKind, StatusRef};
pub use writer::{SampleWriter, write_sample_file};
