//! Core index functionality
//!
//! This module contains the binary layout, the index writer and reader,
//! and the per-reference coordinate translation structures.

pub mod codec;
pub mod collapse;
mod error;
mod index;
pub mod io;
mod mapper;
mod reader;
mod writer;

pub use codec::{PositionRecord, ReferenceEntry, MAGIC, RECORD_SIZE};
pub use collapse::{collapse_sequence, expand_sequence, RunSpan};
pub use error::{
    FastaError, FastaResult, FormatError, FormatResult, HpsError, QueryError, QueryResult,
    Result, WriteError, WriteResult,
};
pub use index::CoordinateIndex;
pub use io::{ByteLineIterator, IoStrategy, SpanReader, DEFAULT_BUFFER_SIZE, MMAP_THRESHOLD};
pub use mapper::{CoordinateMapper, Direction};
pub use reader::IndexReader;
pub use writer::IndexWriter;
