//! Error types for HpsIndex
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for HpsIndex operations
#[derive(Debug, Error)]
pub enum HpsError {
    /// Index file format errors
    #[error("Index format error: {0}")]
    Format(#[from] FormatError),

    /// Index writing errors
    #[error("Index write error: {0}")]
    Write(#[from] WriteError),

    /// Coordinate query errors
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// FASTA parsing errors
    #[error("FASTA error: {0}")]
    Fasta(#[from] FastaError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while reading or decoding an index file
#[derive(Debug, Error)]
pub enum FormatError {
    /// The file does not start with the expected magic constant
    #[error("Corrupt header: expected magic {expected:#010x}, found {found:#010x}")]
    CorruptHeader { expected: u32, found: u32 },

    /// The footer is missing, truncated, or does not parse to its exact length
    #[error("Corrupt footer: {0}")]
    CorruptFooter(String),

    /// A decode ran past the available bytes, or a value is out of range
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Index file not found
    #[error("Index file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while writing an index file
///
/// All of these (except `Io`) indicate caller misuse and are fatal to the
/// current write session.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A reference section with this name was already begun
    #[error("Duplicate reference: {0}")]
    DuplicateReference(String),

    /// Record position does not strictly increase within a reference
    #[error("Out-of-order position in {reference}: {position} after {previous}")]
    OutOfOrderPosition {
        reference: String,
        previous: u32,
        position: u32,
    },

    /// Operation not valid in the writer's current state
    #[error("Invalid writer state: {0}")]
    InvalidState(&'static str),

    /// Run length is zero or exceeds the 32-bit field
    #[error("Run length out of range at position {position}: {run_length}")]
    RunLengthOutOfRange { position: u32, run_length: u64 },

    /// The cumulative collapsed offset no longer fits in 32 bits
    #[error("Collapsed offset overflow in {reference}: {offset}")]
    CollapsedOffsetOverflow { reference: String, offset: u64 },

    /// A record position exceeds the 32-bit field
    #[error("Position out of range: {0}")]
    PositionOverflow(u64),

    /// Reference name longer than the 16-bit length prefix allows
    #[error("Reference name too long ({len} bytes): {name}")]
    NameTooLong { name: String, len: usize },

    /// A record byte offset exceeds the 32-bit footer field
    #[error("Index file too large: byte offset {0} does not fit in 32 bits")]
    FileTooLarge(u64),

    /// I/O error while writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during coordinate queries
#[derive(Debug, Error)]
pub enum QueryError {
    /// Reference not present in the index
    #[error("Reference not found in index: {0}")]
    UnknownReference(String),

    /// Queried position precedes the first recorded run
    #[error("Position {position} precedes first recorded run at {first}")]
    PositionBeforeFirstRecord { position: u32, first: u32 },
}

/// Errors that can occur while parsing FASTA input
#[derive(Debug, Error)]
pub enum FastaError {
    /// Sequence data before any `>` header
    #[error("Sequence data before first header at line {line}")]
    MissingHeader { line: usize },

    /// Header line with no reference name
    #[error("Empty reference name at line {line}")]
    EmptyName { line: usize },

    /// Non-UTF-8 bytes in a header line
    #[error("Invalid UTF-8 in header at line {line}")]
    InvalidHeader { line: usize },

    /// FASTA file not found
    #[error("FASTA file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for HpsIndex operations
pub type Result<T> = std::result::Result<T, HpsError>;

/// Result type alias for format decoding operations
pub type FormatResult<T> = std::result::Result<T, FormatError>;

/// Result type alias for index writing operations
pub type WriteResult<T> = std::result::Result<T, WriteError>;

/// Result type alias for coordinate queries
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Result type alias for FASTA parsing
pub type FastaResult<T> = std::result::Result<T, FastaError>;
