//! FASTA input and wrapped FASTA output
//!
//! The reader streams records from plain, gzip, or bzip2 compressed FASTA
//! files; compression is detected from the extension or the magic bytes.
//! The writer emits line-wrapped FASTA for downstream consumers, with a
//! configurable column width.

use crate::core::io::{ByteLineIterator, DEFAULT_BUFFER_SIZE};
use crate::core::{FastaError, FastaResult};
use std::fs::File;
use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Default wrap width for FASTA output
pub const DEFAULT_WRAP: usize = 50;

/// Compression formats recognized for FASTA input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Gzip,
    Bzip2,
    Plain,
}

/// Detect compression from a file's extension or magic bytes
///
/// - .gz extension or gzip magic bytes (1f 8b)
/// - .bz2 extension or bzip2 magic bytes (42 5a 68)
/// - Plain text otherwise
pub fn detect_compression(path: &Path) -> FastaResult<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        Ok(CompressionFormat::Gzip)
    } else if bytes_read >= 3 && &magic[..3] == b"BZh" {
        Ok(CompressionFormat::Bzip2)
    } else {
        Ok(CompressionFormat::Plain)
    }
}

/// One FASTA record: name plus raw sequence bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Reference name: first whitespace-delimited word of the header
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Streaming FASTA reader over any buffered source
pub struct FastaReader<R: BufRead> {
    lines: ByteLineIterator<R>,
    pending_name: Option<String>,
    line_number: usize,
}

impl<R: BufRead> fmt::Debug for FastaReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastaReader")
            .field("pending_name", &self.pending_name)
            .field("line_number", &self.line_number)
            .finish_non_exhaustive()
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: ByteLineIterator::new(reader),
            pending_name: None,
            line_number: 0,
        }
    }

    /// Read the next record
    /// Returns None at EOF, Some(Ok(record)) on success, Some(Err) on error
    pub fn next_record(&mut self) -> Option<FastaResult<FastaRecord>> {
        let mut name = self.pending_name.take();
        let mut sequence = Vec::new();

        loop {
            let line = match self.lines.next_line() {
                None => {
                    return name.map(|name| Ok(FastaRecord { name, sequence }));
                }
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(FastaError::Io(e))),
            };
            self.line_number += 1;

            if let Some(header) = line.strip_prefix(b">") {
                let parsed = match parse_header(header, self.line_number) {
                    Ok(parsed) => parsed,
                    Err(e) => return Some(Err(e)),
                };
                match name {
                    // End of the record in progress; keep the new header
                    Some(current) => {
                        self.pending_name = Some(parsed);
                        return Some(Ok(FastaRecord {
                            name: current,
                            sequence,
                        }));
                    }
                    None => name = Some(parsed),
                }
            } else {
                let trimmed: Vec<u8> = line
                    .iter()
                    .copied()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                if trimmed.is_empty() {
                    continue;
                }
                if name.is_none() {
                    return Some(Err(FastaError::MissingHeader {
                        line: self.line_number,
                    }));
                }
                sequence.extend_from_slice(&trimmed);
            }
        }
    }
}

fn parse_header(header: &[u8], line_number: usize) -> FastaResult<String> {
    let header = std::str::from_utf8(header)
        .map_err(|_| FastaError::InvalidHeader { line: line_number })?;
    match header.split_whitespace().next() {
        Some(word) => Ok(word.to_string()),
        None => Err(FastaError::EmptyName { line: line_number }),
    }
}

/// Open a FASTA file, transparently decompressing gzip and bzip2
pub fn open_fasta(path: &Path) -> FastaResult<FastaReader<Box<dyn BufRead>>> {
    if !path.exists() {
        return Err(FastaError::FileNotFound(path.to_path_buf()));
    }
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    let reader: Box<dyn BufRead> = match format {
        CompressionFormat::Gzip => {
            let decoder = flate2::read::GzDecoder::new(file);
            Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder))
        }
        CompressionFormat::Bzip2 => {
            let decoder = bzip2::read::BzDecoder::new(file);
            Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder))
        }
        CompressionFormat::Plain => {
            Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
        }
    };
    Ok(FastaReader::new(reader))
}

/// Line-wrapping FASTA writer
///
/// Emits a `>` header per reference and wraps sequence data at a fixed
/// column width. Sequence may arrive in arbitrary chunks; wrapping state
/// carries across calls. A blank line separates reference blocks.
pub struct FastaWriter<W: Write> {
    writer: W,
    wrap: usize,
    line_count: usize,
    first: bool,
}

impl<W: Write> FastaWriter<W> {
    /// Create a writer with the default wrap width of 50 columns
    pub fn new(writer: W) -> Self {
        Self::with_wrap(writer, DEFAULT_WRAP)
    }

    pub fn with_wrap(writer: W, wrap: usize) -> Self {
        assert!(wrap > 0, "wrap width must be positive");
        Self {
            writer,
            wrap,
            line_count: 0,
            first: true,
        }
    }

    /// Start a new reference block
    pub fn begin_ref(&mut self, name: &str) -> std::io::Result<()> {
        if !self.first {
            if self.line_count > 0 {
                self.writer.write_all(b"\n")?;
            }
            self.writer.write_all(b"\n")?;
        }
        write!(self.writer, ">{}", name)?;
        self.writer.write_all(b"\n")?;
        self.first = false;
        self.line_count = 0;
        Ok(())
    }

    /// Append sequence bytes to the current block, wrapping as needed
    pub fn write_seq(&mut self, mut seq: &[u8]) -> std::io::Result<()> {
        while !seq.is_empty() {
            let room = self.wrap - self.line_count;
            let take = room.min(seq.len());
            self.writer.write_all(&seq[..take])?;
            self.line_count += take;
            seq = &seq[take..];

            if self.line_count == self.wrap {
                self.writer.write_all(b"\n")?;
                self.line_count = 0;
            }
        }
        Ok(())
    }

    /// Terminate the final line, flush, and return the underlying writer
    pub fn finish(mut self) -> std::io::Result<W> {
        if self.line_count > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
