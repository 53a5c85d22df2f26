//! I/O abstraction layer
//!
//! Provides random-access span reads over index files (buffered or
//! memory-mapped, selected by file size) and a reusable byte line iterator
//! for streaming text input.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::Path;

/// Default buffer size for buffered readers/writers (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// I/O strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Seek-and-read on a plain file handle
    Seek,
    /// Memory map the entire file
    MemoryMapped,
    /// Select based on file size
    #[default]
    Auto,
}

/// Random-access reader over a finalized index file
///
/// Small files use seek + read on the file handle; large files are memory
/// mapped. In-memory buffers are supported for tests and for callers that
/// already hold the encoded bytes.
#[derive(Debug)]
pub enum SpanReader {
    /// Plain file handle, repositioned per read
    File(File),
    /// Memory-mapped file
    Mapped(Mmap),
    /// In-memory byte buffer
    Memory(Vec<u8>),
}

impl SpanReader {
    /// Open a file with the specified I/O strategy
    pub fn open<P: AsRef<Path>>(path: P, strategy: IoStrategy) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let file_size = file.metadata()?.len();

        match strategy {
            IoStrategy::Seek => Ok(SpanReader::File(file)),
            IoStrategy::MemoryMapped => {
                // SAFETY: the format assumes no concurrent writers once a
                // file is finalized, so the mapping stays consistent.
                let mmap = unsafe { Mmap::map(&file)? };
                Ok(SpanReader::Mapped(mmap))
            }
            IoStrategy::Auto => {
                if file_size >= MMAP_THRESHOLD {
                    let mmap = unsafe { Mmap::map(&file)? };
                    Ok(SpanReader::Mapped(mmap))
                } else {
                    Ok(SpanReader::File(file))
                }
            }
        }
    }

    /// Open with the default auto strategy
    pub fn open_auto<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::open(path, IoStrategy::Auto)
    }

    /// Wrap an in-memory buffer
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        SpanReader::Memory(bytes)
    }

    /// Total byte length of the underlying data
    pub fn len(&self) -> io::Result<u64> {
        match self {
            SpanReader::File(file) => Ok(file.metadata()?.len()),
            SpanReader::Mapped(mmap) => Ok(mmap.len() as u64),
            SpanReader::Memory(bytes) => Ok(bytes.len() as u64),
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// True if the file is memory mapped
    pub fn is_mapped(&self) -> bool {
        matches!(self, SpanReader::Mapped(_))
    }

    /// Read exactly `len` bytes starting at absolute `offset`
    ///
    /// Fails with `UnexpectedEof` if the span extends past the end.
    pub fn read_span(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        match self {
            SpanReader::File(file) => {
                file.seek(SeekFrom::Start(offset))?;
                let mut buf = vec![0u8; len];
                file.read_exact(&mut buf)?;
                Ok(buf)
            }
            SpanReader::Mapped(mmap) => slice_span(mmap, offset, len),
            SpanReader::Memory(bytes) => slice_span(bytes, offset, len),
        }
    }
}

fn slice_span(bytes: &[u8], offset: u64, len: usize) -> io::Result<Vec<u8>> {
    let start = usize::try_from(offset)
        .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "offset out of range"))?;
    let end = start
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "span past end of data"))?;
    Ok(bytes[start..end].to_vec())
}

/// Create a buffered reader with the default buffer size
pub fn create_buf_reader<P: AsRef<Path>>(path: P) -> io::Result<io::BufReader<File>> {
    let file = File::open(path)?;
    Ok(io::BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
}

/// Create a buffered writer with the default buffer size
pub fn create_buf_writer<P: AsRef<Path>>(path: P) -> io::Result<io::BufWriter<File>> {
    let file = File::create(path)?;
    Ok(io::BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
}

/// Byte line iterator that reuses a buffer to avoid allocations
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes
    /// Returns None at EOF, Some(Ok(&[u8])) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                // Remove trailing newline
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_io_strategy_default() {
        assert_eq!(IoStrategy::default(), IoStrategy::Auto);
    }

    #[test]
    fn test_span_reader_memory() {
        let mut reader = SpanReader::from_vec(b"0123456789".to_vec());
        assert_eq!(reader.len().unwrap(), 10);
        assert_eq!(reader.read_span(2, 4).unwrap(), b"2345");
        assert_eq!(reader.read_span(0, 0).unwrap(), b"");
        assert!(reader.read_span(8, 4).is_err());
    }

    #[test]
    fn test_span_reader_file() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"abcdefgh")?;
        temp.flush()?;

        let mut reader = SpanReader::open(temp.path(), IoStrategy::Seek)?;
        assert!(!reader.is_mapped());
        assert_eq!(reader.read_span(3, 2)?, b"de");
        // Spans can be read out of order
        assert_eq!(reader.read_span(0, 3)?, b"abc");
        assert!(reader.read_span(6, 4).is_err());
        Ok(())
    }

    #[test]
    fn test_span_reader_mapped() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"mapped content")?;
        temp.flush()?;

        let mut reader = SpanReader::open(temp.path(), IoStrategy::MemoryMapped)?;
        assert!(reader.is_mapped());
        assert_eq!(reader.read_span(7, 7)?, b"content");
        Ok(())
    }

    #[test]
    fn test_auto_small_file_uses_seek() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"small")?;
        temp.flush()?;

        let reader = SpanReader::open_auto(temp.path())?;
        assert!(!reader.is_mapped());
        Ok(())
    }

    #[test]
    fn test_byte_line_iterator() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"line1\nline2\r\nline3")?;
        temp.flush()?;

        let file = File::open(temp.path())?;
        let reader = BufReader::new(file);
        let mut iter = ByteLineIterator::new(reader);

        assert_eq!(iter.next_line().unwrap()?, b"line1");
        assert_eq!(iter.next_line().unwrap()?, b"line2");
        assert_eq!(iter.next_line().unwrap()?, b"line3");
        assert!(iter.next_line().is_none());
        Ok(())
    }
}
