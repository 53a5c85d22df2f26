//! Index writer
//!
//! Streams per-reference position records to a file in a single forward
//! pass. The writer never seeks: it tracks its own byte position, and the
//! reference table is emitted as a footer at close, once the final record
//! counts and offsets are known.

use crate::core::codec::{self, ReferenceEntry, HEADER_SIZE, MAGIC, RECORD_SIZE};
use crate::core::error::{WriteError, WriteResult};
use crate::core::io::DEFAULT_BUFFER_SIZE;
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Per-reference state while its records are being appended
struct CurrentReference {
    name: String,
    byte_offset: u64,
    record_count: u64,
    last_position: Option<u32>,
    collapsed_offset: u64,
}

/// Streaming writer for homopolymer-stripped index files
///
/// Lifecycle: create, then for each reference call [`begin_reference`]
/// followed by its [`append`] calls in strictly increasing position order,
/// then [`close`] (or [`finish`]) exactly once. Closing writes the footer;
/// a file abandoned before close has no reference table and will not open.
///
/// [`begin_reference`]: IndexWriter::begin_reference
/// [`append`]: IndexWriter::append
/// [`close`]: IndexWriter::close
/// [`finish`]: IndexWriter::finish
///
/// # Example
/// ```ignore
/// let mut writer = IndexWriter::create("genome.hps")?;
/// writer.begin_reference("chr1")?;
/// writer.append(10, 3)?;
/// writer.append(20, 1)?;
/// writer.close()?;
/// ```
pub struct IndexWriter<W: Write> {
    writer: W,
    /// Absolute byte position of the next write
    position: u64,
    /// Finalized entries, in write order
    entries: Vec<ReferenceEntry>,
    seen: HashSet<String>,
    current: Option<CurrentReference>,
    closed: bool,
}

impl IndexWriter<BufWriter<File>> {
    /// Create a new index file at `path`, truncating any existing file
    pub fn create<P: AsRef<Path>>(path: P) -> WriteResult<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }
}

impl<W: Write> IndexWriter<W> {
    /// Wrap a writer and emit the file header
    pub fn new(mut writer: W) -> WriteResult<Self> {
        writer.write_u32::<LittleEndian>(MAGIC)?;
        Ok(Self {
            writer,
            position: HEADER_SIZE,
            entries: Vec::new(),
            seen: HashSet::new(),
            current: None,
            closed: false,
        })
    }

    /// Start a new reference section
    ///
    /// Records the current byte position as the reference's span offset and
    /// resets the record counter and collapsed-offset accumulator.
    pub fn begin_reference(&mut self, name: &str) -> WriteResult<()> {
        if self.closed {
            return Err(WriteError::InvalidState(
                "begin_reference called after close",
            ));
        }
        if name.len() > u16::MAX as usize {
            return Err(WriteError::NameTooLong {
                name: name.chars().take(64).collect(),
                len: name.len(),
            });
        }
        if !self.seen.insert(name.to_string()) {
            return Err(WriteError::DuplicateReference(name.to_string()));
        }

        self.finalize_current()?;
        self.current = Some(CurrentReference {
            name: name.to_string(),
            byte_offset: self.position,
            record_count: 0,
            last_position: None,
            collapsed_offset: 0,
        });
        Ok(())
    }

    /// Append one homopolymer run record to the current reference
    ///
    /// `position` must strictly increase within a reference; `run_length`
    /// must be at least 1 and fit the 32-bit field. Values that would
    /// overflow are rejected rather than truncated.
    pub fn append(&mut self, position: u32, run_length: u64) -> WriteResult<()> {
        if self.closed {
            return Err(WriteError::InvalidState("append called after close"));
        }
        let current = self
            .current
            .as_mut()
            .ok_or(WriteError::InvalidState("append called before any begin_reference"))?;

        if run_length == 0 || run_length > u32::MAX as u64 {
            return Err(WriteError::RunLengthOutOfRange {
                position,
                run_length,
            });
        }
        if let Some(previous) = current.last_position {
            if position <= previous {
                return Err(WriteError::OutOfOrderPosition {
                    reference: current.name.clone(),
                    previous,
                    position,
                });
            }
        }
        if current.collapsed_offset > u32::MAX as u64 {
            return Err(WriteError::CollapsedOffsetOverflow {
                reference: current.name.clone(),
                offset: current.collapsed_offset,
            });
        }

        codec::encode_record(
            &mut self.writer,
            &codec::PositionRecord {
                position,
                run_length: run_length as u32,
                collapsed_offset: current.collapsed_offset as u32,
            },
        )?;
        self.position += RECORD_SIZE as u64;
        current.last_position = Some(position);
        current.record_count += 1;
        current.collapsed_offset += run_length;
        Ok(())
    }

    /// Finalize the file: emit the footer and trailer, then flush
    ///
    /// Idempotent; calling close on an already closed writer is a no-op.
    pub fn close(&mut self) -> WriteResult<()> {
        if self.closed {
            return Ok(());
        }
        self.finalize_current()?;

        let mut footer = Vec::new();
        for entry in &self.entries {
            log::debug!(
                "footer entry: {} count: {} offset: {}",
                entry.name,
                entry.record_count,
                entry.byte_offset
            );
            codec::encode_entry(&mut footer, &entry.name, entry.record_count, entry.byte_offset);
        }

        self.writer.write_all(&footer)?;
        self.writer.write_u32::<LittleEndian>(footer.len() as u32)?;
        self.writer.flush()?;
        self.closed = true;
        Ok(())
    }

    /// Close the writer and return the underlying writer
    pub fn finish(mut self) -> WriteResult<W> {
        self.close()?;
        Ok(self.writer)
    }

    /// Names of all references begun so far, in write order
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .chain(self.current.iter().map(|c| c.name.as_str()))
    }

    /// Convert the in-progress reference into a finalized footer entry
    fn finalize_current(&mut self) -> WriteResult<()> {
        if let Some(current) = self.current.take() {
            let record_count =
                u32::try_from(current.record_count).map_err(|_| WriteError::FileTooLarge(self.position))?;
            let byte_offset =
                u32::try_from(current.byte_offset).map_err(|_| WriteError::FileTooLarge(current.byte_offset))?;
            self.entries.push(ReferenceEntry {
                name: current.name,
                record_count,
                byte_offset,
            });
        }
        Ok(())
    }
}
