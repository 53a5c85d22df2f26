//! Index reader
//!
//! Opens a finalized index file, validates the header magic, and rebuilds
//! the reference table from the footer at the file's tail. The body is
//! never scanned: per-reference record spans are fetched on demand by
//! [`IndexReader::load_coordinate_index`].

use crate::core::codec::{Decoder, ReferenceEntry, HEADER_SIZE, MAGIC, TRAILER_SIZE};
use crate::core::error::{FormatError, HpsError, QueryError, Result};
use crate::core::index::CoordinateIndex;
use crate::core::io::{IoStrategy, SpanReader};
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::path::Path;

/// Reader for homopolymer-stripped index files
///
/// Construction performs all validation: a successfully built reader holds
/// a consistent reference table. Each reader owns an independent file handle
/// and in-memory table; open several readers for concurrent access.
#[derive(Debug)]
pub struct IndexReader {
    source: SpanReader,
    /// Reference names in the order they were written
    references: Vec<String>,
    table: HashMap<String, ReferenceEntry>,
}

impl IndexReader {
    /// Open an index file, validating header and footer
    ///
    /// Large files are memory mapped; small files use a plain handle.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FormatError::FileNotFound(path.to_path_buf()).into());
        }
        let source = SpanReader::open(path, IoStrategy::Auto).map_err(FormatError::Io)?;
        Self::from_source(source)
    }

    /// Build a reader over an in-memory encoded index
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_source(SpanReader::from_vec(bytes))
    }

    fn from_source(mut source: SpanReader) -> Result<Self> {
        let file_len = source.len().map_err(FormatError::Io)?;

        if file_len < HEADER_SIZE {
            return Err(FormatError::CorruptHeader {
                expected: MAGIC,
                found: 0,
            }
            .into());
        }
        let head = source
            .read_span(0, HEADER_SIZE as usize)
            .map_err(FormatError::Io)?;
        let magic = LittleEndian::read_u32(&head);
        if magic != MAGIC {
            return Err(FormatError::CorruptHeader {
                expected: MAGIC,
                found: magic,
            }
            .into());
        }

        if file_len < HEADER_SIZE + TRAILER_SIZE {
            return Err(FormatError::CorruptFooter(format!(
                "file too short for a footer: {} bytes",
                file_len
            ))
            .into());
        }
        let tail = source
            .read_span(file_len - TRAILER_SIZE, TRAILER_SIZE as usize)
            .map_err(FormatError::Io)?;
        let footer_len = LittleEndian::read_u32(&tail) as u64;

        if footer_len > file_len - HEADER_SIZE - TRAILER_SIZE {
            return Err(FormatError::CorruptFooter(format!(
                "footer length {} exceeds file body ({} bytes)",
                footer_len,
                file_len - HEADER_SIZE - TRAILER_SIZE
            ))
            .into());
        }
        let footer_start = file_len - TRAILER_SIZE - footer_len;
        let footer = source
            .read_span(footer_start, footer_len as usize)
            .map_err(FormatError::Io)?;

        let (references, table) = parse_footer(&footer, footer_start)?;
        Ok(Self {
            source,
            references,
            table,
        })
    }

    /// Reference names in the order they were written
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Number of references in the index
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// True if the index holds no references
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Footer entry for a reference, if present
    pub fn entry(&self, name: &str) -> Option<&ReferenceEntry> {
        self.table.get(name)
    }

    /// Check whether a reference is present
    pub fn has_reference(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Load the coordinate index for one reference
    ///
    /// Reads exactly the reference's record span and decodes it into an
    /// ordered, binary-searchable structure. Fails with `UnknownReference`
    /// for names not in the footer.
    pub fn load_coordinate_index(&mut self, name: &str) -> Result<CoordinateIndex> {
        let entry = self
            .table
            .get(name)
            .ok_or_else(|| HpsError::Query(QueryError::UnknownReference(name.to_string())))?
            .clone();

        let span_len = entry.span_len() as usize;
        let span = self
            .source
            .read_span(entry.byte_offset as u64, span_len)
            .map_err(FormatError::Io)?;

        let mut records = Vec::with_capacity(entry.record_count as usize);
        let mut decoder = Decoder::new(&span);
        for _ in 0..entry.record_count {
            records.push(decoder.record().map_err(HpsError::Format)?);
        }

        let index = CoordinateIndex::from_records(entry.name.clone(), records)?;
        log::debug!(
            "loaded coordinate index for {}: {} records",
            name,
            index.len()
        );
        Ok(index)
    }
}

/// Parse footer entries until the buffer is consumed exactly
fn parse_footer(
    footer: &[u8],
    footer_start: u64,
) -> Result<(Vec<String>, HashMap<String, ReferenceEntry>)> {
    let mut references = Vec::new();
    let mut table = HashMap::new();
    let mut decoder = Decoder::new(footer);

    while !decoder.is_empty() {
        // Any overrun here means the claimed footer length and its contents
        // disagree, which is footer corruption rather than a bad primitive.
        let name_bytes = decoder
            .name_bytes()
            .map_err(|e| FormatError::CorruptFooter(e.to_string()))?;
        let name = String::from_utf8(name_bytes.to_vec()).map_err(|_| {
            FormatError::CorruptFooter("reference name is not valid UTF-8".to_string())
        })?;
        let record_count = decoder
            .u32("record count")
            .map_err(|e| FormatError::CorruptFooter(e.to_string()))?;
        let byte_offset = decoder
            .u32("byte offset")
            .map_err(|e| FormatError::CorruptFooter(e.to_string()))?;

        let entry = ReferenceEntry {
            name: name.clone(),
            record_count,
            byte_offset,
        };
        if (byte_offset as u64) < HEADER_SIZE
            || byte_offset as u64 + entry.span_len() > footer_start
        {
            return Err(FormatError::CorruptFooter(format!(
                "record span of {} ({} records at offset {}) crosses the footer",
                name, record_count, byte_offset
            ))
            .into());
        }
        log::debug!(
            "ref: {} count: {} offset: {}",
            name,
            record_count,
            byte_offset
        );

        if table.insert(name.clone(), entry).is_some() {
            return Err(
                FormatError::CorruptFooter(format!("duplicate reference name: {}", name)).into(),
            );
        }
        references.push(name);
    }

    Ok((references, table))
}
