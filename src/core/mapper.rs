//! Coordinate translation over a whole index
//!
//! Couples an [`IndexReader`] with an explicit cache of loaded per-reference
//! coordinate indexes, so repeated queries against the same reference do not
//! re-read its record span. The cache is owned state passed around with the
//! mapper, never process-global.

use crate::core::error::{HpsError, QueryError, Result};
use crate::core::index::CoordinateIndex;
use crate::core::reader::IndexReader;
use std::collections::HashMap;
use std::path::Path;

/// Direction of a coordinate translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Original genome coordinate to collapsed genome coordinate
    #[default]
    OriginalToCollapsed,
    /// Collapsed genome coordinate back to the original genome
    CollapsedToOriginal,
}

impl Direction {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "collapse" | "forward" | "original-to-collapsed" => Some(Direction::OriginalToCollapsed),
            "expand" | "reverse" | "collapsed-to-original" => Some(Direction::CollapsedToOriginal),
            _ => None,
        }
    }
}

/// Coordinate mapper with a per-reference index cache
///
/// # Example
/// ```ignore
/// let mut mapper = CoordinateMapper::open("genome.hps")?;
/// let collapsed = mapper.original_to_collapsed("chr1", 1500)?;
/// let original = mapper.collapsed_to_original("chr1", collapsed)?;
/// ```
pub struct CoordinateMapper {
    reader: IndexReader,
    cache: HashMap<String, CoordinateIndex>,
}

impl CoordinateMapper {
    /// Open an index file and wrap it in a mapper with an empty cache
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(IndexReader::open(path)?))
    }

    /// Wrap an already opened reader
    pub fn new(reader: IndexReader) -> Self {
        Self {
            reader,
            cache: HashMap::new(),
        }
    }

    /// Reference names in the order they were written
    pub fn references(&self) -> &[String] {
        self.reader.references()
    }

    /// Check whether a reference is present
    pub fn has_reference(&self, name: &str) -> bool {
        self.reader.has_reference(name)
    }

    /// Load the given references into the cache
    ///
    /// After preloading, translations for those references can run through
    /// [`get`] on a shared `&self`, which is what the parallel batch driver
    /// relies on.
    ///
    /// [`get`]: CoordinateMapper::get
    pub fn preload<'a, I: IntoIterator<Item = &'a str>>(&mut self, names: I) -> Result<()> {
        for name in names {
            self.ensure_loaded(name)?;
        }
        Ok(())
    }

    /// A previously loaded coordinate index, if present in the cache
    pub fn get(&self, name: &str) -> Option<&CoordinateIndex> {
        self.cache.get(name)
    }

    /// The coordinate index for a reference, loading it on first use
    pub fn index_for(&mut self, name: &str) -> Result<&CoordinateIndex> {
        self.ensure_loaded(name)?;
        Ok(&self.cache[name])
    }

    /// Translate an original-genome coordinate to the collapsed genome
    pub fn original_to_collapsed(&mut self, reference: &str, pos: u32) -> Result<u32> {
        Ok(self.index_for(reference)?.original_to_collapsed(pos))
    }

    /// Translate a collapsed-genome coordinate back to the original genome
    pub fn collapsed_to_original(&mut self, reference: &str, pos: u32) -> Result<u32> {
        Ok(self.index_for(reference)?.collapsed_to_original(pos))
    }

    /// Translate in the given direction
    pub fn translate(&mut self, reference: &str, pos: u32, direction: Direction) -> Result<u32> {
        let index = self.index_for(reference)?;
        Ok(match direction {
            Direction::OriginalToCollapsed => index.original_to_collapsed(pos),
            Direction::CollapsedToOriginal => index.collapsed_to_original(pos),
        })
    }

    fn ensure_loaded(&mut self, name: &str) -> Result<()> {
        if !self.cache.contains_key(name) {
            if !self.reader.has_reference(name) {
                return Err(HpsError::Query(QueryError::UnknownReference(
                    name.to_string(),
                )));
            }
            let index = self.reader.load_coordinate_index(name)?;
            self.cache.insert(name.to_string(), index);
        }
        Ok(())
    }
}
