//! HpsIndex - binary index for homopolymer-stripped genomes
//!
//! Records, per reference sequence, the positions and lengths of
//! homopolymer runs collapsed out of a genome, and translates coordinates
//! between the original and the collapsed coordinate spaces.
//!
//! # Features
//!
//! - Append-during-write binary format, finalized by a footer at close
//! - Random-access reads: the reference table loads without a body scan
//! - O(log n) coordinate translation in both directions
//! - FASTA stripping pipeline with gzip/bzip2 input support
//!
//! # Example
//!
//! ```ignore
//! use hps_index::{IndexWriter, IndexReader};
//!
//! // Record runs while collapsing a genome
//! let mut writer = IndexWriter::create("genome.hps")?;
//! writer.begin_reference("chr1")?;
//! writer.append(10, 3)?;
//! writer.append(35, 5)?;
//! writer.close()?;
//!
//! // Translate coordinates later
//! let mut reader = IndexReader::open("genome.hps")?;
//! let index = reader.load_coordinate_index("chr1")?;
//! let collapsed = index.original_to_collapsed(36);
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    CoordinateIndex, CoordinateMapper, Direction, FastaError, FormatError, HpsError,
    IndexReader, IndexWriter, PositionRecord, QueryError, ReferenceEntry, Result, WriteError,
};
pub use formats::{fasta, loci, strip};
