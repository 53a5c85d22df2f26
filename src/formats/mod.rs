//! File format adapters
//!
//! Adapters around the core index: FASTA input/output, the homopolymer
//! stripping pipeline, and batch translation of position lists.

pub mod fasta;
pub mod loci;
pub mod strip;

pub use fasta::{
    detect_compression, open_fasta, CompressionFormat, FastaReader, FastaRecord, FastaWriter,
    DEFAULT_WRAP,
};
pub use loci::{convert_loci, ConversionStats};
pub use strip::{strip_fasta, StripStats};
