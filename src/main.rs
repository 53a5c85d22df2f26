//! HpsIndex CLI entry point
//!
//! Strips homopolymer runs from genomes and translates coordinates
//! against the resulting index files.

use clap::{Parser, Subcommand, ValueEnum};
use hps_index::core::{CoordinateMapper, Direction, IndexReader};
use hps_index::formats;
use std::path::PathBuf;
use std::time::Instant;

/// Translation direction (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum DirectionArg {
    /// Original genome coordinate to collapsed genome coordinate
    #[default]
    #[value(name = "forward")]
    Forward,
    /// Collapsed genome coordinate back to the original genome
    #[value(name = "reverse")]
    Reverse,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Direction::OriginalToCollapsed,
            DirectionArg::Reverse => Direction::CollapsedToOriginal,
        }
    }
}

#[derive(Parser)]
#[command(name = "hpsindex")]
#[command(about = "Homopolymer-stripped genome index and coordinate translation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collapse homopolymer runs in a FASTA genome and build its index
    Strip {
        /// Input FASTA file (may be gzip or bzip2 compressed)
        input: PathBuf,
        /// Output collapsed FASTA file
        fasta_out: PathBuf,
        /// Output index file
        index_out: PathBuf,
        /// Column width for FASTA output
        #[arg(long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..))]
        wrap: u32,
    },
    /// List the references recorded in an index
    Refs {
        /// Index file
        index: PathBuf,
    },
    /// Translate a single coordinate
    Lookup {
        /// Index file
        index: PathBuf,
        /// Reference name
        reference: String,
        /// Coordinate to translate
        position: u32,
        /// Translation direction
        #[arg(long, default_value = "forward")]
        direction: DirectionArg,
    },
    /// Translate a file of tab-separated "reference<TAB>position" lines
    Translate {
        /// Index file
        index: PathBuf,
        /// Input position list
        input: PathBuf,
        /// Output file (optional, "output.tsv" if not specified)
        output: Option<PathBuf>,
        /// Translation direction
        #[arg(long, default_value = "forward")]
        direction: DirectionArg,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Strip { input, fasta_out, index_out, wrap } => {
            eprintln!("Stripping genome: {:?} -> {:?} + {:?}", input, fasta_out, index_out);
            let stats = formats::strip_fasta(&input, &fasta_out, &index_out, wrap as usize)?;

            eprintln!("\n=== Strip Statistics ===");
            eprintln!("References:      {}", stats.references);
            eprintln!("Bases in:        {}", stats.bases_in);
            eprintln!("Bases out:       {}", stats.bases_out);
            eprintln!("Runs recorded:   {}", stats.runs);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Refs { index } => {
            let reader = IndexReader::open(&index)?;
            for name in reader.references() {
                if let Some(entry) = reader.entry(name) {
                    println!("{}\t{}\t{}", name, entry.record_count, entry.byte_offset);
                }
            }
        }

        Commands::Lookup { index, reference, position, direction } => {
            let mut mapper = CoordinateMapper::open(&index)?;
            let translated = mapper.translate(&reference, position, direction.into())?;
            println!("{}\t{}\t{}", reference, position, translated);
        }

        Commands::Translate { index, input, output, direction, threads } => {
            let mut mapper = CoordinateMapper::open(&index)?;
            let output_path = output.unwrap_or_else(|| PathBuf::from("output.tsv"));
            let unmap_path = output_path.with_extension("tsv.unmap");

            eprintln!("Translating loci: {:?} -> {:?}", input, output_path);
            let stats = formats::convert_loci(
                &input,
                &output_path,
                &unmap_path,
                &mut mapper,
                direction.into(),
                threads,
            )?;

            eprintln!("\n=== Translation Statistics ===");
            eprintln!("Total records:   {}", stats.total);
            eprintln!("Successful:      {}", stats.success);
            eprintln!("Failed:          {}", stats.failed);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
