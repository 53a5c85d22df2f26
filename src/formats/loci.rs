//! Batch coordinate translation for position lists
//!
//! Input is tab-separated `reference<TAB>position` lines. Each line is
//! translated in the requested direction and written as
//! `reference<TAB>position<TAB>translated`; lines that cannot be translated
//! (unknown reference, bad syntax) go to the unmap sidecar. Parallel
//! processing reads the file into memory and fans chunks out with rayon.

use crate::core::{CoordinateMapper, Direction, HpsError, Result};
use memchr::memchr;
use rayon::prelude::*;
use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lines per parallel work unit
const CHUNK_SIZE: usize = 4096;

/// Statistics from one batch translation
#[derive(Debug, Default, Clone)]
pub struct ConversionStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// A parsed input line
struct Locus<'a> {
    reference: &'a str,
    position: u32,
}

/// Parse `reference<TAB>position` from a line
fn parse_locus(line: &str) -> Option<Locus<'_>> {
    let bytes = line.as_bytes();
    let tab = memchr(b'\t', bytes)?;
    let reference = &line[..tab];
    if reference.is_empty() {
        return None;
    }
    // Ignore any trailing fields after the position column
    let rest = &line[tab + 1..];
    let end = memchr(b'\t', rest.as_bytes()).unwrap_or(rest.len());
    let position: u32 = rest[..end].trim().parse().ok()?;
    Some(Locus {
        reference,
        position,
    })
}

/// Translate one line against preloaded indexes
fn translate_line(line: &str, mapper: &CoordinateMapper, direction: Direction) -> Option<String> {
    let locus = parse_locus(line)?;
    let index = mapper.get(locus.reference)?;
    let translated = match direction {
        Direction::OriginalToCollapsed => index.original_to_collapsed(locus.position),
        Direction::CollapsedToOriginal => index.collapsed_to_original(locus.position),
    };
    Some(format!("{}\t{}\t{}", locus.reference, locus.position, translated))
}

/// Translate a file of loci
///
/// References named by the input are loaded up front through the mapper's
/// cache; unknown references fail per line rather than aborting the batch.
pub fn convert_loci<P: AsRef<Path>>(
    input: P,
    output: P,
    unmap: P,
    mapper: &mut CoordinateMapper,
    direction: Direction,
    threads: usize,
) -> Result<ConversionStats> {
    // Read all lines; position lists are small next to the genomes they
    // refer to, and parallel translation needs them resident anyway.
    let input_file = std::fs::File::open(input.as_ref())?;
    let reader = BufReader::with_capacity(128 * 1024, input_file);

    let mut data_lines = Vec::new();
    for line_result in reader.lines() {
        let line = line_result?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        data_lines.push(line);
    }

    // Preload every reference the input mentions; unknown names stay
    // unloaded and their lines land in the unmap file.
    let mut wanted = HashSet::new();
    for line in &data_lines {
        if let Some(locus) = parse_locus(line) {
            wanted.insert(locus.reference.to_string());
        }
    }
    for name in &wanted {
        if mapper.has_reference(name) {
            mapper.preload([name.as_str()])?;
        }
    }

    let mut output_file =
        BufWriter::with_capacity(128 * 1024, std::fs::File::create(output.as_ref())?);
    let mut unmap_file =
        BufWriter::with_capacity(64 * 1024, std::fs::File::create(unmap.as_ref())?);

    let stats = if threads > 1 {
        convert_parallel(
            &data_lines,
            &mut output_file,
            &mut unmap_file,
            mapper,
            direction,
            threads,
        )?
    } else {
        convert_sequential(
            &data_lines,
            &mut output_file,
            &mut unmap_file,
            mapper,
            direction,
        )?
    };

    output_file.flush()?;
    unmap_file.flush()?;
    Ok(stats)
}

fn convert_sequential<W: Write>(
    lines: &[String],
    output: &mut W,
    unmap: &mut W,
    mapper: &CoordinateMapper,
    direction: Direction,
) -> Result<ConversionStats> {
    let mut stats = ConversionStats::default();
    for line in lines {
        stats.total += 1;
        match translate_line(line, mapper, direction) {
            Some(out) => {
                writeln!(output, "{}", out)?;
                stats.success += 1;
            }
            None => {
                writeln!(unmap, "{}", line)?;
                stats.failed += 1;
            }
        }
    }
    Ok(stats)
}

fn convert_parallel<W: Write>(
    lines: &[String],
    output: &mut W,
    unmap: &mut W,
    mapper: &CoordinateMapper,
    direction: Direction,
    threads: usize,
) -> Result<ConversionStats> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| {
            HpsError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create thread pool: {}", e),
            ))
        })?;

    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    // Chunks keep their input order in the collected results
    let results: Vec<(Vec<String>, Vec<String>)> = pool.install(|| {
        lines
            .par_chunks(CHUNK_SIZE)
            .map(|chunk| {
                let mut mapped = Vec::with_capacity(chunk.len());
                let mut unmapped = Vec::new();
                for line in chunk {
                    match translate_line(line, mapper, direction) {
                        Some(out) => mapped.push(out),
                        None => unmapped.push(line.clone()),
                    }
                }
                success.fetch_add(mapped.len(), Ordering::Relaxed);
                failed.fetch_add(unmapped.len(), Ordering::Relaxed);
                (mapped, unmapped)
            })
            .collect()
    });

    for (mapped, unmapped) in results {
        for line in mapped {
            writeln!(output, "{}", line)?;
        }
        for line in unmapped {
            writeln!(unmap, "{}", line)?;
        }
    }

    Ok(ConversionStats {
        total: lines.len(),
        success: success.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    })
}
