//! Genomic regions to scan.
//!
//! A region argument is either the path of a region list (BED-like, three
//! whitespace-separated columns `chrom start end`, `#` comments allowed) or
//! an inline `chrom:start-end` / `chrom:pos` token. Coordinates are 0-based
//! and half-open; a single position expands to `[pos, pos + 1)`. Commas in
//! inline coordinates are ignored, so `chr1:1,000-2,000` is accepted.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::types::{MaxEntError, Result};

/// Half-open interval `[start, end)` on one contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    /// Create a region, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::InvalidRegion`] if the interval is reversed.
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        let chrom = chrom.into();
        if start > end {
            return Err(MaxEntError::InvalidRegion(format!(
                "{chrom}:{start}-{end} starts after it ends"
            )));
        }
        Ok(Self { chrom, start, end })
    }

    /// Number of positions in the region.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

fn parse_coordinate(token: &str, context: &str) -> Result<u64> {
    token
        .trim()
        .parse()
        .map_err(|_| MaxEntError::InvalidRegion(format!("bad coordinate {token:?} in {context:?}")))
}

/// Parse an inline `chrom:start-end` or `chrom:pos` region.
///
/// # Errors
///
/// Returns [`MaxEntError::InvalidRegion`] if the text has no `:` or the
/// coordinates are not non-negative integers.
///
/// # Examples
///
/// ```rust
/// use maxentscan_core::region::parse_region;
///
/// let region = parse_region("chr7:1,000-1,010").unwrap();
/// assert_eq!((region.start, region.end), (1000, 1010));
///
/// let single = parse_region("chrX:42").unwrap();
/// assert_eq!((single.start, single.end), (42, 43));
/// ```
pub fn parse_region(text: &str) -> Result<Region> {
    let cleaned = text.trim().replace(',', "");
    let (chrom, coordinates) = cleaned.rsplit_once(':').ok_or_else(|| {
        MaxEntError::InvalidRegion(format!("{text:?} is neither a file nor chrom:start-end"))
    })?;
    if chrom.is_empty() {
        return Err(MaxEntError::InvalidRegion(format!("{text:?} has no contig name")));
    }

    match coordinates.split_once('-') {
        Some((start, end)) => Region::new(
            chrom,
            parse_coordinate(start, text)?,
            parse_coordinate(end, text)?,
        ),
        None => {
            let position = parse_coordinate(coordinates, text)?;
            let end = position.checked_add(1).ok_or_else(|| {
                MaxEntError::InvalidRegion(format!("position in {text:?} is out of range"))
            })?;
            Region::new(chrom, position, end)
        }
    }
}

/// Read a region list: `chrom start end [ignored columns...]` per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`MaxEntError::InvalidRegion`] for lines with fewer than three
/// columns or non-integer coordinates, and [`MaxEntError::IoError`] if
/// reading fails.
pub fn read_region_file<R: BufRead>(reader: R) -> Result<Vec<Region>> {
    let mut regions = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let context = format!("line {}", i + 1);
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [chrom, start, end, ..] = fields.as_slice() else {
            return Err(MaxEntError::InvalidRegion(format!(
                "{context}: expected chrom, start and end columns"
            )));
        };
        regions.push(Region::new(
            *chrom,
            parse_coordinate(start, &context)?,
            parse_coordinate(end, &context)?,
        )?);
    }
    Ok(regions)
}

/// Resolve a region argument: a readable path is read as a region list,
/// anything else is parsed as an inline region.
///
/// # Errors
///
/// Propagates [`read_region_file`] and [`parse_region`] failures.
pub fn load_regions(argument: &str) -> Result<Vec<Region>> {
    let path = Path::new(argument);
    if path.is_file() {
        let regions = read_region_file(BufReader::new(File::open(path)?))?;
        debug!("Read {} regions from {}", regions.len(), path.display());
        Ok(regions)
    } else {
        Ok(vec![parse_region(argument)?])
    }
}
