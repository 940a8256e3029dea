//! Tab-separated output for scan results.
//!
//! Each scored position becomes one line:
//!
//! ```text
//! chrom<TAB>position<TAB>donor<TAB>acceptor
//! ```
//!
//! Scores use Rust's shortest round-trip float formatting; windows that
//! could not be scored are written as `NA`.
//!
//! ## Examples
//!
//! ```rust
//! use maxentscan_core::output::write_results;
//! use maxentscan_core::region::Region;
//! use maxentscan_core::results::{PositionScores, RegionScores};
//!
//! let scores = RegionScores {
//!     region: Region::new("chr1", 7, 8)?,
//!     positions: vec![PositionScores { position: 7, donor: Some(8.5), acceptor: None }],
//! };
//!
//! let mut buffer = Vec::new();
//! write_results(&mut buffer, &scores)?;
//! assert_eq!(String::from_utf8(buffer).unwrap(), "chr1\t7\t8.5\tNA\n");
//! # Ok::<(), maxentscan_core::types::MaxEntError>(())
//! ```

use std::fmt;
use std::io::Write;

use crate::constants::MISSING_SCORE;
use crate::results::RegionScores;
use crate::types::Result;

/// Column names, written after a leading `#`.
pub const HEADER_COLUMNS: [&str; 4] = ["chrom", "position", "donor", "acceptor"];

struct Score(Option<f64>);

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str(MISSING_SCORE),
        }
    }
}

/// Write the `#chrom position donor acceptor` header line.
///
/// # Errors
///
/// Returns [`crate::types::MaxEntError::IoError`] if writing fails.
pub fn write_header<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "#{}", HEADER_COLUMNS.join("\t"))?;
    Ok(())
}

/// Write one line per position of `scores`, in coordinate order.
///
/// # Errors
///
/// Returns [`crate::types::MaxEntError::IoError`] if writing fails.
pub fn write_results<W: Write>(writer: &mut W, scores: &RegionScores) -> Result<()> {
    for position in &scores.positions {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            scores.region.chrom,
            position.position,
            Score(position.donor),
            Score(position.acceptor)
        )?;
    }
    Ok(())
}
