use std::path::PathBuf;

use crate::constants::{DEFAULT_ACCEPTOR_MATRIX, DEFAULT_DONOR_MATRIX};

/// Configuration settings for a splice-site scan.
///
/// # Examples
///
/// ```rust
/// use maxentscan_core::config::ScanConfig;
///
/// let config = ScanConfig {
///     num_threads: Some(4),
///     write_header: true,
///     ..Default::default()
/// };
/// assert!(!config.quiet);
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Donor matrix resource (`<7-mer> <probability>` lines).
    ///
    /// **Default**: `data/score5_matrix.txt`
    pub donor_matrix: PathBuf,

    /// Acceptor matrix resource (`<matrix> <code> <probability>` lines).
    ///
    /// **Default**: `data/score3_matrix.txt`
    pub acceptor_matrix: PathBuf,

    /// Number of threads used to score positions within a region.
    ///
    /// A dedicated Rayon pool is built with this many threads. `None` uses
    /// Rayon's global pool.
    ///
    /// **Default**: `None`
    pub num_threads: Option<usize>,

    /// Suppress progress messages on stderr.
    ///
    /// **Default**: `false`
    pub quiet: bool,

    /// Emit a `#chrom position donor acceptor` header before the scores.
    ///
    /// **Default**: `false`
    pub write_header: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            donor_matrix: PathBuf::from(DEFAULT_DONOR_MATRIX),
            acceptor_matrix: PathBuf::from(DEFAULT_ACCEPTOR_MATRIX),
            num_threads: None,
            quiet: false,
            write_header: false,
        }
    }
}
