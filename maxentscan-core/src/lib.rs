//! # MaxEntScan splice-site scoring
//!
//! A Rust implementation of the maximum-entropy splice-site model of Yeo and
//! Burge. Candidate 5' (donor) and 3' (acceptor) splice sites are scored as
//! log2 odds ratios of a site-specific model against a uniform-like
//! background.
//!
//! ## Overview
//!
//! - **Donor sites** are 9-base windows: 3 exonic bases followed by 6
//!   intronic bases, `GT` at the centre of a canonical site.
//! - **Acceptor sites** are 23-base windows: 20 intronic bases followed by
//!   3 exonic bases, `AG` just before the junction.
//!
//! The two consensus bases of a window are scored from fixed probability
//! tables; the remaining bases are looked up in pre-trained maximum-entropy
//! matrices (one donor table keyed by 7-mer, nine acceptor sub-matrices keyed
//! by base-4 hash codes).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maxentscan_core::MatrixStore;
//!
//! let store = MatrixStore::from_files("data/score5_matrix.txt", "data/score3_matrix.txt")?;
//!
//! let donor = store.score5("CAGGTAAGT")?;
//! let acceptor = store.score3("TTCCAAACGAACTTTTGTAGGGA")?;
//! println!("donor {donor:.2}, acceptor {acceptor:.2}");
//! # Ok::<(), maxentscan_core::types::MaxEntError>(())
//! ```
//!
//! ## Scanning a reference
//!
//! [`SpliceScanner`] slides both windows over every position of a region of
//! an indexed FASTA and reports one donor and one acceptor score per
//! position:
//!
//! ```rust,no_run
//! use maxentscan_core::SpliceScanner;
//! use maxentscan_core::config::ScanConfig;
//! use maxentscan_core::output::write_results;
//! use maxentscan_core::region::parse_region;
//! use maxentscan_core::sequence::IndexedFasta;
//!
//! let scanner = SpliceScanner::from_config(ScanConfig::default())?;
//! let mut reference = IndexedFasta::from_file("hg38.fa")?;
//! let scores = scanner.scan_region(&mut reference, &parse_region("chr17:7,676,520-7,676,620")?)?;
//! write_results(&mut std::io::stdout(), &scores)?;
//! # Ok::<(), maxentscan_core::types::MaxEntError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Scan settings
//! - [`constants`]: Window geometry and consensus probability tables
//! - [`engine`]: Region scanner
//! - [`matrix`]: Matrix loading and the immutable matrix store
//! - [`output`]: Tab-separated score output
//! - [`region`]: Region parsing
//! - [`results`]: Per-position score containers
//! - [`scoring`]: `score5` / `score3`
//! - [`sequence`]: Nucleotide hashing and reference access
//! - [`types`]: Core types and errors
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, MaxEntError>`](types::MaxEntError).
//! Wrong window lengths and non-ACGT bases are recoverable: a scan records
//! the score as missing and moves on. Missing matrix entries and unreadable
//! resources abort.

pub mod config;
pub mod constants;
pub mod engine;
pub mod matrix;
pub mod output;
pub mod region;
pub mod results;
pub mod scoring;
pub mod sequence;
pub mod types;

pub use engine::SpliceScanner;
pub use matrix::MatrixStore;
pub use types::MaxEntError;
