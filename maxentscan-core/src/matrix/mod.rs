//! Maximum-entropy probability matrices.
//!
//! Two whitespace-delimited text resources feed the [`MatrixStore`]:
//!
//! - **Donor** (`score5_matrix.txt`): `<7-mer> <probability>` per line
//! - **Acceptor** (`score3_matrix.txt`): `<matrix index> <hash code> <probability>`
//!   per line, where the hash code is the base-4 encoding from
//!   [`crate::sequence::hash_sequence`]
//!
//! Blank lines are ignored. When a key appears twice the later line wins.
//! The store is built once and never mutated afterwards, so it can be shared
//! across scoring threads by reference.
//!
//! ## Examples
//!
//! ```rust
//! use maxentscan_core::matrix::MatrixStore;
//!
//! let donor = "AAGCAGG 0.003\n";
//! let acceptor = "0 0 0.5\n5 0 0.25\n";
//! let store = MatrixStore::from_readers(donor.as_bytes(), acceptor.as_bytes()).unwrap();
//!
//! assert_eq!(store.donor().get("aagcagg"), Some(0.003));
//! assert_eq!(store.acceptor().get(5, 0), Some(0.25));
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::info;
use rustc_hash::FxHashMap;

use crate::constants::{ACCEPTOR_SEGMENTS, DONOR_REST_BASES};
use crate::sequence::unhash;
use crate::types::{MaxEntError, Result};

/// Upper bound on acceptor sub-matrix indices accepted from a resource.
pub const MAX_ACCEPTOR_MATRICES: usize = 256;

/// Donor rest-window probabilities keyed by uppercase 7-mer.
#[derive(Debug, Clone, Default)]
pub struct DonorMatrix {
    entries: FxHashMap<String, f64>,
}

impl DonorMatrix {
    /// Probability for a 7-mer, looked up case-insensitively.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        if key.bytes().any(|b| b.is_ascii_lowercase()) {
            self.entries.get(&key.to_ascii_uppercase()).copied()
        } else {
            self.entries.get(key).copied()
        }
    }

    /// Probability for a 7-mer given as raw bytes; non-UTF-8 keys are absent.
    #[must_use]
    pub fn get_bytes(&self, key: &[u8]) -> Option<f64> {
        std::str::from_utf8(key).ok().and_then(|key| self.get(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Family of acceptor sub-matrices, each keyed by base-4 hash code.
#[derive(Debug, Clone, Default)]
pub struct AcceptorMatrix {
    matrices: Vec<FxHashMap<u32, f64>>,
}

impl AcceptorMatrix {
    /// Probability stored in sub-matrix `matrix` under `code`.
    #[must_use]
    pub fn get(&self, matrix: usize, code: u32) -> Option<f64> {
        self.matrices.get(matrix)?.get(&code).copied()
    }

    /// Number of sub-matrix slots (highest index seen plus one).
    #[must_use]
    pub fn matrix_count(&self) -> usize {
        self.matrices.len()
    }

    /// Total number of entries across all sub-matrices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.iter().map(FxHashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a resource line into exactly `N` whitespace-separated tokens.
///
/// Returns `Ok(None)` for blank lines.
fn split_tokens<'a, const N: usize>(
    line: &'a str,
    resource: &str,
    line_number: usize,
) -> Result<Option<[&'a str; N]>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    <[&str; N]>::try_from(tokens.as_slice())
        .map(Some)
        .map_err(|_| MaxEntError::Format {
            resource: resource.to_string(),
            line: line_number,
            reason: format!("expected {N} fields, found {}", tokens.len()),
        })
}

fn parse_field<T: std::str::FromStr>(
    token: &str,
    what: &str,
    resource: &str,
    line_number: usize,
) -> Result<T> {
    token.parse().map_err(|_| MaxEntError::Format {
        resource: resource.to_string(),
        line: line_number,
        reason: format!("{what} {token:?} is not a valid number"),
    })
}

/// Iterate the lines of a resource, mapping read failures to [`MaxEntError::Resource`].
fn resource_lines<R: BufRead>(
    reader: R,
    resource: &str,
) -> impl Iterator<Item = Result<(usize, String)>> {
    let path = PathBuf::from(resource);
    reader.lines().enumerate().map(move |(i, line)| {
        line.map(|line| (i + 1, line))
            .map_err(|source| MaxEntError::Resource {
                path: path.clone(),
                source,
            })
    })
}

/// Parse a donor resource of `<7-mer> <probability>` lines.
///
/// # Errors
///
/// Returns [`MaxEntError::Format`] for a line without exactly two fields or
/// with a non-numeric probability, and [`MaxEntError::Resource`] if reading
/// fails part-way.
pub fn load_donor<R: BufRead>(reader: R, resource: &str) -> Result<DonorMatrix> {
    let mut entries = FxHashMap::default();
    for line in resource_lines(reader, resource) {
        let (line_number, line) = line?;
        let Some([key, value]) = split_tokens::<2>(&line, resource, line_number)? else {
            continue;
        };
        let value: f64 = parse_field(value, "probability", resource, line_number)?;
        entries.insert(key.to_ascii_uppercase(), value);
    }
    Ok(DonorMatrix { entries })
}

/// Parse an acceptor resource of `<matrix> <code> <probability>` lines.
///
/// # Errors
///
/// Returns [`MaxEntError::Format`] for a line without exactly three fields,
/// non-numeric fields, or a matrix index of [`MAX_ACCEPTOR_MATRICES`] or more;
/// [`MaxEntError::Resource`] if reading fails part-way.
pub fn load_acceptor<R: BufRead>(reader: R, resource: &str) -> Result<AcceptorMatrix> {
    let mut matrices: Vec<FxHashMap<u32, f64>> = Vec::new();
    for line in resource_lines(reader, resource) {
        let (line_number, line) = line?;
        let Some([index, code, value]) = split_tokens::<3>(&line, resource, line_number)? else {
            continue;
        };
        let index: usize = parse_field(index, "matrix index", resource, line_number)?;
        let code: u32 = parse_field(code, "hash code", resource, line_number)?;
        let value: f64 = parse_field(value, "probability", resource, line_number)?;

        if index >= MAX_ACCEPTOR_MATRICES {
            return Err(MaxEntError::Format {
                resource: resource.to_string(),
                line: line_number,
                reason: format!("matrix index {index} exceeds {MAX_ACCEPTOR_MATRICES}"),
            });
        }
        if matrices.len() <= index {
            matrices.resize_with(index + 1, FxHashMap::default);
        }
        matrices[index].insert(code, value);
    }
    Ok(AcceptorMatrix { matrices })
}

fn open_resource(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| MaxEntError::Resource {
            path: path.to_path_buf(),
            source,
        })
}

/// Immutable donor and acceptor tables used by the scoring engine.
#[derive(Debug, Clone)]
pub struct MatrixStore {
    donor: DonorMatrix,
    acceptor: AcceptorMatrix,
}

impl MatrixStore {
    /// Build a store from two already-parsed matrices.
    #[must_use]
    pub const fn new(donor: DonorMatrix, acceptor: AcceptorMatrix) -> Self {
        Self { donor, acceptor }
    }

    /// Parse both resources from in-memory or streamed readers.
    ///
    /// # Errors
    ///
    /// Propagates [`load_donor`] and [`load_acceptor`] failures.
    pub fn from_readers<D: BufRead, A: BufRead>(donor: D, acceptor: A) -> Result<Self> {
        Ok(Self::new(
            load_donor(donor, "donor matrix")?,
            load_acceptor(acceptor, "acceptor matrix")?,
        ))
    }

    /// Load both resources from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::Resource`] if either file cannot be opened,
    /// otherwise propagates parse failures.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(donor: P, acceptor: Q) -> Result<Self> {
        let donor_path = donor.as_ref();
        let acceptor_path = acceptor.as_ref();

        let donor = load_donor(
            open_resource(donor_path)?,
            &donor_path.display().to_string(),
        )?;
        let acceptor = load_acceptor(
            open_resource(acceptor_path)?,
            &acceptor_path.display().to_string(),
        )?;
        info!(
            "Loaded {} donor entries and {} acceptor entries in {} sub-matrices",
            donor.len(),
            acceptor.len(),
            acceptor.matrix_count()
        );
        Ok(Self::new(donor, acceptor))
    }

    #[must_use]
    pub const fn donor(&self) -> &DonorMatrix {
        &self.donor
    }

    #[must_use]
    pub const fn acceptor(&self) -> &AcceptorMatrix {
        &self.acceptor
    }

    /// Verify that every key a valid window can produce is present.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::LookupMiss`] naming the first absent key.
    pub fn check_coverage(&self) -> Result<()> {
        let donor_keys = 1u32 << (2 * DONOR_REST_BASES);
        for code in 0..donor_keys {
            let key = unhash(code, DONOR_REST_BASES);
            if self.donor.get(&key).is_none() {
                return Err(MaxEntError::LookupMiss {
                    matrix: "donor".to_string(),
                    key,
                });
            }
        }

        for segment in &ACCEPTOR_SEGMENTS {
            let codes = 1u32 << (2 * segment.len());
            for code in 0..codes {
                if self.acceptor.get(segment.matrix, code).is_none() {
                    return Err(MaxEntError::LookupMiss {
                        matrix: format!("acceptor[{}]", segment.matrix),
                        key: format!("{code} ({})", unhash(code, segment.len())),
                    });
                }
            }
        }
        Ok(())
    }
}
