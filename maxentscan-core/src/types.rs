use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Canonical DNA nucleotides accepted by the scoring engine.
///
/// The discriminant doubles as the base-4 digit used when hashing
/// sub-windows and as the index into the per-base constant tables.
///
/// # Examples
///
/// ```rust
/// use maxentscan_core::types::Nucleotide;
///
/// assert_eq!(Nucleotide::from_byte(b'g'), Some(Nucleotide::G));
/// assert_eq!(Nucleotide::G.to_index(), 2);
/// assert_eq!(Nucleotide::from_byte(b'N'), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    /// Adenine
    A = 0,
    /// Cytosine
    C = 1,
    /// Guanine
    G = 2,
    /// Thymine
    T = 3,
}

impl Nucleotide {
    /// All nucleotides in digit order.
    pub const ALL: [Self; 4] = [Self::A, Self::C, Self::G, Self::T];

    /// Parse an ASCII base, case-insensitively. Anything outside ACGT is `None`.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    /// Base-4 digit / table index for this nucleotide.
    #[must_use]
    pub const fn to_index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Nucleotide::to_index`]; only the low two bits are used.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index & 0b11]
    }

    /// Uppercase ASCII letter.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.to_byte()))
    }
}

/// Which splice-site model a window is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    /// 5' splice site, scored by `score5`
    Donor,
    /// 3' splice site, scored by `score3`
    Acceptor,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Donor => write!(f, "donor"),
            Self::Acceptor => write!(f, "acceptor"),
        }
    }
}

/// Errors raised while loading matrices, scoring windows, or scanning regions.
///
/// Window-level errors ([`MaxEntError::InvalidLength`] and
/// [`MaxEntError::InvalidAlphabet`]) are recoverable: they concern a single
/// scoring call and a scan reports them as missing values. Every other
/// variant means the model data or the run setup cannot be trusted.
#[derive(Debug, Error)]
pub enum MaxEntError {
    /// A matrix resource could not be opened or read
    #[error("cannot read matrix resource {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A matrix resource line is malformed
    #[error("malformed line {line} in {resource}: {reason}")]
    Format {
        resource: String,
        line: usize,
        reason: String,
    },
    /// Window handed to `score5`/`score3` has the wrong length
    #[error("need {expected} nucleotides, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Window contains a byte outside ACGT
    #[error("invalid nucleotide {found:?} at position {position}")]
    InvalidAlphabet { found: char, position: usize },
    /// Key absent from a scoring matrix
    #[error("{matrix} matrix has no entry for key {key}")]
    LookupMiss { matrix: String, key: String },
    /// Divisor entry is zero, so the ratio is undefined
    #[error("{matrix} matrix entry for key {key} is zero")]
    ZeroEntry { matrix: String, key: String },
    /// Product of key and rest scores is not positive; log2 undefined
    #[error("non-positive {kind} odds ratio {value}")]
    NonPositiveScore { kind: SiteKind, value: f64 },
    /// Reference FASTA or its index could not be used
    #[error("reference error: {0}")]
    Reference(String),
    /// Scan settings cannot be applied
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Region specification could not be parsed
    #[error("invalid region: {0}")]
    InvalidRegion(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MaxEntError {
    /// Whether the error is scoped to a single window and a scan may continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. } | Self::InvalidAlphabet { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MaxEntError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nucleotide_from_byte() {
        assert_eq!(Nucleotide::from_byte(b'A'), Some(Nucleotide::A));
        assert_eq!(Nucleotide::from_byte(b'c'), Some(Nucleotide::C));
        assert_eq!(Nucleotide::from_byte(b'G'), Some(Nucleotide::G));
        assert_eq!(Nucleotide::from_byte(b't'), Some(Nucleotide::T));
        assert_eq!(Nucleotide::from_byte(b'N'), None);
        assert_eq!(Nucleotide::from_byte(b'U'), None);
        assert_eq!(Nucleotide::from_byte(b'-'), None);
    }

    #[test]
    fn test_nucleotide_index_round_trip() {
        for base in Nucleotide::ALL {
            assert_eq!(Nucleotide::from_index(base.to_index()), base);
            assert_eq!(Nucleotide::from_byte(base.to_byte()), Some(base));
        }
    }

    #[test]
    fn test_nucleotide_display() {
        assert_eq!(Nucleotide::T.to_string(), "T");
        assert_eq!(SiteKind::Acceptor.to_string(), "acceptor");
    }

    #[test]
    fn test_error_recoverability() {
        assert!(
            MaxEntError::InvalidLength {
                expected: 9,
                actual: 8
            }
            .is_recoverable()
        );
        assert!(
            MaxEntError::InvalidAlphabet {
                found: 'N',
                position: 0
            }
            .is_recoverable()
        );
        assert!(
            !MaxEntError::LookupMiss {
                matrix: "donor".into(),
                key: "AAAAAAA".into()
            }
            .is_recoverable()
        );
        assert!(!MaxEntError::Reference("missing index".into()).is_recoverable());
    }

    #[test]
    fn test_invalid_length_message() {
        let err = MaxEntError::InvalidLength {
            expected: 9,
            actual: 4,
        };
        assert_eq!(err.to_string(), "need 9 nucleotides, got 4");
    }
}
