//! Nucleotide validation and base-4 sequence hashing.
//!
//! Acceptor sub-matrices are keyed by an integer code rather than by the
//! literal sub-window. The code reads the window as a base-4 number, most
//! significant digit first:
//!
//! - A: 0
//! - C: 1
//! - G: 2
//! - T: 3
//!
//! so `"ACG"` hashes to `0·16 + 1·4 + 2 = 6`.
//!
//! ## Modules
//!
//! - [`io`]: reference sequence access (indexed FASTA, in-memory)
//!
//! ## Examples
//!
//! ```rust
//! use maxentscan_core::sequence::{hash_sequence, unhash};
//!
//! let code = hash_sequence(b"acgT").unwrap();
//! assert_eq!(code, 27);
//! assert_eq!(unhash(code, 4), "ACGT");
//! ```

use crate::types::{MaxEntError, Nucleotide, Result};

pub mod io;

pub use io::*;

/// Longest window that fits a `u32` hash code.
pub const MAX_HASH_BASES: usize = 16;

/// Map one byte to its nucleotide, reporting the offending position on failure.
fn nucleotide_at(sequence: &[u8], position: usize) -> Result<Nucleotide> {
    let byte = sequence[position];
    Nucleotide::from_byte(byte).ok_or(MaxEntError::InvalidAlphabet {
        found: char::from(byte),
        position,
    })
}

/// Check that every byte is one of A, C, G, T (either case).
///
/// # Errors
///
/// Returns [`MaxEntError::InvalidAlphabet`] for the first offending byte.
pub fn validate_nucleotides(sequence: &[u8]) -> Result<()> {
    for position in 0..sequence.len() {
        nucleotide_at(sequence, position)?;
    }
    Ok(())
}

/// Hash a nucleotide string to its base-4 integer code.
///
/// # Errors
///
/// Returns [`MaxEntError::InvalidAlphabet`] for any byte outside ACGT and
/// [`MaxEntError::InvalidLength`] for windows longer than [`MAX_HASH_BASES`].
///
/// # Examples
///
/// ```rust
/// use maxentscan_core::sequence::hash_sequence;
///
/// assert_eq!(hash_sequence(b"AAA").unwrap(), 0);
/// assert_eq!(hash_sequence(b"TTT").unwrap(), 63);
/// assert!(hash_sequence(b"ANA").is_err());
/// ```
pub fn hash_sequence(sequence: &[u8]) -> Result<u32> {
    if sequence.len() > MAX_HASH_BASES {
        return Err(MaxEntError::InvalidLength {
            expected: MAX_HASH_BASES,
            actual: sequence.len(),
        });
    }
    let mut code = 0u32;
    for position in 0..sequence.len() {
        let digit = nucleotide_at(sequence, position)?.to_index() as u32;
        code = (code << 2) | digit;
    }
    Ok(code)
}

/// Decode a base-4 code of `len` digits back to an uppercase nucleotide string.
///
/// Digits above `len` are ignored.
#[must_use]
pub fn unhash(code: u32, len: usize) -> String {
    (0..len)
        .rev()
        .map(|shift| {
            let digit = code.checked_shr(2 * shift as u32).unwrap_or(0) as usize;
            char::from(Nucleotide::from_index(digit).to_byte())
        })
        .collect()
}
