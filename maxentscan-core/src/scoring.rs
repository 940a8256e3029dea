//! Donor (`score5`) and acceptor (`score3`) maximum-entropy scores.
//!
//! Each window is split into two key bases at the splice junction, scored
//! with fixed conditional probabilities against the background, and a rest
//! window scored through the [`MatrixStore`]. The result is
//! `log2(key_score * rest_score)`.
//!
//! ```text
//! donor     (exon) XXX|XXXXXX (intron)      9 bases
//!                     **
//! acceptor  (intron) XXXXXXXXXXXXXXXXXXXX|XXX (exon)    23 bases
//!                                      **
//! ```

use crate::constants::{
    ACCEPTOR_BASES, ACCEPTOR_CONS1, ACCEPTOR_CONS2, ACCEPTOR_KEY_START, ACCEPTOR_MATRIX_COUNT,
    ACCEPTOR_REST_BASES, ACCEPTOR_SEGMENTS, AcceptorSegment, BACKGROUND, DONOR_BASES, DONOR_CONS1,
    DONOR_CONS2, DONOR_KEY_START, DONOR_REST_BASES, KEY_BASES, SegmentRole,
};
use crate::matrix::MatrixStore;
use crate::sequence::{hash_sequence, unhash, validate_nucleotides};
use crate::types::{MaxEntError, Nucleotide, Result, SiteKind};

/// Odds ratio of the two key bases against the background model.
///
/// `cons1[first] * cons2[second] / (bg[first] * bg[second])`
#[must_use]
pub fn key_score(kind: SiteKind, first: Nucleotide, second: Nucleotide) -> f64 {
    let (cons1, cons2) = match kind {
        SiteKind::Donor => (&DONOR_CONS1, &DONOR_CONS2),
        SiteKind::Acceptor => (&ACCEPTOR_CONS1, &ACCEPTOR_CONS2),
    };
    let (i, j) = (first.to_index(), second.to_index());
    cons1[i] * cons2[j] / (BACKGROUND[i] * BACKGROUND[j])
}

/// `log2` computed as `ln(x) / ln(2)`, which reproduces the reference
/// scores to the last bit.
fn log2_odds(kind: SiteKind, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value.ln() / 2f64.ln())
    } else {
        Err(MaxEntError::NonPositiveScore { kind, value })
    }
}

fn check_window(window: &[u8], expected: usize) -> Result<()> {
    if window.len() != expected {
        return Err(MaxEntError::InvalidLength {
            expected,
            actual: window.len(),
        });
    }
    validate_nucleotides(window)
}

fn key_bases(window: &[u8], start: usize) -> (Nucleotide, Nucleotide) {
    // Alphabet already validated; the fallback is unreachable.
    let base = |i: usize| Nucleotide::from_byte(window[start + i]).unwrap_or(Nucleotide::A);
    (base(0), base(1))
}

/// Uppercase donor rest window: `window[0..3] + window[5..9]`.
///
/// `window` must be a validated 9-base donor window.
#[must_use]
pub fn donor_rest(window: &[u8]) -> [u8; DONOR_REST_BASES] {
    let mut rest = [0u8; DONOR_REST_BASES];
    rest[..DONOR_KEY_START].copy_from_slice(&window[..DONOR_KEY_START]);
    rest[DONOR_KEY_START..].copy_from_slice(&window[DONOR_KEY_START + KEY_BASES..]);
    rest.make_ascii_uppercase();
    rest
}

/// Uppercase acceptor rest window: `window[0..18] + window[20..23]`.
///
/// `window` must be a validated 23-base acceptor window.
#[must_use]
pub fn acceptor_rest(window: &[u8]) -> [u8; ACCEPTOR_REST_BASES] {
    let mut rest = [0u8; ACCEPTOR_REST_BASES];
    rest[..ACCEPTOR_KEY_START].copy_from_slice(&window[..ACCEPTOR_KEY_START]);
    rest[ACCEPTOR_KEY_START..].copy_from_slice(&window[ACCEPTOR_KEY_START + KEY_BASES..]);
    rest.make_ascii_uppercase();
    rest
}

/// Pair each acceptor segment with its slice of the rest window.
#[must_use]
pub fn acceptor_subwindows(
    rest: &[u8; ACCEPTOR_REST_BASES],
) -> [(AcceptorSegment, &[u8]); ACCEPTOR_MATRIX_COUNT] {
    ACCEPTOR_SEGMENTS.map(|segment| (segment, &rest[segment.start..segment.end]))
}

impl MatrixStore {
    /// Score a 9-base donor window.
    ///
    /// # Errors
    ///
    /// - [`MaxEntError::InvalidLength`] unless the window has 9 bases
    /// - [`MaxEntError::InvalidAlphabet`] for any base outside ACGT
    /// - [`MaxEntError::LookupMiss`] if the rest 7-mer is absent from the matrix
    /// - [`MaxEntError::NonPositiveScore`] if the odds ratio is not positive
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maxentscan_core::matrix::MatrixStore;
    ///
    /// let store = MatrixStore::from_readers("CAGAAGT 2.0\n".as_bytes(), "".as_bytes()).unwrap();
    /// let score = store.score5("CAGgtAAGT").unwrap();
    /// assert!(score > 0.0);
    /// assert!(store.score5("CAGGT").is_err());
    /// ```
    pub fn score5(&self, window: impl AsRef<[u8]>) -> Result<f64> {
        let window = window.as_ref();
        check_window(window, DONOR_BASES)?;

        let (first, second) = key_bases(window, DONOR_KEY_START);
        let key = key_score(SiteKind::Donor, first, second);

        let rest = donor_rest(window);
        let rest_score = self
            .donor()
            .get_bytes(&rest)
            .ok_or_else(|| MaxEntError::LookupMiss {
                matrix: "donor".to_string(),
                key: String::from_utf8_lossy(&rest).into_owned(),
            })?;

        log2_odds(SiteKind::Donor, key * rest_score)
    }

    /// Score a 23-base acceptor window.
    ///
    /// # Errors
    ///
    /// - [`MaxEntError::InvalidLength`] unless the window has 23 bases
    /// - [`MaxEntError::InvalidAlphabet`] for any base outside ACGT
    /// - [`MaxEntError::LookupMiss`] if a sub-window code is absent from its sub-matrix
    /// - [`MaxEntError::ZeroEntry`] if an overlap-correction entry is zero
    /// - [`MaxEntError::NonPositiveScore`] if the odds ratio is not positive
    pub fn score3(&self, window: impl AsRef<[u8]>) -> Result<f64> {
        let window = window.as_ref();
        check_window(window, ACCEPTOR_BASES)?;

        let (first, second) = key_bases(window, ACCEPTOR_KEY_START);
        let key = key_score(SiteKind::Acceptor, first, second);

        let rest = acceptor_rest(window);
        let mut rest_score = 1.0;
        for (segment, subwindow) in acceptor_subwindows(&rest) {
            let code = hash_sequence(subwindow)?;
            let value = self.acceptor_entry(&segment, code)?;
            match segment.role {
                SegmentRole::Numerator => rest_score *= value,
                SegmentRole::Denominator => rest_score /= value,
            }
        }

        log2_odds(SiteKind::Acceptor, key * rest_score)
    }

    fn acceptor_entry(&self, segment: &AcceptorSegment, code: u32) -> Result<f64> {
        let describe = || {
            (
                format!("acceptor[{}]", segment.matrix),
                format!("{code} ({})", unhash(code, segment.len())),
            )
        };
        let value = self.acceptor().get(segment.matrix, code).ok_or_else(|| {
            let (matrix, key) = describe();
            MaxEntError::LookupMiss { matrix, key }
        })?;
        if segment.role == SegmentRole::Denominator && value == 0.0 {
            let (matrix, key) = describe();
            return Err(MaxEntError::ZeroEntry { matrix, key });
        }
        Ok(value)
    }
}
