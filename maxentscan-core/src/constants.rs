// =============================================================================
// Window geometry
// =============================================================================

/// Total length of a donor (5') window handed to `score5`
pub const DONOR_BASES: usize = 9;

/// Bases of the donor window that precede the splice junction
pub const DONOR_JUNCTION_OFFSET: usize = 3;

/// Total length of an acceptor (3') window handed to `score3`
pub const ACCEPTOR_BASES: usize = 23;

/// Bases of the acceptor window that precede the splice junction
pub const ACCEPTOR_JUNCTION_OFFSET: usize = 20;

/// Start of the two donor key bases inside the 9-base window
pub const DONOR_KEY_START: usize = 3;

/// Start of the two acceptor key bases inside the 23-base window
pub const ACCEPTOR_KEY_START: usize = 18;

/// Number of key bases scored by the conditional constants
pub const KEY_BASES: usize = 2;

/// Length of the donor rest window (window minus key bases)
pub const DONOR_REST_BASES: usize = DONOR_BASES - KEY_BASES;

/// Length of the acceptor rest window (window minus key bases)
pub const ACCEPTOR_REST_BASES: usize = ACCEPTOR_BASES - KEY_BASES;

/// Bases fetched upstream of a region so every donor and acceptor window fits
pub const SCAN_ANCHOR_OFFSET: usize = if DONOR_JUNCTION_OFFSET > ACCEPTOR_JUNCTION_OFFSET {
    DONOR_JUNCTION_OFFSET
} else {
    ACCEPTOR_JUNCTION_OFFSET
};

// =============================================================================
// Per-base probabilities, indexed by `Nucleotide::to_index` (A, C, G, T)
// =============================================================================

/// Genome-wide single-base background frequencies
pub const BACKGROUND: [f64; 4] = [0.27, 0.23, 0.23, 0.27];

/// Donor: probability of each base immediately before the junction
pub const DONOR_CONS1: [f64; 4] = [0.004, 0.0032, 0.9896, 0.0032];

/// Donor: probability of each base immediately after the junction
pub const DONOR_CONS2: [f64; 4] = [0.0034, 0.0039, 0.0042, 0.9884];

/// Acceptor: probability of each base immediately before the junction
pub const ACCEPTOR_CONS1: [f64; 4] = [0.9903, 0.0032, 0.0034, 0.0030];

/// Acceptor: probability of each base immediately after the junction
pub const ACCEPTOR_CONS2: [f64; 4] = [0.0027, 0.0037, 0.9905, 0.0030];

// =============================================================================
// Acceptor rest-window decomposition
// =============================================================================

/// How a sub-window probability enters the acceptor rest score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// Multiplied into the rest score
    Numerator,
    /// Divides the rest score (overlap correction)
    Denominator,
}

/// One sub-window of the 21-base acceptor rest string and its sub-matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptorSegment {
    /// Sub-matrix the segment is looked up in
    pub matrix: usize,
    /// Start offset in the rest string (inclusive)
    pub start: usize,
    /// End offset in the rest string (exclusive)
    pub end: usize,
    pub role: SegmentRole,
}

impl AcceptorSegment {
    const fn new(matrix: usize, start: usize, end: usize, role: SegmentRole) -> Self {
        Self {
            matrix,
            start,
            end,
            role,
        }
    }

    /// Segment length in bases.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of acceptor sub-matrices referenced by [`ACCEPTOR_SEGMENTS`]
pub const ACCEPTOR_MATRIX_COUNT: usize = 9;

/// Acceptor rest-score layout. Numerators cover the rest string with
/// overlapping windows; denominators remove the doubly counted overlaps.
pub const ACCEPTOR_SEGMENTS: [AcceptorSegment; ACCEPTOR_MATRIX_COUNT] = [
    AcceptorSegment::new(0, 0, 7, SegmentRole::Numerator),
    AcceptorSegment::new(1, 7, 14, SegmentRole::Numerator),
    AcceptorSegment::new(2, 14, 21, SegmentRole::Numerator),
    AcceptorSegment::new(3, 4, 11, SegmentRole::Numerator),
    AcceptorSegment::new(4, 11, 18, SegmentRole::Numerator),
    AcceptorSegment::new(5, 4, 7, SegmentRole::Denominator),
    AcceptorSegment::new(6, 7, 11, SegmentRole::Denominator),
    AcceptorSegment::new(7, 11, 14, SegmentRole::Denominator),
    AcceptorSegment::new(8, 14, 18, SegmentRole::Denominator),
];

// =============================================================================
// Data files
// =============================================================================

/// Default location of the donor matrix resource
pub const DEFAULT_DONOR_MATRIX: &str = "data/score5_matrix.txt";

/// Default location of the acceptor matrix resource
pub const DEFAULT_ACCEPTOR_MATRIX: &str = "data/score3_matrix.txt";

/// Placeholder written for scores that could not be computed
pub const MISSING_SCORE: &str = "NA";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_anchor_offset() {
        assert_eq!(SCAN_ANCHOR_OFFSET, 20);
    }

    #[test]
    fn test_segments_fit_rest_window() {
        for (i, segment) in ACCEPTOR_SEGMENTS.iter().enumerate() {
            assert_eq!(segment.matrix, i);
            assert!(segment.end <= ACCEPTOR_REST_BASES);
            assert!(!segment.is_empty());
        }
    }

    #[test]
    fn test_segments_cover_rest_once_net() {
        // Every rest position is counted exactly once after overlap correction.
        let mut coverage = [0i32; ACCEPTOR_REST_BASES];
        for segment in &ACCEPTOR_SEGMENTS {
            let delta = match segment.role {
                SegmentRole::Numerator => 1,
                SegmentRole::Denominator => -1,
            };
            for slot in &mut coverage[segment.start..segment.end] {
                *slot += delta;
            }
        }
        assert!(coverage.iter().all(|&c| c == 1), "{coverage:?}");
    }

    #[test]
    fn test_conditional_constants_are_probabilities() {
        for table in [DONOR_CONS1, DONOR_CONS2, ACCEPTOR_CONS1, ACCEPTOR_CONS2] {
            let total: f64 = table.iter().sum();
            assert!((total - 1.0).abs() < 1e-3, "{total}");
        }
        let bg_total: f64 = BACKGROUND.iter().sum();
        assert!((bg_total - 1.0).abs() < 1e-12);
    }
}
