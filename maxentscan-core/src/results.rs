use crate::region::Region;

/// Donor and acceptor scores for one reference position.
///
/// A score is `None` when its window could not be scored, e.g. it runs
/// off the contig or contains a base other than A, C, G or T.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionScores {
    /// 0-based reference coordinate of the splice junction.
    pub position: u64,
    /// `score5` of the 9-base window around `position`.
    pub donor: Option<f64>,
    /// `score3` of the 23-base window around `position`.
    pub acceptor: Option<f64>,
}

/// All position scores for one scanned region.
///
/// # Examples
///
/// ```rust
/// use maxentscan_core::region::Region;
/// use maxentscan_core::results::{PositionScores, RegionScores};
///
/// let scores = RegionScores {
///     region: Region::new("chr1", 100, 101)?,
///     positions: vec![PositionScores { position: 100, donor: Some(-3.2), acceptor: None }],
/// };
/// assert_eq!(scores.scored_count(), 1);
/// # Ok::<(), maxentscan_core::types::MaxEntError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RegionScores {
    pub region: Region,
    /// One entry per region position, in coordinate order.
    pub positions: Vec<PositionScores>,
}

impl RegionScores {
    /// Positions with at least one computed score.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.positions
            .iter()
            .filter(|p| p.donor.is_some() || p.acceptor.is_some())
            .count()
    }

    /// Position with the highest donor score, if any was computed.
    #[must_use]
    pub fn best_donor(&self) -> Option<&PositionScores> {
        self.positions
            .iter()
            .filter(|p| p.donor.is_some())
            .max_by(|a, b| a.donor.partial_cmp(&b.donor).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Position with the highest acceptor score, if any was computed.
    #[must_use]
    pub fn best_acceptor(&self) -> Option<&PositionScores> {
        self.positions
            .iter()
            .filter(|p| p.acceptor.is_some())
            .max_by(|a, b| {
                a.acceptor
                    .partial_cmp(&b.acceptor)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
