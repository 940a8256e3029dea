use log::{debug, info};
use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::constants::{
    ACCEPTOR_BASES, ACCEPTOR_JUNCTION_OFFSET, DONOR_BASES, DONOR_JUNCTION_OFFSET,
    SCAN_ANCHOR_OFFSET,
};
use crate::matrix::MatrixStore;
use crate::region::Region;
use crate::results::{PositionScores, RegionScores};
use crate::sequence::ReferenceSource;
use crate::types::{MaxEntError, Result};

/// Placeholder base for positions upstream of the contig start.
const PAD_BASE: u8 = b'N';

/// Slides donor and acceptor windows across reference regions.
///
/// Every position of a region is scored independently, so positions are
/// spread over a Rayon pool; results keep coordinate order.
///
/// # Examples
///
/// ```rust,no_run
/// use maxentscan_core::config::ScanConfig;
/// use maxentscan_core::engine::SpliceScanner;
/// use maxentscan_core::region::parse_region;
/// use maxentscan_core::sequence::IndexedFasta;
///
/// let scanner = SpliceScanner::from_config(ScanConfig::default())?;
/// let mut reference = IndexedFasta::from_file("hg38.fa")?;
/// let scores = scanner.scan_region(&mut reference, &parse_region("chr1:14,829-14,970")?)?;
///
/// for position in &scores.positions {
///     println!("{} {:?} {:?}", position.position, position.donor, position.acceptor);
/// }
/// # Ok::<(), maxentscan_core::types::MaxEntError>(())
/// ```
#[derive(Debug)]
pub struct SpliceScanner {
    pub config: ScanConfig,
    store: MatrixStore,
    pool: Option<rayon::ThreadPool>,
}

impl SpliceScanner {
    /// Create a scanner over an already loaded store.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::Config`] if the configured thread pool cannot
    /// be built.
    pub fn new(store: MatrixStore, config: ScanConfig) -> Result<Self> {
        let pool = match config.num_threads {
            Some(num_threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| {
                        MaxEntError::Config(format!("Failed to configure thread pool: {e}"))
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            config,
            store,
            pool,
        })
    }

    /// Load the matrices named in `config`, check that they cover every
    /// reachable key, and create a scanner.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::Resource`] or [`MaxEntError::Format`] if a
    /// matrix cannot be loaded, and [`MaxEntError::LookupMiss`] if one is
    /// incomplete.
    pub fn from_config(config: ScanConfig) -> Result<Self> {
        let store = MatrixStore::from_files(&config.donor_matrix, &config.acceptor_matrix)?;
        store.check_coverage()?;
        Self::new(store, config)
    }

    #[must_use]
    pub const fn store(&self) -> &MatrixStore {
        &self.store
    }

    /// Score every position of `region`.
    ///
    /// Windows that run past either end of the contig, or that contain
    /// bases other than ACGT, get `None` for that score.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::InvalidRegion`] if the region ends too close to
    /// `u64::MAX` to fetch its windows, [`MaxEntError::Reference`] if it cannot
    /// be fetched, and any non-recoverable scoring error (missing matrix
    /// entries).
    pub fn scan_region<R: ReferenceSource>(
        &self,
        reference: &mut R,
        region: &Region,
    ) -> Result<RegionScores> {
        let anchor = SCAN_ANCHOR_OFFSET as u64;
        let fetch_start = region.start.saturating_sub(anchor);
        let fetch_end = region
            .end
            .checked_add(ACCEPTOR_BASES as u64)
            .ok_or_else(|| MaxEntError::InvalidRegion(format!("{region} ends out of range")))?;

        // Left-pad so the anchor offset holds even at the contig start.
        let pad = (anchor - (region.start - fetch_start)) as usize;
        let mut sequence = vec![PAD_BASE; pad];
        sequence.extend(reference.fetch(&region.chrom, fetch_start, fetch_end)?);

        let positions = self.score_sequence(&sequence, region)?;
        let scores = RegionScores {
            region: region.clone(),
            positions,
        };
        info!(
            "Scanned {}: {} positions, {} scored",
            region,
            scores.positions.len(),
            scores.scored_count()
        );
        Ok(scores)
    }

    /// Score all region offsets against `sequence`, which starts
    /// [`SCAN_ANCHOR_OFFSET`] bases before `region.start`.
    fn score_sequence(&self, sequence: &[u8], region: &Region) -> Result<Vec<PositionScores>> {
        let count = usize::try_from(region.len())
            .map_err(|_| MaxEntError::InvalidRegion(format!("{region} is too large")))?;
        let score_all = || {
            (0..count)
                .into_par_iter()
                .map(|offset| self.score_offset(sequence, region.start, offset))
                .collect::<Result<Vec<_>>>()
        };
        match &self.pool {
            Some(pool) => pool.install(score_all),
            None => score_all(),
        }
    }

    fn score_offset(&self, sequence: &[u8], start: u64, offset: usize) -> Result<PositionScores> {
        let donor_start = offset + SCAN_ANCHOR_OFFSET - DONOR_JUNCTION_OFFSET;
        let acceptor_start = offset + SCAN_ANCHOR_OFFSET - ACCEPTOR_JUNCTION_OFFSET;
        let position = start + offset as u64;

        let donor = window(sequence, donor_start, DONOR_BASES);
        let acceptor = window(sequence, acceptor_start, ACCEPTOR_BASES);

        Ok(PositionScores {
            position,
            donor: recover(self.store.score5(donor), position)?,
            acceptor: recover(self.store.score3(acceptor), position)?,
        })
    }
}

/// Window of up to `len` bases at `start`, truncated at the sequence end.
fn window(sequence: &[u8], start: usize, len: usize) -> &[u8] {
    let end = (start + len).min(sequence.len());
    &sequence[start.min(end)..end]
}

/// Turn recoverable per-window errors into a missing score.
fn recover(score: Result<f64>, position: u64) -> Result<Option<f64>> {
    match score {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_recoverable() => {
            debug!("Position {position} not scored: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::fixtures::uniform_store;
    use crate::scoring::key_score;
    use crate::sequence::InMemoryReference;
    use crate::types::{Nucleotide, SiteKind};

    // Donor GT at 40..42 and acceptor AG at 60..62 of a 100-base contig;
    // the CA background contains neither dinucleotide.
    fn reference() -> InMemoryReference {
        let mut sequence = b"CA".repeat(50);
        sequence[40..42].copy_from_slice(b"GT");
        sequence[60..62].copy_from_slice(b"AG");
        let mut reference = InMemoryReference::default();
        reference.insert("chr1", sequence);
        reference
    }

    fn scanner(num_threads: Option<usize>) -> SpliceScanner {
        let config = ScanConfig {
            num_threads,
            ..Default::default()
        };
        SpliceScanner::new(uniform_store(1.0), config).unwrap()
    }

    #[test]
    fn test_scan_region_windows() {
        let mut reference = reference();
        let region = Region::new("chr1", 30, 70).unwrap();
        let scores = scanner(None).scan_region(&mut reference, &region).unwrap();
        assert_eq!(scores.positions.len(), 40);

        // With uniform matrices of 1.0 a score is the key odds ratio alone.
        let donor_gt = key_score(SiteKind::Donor, Nucleotide::G, Nucleotide::T).log2();
        let acceptor_ag = key_score(SiteKind::Acceptor, Nucleotide::A, Nucleotide::G).log2();

        // Junction p lies between bases p-1 and p: donor key bases are
        // p and p+1, acceptor key bases p-2 and p-1.
        let donor_site = &scores.positions[40 - 30];
        assert_eq!(donor_site.position, 40);
        assert!((donor_site.donor.unwrap() - donor_gt).abs() < 1e-9);

        let acceptor_site = &scores.positions[62 - 30];
        assert_eq!(acceptor_site.position, 62);
        assert!((acceptor_site.acceptor.unwrap() - acceptor_ag).abs() < 1e-9);

        assert_eq!(scores.best_donor().map(|p| p.position), Some(40));
        assert_eq!(scores.best_acceptor().map(|p| p.position), Some(62));
    }

    #[test]
    fn test_scan_region_matches_direct_scoring() {
        let mut reference = reference();
        let contig = reference.fetch("chr1", 0, 100).unwrap();
        let store = uniform_store(1.0);
        let region = Region::new("chr1", 25, 30).unwrap();
        let scores = scanner(Some(2)).scan_region(&mut reference, &region).unwrap();

        for scored in &scores.positions {
            let p = scored.position as usize;
            let donor = store.score5(&contig[p - 3..p + 6]).unwrap();
            let acceptor = store.score3(&contig[p - 20..p + 3]).unwrap();
            assert_eq!(scored.donor, Some(donor));
            assert_eq!(scored.acceptor, Some(acceptor));
        }
    }

    #[test]
    fn test_scan_region_contig_edges() {
        let mut reference = reference();
        let region = Region::new("chr1", 0, 100).unwrap();
        let scores = scanner(None).scan_region(&mut reference, &region).unwrap();
        assert_eq!(scores.positions.len(), 100);

        // Acceptor windows need 20 upstream bases, donor windows 3.
        assert_eq!(scores.positions[2].donor, None);
        assert!(scores.positions[3].donor.is_some());
        assert_eq!(scores.positions[19].acceptor, None);
        assert!(scores.positions[20].acceptor.is_some());

        // Downstream: donor needs 6 bases from p, acceptor 3.
        assert!(scores.positions[94].donor.is_some());
        assert_eq!(scores.positions[95].donor, None);
        assert!(scores.positions[97].acceptor.is_some());
        assert_eq!(scores.positions[98].acceptor, None);
    }

    #[test]
    fn test_scan_region_ambiguous_bases() {
        let mut reference = InMemoryReference::default();
        let mut sequence = b"ACGT".repeat(20);
        sequence[40] = b'N';
        reference.insert("chr2", sequence);

        let region = Region::new("chr2", 38, 39).unwrap();
        let scores = scanner(None).scan_region(&mut reference, &region).unwrap();
        assert_eq!(scores.positions[0].donor, None);
        assert_eq!(scores.positions[0].acceptor, None);
    }

    #[test]
    fn test_scan_region_unknown_contig() {
        let mut reference = reference();
        let region = Region::new("chrUn", 0, 10).unwrap();
        assert!(matches!(
            scanner(None).scan_region(&mut reference, &region),
            Err(MaxEntError::Reference(_))
        ));
    }

    #[test]
    fn test_scan_region_lookup_miss_aborts() {
        let store = MatrixStore::from_readers("".as_bytes(), "".as_bytes()).unwrap();
        let scanner = SpliceScanner::new(store, ScanConfig::default()).unwrap();
        let mut reference = reference();
        let region = Region::new("chr1", 30, 31).unwrap();
        assert!(matches!(
            scanner.scan_region(&mut reference, &region),
            Err(MaxEntError::LookupMiss { .. })
        ));
    }

    #[test]
    fn test_scan_region_coordinate_overflow() {
        let mut reference = reference();
        let region = Region::new("chr1", u64::MAX - 15, u64::MAX - 14).unwrap();
        assert!(matches!(
            scanner(None).scan_region(&mut reference, &region),
            Err(MaxEntError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_scan_empty_region() {
        let mut reference = reference();
        let region = Region::new("chr1", 50, 50).unwrap();
        let scores = scanner(None).scan_region(&mut reference, &region).unwrap();
        assert!(scores.positions.is_empty());
    }

    #[test]
    fn test_window_truncation() {
        let sequence = b"ACGTACGT";
        assert_eq!(window(sequence, 2, 3), b"GTA");
        assert_eq!(window(sequence, 6, 5), b"GT");
        assert!(window(sequence, 20, 5).is_empty());
    }
}
