use std::fs::File;
use std::io::Read;
use std::path::Path;

use bio::io::fasta;
use log::debug;
use rustc_hash::FxHashMap;

use crate::types::{MaxEntError, Result};

/// Random access to reference contigs by 0-based, half-open coordinates.
///
/// Implementations clamp `end` to the contig length, so a fetch near the
/// end of a contig returns fewer than `end - start` bases.
pub trait ReferenceSource {
    /// Length of `chrom`, or `None` when the contig is unknown.
    fn contig_length(&self, chrom: &str) -> Option<u64>;

    /// Fetch bases `[start, end)` of `chrom`.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::Reference`] if the contig is unknown or the
    /// underlying reader fails.
    fn fetch(&mut self, chrom: &str, start: u64, end: u64) -> Result<Vec<u8>>;
}

/// `.fai`-indexed FASTA reader backed by rust-bio.
pub struct IndexedFasta {
    reader: fasta::IndexedReader<File>,
    lengths: FxHashMap<String, u64>,
}

impl IndexedFasta {
    /// Open `path` together with its `path.fai` index.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::Reference`] if the index is missing or
    /// unreadable, and [`MaxEntError::IoError`] if the FASTA cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let index = fasta::Index::with_fasta_file(&path).map_err(|e| {
            MaxEntError::Reference(format!("cannot load index for {}: {e}", path.display()))
        })?;
        let lengths: FxHashMap<String, u64> = index
            .sequences()
            .into_iter()
            .map(|sequence| (sequence.name, sequence.len))
            .collect();
        debug!("Indexed {} contigs in {}", lengths.len(), path.display());

        let reader = fasta::IndexedReader::with_index(File::open(path)?, index);
        Ok(Self { reader, lengths })
    }
}

impl ReferenceSource for IndexedFasta {
    fn contig_length(&self, chrom: &str) -> Option<u64> {
        self.lengths.get(chrom).copied()
    }

    fn fetch(&mut self, chrom: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        let length = self
            .contig_length(chrom)
            .ok_or_else(|| MaxEntError::Reference(format!("unknown contig {chrom}")))?;
        let end = end.min(length);
        if start >= end {
            return Ok(Vec::new());
        }

        let mut sequence = Vec::with_capacity((end - start) as usize);
        self.reader
            .fetch(chrom, start, end)
            .and_then(|()| self.reader.read(&mut sequence))
            .map_err(|e| MaxEntError::Reference(format!("{chrom}:{start}-{end}: {e}")))?;
        Ok(sequence)
    }
}

/// Reference held entirely in memory, keyed by contig name.
///
/// # Examples
///
/// ```rust
/// use maxentscan_core::sequence::{InMemoryReference, ReferenceSource};
///
/// let mut reference = InMemoryReference::default();
/// reference.insert("chr1", b"ACGTACGT".to_vec());
///
/// assert_eq!(reference.fetch("chr1", 2, 5).unwrap(), b"GTA");
/// assert_eq!(reference.fetch("chr1", 6, 100).unwrap(), b"GT");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryReference {
    contigs: FxHashMap<String, Vec<u8>>,
}

impl InMemoryReference {
    /// Add or replace a contig.
    pub fn insert(&mut self, chrom: impl Into<String>, sequence: Vec<u8>) {
        self.contigs.insert(chrom.into(), sequence);
    }

    /// Load every record of a FASTA stream.
    ///
    /// # Errors
    ///
    /// Returns [`MaxEntError::Reference`] if a record cannot be parsed.
    pub fn from_fasta<R: Read>(reader: R) -> Result<Self> {
        let mut reference = Self::default();
        for record in fasta::Reader::new(reader).records() {
            let record = record.map_err(|e| MaxEntError::Reference(e.to_string()))?;
            reference.insert(record.id(), record.seq().to_vec());
        }
        Ok(reference)
    }
}

impl ReferenceSource for InMemoryReference {
    fn contig_length(&self, chrom: &str) -> Option<u64> {
        self.contigs.get(chrom).map(|sequence| sequence.len() as u64)
    }

    fn fetch(&mut self, chrom: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        let sequence = self
            .contigs
            .get(chrom)
            .ok_or_else(|| MaxEntError::Reference(format!("unknown contig {chrom}")))?;
        let end = (end as usize).min(sequence.len());
        let start = (start as usize).min(end);
        Ok(sequence[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_indexed_fasta(dir: &TempDir) -> std::path::PathBuf {
        let fasta_path = dir.path().join("ref.fa");
        // 10 bases per line, two contigs
        fs::write(&fasta_path, ">chr1\nACGTACGTAC\nGGGGGCCCCC\nTT\n>chr2\nAAAACCCC\n").unwrap();
        fs::write(
            dir.path().join("ref.fa.fai"),
            "chr1\t22\t6\t10\t11\nchr2\t8\t37\t8\t9\n",
        )
        .unwrap();
        fasta_path
    }

    #[test]
    fn test_indexed_fasta_fetch() {
        let dir = TempDir::new().unwrap();
        let mut reference = IndexedFasta::from_file(write_indexed_fasta(&dir)).unwrap();

        assert_eq!(reference.contig_length("chr1"), Some(22));
        assert_eq!(reference.contig_length("chr2"), Some(8));
        assert_eq!(reference.contig_length("chrX"), None);

        assert_eq!(reference.fetch("chr1", 0, 4).unwrap(), b"ACGT");
        assert_eq!(reference.fetch("chr1", 8, 13).unwrap(), b"ACGGG");
        assert_eq!(reference.fetch("chr2", 2, 6).unwrap(), b"AACC");
    }

    #[test]
    fn test_indexed_fasta_clamps_end() {
        let dir = TempDir::new().unwrap();
        let mut reference = IndexedFasta::from_file(write_indexed_fasta(&dir)).unwrap();

        assert_eq!(reference.fetch("chr1", 18, 40).unwrap(), b"CCTT");
        assert!(reference.fetch("chr1", 30, 40).unwrap().is_empty());
    }

    #[test]
    fn test_indexed_fasta_unknown_contig() {
        let dir = TempDir::new().unwrap();
        let mut reference = IndexedFasta::from_file(write_indexed_fasta(&dir)).unwrap();
        assert!(matches!(
            reference.fetch("chrX", 0, 1),
            Err(MaxEntError::Reference(_))
        ));
    }

    #[test]
    fn test_indexed_fasta_missing_index() {
        let dir = TempDir::new().unwrap();
        let fasta_path = dir.path().join("plain.fa");
        fs::write(&fasta_path, ">chr1\nACGT\n").unwrap();
        assert!(matches!(
            IndexedFasta::from_file(&fasta_path),
            Err(MaxEntError::Reference(_))
        ));
    }

    #[test]
    fn test_in_memory_from_fasta() {
        let fasta_content = ">seq1 description\nACGT\nGCTA\n>seq2\nTTAA\n";
        let mut reference = InMemoryReference::from_fasta(fasta_content.as_bytes()).unwrap();

        assert_eq!(reference.contig_length("seq1"), Some(8));
        assert_eq!(reference.fetch("seq1", 3, 6).unwrap(), b"TGC");
        assert_eq!(reference.fetch("seq2", 0, 4).unwrap(), b"TTAA");
    }

    #[test]
    fn test_in_memory_out_of_range() {
        let mut reference = InMemoryReference::default();
        reference.insert("chr1", b"ACGT".to_vec());
        assert!(reference.fetch("chr1", 10, 20).unwrap().is_empty());
        assert!(reference.fetch("chr9", 0, 1).is_err());
    }
}
