#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use maxentscan_core::constants::{ACCEPTOR_SEGMENTS, DONOR_REST_BASES};
use maxentscan_core::scoring::key_score;
use maxentscan_core::sequence::unhash;
use maxentscan_core::types::{Nucleotide, SiteKind};
use tempfile::TempDir;

/// Bases per FASTA line in the test reference.
const LINE_BASES: usize = 60;

/// 100-base contig with a donor `GT` at 40..42 and an acceptor `AG` at
/// 60..62 on a `CA` background that contains neither dinucleotide.
pub fn test_contig() -> Vec<u8> {
    let mut sequence = b"CA".repeat(50);
    sequence[40..42].copy_from_slice(b"GT");
    sequence[60..62].copy_from_slice(b"AG");
    sequence
}

/// Temporary directory holding an indexed reference and complete matrices
/// whose entries are all 1.0, so every score is the key odds ratio alone.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let fixture = Self { dir };
        fixture.write_reference(&[("chr1", test_contig())]);
        fs::write(fixture.donor_matrix(), donor_text(1.0)).unwrap();
        fs::write(fixture.acceptor_matrix(), acceptor_text(1.0)).unwrap();
        fixture
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn fasta(&self) -> PathBuf {
        self.path("reference.fa")
    }

    pub fn donor_matrix(&self) -> PathBuf {
        self.path("score5_matrix.txt")
    }

    pub fn acceptor_matrix(&self) -> PathBuf {
        self.path("score3_matrix.txt")
    }

    /// Write a FASTA plus its `.fai` index.
    pub fn write_reference(&self, contigs: &[(&str, Vec<u8>)]) {
        let mut fasta = String::new();
        let mut index = String::new();
        for (name, sequence) in contigs {
            fasta.push('>');
            fasta.push_str(name);
            fasta.push('\n');
            let offset = fasta.len();
            for line in sequence.chunks(LINE_BASES) {
                fasta.push_str(std::str::from_utf8(line).unwrap());
                fasta.push('\n');
            }
            writeln!(
                index,
                "{name}\t{}\t{offset}\t{LINE_BASES}\t{}",
                sequence.len(),
                LINE_BASES + 1
            )
            .unwrap();
        }
        fs::write(self.fasta(), fasta).unwrap();
        fs::write(self.path("reference.fa.fai"), index).unwrap();
    }

    /// `maxentscan` with both matrix options pointing into the fixture.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("maxentscan").unwrap();
        cmd.arg("-d")
            .arg(self.donor_matrix())
            .arg("-a")
            .arg(self.acceptor_matrix());
        cmd
    }

    /// `command()` scanning `regions` against the fixture reference.
    pub fn scan(&self, regions: impl AsRef<Path>) -> Command {
        let mut cmd = self.command();
        cmd.arg("-f").arg(self.fasta()).arg("-r").arg(regions.as_ref());
        cmd
    }
}

pub fn donor_text(value: f64) -> String {
    let mut text = String::new();
    for code in 0..(1u32 << (2 * DONOR_REST_BASES)) {
        writeln!(text, "{} {value}", unhash(code, DONOR_REST_BASES)).unwrap();
    }
    text
}

pub fn acceptor_text(value: f64) -> String {
    let mut text = String::new();
    for segment in &ACCEPTOR_SEGMENTS {
        for code in 0..(1u32 << (2 * segment.len())) {
            writeln!(text, "{} {code} {value}", segment.matrix).unwrap();
        }
    }
    text
}

/// Expected score of a window under all-1.0 matrices.
pub fn key_only_score(kind: SiteKind, first: Nucleotide, second: Nucleotide) -> f64 {
    key_score(kind, first, second).log2()
}

/// Split a TSV line into its columns.
pub fn columns(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

pub fn assert_close(actual: &str, expected: f64) {
    let actual: f64 = actual.parse().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
