//! # MaxEntScan CLI - Splice-Site Strength Scanner
//!
//! A command-line interface for maximum-entropy splice-site scoring.
//!
//! ## Usage
//!
//! ```bash
//! # Score every position of a region
//! maxentscan -f hg38.fa -r chr17:7,676,520-7,676,620
//!
//! # Score the regions of a BED-like file, with a header, on 8 threads
//! maxentscan -f hg38.fa -r exons.bed --header -t 8 -o scores.tsv
//!
//! # Score literal windows without a reference
//! maxentscan --donor CAGGTAAGT --acceptor TTCCAAACGAACTTTTGTAGGGA
//! ```
//!
//! ## Options
//!
//! - `-f, --fasta <FILE>`: Indexed reference FASTA (`.fai` next to it)
//! - `-r, --regions <REGIONS>`: Region file or inline `chrom:start-end`
//! - `-d, --donor-matrix <FILE>`: Donor matrix (default: data/score5_matrix.txt)
//! - `-a, --acceptor-matrix <FILE>`: Acceptor matrix (default: data/score3_matrix.txt)
//! - `-o, --output <FILE>`: Output file (default: stdout)
//! - `-t, --threads <N>`: Worker threads (default: all cores)
//! - `-q, --quiet`: Only log warnings and errors
//! - `-v, --verbose`: Log per-window diagnostics
//! - `--header`: Write a column header line
//! - `--donor <SEQ>`: Score a 9-base donor window (repeatable)
//! - `--acceptor <SEQ>`: Score a 23-base acceptor window (repeatable)
//!
//! ## Output
//!
//! Region scans write `chrom position donor acceptor`, tab-separated, with
//! `NA` where a window could not be scored. Literal windows are written as
//! `kind sequence score`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{Level, info, warn};
use maxentscan_core::config::ScanConfig;
use maxentscan_core::constants::MISSING_SCORE;
use maxentscan_core::output::{write_header, write_results};
use maxentscan_core::region::load_regions;
use maxentscan_core::sequence::IndexedFasta;
use maxentscan_core::types::SiteKind;
use maxentscan_core::SpliceScanner;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

fn cli() -> Command {
    Command::new("maxentscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Maximum-entropy splice-site scoring")
        .arg(
            Arg::new("fasta")
                .short('f')
                .long("fasta")
                .value_name("FILE")
                .help("Indexed reference FASTA")
                .required_unless_present_any(["donor", "acceptor"])
                .requires("regions"),
        )
        .arg(
            Arg::new("regions")
                .short('r')
                .long("regions")
                .value_name("REGIONS")
                .help("Region file (chrom start end) or inline chrom:start-end")
                .requires("fasta"),
        )
        .arg(
            Arg::new("donor-matrix")
                .short('d')
                .long("donor-matrix")
                .value_name("FILE")
                .help("Donor matrix")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("acceptor-matrix")
                .short('a')
                .long("acceptor-matrix")
                .value_name("FILE")
                .help("Acceptor matrix")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("N")
                .help("Number of worker threads")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Quiet mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log skipped windows")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("header")
                .long("header")
                .help("Write a column header line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("donor")
                .long("donor")
                .value_name("SEQ")
                .help("Score a 9-base donor window")
                .action(ArgAction::Append)
                .conflicts_with("fasta"),
        )
        .arg(
            Arg::new("acceptor")
                .long("acceptor")
                .value_name("SEQ")
                .help("Score a 23-base acceptor window")
                .action(ArgAction::Append)
                .conflicts_with("fasta"),
        )
}

/// Main entry point for the MaxEntScan CLI application.
///
/// Parses command-line arguments, loads the matrices, scores the requested
/// regions or literal windows, and writes tab-separated results.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let config = scan_config(&matches);
    simple_logger::init_with_level(log_level(&config, matches.get_flag("verbose")))?;

    let started = Instant::now();
    let scanner = SpliceScanner::from_config(config)?;

    let mut writer: Box<dyn Write> = if let Some(output_file) = matches.get_one::<String>("output")
    {
        Box::new(BufWriter::new(File::create(output_file)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    if let Some(fasta) = matches.get_one::<String>("fasta") {
        let regions = matches
            .get_one::<String>("regions")
            .ok_or("--regions is required with --fasta")?;
        scan_regions(&scanner, fasta, regions, &mut writer)?;
    } else {
        score_windows(&scanner, &matches, &mut writer)?;
    }
    writer.flush()?;

    info!("Finished in {:.2?}", started.elapsed());
    Ok(())
}

/// Build the scan configuration from parsed arguments.
fn scan_config(matches: &ArgMatches) -> ScanConfig {
    let mut config = ScanConfig {
        num_threads: matches.get_one::<usize>("threads").copied(),
        quiet: matches.get_flag("quiet"),
        write_header: matches.get_flag("header"),
        ..Default::default()
    };
    if let Some(path) = matches.get_one::<PathBuf>("donor-matrix") {
        config.donor_matrix.clone_from(path);
    }
    if let Some(path) = matches.get_one::<PathBuf>("acceptor-matrix") {
        config.acceptor_matrix.clone_from(path);
    }
    config
}

fn log_level(config: &ScanConfig, verbose: bool) -> Level {
    if config.quiet {
        Level::Warn
    } else if verbose {
        Level::Debug
    } else {
        Level::Info
    }
}

fn scan_regions<W: Write>(
    scanner: &SpliceScanner,
    fasta: &str,
    regions: &str,
    writer: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let regions = load_regions(regions)?;
    let mut reference = IndexedFasta::from_file(fasta)?;

    if scanner.config.write_header {
        write_header(writer)?;
    }

    let mut positions = 0;
    for region in &regions {
        let scores = scanner.scan_region(&mut reference, region)?;
        write_results(writer, &scores)?;
        positions += scores.positions.len();
    }

    info!("Scored {} positions in {} regions", positions, regions.len());
    Ok(())
}

fn score_windows<W: Write>(
    scanner: &SpliceScanner,
    matches: &ArgMatches,
    writer: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    if scanner.config.write_header {
        writeln!(writer, "#kind\tsequence\tscore")?;
    }

    let store = scanner.store();
    for kind in [SiteKind::Donor, SiteKind::Acceptor] {
        let id = kind.to_string();
        for sequence in matches.get_many::<String>(&id).into_iter().flatten() {
            let score = match kind {
                SiteKind::Donor => store.score5(sequence),
                SiteKind::Acceptor => store.score3(sequence),
            };
            match score {
                Ok(value) => writeln!(writer, "{kind}\t{sequence}\t{value}")?,
                Err(err) if err.is_recoverable() => {
                    warn!("Cannot score {kind} window {sequence}: {err}");
                    writeln!(writer, "{kind}\t{sequence}\t{MISSING_SCORE}")?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}
