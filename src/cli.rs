//! Command-line interface definition for unique-int-processor
//!
//! Provides argument parsing for the integer set processing tool.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Extract, deduplicate and sort bounded integers from text files
///
/// Every `.txt` file in the input directory produces a `<name>_results.txt`
/// file in the output directory holding its distinct integers in [-1023, 1023],
/// one per line, ascending.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "unique-int-processor",
    author = "m0h1nd4",
    version,
    about = "Extract, deduplicate and sort bounded integers from text files",
    long_about = r#"
Reads every .txt file in the input directory, keeps the whitespace-separated
tokens that are base-10 integers between -1023 and 1023, removes duplicates and
writes them in ascending order, one per line, to <name>_results.txt in the
output directory. Malformed and out-of-range tokens are skipped silently.

EXAMPLES:
    # Process ./sample_inputs into ./sample_results
    unique-int-processor -i sample_inputs -o sample_results

    # Show what would be written without touching the disk
    unique-int-processor -i sample_inputs --dry-run

    # Legacy naming: drop the last four characters of the file name
    unique-int-processor -i sample_inputs --naming truncate
"#
)]
pub struct Args {
    /// Input directory containing .txt files
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory, created if missing (default: ./results)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// How results file names are derived from input file names
    #[arg(long, value_enum, default_value_t = NamingMode::Extension)]
    pub naming: NamingMode,

    /// Deduplication strategy
    #[arg(long, value_enum, default_value_t = DedupStrategy::Hash)]
    pub dedup_strategy: DedupStrategy,

    /// Show detailed statistics
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Dry run - show what would be done without writing files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Deduplication strategy for accepted integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupStrategy {
    /// In-memory HashSet
    Hash,
    /// One bit per value of the accepted range
    Bitset,
}

/// How the results file name is derived from the intended output path
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingMode {
    /// Strip a trailing ".txt" if present, then append "_results.txt"
    Extension,
    /// Drop the last four characters of the name, then append "_results.txt"
    Truncate,
}

impl Args {
    /// Get output directory, defaulting to ./results
    pub fn get_output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("results"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["unique-int-processor", "-i", "inputs"]).unwrap();

        assert_eq!(args.input, PathBuf::from("inputs"));
        assert_eq!(args.get_output_dir(), PathBuf::from("results"));
        assert_eq!(args.naming, NamingMode::Extension);
        assert_eq!(args.dedup_strategy, DedupStrategy::Hash);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_explicit_flags() {
        let args = Args::try_parse_from([
            "unique-int-processor",
            "--input",
            "in",
            "--output",
            "out",
            "--naming",
            "truncate",
            "--dedup-strategy",
            "bitset",
            "--stats",
            "-q",
        ])
        .unwrap();

        assert_eq!(args.get_output_dir(), PathBuf::from("out"));
        assert_eq!(args.naming, NamingMode::Truncate);
        assert_eq!(args.dedup_strategy, DedupStrategy::Bitset);
        assert!(args.stats);
        assert!(args.quiet);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["unique-int-processor"]).is_err());
    }
}
