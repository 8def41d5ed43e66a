//! Core processing engine
//!
//! Runs the per-file pipeline (parse, filter, deduplicate, sort, write) and
//! applies it to every `.txt` file of a directory.

use crate::cli::{Args, DedupStrategy, NamingMode};
use crate::dedup::create_deduplicator;
use crate::encoding::EncodedLineIterator;
use crate::error::{ProcessError, Result};
use crate::filter::{self, IntegerRange, TokenCounts};
use crate::output::{ensure_output_dir, results_path, write_results};
use crate::progress::{create_progress_bar, print_bullet, print_error, print_header, print_info, print_success, print_warning, ProcessingStats};
use crate::sort::quick_sort;

use bytesize::ByteSize;
use colored::*;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// File name suffix selecting input files (case-sensitive)
pub const INPUT_SUFFIX: &str = ".txt";

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub output_dir: PathBuf,
    pub naming: NamingMode,
    pub dedup_strategy: DedupStrategy,
    pub range: IntegerRange,
    pub dry_run: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            output_dir: args.get_output_dir(),
            naming: args.naming,
            dedup_strategy: args.dedup_strategy,
            range: IntegerRange::DEFAULT,
            dry_run: args.dry_run,
            quiet: args.quiet,
            verbose: args.verbose,
        }
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            naming: NamingMode::Extension,
            dedup_strategy: DedupStrategy::Hash,
            range: IntegerRange::DEFAULT,
            dry_run: false,
            quiet: true,
            verbose: false,
        }
    }
}

/// What processing one file produced
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lines: u64,
    pub tokens: TokenCounts,
    pub duplicates: u64,
    pub unique: usize,
    pub bytes_written: u64,
}

/// Outcome of one file in a directory run
pub type FileOutcome = Result<FileReport>;

/// Outcomes of a directory run, one per selected input file
#[derive(Debug, Default)]
pub struct DirectoryReport {
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
}

impl DirectoryReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileReport> {
        self.outcomes.iter().filter_map(|(_, outcome)| outcome.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&PathBuf, &ProcessError)> {
        self.outcomes
            .iter()
            .filter_map(|(path, outcome)| outcome.as_ref().err().map(|e| (path, e)))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    stats: Arc<ProcessingStats>,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Extract the valid integers of one line
    pub fn process_line(&self, line: &str) -> Vec<i32> {
        filter::process_line(line, self.config.range)
    }

    /// Process one input file into its results file
    ///
    /// `intended_output` is renamed according to the naming mode before
    /// writing; the returned report carries the path actually written.
    pub fn process_file(&self, input: &Path, intended_output: &Path) -> Result<FileReport> {
        let result = self.run_file(input, intended_output);

        match &result {
            Ok(report) => {
                self.stats.complete_file(report.bytes_written);
                log::info!("Processed: {} -> {}", report.input.display(), report.output.display());
            }
            Err(e) => {
                self.stats.fail_file();
                log::warn!("{}", e);
            }
        }

        result
    }

    fn run_file(&self, input: &Path, intended_output: &Path) -> Result<FileReport> {
        if !input.is_file() {
            return Err(ProcessError::MissingFile(input.to_path_buf()));
        }

        let read_error = |source: io::Error| {
            if source.kind() == io::ErrorKind::NotFound {
                ProcessError::MissingFile(input.to_path_buf())
            } else {
                ProcessError::Read {
                    path: input.to_path_buf(),
                    source,
                }
            }
        };

        let lines = EncodedLineIterator::new(input).map_err(read_error)?;
        let encoding = lines.encoding_info();
        log::debug!(
            "Reading {} as {}{}",
            input.display(),
            encoding.name,
            if encoding.from_bom { " (BOM)" } else { "" }
        );

        let range = self.config.range;
        let mut dedup = create_deduplicator(self.config.dedup_strategy, range);
        let mut tokens = TokenCounts::default();
        let mut line_count = 0u64;
        let mut duplicates = 0u64;

        for line in lines {
            let line = line.map_err(read_error)?;
            line_count += 1;

            let counts = filter::process_line_counted(&line, range, |value| {
                if !dedup.insert(value) {
                    duplicates += 1;
                }
            });
            tokens.merge(counts);
        }

        let unique = dedup.len();
        log::debug!(
            "{}: {} lines, {} tokens, {} unique ({} bytes of dedup state)",
            input.display(),
            line_count,
            tokens.tokens,
            unique,
            dedup.memory_usage()
        );

        let sorted = quick_sort(dedup.values());
        let output_path = results_path(intended_output, self.config.naming);
        let (output, bytes_written) = write_results(output_path, &sorted)?;

        self.stats.add_lines(line_count);
        self.stats.add_tokens(tokens);
        self.stats.add_values(unique as u64, duplicates);

        Ok(FileReport {
            input: input.to_path_buf(),
            output,
            lines: line_count,
            tokens,
            duplicates,
            unique,
            bytes_written,
        })
    }

    /// Process every `.txt` file of `input_dir` into `output_dir`
    ///
    /// Only a missing input directory or an uncreatable output directory is
    /// an error here; per-file failures are collected in the report.
    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Result<DirectoryReport> {
        if !input_dir.is_dir() {
            return Err(ProcessError::InputDirectoryMissing(input_dir.to_path_buf()));
        }

        if !self.config.quiet {
            print_header("Scanning input...");
        }

        let files = self.collect_files(input_dir);

        if !self.config.quiet {
            let total_size: u64 = files.iter().map(|(_, size)| *size).sum();
            print_info(&format!("Found {} files ({} total)", files.len(), ByteSize(total_size)));
        }

        if self.config.dry_run {
            self.dry_run_report(&files, output_dir);
            return Ok(DirectoryReport::default());
        }

        ensure_output_dir(output_dir)?;

        if files.is_empty() {
            if !self.config.quiet {
                print_warning("No .txt files found to process!");
            }
            return Ok(DirectoryReport::default());
        }

        if !self.config.quiet {
            print_header("Processing...");
            print_info(&format!("Output: {:?}", output_dir));
        }

        let pb = if self.config.quiet {
            indicatif::ProgressBar::hidden()
        } else {
            create_progress_bar(files.len() as u64, "Processing...")
        };

        let mut report = DirectoryReport::default();

        for (path, _) in &files {
            let file_name = path.file_name().unwrap_or_default();
            if self.config.verbose {
                pb.set_message(format!("Processing {:?}...", file_name));
            }

            let intended = output_dir.join(file_name);
            let outcome = pb.suspend(|| self.process_file(path, &intended));

            if let Err(ref e) = outcome {
                pb.suspend(|| print_error(&e.to_string()));
            }

            report.outcomes.push((path.clone(), outcome));
            pb.inc(1);
        }

        pb.finish_with_message("Complete".green().to_string());

        if !self.config.quiet {
            let written = report.succeeded().count();
            print_success(&format!("{} results files written to {:?}", written, output_dir));
            if self.config.verbose {
                for file in report.succeeded() {
                    print_bullet(&format!("{:?}: {} unique values", file.output, file.unique));
                }
            }
        }

        Ok(report)
    }

    /// Collect the `.txt` entries directly inside `input_dir`, sorted by name
    ///
    /// Regular files and symlinks not pointing at a directory are selected.
    /// A dangling link or an entry that cannot be read is still selected so
    /// that it fails in [`Processor::process_file`] and shows up in the report.
    fn collect_files(&self, input_dir: &Path) -> Vec<(PathBuf, u64)> {
        let mut files = Vec::new();

        let walker = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker.into_iter() {
            let path = match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let selectable =
                        file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir());
                    if !selectable {
                        continue;
                    }
                    entry.into_path()
                }
                Err(e) => match e.path() {
                    Some(path) if has_input_suffix(path) => {
                        log::warn!("Cannot inspect {}: {}", path.display(), e);
                        path.to_path_buf()
                    }
                    _ => {
                        log::warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                },
            };

            if !has_input_suffix(&path) {
                log::debug!("Skipping {}", path.display());
                continue;
            }

            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            self.stats.add_file(size);
            files.push((path, size));
        }

        files
    }

    /// Dry run report
    fn dry_run_report(&self, files: &[(PathBuf, u64)], output_dir: &Path) {
        print_header("DRY RUN - No files will be written");

        println!("\n  {} Files to process:", "▶".green());
        for (path, size) in files {
            let file_name = path.file_name().unwrap_or_default();
            let target = results_path(&output_dir.join(file_name), self.config.naming);
            print_bullet(&format!("{:?} ({}) -> {:?}", path, ByteSize(*size), target));
        }

        println!("\n  {} Output configuration:", "▶".green());
        print_bullet(&format!("Output directory: {:?}", output_dir));
        print_bullet(&format!("Naming: {:?}", self.config.naming));
        print_bullet(&format!("Deduplication: {:?}", self.config.dedup_strategy));
    }

    /// Get processing statistics
    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }
}

fn has_input_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(INPUT_SUFFIX))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::LINE_ENDING;
    use std::fs;
    use tempfile::TempDir;

    fn processor() -> Processor {
        Processor::new(ProcessorConfig::default())
    }

    fn lines(values: &[&str]) -> String {
        values.iter().map(|v| format!("{}{}", v, LINE_ENDING)).collect()
    }

    #[test]
    fn test_process_line() {
        assert_eq!(processor().process_line("5 -5 1024 abc 3 5"), vec![5, -5, 3, 5]);
    }

    #[test]
    fn test_process_file_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.txt");
        fs::write(&input, "5 -5 1024 abc 3 5\n").unwrap();

        let report = processor()
            .process_file(&input, &temp_dir.path().join("out.txt"))
            .unwrap();

        assert_eq!(report.output, temp_dir.path().join("out_results.txt"));
        assert_eq!(fs::read_to_string(&report.output).unwrap(), lines(&["-5", "3", "5"]));
        assert_eq!(report.unique, 3);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.tokens.out_of_range, 1);
        assert_eq!(report.tokens.malformed, 1);
    }

    #[test]
    fn test_accumulates_across_lines() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("multi.txt");
        fs::write(&input, "3 1\r\n\r\n2 3 -1023 1023\n-1024 1024 12.5 --5 5-5\n1").unwrap();

        let report = processor()
            .process_file(&input, &temp_dir.path().join("multi.txt"))
            .unwrap();

        assert_eq!(report.lines, 5);
        assert_eq!(
            fs::read_to_string(&report.output).unwrap(),
            lines(&["-1023", "1", "2", "3", "1023"])
        );
    }

    #[test]
    fn test_empty_file_creates_empty_results() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("empty.txt");
        fs::write(&input, "").unwrap();

        let report = processor()
            .process_file(&input, &temp_dir.path().join("empty.txt"))
            .unwrap();

        assert!(report.output.exists());
        assert_eq!(fs::read_to_string(&report.output).unwrap(), "");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let proc = processor();

        let err = proc
            .process_file(&temp_dir.path().join("gone.txt"), &temp_dir.path().join("gone.txt"))
            .unwrap_err();

        assert!(matches!(err, ProcessError::MissingFile(_)));
        assert!(!err.is_fatal());
        assert_eq!(proc.stats().get_failed_files(), 1);
        assert!(!temp_dir.path().join("gone_results.txt").exists());
    }

    #[test]
    fn test_process_file_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.txt");
        fs::write(&input, "9 8 7 8 9 -1 0\n").unwrap();
        let intended = temp_dir.path().join("a.txt");

        let first = processor().process_file(&input, &intended).unwrap();
        let first_content = fs::read(&first.output).unwrap();
        let second = processor().process_file(&input, &intended).unwrap();

        assert_eq!(first.output, second.output);
        assert_eq!(first_content, fs::read(&second.output).unwrap());
    }

    #[test]
    fn test_bitset_strategy_matches_hash() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.txt");
        fs::write(&input, "100 -100 0 100 +7 007 2000\n").unwrap();

        let hash = processor()
            .process_file(&input, &temp_dir.path().join("hash.txt"))
            .unwrap();
        let bitset = Processor::new(ProcessorConfig {
            dedup_strategy: DedupStrategy::Bitset,
            ..ProcessorConfig::default()
        })
        .process_file(&input, &temp_dir.path().join("bitset.txt"))
        .unwrap();

        assert_eq!(
            fs::read_to_string(&hash.output).unwrap(),
            fs::read_to_string(&bitset.output).unwrap()
        );
    }

    #[test]
    fn test_directory_selects_only_txt_files() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out").join("nested");
        fs::create_dir_all(input_dir.join("sub")).unwrap();
        fs::create_dir_all(input_dir.join("dir.txt")).unwrap();
        fs::write(input_dir.join("a.txt"), "2 1\n").unwrap();
        fs::write(input_dir.join("b.csv"), "3 4\n").unwrap();
        fs::write(input_dir.join("C.TXT"), "5\n").unwrap();
        fs::write(input_dir.join("sub").join("d.txt"), "6\n").unwrap();

        let report = processor().process_directory(&input_dir, &output_dir).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report.failed().count(), 0);
        assert_eq!(
            fs::read_to_string(output_dir.join("a_results.txt")).unwrap(),
            lines(&["1", "2"])
        );

        let written: Vec<_> = fs::read_dir(&output_dir).unwrap().filter_map(|e| e.ok()).collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_directory_with_no_txt_files() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir_all(&input_dir).unwrap();

        let report = processor().process_directory(&input_dir, &output_dir).unwrap();

        assert!(report.is_empty());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_missing_input_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("out");

        let err = processor()
            .process_directory(&temp_dir.path().join("missing"), &output_dir)
            .unwrap_err();

        assert!(matches!(err, ProcessError::InputDirectoryMissing(_)));
        assert!(err.is_fatal());
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("a.txt"), "1\n").unwrap();

        let proc = Processor::new(ProcessorConfig {
            dry_run: true,
            ..ProcessorConfig::default()
        });
        let report = proc.process_directory(&input_dir, &output_dir).unwrap();

        assert!(report.is_empty());
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_truncate_naming_in_directory_run() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("report.txt"), "1\n").unwrap();

        let proc = Processor::new(ProcessorConfig {
            naming: NamingMode::Truncate,
            ..ProcessorConfig::default()
        });
        proc.process_directory(&input_dir, &output_dir).unwrap();

        assert!(output_dir.join("report_results.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_fails_without_stopping_siblings() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("a.txt"), "3 1 3\n").unwrap();
        symlink(input_dir.join("nowhere.txt"), input_dir.join("b.txt")).unwrap();
        fs::write(input_dir.join("c.txt"), "-7\n").unwrap();

        let proc = processor();
        let report = proc.process_directory(&input_dir, &output_dir).unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded().count(), 2);

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, &input_dir.join("b.txt"));
        assert!(matches!(failed[0].1, ProcessError::MissingFile(_)));
        assert!(!failed[0].1.is_fatal());

        assert_eq!(
            fs::read_to_string(output_dir.join("a_results.txt")).unwrap(),
            lines(&["1", "3"])
        );
        assert_eq!(fs::read_to_string(output_dir.join("c_results.txt")).unwrap(), lines(&["-7"]));
        assert!(!output_dir.join("b_results.txt").exists());

        let stats = proc.stats();
        assert_eq!(stats.get_total_files(), 3);
        assert_eq!(stats.get_processed_files(), 2);
        assert_eq!(stats.get_failed_files(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_links_follow_their_target_kind() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        let output_dir = temp_dir.path().join("out");
        let elsewhere = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&input_dir).unwrap();
        fs::create_dir_all(&elsewhere).unwrap();
        fs::write(elsewhere.join("real.txt"), "42 42\n").unwrap();
        symlink(elsewhere.join("real.txt"), input_dir.join("linked.txt")).unwrap();
        symlink(&elsewhere, input_dir.join("folder.txt")).unwrap();

        let report = processor().process_directory(&input_dir, &output_dir).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report.failed().count(), 0);
        assert_eq!(
            fs::read_to_string(output_dir.join("linked_results.txt")).unwrap(),
            lines(&["42"])
        );
        assert!(!output_dir.join("folder_results.txt").exists());
    }
}
