//! Progress display module
//!
//! Provides styled terminal messages, a per-file progress bar and run statistics.

use crate::filter::TokenCounts;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║                    UNIQUE-INT-PROCESSOR                      ║
║        Bounded integer extraction, dedup and sorting         ║
║                                                  v1.0.0      ║
╚══════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar counting files
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} files {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Processing statistics
#[derive(Debug)]
pub struct ProcessingStats {
    pub total_files: AtomicU64,
    pub processed_files: AtomicU64,
    pub failed_files: AtomicU64,
    pub input_bytes: AtomicU64,
    pub output_bytes: AtomicU64,
    pub total_lines: AtomicU64,
    pub total_tokens: AtomicU64,
    pub accepted_tokens: AtomicU64,
    pub out_of_range_tokens: AtomicU64,
    pub malformed_tokens: AtomicU64,
    pub duplicate_values: AtomicU64,
    pub unique_values: AtomicU64,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            total_files: AtomicU64::new(0),
            processed_files: AtomicU64::new(0),
            failed_files: AtomicU64::new(0),
            input_bytes: AtomicU64::new(0),
            output_bytes: AtomicU64::new(0),
            total_lines: AtomicU64::new(0),
            total_tokens: AtomicU64::new(0),
            accepted_tokens: AtomicU64::new(0),
            out_of_range_tokens: AtomicU64::new(0),
            malformed_tokens: AtomicU64::new(0),
            duplicate_values: AtomicU64::new(0),
            unique_values: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_file(&self, size: u64) {
        self.total_files.fetch_add(1, Ordering::Relaxed);
        self.input_bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub fn complete_file(&self, output_bytes: u64) {
        self.processed_files.fetch_add(1, Ordering::Relaxed);
        self.output_bytes.fetch_add(output_bytes, Ordering::Relaxed);
    }

    pub fn fail_file(&self) {
        self.failed_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_lines(&self, count: u64) {
        self.total_lines.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_tokens(&self, counts: TokenCounts) {
        self.total_tokens.fetch_add(counts.tokens, Ordering::Relaxed);
        self.accepted_tokens.fetch_add(counts.accepted, Ordering::Relaxed);
        self.out_of_range_tokens.fetch_add(counts.out_of_range, Ordering::Relaxed);
        self.malformed_tokens.fetch_add(counts.malformed, Ordering::Relaxed);
    }

    pub fn add_values(&self, unique: u64, duplicates: u64) {
        self.unique_values.fetch_add(unique, Ordering::Relaxed);
        self.duplicate_values.fetch_add(duplicates, Ordering::Relaxed);
    }

    pub fn get_total_files(&self) -> u64 {
        self.total_files.load(Ordering::Relaxed)
    }

    pub fn get_processed_files(&self) -> u64 {
        self.processed_files.load(Ordering::Relaxed)
    }

    pub fn get_failed_files(&self) -> u64 {
        self.failed_files.load(Ordering::Relaxed)
    }

    pub fn get_total_lines(&self) -> u64 {
        self.total_lines.load(Ordering::Relaxed)
    }

    pub fn get_total_tokens(&self) -> u64 {
        self.total_tokens.load(Ordering::Relaxed)
    }

    pub fn get_accepted_tokens(&self) -> u64 {
        self.accepted_tokens.load(Ordering::Relaxed)
    }

    pub fn get_unique_values(&self) -> u64 {
        self.unique_values.load(Ordering::Relaxed)
    }

    pub fn get_duplicate_values(&self) -> u64 {
        self.duplicate_values.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        let failed = self.get_failed_files();
        let out_of_range = self.out_of_range_tokens.load(Ordering::Relaxed);
        let malformed = self.malformed_tokens.load(Ordering::Relaxed);

        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                    PROCESSING COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!("  {} {}/{}", "Files processed:".green(),
            self.get_processed_files(), self.get_total_files());
        if failed > 0 {
            println!("  {} {}", "Files failed:   ".red(), format_number(failed).red());
        }
        println!("  {} {} in, {} out", "Data:           ".green(),
            ByteSize(self.input_bytes.load(Ordering::Relaxed)),
            ByteSize(self.output_bytes.load(Ordering::Relaxed)));
        println!();

        println!("  {} {}", "Lines read:     ".green(), format_number(self.get_total_lines()));
        println!("  {} {}", "Tokens:         ".green(), format_number(self.get_total_tokens()));
        println!("  {} {}", "Accepted:       ".green(), format_number(self.get_accepted_tokens()));
        println!("  {} {}", "Out of range:   ".yellow(), format_number(out_of_range));
        println!("  {} {}", "Malformed:      ".yellow(), format_number(malformed));
        println!("  {} {}", "Duplicates:     ".yellow(), format_number(self.get_duplicate_values()));
        println!("  {} {}", "Unique output:  ".green().bold(),
            format_number(self.get_unique_values()).green().bold());

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
