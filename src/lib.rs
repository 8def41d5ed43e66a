//! # Unique Int Processor
//!
//! Extracts bounded integers from directories of text files, deduplicates and
//! sorts them, and writes one results file per input.
//!
//! ## Pipeline
//!
//! - **Tokenize**: split each line on whitespace
//! - **Filter**: keep tokens that are base-10 integers in [-1023, 1023]
//! - **Deduplicate**: collapse repeats across the whole file
//! - **Sort**: three-way quicksort, ascending
//! - **Write**: one value per line to `<name>_results.txt`, atomically
//!
//! ## Usage
//!
//! ```bash
//! unique-int-processor -i sample_inputs -o sample_results
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use unique_int_processor::processor::{Processor, ProcessorConfig};
//! use std::path::Path;
//!
//! let processor = Processor::new(ProcessorConfig::default());
//! let report = processor
//!     .process_directory(Path::new("sample_inputs"), Path::new("sample_results"))
//!     .unwrap();
//! println!("{} files processed", report.succeeded().count());
//! ```

pub mod cli;
pub mod dedup;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod output;
pub mod processor;
pub mod progress;
pub mod sort;

pub use cli::Args;
pub use error::ProcessError;
pub use processor::{Processor, ProcessorConfig};
