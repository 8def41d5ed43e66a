//! Output management module
//!
//! Derives results file names and writes sorted integers through a temporary
//! file that only replaces the target once everything has been written.

use crate::cli::NamingMode;
use crate::error::{ProcessError, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to every results file name
pub const RESULTS_SUFFIX: &str = "_results.txt";

/// Extension stripped from the intended output name in extension mode
const INPUT_EXTENSION: &str = ".txt";

/// Line terminator used in results files
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Map an intended output path to the results file actually written
///
/// Only the file name changes; the parent directory is kept as given.
pub fn results_path(intended: &Path, mode: NamingMode) -> PathBuf {
    let name = intended
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match mode {
        NamingMode::Extension => name.strip_suffix(INPUT_EXTENSION).unwrap_or(&name).to_string(),
        NamingMode::Truncate => {
            let keep = name.chars().count().saturating_sub(4);
            name.chars().take(keep).collect()
        }
    };

    intended.with_file_name(format!("{}{}", stem, RESULTS_SUFFIX))
}

/// Buffered writer for one results file
///
/// Writes go to a hidden sibling (`.<name>.tmp`). [`ResultsWriter::commit`]
/// flushes and renames it over the target; dropping without a successful
/// commit removes the temporary so a failed run never leaves a partial file.
pub struct ResultsWriter {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    temp_path: PathBuf,
    committed: bool,
    bytes_written: u64,
}

impl ResultsWriter {
    /// Create a new results writer targeting `path`
    pub fn create(path: PathBuf) -> Result<Self> {
        let temp_path = temp_path_for(&path);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|source| ProcessError::Write {
                path: temp_path.clone(),
                source,
            })?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
            temp_path,
            committed: false,
            bytes_written: 0,
        })
    }

    /// Write one integer followed by the platform line terminator
    pub fn write_value(&mut self, value: i32) -> Result<()> {
        let line = value.to_string();
        if let Some(writer) = self.writer.as_mut() {
            write!(writer, "{}{}", line, LINE_ENDING).map_err(|source| ProcessError::Write {
                path: self.temp_path.clone(),
                source,
            })?;
        }
        self.bytes_written += (line.len() + LINE_ENDING.len()) as u64;
        Ok(())
    }

    /// Flush, close and move the temporary file into place
    pub fn commit(mut self) -> Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| ProcessError::Write {
                path: self.temp_path.clone(),
                source: e.into_error(),
            })?;
            file.sync_all().map_err(|source| ProcessError::Write {
                path: self.temp_path.clone(),
                source,
            })?;
        }

        fs::rename(&self.temp_path, &self.path).map_err(|source| ProcessError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.committed = true;

        Ok(self.path.clone())
    }

    /// Get bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for ResultsWriter {
    fn drop(&mut self) {
        if !self.committed {
            // Close the handle before removing the file
            drop(self.writer.take());
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write sorted values to the results file in one go
pub fn write_results(path: PathBuf, values: &[i32]) -> Result<(PathBuf, u64)> {
    let mut writer = ResultsWriter::create(path)?;
    for &value in values {
        writer.write_value(value)?;
    }
    let bytes = writer.bytes_written();
    let path = writer.commit()?;
    Ok((path, bytes))
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|source| ProcessError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
