//! Encoding detection and line reading module
//!
//! Input files are expected to be UTF-8 or ASCII, but a BOM or a chardetng guess
//! lets other encodings through as well. Everything is decoded to UTF-8 before
//! the tokenizer sees it.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Bytes sampled from the start of a file for detection
const SAMPLE_SIZE: usize = 64 * 1024;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Whether a byte order mark decided the encoding
    pub from_bom: bool,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            from_bom: false,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> io::Result<EncodingInfo> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample)?;

    if sample.is_empty() {
        return Ok(EncodingInfo::default());
    }

    if let Some(encoding) = detect_bom(&sample) {
        return Ok(EncodingInfo {
            name: encoding.name(),
            from_bom: true,
            encoding,
        });
    }

    // Valid UTF-8 (which includes plain ASCII) needs no guessing
    if std::str::from_utf8(&sample).is_ok() {
        return Ok(EncodingInfo::default());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, true);
    let encoding = detector.guess(None, true);

    Ok(EncodingInfo {
        name: encoding.name(),
        from_bom: false,
        encoding,
    })
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<&'static Encoding> {
    if content.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(encoding_rs::UTF_8);
    }
    if content.starts_with(&[0xFE, 0xFF]) {
        return Some(encoding_rs::UTF_16BE);
    }
    if content.starts_with(&[0xFF, 0xFE]) {
        return Some(encoding_rs::UTF_16LE);
    }
    None
}

/// Line iterator over a file decoded to UTF-8
///
/// Line terminators (`\n` or `\r\n`) are removed. Undecodable bytes become
/// U+FFFD rather than errors. The file handle closes when the iterator drops.
pub struct EncodedLineIterator {
    reader: BufReader<DecodeReaderBytes<File, Vec<u8>>>,
    info: EncodingInfo,
    line_buffer: Vec<u8>,
}

impl EncodedLineIterator {
    /// Create a new line iterator for a file with automatic encoding detection
    pub fn new(path: &Path) -> io::Result<Self> {
        let info = detect_encoding(path)?;
        let file = File::open(path)?;
        // A BOM in the file still wins over the detected encoding
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(info.encoding))
            .build(file);

        Ok(Self {
            reader: BufReader::with_capacity(64 * 1024, decoder),
            info,
            line_buffer: Vec::with_capacity(4096),
        })
    }

    /// What detection decided for this file
    pub fn encoding_info(&self) -> &EncodingInfo {
        &self.info
    }
}

impl Iterator for EncodedLineIterator {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.line_buffer.strip_suffix(b"\n").unwrap_or(&self.line_buffer[..]);
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
