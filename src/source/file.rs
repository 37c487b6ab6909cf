//! JSONL conversation files.
//!
//! One `ConversationSummary` per line, camelCase keys, RFC 3339 times:
//!
//! ```text
//! {"id":1,"displayName":"Ada","lastMessageTime":"2025-06-01T12:00:00Z","unreadCount":2}
//! ```
//!
//! Blank lines are skipped. Lines that fail to decode are logged and skipped;
//! a bad line never hides the rest of the file.

use crate::model::error::{InputError, ParseError};
use crate::model::ConversationSummary;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A conversation file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Open `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every decodable record.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the file cannot be read.
    pub fn read_all(&self) -> Result<Vec<ConversationSummary>, InputError> {
        let file = File::open(&self.path)?;
        let parsed = parse_lines(BufReader::new(file))?;

        for error in &parsed.errors {
            warn!(path = %self.path.display(), %error, "Skipping malformed line");
        }
        info!(
            path = %self.path.display(),
            records = parsed.summaries.len(),
            skipped = parsed.errors.len(),
            "Conversation file loaded"
        );
        Ok(parsed.summaries)
    }
}

/// Records and per-line failures from one read.
#[derive(Debug, Default)]
pub struct ParsedLines {
    /// Decoded records, in file order.
    pub summaries: Vec<ConversationSummary>,
    /// Lines that failed to decode.
    pub errors: Vec<ParseError>,
}

/// Decode one line. `line` is 1-based and only used for error reporting.
pub fn parse_line(line: usize, text: &str) -> Result<ConversationSummary, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::InvalidJson {
        line,
        message: e.to_string(),
    })
}

/// Decode every line of `reader`.
///
/// # Errors
///
/// Only I/O failures are errors; decode failures are collected in
/// [`ParsedLines::errors`].
pub fn parse_lines(reader: impl BufRead) -> Result<ParsedLines, InputError> {
    let mut parsed = ParsedLines::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match parse_line(i + 1, text) {
            Ok(summary) => parsed.summaries.push(summary),
            Err(e) => parsed.errors.push(e),
        }
    }
    Ok(parsed)
}
