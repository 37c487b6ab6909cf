//! Conversation data sources.
//!
//! - File: a JSONL file of summaries, read once
//! - Synthetic: seeded demo data

use crate::model::error::InputError;
use crate::model::ConversationSummary;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod file;
pub mod synthetic;

pub use file::FileSource;
pub use synthetic::SyntheticSource;

/// Conversations generated when no file is given.
pub const DEFAULT_SYNTHETIC_COUNT: usize = 100;

/// Where the initial conversation list comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// JSONL file.
    File(FileSource),
    /// Generated demo data.
    Synthetic {
        /// Number of conversations.
        count: usize,
        /// Generator seed.
        seed: u64,
    },
}

impl InputSource {
    /// Read or generate every conversation.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if a file source cannot be read.
    pub fn load(&self, now: DateTime<Utc>) -> Result<Vec<ConversationSummary>, InputError> {
        match self {
            InputSource::File(file) => file.read_all(),
            InputSource::Synthetic { count, seed } => {
                Ok(SyntheticSource::new(*seed).conversations(*count, now))
            }
        }
    }

    /// Short description for the status line.
    pub fn describe(&self) -> String {
        match self {
            InputSource::File(file) => file.path().display().to_string(),
            InputSource::Synthetic { count, seed } => format!("synthetic ({count}, seed {seed})"),
        }
    }
}

/// Pick the source: a file when one is given, else synthetic data.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if `file` does not exist.
pub fn detect_input_source(
    file: Option<PathBuf>,
    count: Option<usize>,
    seed: u64,
) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Synthetic {
            count: count.unwrap_or(DEFAULT_SYNTHETIC_COUNT),
            seed,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn no_file_means_synthetic_with_default_count() {
        let source = detect_input_source(None, None, 1).unwrap();
        assert_eq!(source.load(now()).unwrap().len(), DEFAULT_SYNTHETIC_COUNT);
    }

    #[test]
    fn count_overrides_default() {
        let source = detect_input_source(None, Some(7), 1).unwrap();
        assert_eq!(source.load(now()).unwrap().len(), 7);
        assert_eq!(source.describe(), "synthetic (7, seed 1)");
    }

    #[test]
    fn missing_file_fails_detection() {
        let err = detect_input_source(Some(PathBuf::from("/nonexistent/x.jsonl")), None, 0);
        assert!(matches!(err, Err(InputError::FileNotFound { .. })));
    }
}
