//! Unified error types for convostats.
//!
//! Every fallible operation in the crate returns [`StatsError`]. The variants
//! map one-to-one onto the ways a conversation can fail to load:
//!
//! - **Malformed archives**: a fragment that is unreadable, not JSON, or lacks `title`/`messages`
//! - **Encoding repair**: mis-encoded text that does not decode back to UTF-8
//! - **Invalid records**: a message without `sender_name` or `timestamp_ms`
//!
//! The [`Scanner`](crate::scanner::Scanner) isolates these per conversation;
//! the loader and normalizer surface them directly to their caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for convostats operations.
///
/// # Example
///
/// ```rust
/// use convostats::error::Result;
/// use convostats::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, StatsError>;

/// The error type for all convostats operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    /// An I/O error occurred while reading a fragment or walking a folder.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A fragment file is not valid JSON or lacks a required top-level field.
    #[error("Malformed archive{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    MalformedArchive {
        /// The fragment path, if the content came from a file
        path: Option<PathBuf>,
        /// What was wrong with it
        #[source]
        source: ParseErrorKind,
    },

    /// Mis-encoded text could not be turned back into UTF-8.
    #[error("Encoding repair failed in {context}: {detail}")]
    EncodingRepair {
        /// Which field was being repaired (e.g. "title", "message 4 content")
        context: String,
        /// Why the repair failed
        #[source]
        detail: RepairFailure,
    },

    /// A message record is missing a required field or carries an unusable value.
    #[error("Invalid record at index {index}: missing or invalid '{field}'")]
    InvalidRecord {
        /// Position of the record in the merged (pre-sort) message list
        index: usize,
        /// The offending field name
        field: &'static str,
    },

    /// The fragment-name pattern in the scanner configuration does not compile.
    #[error("Invalid fragment pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The scan root does not exist or is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Kinds of malformed-archive failures.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// The document is not valid JSON (or has the wrong shape)
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The fragment file could not be read as UTF-8 text
    #[error("unreadable file: {0}")]
    Io(#[from] io::Error),
    /// A required top-level field is absent
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// Why a text-repair step failed.
#[derive(Debug, Error)]
pub enum RepairFailure {
    /// A character's code point does not fit in a single byte.
    #[error("character {ch:?} (U+{code:04X}) at position {position} is not a byte value")]
    NotAByte {
        /// The offending character
        ch: char,
        /// Its code point
        code: u32,
        /// Character index within the string
        position: usize,
    },
    /// The reconstructed bytes are not valid UTF-8.
    #[error("{0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl StatsError {
    /// Creates a malformed-archive error from a JSON failure.
    pub fn malformed(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        StatsError::MalformedArchive {
            path,
            source: ParseErrorKind::Json(source),
        }
    }

    /// Creates a malformed-archive error for a fragment file that cannot be read.
    pub fn unreadable(source: io::Error, path: impl Into<PathBuf>) -> Self {
        StatsError::MalformedArchive {
            path: Some(path.into()),
            source: ParseErrorKind::Io(source),
        }
    }

    /// Creates a malformed-archive error for an absent top-level field.
    pub fn missing_field(field: &'static str, path: Option<PathBuf>) -> Self {
        StatsError::MalformedArchive {
            path,
            source: ParseErrorKind::MissingField(field),
        }
    }

    /// Creates an encoding-repair error.
    pub fn encoding_repair(context: impl Into<String>, detail: RepairFailure) -> Self {
        StatsError::EncodingRepair {
            context: context.into(),
            detail,
        }
    }

    /// Creates an invalid-record error.
    pub fn invalid_record(index: usize, field: &'static str) -> Self {
        StatsError::InvalidRecord { index, field }
    }

    /// Attaches a file path to a malformed-archive error that has none.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            StatsError::MalformedArchive { path: None, source } => StatsError::MalformedArchive {
                path: Some(file.into()),
                source,
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, StatsError::Io(_))
    }

    /// Returns `true` if this is a malformed-archive error.
    pub fn is_malformed_archive(&self) -> bool {
        matches!(self, StatsError::MalformedArchive { .. })
    }

    /// Returns `true` if this is an encoding-repair error.
    pub fn is_encoding_repair(&self) -> bool {
        matches!(self, StatsError::EncodingRepair { .. })
    }

    /// Returns `true` if this is an invalid-record error.
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, StatsError::InvalidRecord { .. })
    }
}
