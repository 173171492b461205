//! Configuration types for loading, aggregation and scanning.
//!
//! Plain builder structs with no CLI framework dependencies. The defaults
//! reproduce the fixed policies of the analysis: encoding repair on,
//! conversations under 10 messages dropped, a 4-hour gap starting a new
//! session, 42 top words, and fragment files named `message*`.
//!
//! # Example
//!
//! ```rust
//! use convostats::config::{AnalyzerConfig, ScannerConfig};
//!
//! let config = ScannerConfig::new()
//!     .with_parallel(true)
//!     .with_analyzer(AnalyzerConfig::new().with_min_messages(50));
//!
//! assert_eq!(config.analyzer.min_messages, 50);
//! ```

use serde::{Deserialize, Serialize};

/// Default number of words returned by the top-K selector.
pub const DEFAULT_TOP_K: usize = 42;

/// Conversations with fewer records than this are not analysed.
pub const DEFAULT_MIN_MESSAGES: usize = 10;

/// A gap of at least this many whole hours starts a new conversation segment.
pub const DEFAULT_SESSION_GAP_HOURS: i64 = 4;

/// Fragment files are those whose name matches this pattern.
pub const DEFAULT_FRAGMENT_PATTERN: &str = "^message";

/// Configuration for the archive loader.
///
/// # Example
///
/// ```rust
/// use convostats::config::LoaderConfig;
///
/// let config = LoaderConfig::new().with_repair_encoding(false);
/// assert!(!config.repair_encoding);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Undo the byte-per-code-point mis-encoding of exported text (default: true)
    pub repair_encoding: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            repair_encoding: true,
        }
    }
}

impl LoaderConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables encoding repair.
    #[must_use]
    pub fn with_repair_encoding(mut self, repair: bool) -> Self {
        self.repair_encoding = repair;
        self
    }
}

/// Configuration for the statistics aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Minimum record count for a conversation to be analysed (default: 10)
    pub min_messages: usize,

    /// Whole hours of silence that start a new segment (default: 4)
    pub session_gap_hours: i64,

    /// Number of words reported by [`ConversationStats::top_words`](crate::core::ConversationStats::top_words) (default: 42)
    pub top_k: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_messages: DEFAULT_MIN_MESSAGES,
            session_gap_hours: DEFAULT_SESSION_GAP_HOURS,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum record count.
    #[must_use]
    pub fn with_min_messages(mut self, min: usize) -> Self {
        self.min_messages = min;
        self
    }

    /// Sets the session gap in whole hours.
    #[must_use]
    pub fn with_session_gap_hours(mut self, hours: i64) -> Self {
        self.session_gap_hours = hours;
        self
    }

    /// Sets the default top-K word count.
    #[must_use]
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
}

/// Configuration for the conversation scanner.
///
/// # Example
///
/// ```rust
/// use convostats::config::ScannerConfig;
///
/// let config = ScannerConfig::new()
///     .with_fragment_pattern(r"^message_\d+\.json$")
///     .with_skip_failures(false);
/// assert!(!config.skip_failures);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Regex matched against file names to find fragments (default: `^message`)
    pub fragment_pattern: String,

    /// Log and skip failing conversations instead of aborting the scan (default: true)
    pub skip_failures: bool,

    /// Process fragment groups on a worker pool (default: false, needs the `parallel` feature)
    pub parallel: bool,

    /// Loader settings applied to every group
    pub loader: LoaderConfig,

    /// Aggregator settings applied to every group
    pub analyzer: AnalyzerConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fragment_pattern: DEFAULT_FRAGMENT_PATTERN.to_string(),
            skip_failures: true,
            parallel: false,
            loader: LoaderConfig::default(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fragment file-name pattern.
    #[must_use]
    pub fn with_fragment_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.fragment_pattern = pattern.into();
        self
    }

    /// Sets whether failing conversations are skipped.
    #[must_use]
    pub fn with_skip_failures(mut self, skip: bool) -> Self {
        self.skip_failures = skip;
        self
    }

    /// Enables or disables parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the loader configuration.
    #[must_use]
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// Sets the analyzer configuration.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }
}
