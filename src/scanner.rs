//! Conversation scanner.
//!
//! Walks a directory tree and treats every directory that directly holds
//! fragment files (by default, files whose name starts with `message`) as one
//! conversation. Each group is loaded, normalized and aggregated on its own;
//! a failing conversation is logged and skipped so one bad export never
//! aborts the batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use convostats::scanner::Scanner;
//!
//! let scanner = Scanner::new();
//! for stats in scanner.scan("facebook-export/messages/inbox")? {
//!     println!("{stats}");
//! }
//! # Ok::<(), convostats::StatsError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, TimeZone};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ScannerConfig;
use crate::core::{Analyzer, ConversationStats, LexiconScorer, SentimentScorer};
use crate::error::StatsError;
use crate::loader::ArchiveLoader;

/// The fragment files of one conversation directory, in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// A conversation left out of the scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedConversation {
    pub directory: PathBuf,
    pub reason: String,
}

/// Retained conversations, ranked, plus what was left out and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub conversations: Vec<ConversationStats>,
    pub skipped: Vec<SkippedConversation>,
}

/// Batch driver over a directory of conversation exports.
#[derive(Debug, Clone)]
pub struct Scanner<S = LexiconScorer, Tz = Local> {
    config: ScannerConfig,
    loader: ArchiveLoader,
    analyzer: Analyzer<S, Tz>,
}

impl Scanner {
    /// Creates a scanner with default settings.
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    /// Creates a scanner with the built-in analyzer and the given settings.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            loader: ArchiveLoader::with_config(config.loader.clone()),
            analyzer: Analyzer::new().with_config(config.analyzer.clone()),
            config,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

enum Outcome {
    Retained(ConversationStats),
    TooSmall,
    Failed(StatsError),
}

impl<S, Tz> Scanner<S, Tz>
where
    S: SentimentScorer,
    Tz: TimeZone + Send + Sync,
{
    /// Replaces the analyzer, keeping the scanner's other settings.
    ///
    /// The analyzer's own [`AnalyzerConfig`](crate::config::AnalyzerConfig)
    /// is used from then on.
    pub fn with_analyzer<S2, Tz2>(self, analyzer: Analyzer<S2, Tz2>) -> Scanner<S2, Tz2>
    where
        S2: SentimentScorer,
        Tz2: TimeZone + Send + Sync,
    {
        let mut config = self.config;
        config.analyzer = analyzer.config().clone();
        Scanner {
            config,
            loader: self.loader,
            analyzer,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scans `root` and returns the retained conversations, largest first.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory or the fragment pattern is invalid.
    /// With `skip_failures` disabled, the first failing conversation is
    /// returned as the error.
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<Vec<ConversationStats>, StatsError> {
        Ok(self.scan_with_report(root)?.conversations)
    }

    /// Like [`scan`](Self::scan), but also reports skipped conversations.
    pub fn scan_with_report(&self, root: impl AsRef<Path>) -> Result<ScanReport, StatsError> {
        let root = root.as_ref();
        let started = Instant::now();

        let groups = self.discover(root)?;
        info!(root = %root.display(), groups = groups.len(), "discovered conversations");

        let outcomes = self.process_all(&groups);

        let mut report = ScanReport::default();
        for (group, outcome) in groups.into_iter().zip(outcomes) {
            match outcome {
                Outcome::Retained(stats) => report.conversations.push(stats),
                Outcome::TooSmall => report.skipped.push(SkippedConversation {
                    directory: group.directory,
                    reason: format!(
                        "fewer than {} messages",
                        self.config.analyzer.min_messages
                    ),
                }),
                Outcome::Failed(err) if self.config.skip_failures => {
                    warn!(
                        directory = %group.directory.display(),
                        error = %err,
                        "skipping conversation"
                    );
                    report.skipped.push(SkippedConversation {
                        directory: group.directory,
                        reason: err.to_string(),
                    });
                }
                Outcome::Failed(err) => return Err(err),
            }
        }

        // Stable: equal totals keep discovery order.
        report
            .conversations
            .sort_by(|a, b| b.total_messages.cmp(&a.total_messages));

        info!(
            retained = report.conversations.len(),
            skipped = report.skipped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(report)
    }

    /// Finds every directory under `root` (itself included) that directly
    /// holds fragment files.
    ///
    /// Directories are visited in file-name order and files within a group
    /// are sorted by name, so discovery order is deterministic.
    pub fn discover(&self, root: &Path) -> Result<Vec<FragmentGroup>, StatsError> {
        if !root.is_dir() {
            return Err(StatsError::NotADirectory(root.to_path_buf()));
        }
        let pattern = Regex::new(&self.config.fragment_pattern)?;

        let mut groups = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            match fragment_files(entry.path(), &pattern) {
                Ok(files) if files.is_empty() => {}
                Ok(files) => groups.push(FragmentGroup {
                    directory: entry.into_path(),
                    files,
                }),
                Err(err) => {
                    warn!(directory = %entry.path().display(), error = %err, "unreadable directory");
                }
            }
        }
        Ok(groups)
    }

    /// Loads and aggregates one fragment group.
    ///
    /// Returns `Ok(None)` for conversations below the minimum size.
    pub fn analyze_group(
        &self,
        group: &FragmentGroup,
    ) -> Result<Option<ConversationStats>, StatsError> {
        let fragment = self.loader.load(&group.files)?;
        self.analyzer.analyze_fragment(fragment)
    }

    fn process(&self, group: &FragmentGroup) -> Outcome {
        debug!(directory = %group.directory.display(), files = group.files.len(), "analyzing");
        match self.analyze_group(group) {
            Ok(Some(stats)) => Outcome::Retained(stats),
            Ok(None) => Outcome::TooSmall,
            Err(err) => Outcome::Failed(err),
        }
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, groups: &[FragmentGroup]) -> Vec<Outcome> {
        if self.config.parallel {
            groups.par_iter().map(|group| self.process(group)).collect()
        } else {
            groups.iter().map(|group| self.process(group)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, groups: &[FragmentGroup]) -> Vec<Outcome> {
        if self.config.parallel {
            debug!("parallel scanning requested but the `parallel` feature is disabled");
        }
        groups.iter().map(|group| self.process(group)).collect()
    }
}

fn fragment_files(directory: &Path, pattern: &Regex) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(|name| pattern.is_match(name)) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
