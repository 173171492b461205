//! Command-line interface definition using clap.
//!
//! [`Args`] is also usable outside the binary, e.g. to turn parsed flags into
//! a [`ScannerConfig`] with [`Args::scanner_config`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    AnalyzerConfig, DEFAULT_MIN_MESSAGES, DEFAULT_TOP_K, LoaderConfig, ScannerConfig,
};

/// Summarize a folder of exported Messenger conversations: who writes,
/// who starts the conversation, when, and about what.
#[derive(Parser, Debug, Clone)]
#[command(name = "convostats")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    convostats export/messages/inbox
    convostats inbox --top 20 --min-len 5
    convostats inbox --json > stats.json
    convostats inbox --utc -vv")]
pub struct Args {
    /// Folder containing conversation sub-folders
    pub folder: PathBuf,

    /// Print full statistics as JSON instead of summaries
    #[arg(long)]
    pub json: bool,

    /// Number of top words to print per conversation
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_K)]
    pub top: usize,

    /// Only count words at least this many characters long in the top list
    #[arg(long, value_name = "N")]
    pub min_len: Option<usize>,

    /// Minimum messages for a conversation to be reported
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_MESSAGES)]
    pub min_messages: usize,

    /// Bucket days and hours in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// Skip the mojibake repair step
    #[arg(long)]
    pub no_repair: bool,

    /// Abort on the first conversation that fails to load
    #[arg(long)]
    pub strict: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Scanner settings selected by these flags.
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig::new()
            .with_skip_failures(!self.strict)
            .with_parallel(true)
            .with_loader(LoaderConfig::new().with_repair_encoding(!self.no_repair))
            .with_analyzer(
                AnalyzerConfig::new()
                    .with_min_messages(self.min_messages)
                    .with_top_k(self.top),
            )
    }

    /// Default log filter directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
