//! # convostats
//!
//! Per-conversation statistics over Facebook Messenger JSON exports.
//!
//! ## Overview
//!
//! A Messenger export holds one directory per conversation, each with one or
//! more `message*.json` fragment files. convostats turns each conversation
//! into a [`ConversationStats`](core::ConversationStats):
//!
//! - message counts per sender, day, month, hour and weekday
//! - who initiates conversations (first message after a 4 hour silence)
//! - sticker tallies per day and month
//! - average sentiment per day
//! - word frequencies with stopwords removed, and top-K words
//!
//! ## Pipeline
//!
//! Data flows one way:
//!
//! 1. [`loader`] reads and merges fragments and repairs mis-encoded text
//! 2. [`normalizer`] validates records into [`Message`]s sorted by time
//! 3. [`core::Analyzer`] aggregates them in a single pass
//! 4. [`scanner`] runs the above for every conversation under a folder and
//!    ranks the results by size
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convostats::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let conversations = Scanner::new().scan("messages/inbox")?;
//!     for stats in &conversations {
//!         println!("{stats}");
//!         for (word, count) in stats.top_words_with_min_len(20, 5) {
//!             println!("  {word}: {count}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Single Conversation
//!
//! ```rust
//! use convostats::prelude::*;
//!
//! let json = r#"{"title": "Chat", "messages": [
//!     {"sender_name": "Ana", "timestamp_ms": 1000, "content": "good morning"},
//!     {"sender_name": "Ben", "timestamp_ms": 2000, "sticker": {"uri": "s.png"}}
//! ]}"#;
//!
//! let fragment = ArchiveLoader::new().load_strs(&[json])?;
//! let analyzer = Analyzer::new().with_config(AnalyzerConfig::new().with_min_messages(1));
//! let stats = analyzer.analyze_fragment(fragment)?.unwrap();
//!
//! assert_eq!(stats.total_messages, 2);
//! assert_eq!(stats.messages.len(), 1);
//! # Ok::<(), convostats::StatsError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`loader`] / [`parsing`] - Archive fragments and encoding repair
//! - [`normalizer`] - Record validation and ordering
//! - [`core`] - Aggregation, sentiment, stopwords, top-K
//! - [`scanner`] - Directory batch driver
//! - [`config`] - Builder-style settings
//! - [`error`] - [`StatsError`] and [`Result`]
//! - `cli` - CLI arguments (feature `cli`)
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod loader;
pub mod message;
pub mod normalizer;
pub mod parsing;
pub mod scanner;

// Re-export the main types at the crate root for convenience
pub use error::{Result, StatsError};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use convostats::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;

    pub use crate::error::{Result, StatsError};

    pub use crate::config::{AnalyzerConfig, LoaderConfig, ScannerConfig};

    pub use crate::loader::ArchiveLoader;
    pub use crate::normalizer::normalize;

    pub use crate::core::{
        Analyzer, ConversationStats, LexiconScorer, SentimentScorer, StopwordSet,
        select_top_words,
    };

    pub use crate::scanner::{ScanReport, Scanner, SkippedConversation};
}
