//! Core statistics engine.
//!
//! This module contains:
//! - [`aggregator`] - The single-pass [`Analyzer`] and the word [`tokenize`]r
//! - [`stats`] - [`ConversationStats`] and its derived views
//! - [`sentiment`] - The [`SentimentScorer`] capability and [`LexiconScorer`]
//! - [`stopwords`] - [`StopwordSet`] used by word counting
//! - [`top_k`] - [`select_top_words`]
//!
//! # Quick Start
//!
//! ```rust
//! use convostats::core::{Analyzer, StopwordSet};
//! use convostats::config::AnalyzerConfig;
//!
//! let analyzer = Analyzer::new()
//!     .with_stopwords(StopwordSet::english().with_words(["lol"]))
//!     .with_config(AnalyzerConfig::new().with_top_k(20));
//! assert_eq!(analyzer.config().top_k, 20);
//! ```

pub mod aggregator;
pub mod sentiment;
pub mod stats;
pub mod stopwords;
pub mod top_k;

pub use aggregator::{Analyzer, tokenize};
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use stats::{ConversationStats, HourlyCounts, WEEKDAY_NAMES, WeekdayCounts, weekday_name};
pub use stopwords::StopwordSet;
pub use top_k::select_top_words;
