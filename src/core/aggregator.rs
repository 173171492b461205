//! Statistics aggregator.
//!
//! [`Analyzer::aggregate`] makes a single forward pass over a conversation's
//! normalized messages and fills every counter of [`ConversationStats`].
//! The sentiment scorer, stopword set and bucketing time zone are injected
//! through the analyzer rather than held in globals, so tests can swap in
//! stubs and a fixed offset.
//!
//! # Initiation heuristic
//!
//! A message starts a new conversation segment when it is the first message,
//! or when the time since the previous message, floored to whole hours, is at
//! least [`session_gap_hours`](AnalyzerConfig::session_gap_hours) (4 by
//! default). Exactly 4h00m00s counts; 3h59m59s does not.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use tracing::debug;

use crate::Message;
use crate::config::AnalyzerConfig;
use crate::core::sentiment::{LexiconScorer, SentimentScorer};
use crate::core::stats::{ConversationStats, HourlyCounts, WeekdayCounts};
use crate::core::stopwords::StopwordSet;
use crate::error::StatsError;
use crate::normalizer::normalize_fragment;
use crate::parsing::RawFragment;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Splits content into frequency-table tokens.
///
/// Content is split on single spaces; each piece is lowercased and stripped
/// of leading/trailing ASCII punctuation. A piece made only of punctuation is
/// kept in its lowercased form. Tokens of one character or fewer and
/// stopwords are dropped.
///
/// # Example
///
/// ```rust
/// use convostats::core::{StopwordSet, tokenize};
///
/// let stopwords = StopwordSet::english();
/// let tokens: Vec<_> = tokenize("The PIZZA was great!! :)", &stopwords).collect();
/// assert_eq!(tokens, vec!["pizza", "great", ":)"]);
/// ```
pub fn tokenize<'a>(
    content: &'a str,
    stopwords: &'a StopwordSet,
) -> impl Iterator<Item = String> + 'a {
    content.split(' ').filter_map(move |word| {
        let lower = word.to_lowercase();
        let stripped = lower.trim_matches(|c: char| c.is_ascii_punctuation());
        let token = if stripped.is_empty() { &lower } else { stripped };

        (token.chars().count() > 1 && !stopwords.contains(token)).then(|| token.to_string())
    })
}

/// Aggregates normalized messages into [`ConversationStats`].
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use convostats::Message;
/// use convostats::config::AnalyzerConfig;
/// use convostats::core::Analyzer;
///
/// let analyzer = Analyzer::new()
///     .with_timezone(Utc)
///     .with_scorer(|_: &str| 0.0)
///     .with_config(AnalyzerConfig::new().with_min_messages(1));
///
/// let at = |ms| Utc.timestamp_millis_opt(ms).unwrap();
/// let messages = vec![
///     Message::new("A", at(0)).with_content("hello world"),
///     Message::new("B", at(5 * 60_000)).with_content("hello"),
///     Message::new("A", at(5 * 3_600_000)).with_content("hi"),
/// ];
///
/// let stats = analyzer.aggregate("Chat", messages).unwrap();
/// assert_eq!(stats.total_messages, 3);
/// assert_eq!(stats.initiations_by_sender.get("A"), Some(&2));
/// assert_eq!(stats.initiations_by_sender.get("B"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer<S = LexiconScorer, Tz = Local> {
    scorer: S,
    stopwords: StopwordSet,
    timezone: Tz,
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Creates an analyzer with the built-in scorer, English stopwords and
    /// the local time zone.
    pub fn new() -> Self {
        Self {
            scorer: LexiconScorer::new(),
            stopwords: StopwordSet::english(),
            timezone: Local,
            config: AnalyzerConfig::default(),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SentimentScorer, Tz: TimeZone> Analyzer<S, Tz> {
    /// Replaces the sentiment scorer.
    pub fn with_scorer<S2: SentimentScorer>(self, scorer: S2) -> Analyzer<S2, Tz> {
        Analyzer {
            scorer,
            stopwords: self.stopwords,
            timezone: self.timezone,
            config: self.config,
        }
    }

    /// Replaces the time zone used to derive day, month, weekday and hour.
    pub fn with_timezone<Tz2: TimeZone>(self, timezone: Tz2) -> Analyzer<S, Tz2> {
        Analyzer {
            scorer: self.scorer,
            stopwords: self.stopwords,
            timezone,
            config: self.config,
        }
    }

    /// Replaces the stopword set.
    #[must_use]
    pub fn with_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Normalizes a loaded fragment and aggregates it.
    ///
    /// Returns `Ok(None)` when the conversation is below the minimum size.
    pub fn analyze_fragment(
        &self,
        fragment: RawFragment,
    ) -> Result<Option<ConversationStats>, StatsError> {
        let (title, messages) = normalize_fragment(fragment)?;
        Ok(self.aggregate(title, messages))
    }

    /// Runs the aggregation pass.
    ///
    /// `messages` should be sorted by timestamp, as produced by
    /// [`normalize`](crate::normalizer::normalize): initiations are detected
    /// from gaps in the order given. The first and last timestamps are the
    /// minimum and maximum seen, whatever the order. Returns `None` when there
    /// are fewer than [`min_messages`](AnalyzerConfig::min_messages) records.
    pub fn aggregate(
        &self,
        title: impl Into<String>,
        messages: Vec<Message>,
    ) -> Option<ConversationStats> {
        let title = title.into();

        if messages.len() < self.config.min_messages {
            debug!(
                title = %title,
                records = messages.len(),
                min = self.config.min_messages,
                "conversation below minimum size, skipped"
            );
            return None;
        }

        let started = Instant::now();
        let total_messages = messages.len();

        let mut participants = BTreeSet::new();
        let mut counts_by_sender: BTreeMap<String, usize> = BTreeMap::new();
        let mut initiations_by_sender: BTreeMap<String, usize> = BTreeMap::new();
        let mut daily_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut daily_counts_by_sender: BTreeMap<String, BTreeMap<String, usize>> =
            BTreeMap::new();
        let mut monthly_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut daily_sticker_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut monthly_sticker_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut sentiment_sums: BTreeMap<String, f64> = BTreeMap::new();
        let mut word_frequencies: HashMap<String, usize> = HashMap::new();
        let mut hourly_counts = HourlyCounts::default();
        let mut day_name_counts = WeekdayCounts::default();
        let mut content_messages = Vec::new();

        let mut previous_ms: Option<i64> = None;
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

        for message in messages {
            let sender = message.sender.clone();
            let local = message.timestamp.with_timezone(&self.timezone).naive_local();
            let day = local.format("%Y-%m-%d").to_string();
            let month = local.format("%Y-%m").to_string();

            let timestamp_ms = message.timestamp_ms();
            let starts_segment = previous_ms.is_none_or(|prev| {
                (timestamp_ms - prev).div_euclid(MS_PER_HOUR) >= self.config.session_gap_hours
            });
            if starts_segment {
                *initiations_by_sender.entry(sender.clone()).or_default() += 1;
            }
            previous_ms = Some(timestamp_ms);
            bounds = Some(match bounds {
                Some((first, last)) => (first.min(message.timestamp), last.max(message.timestamp)),
                None => (message.timestamp, message.timestamp),
            });

            participants.insert(sender.clone());
            *counts_by_sender.entry(sender.clone()).or_default() += 1;
            hourly_counts.increment(local.hour());
            day_name_counts.increment(local.weekday());
            *daily_counts.entry(day.clone()).or_default() += 1;
            *daily_counts_by_sender
                .entry(day.clone())
                .or_default()
                .entry(sender)
                .or_default() += 1;
            *monthly_counts.entry(month.clone()).or_default() += 1;

            if message.has_sticker {
                *daily_sticker_counts.entry(day.clone()).or_default() += 1;
                *monthly_sticker_counts.entry(month).or_default() += 1;
            }

            if let Some(content) = message.content.as_deref() {
                *sentiment_sums.entry(day).or_default() += self.scorer.score(content);
                for token in tokenize(content, &self.stopwords) {
                    *word_frequencies.entry(token).or_default() += 1;
                }
                content_messages.push(message);
            }
        }

        let (first, last) = bounds?;

        // Averaged over every record of the day, content-less ones included.
        let daily_sentiments = sentiment_sums
            .into_iter()
            .map(|(day, sum)| {
                let count = daily_counts.get(&day).copied().unwrap_or(1);
                (day, sum / count as f64)
            })
            .collect();

        debug!(
            title = %title,
            records = total_messages,
            with_content = content_messages.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregated conversation"
        );

        Some(ConversationStats {
            title,
            participants,
            messages: content_messages,
            total_messages,
            counts_by_sender,
            initiations_by_sender,
            daily_counts_by_sender,
            monthly_counts,
            hourly_counts,
            day_name_counts,
            daily_sticker_counts,
            monthly_sticker_counts,
            daily_sentiments,
            word_frequencies,
            first_timestamp: first,
            last_timestamp: last,
            top_k: self.config.top_k,
        })
    }
}
