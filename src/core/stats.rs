//! Per-conversation statistics.
//!
//! A [`ConversationStats`] is produced once by the
//! [`Analyzer`](crate::core::Analyzer), fully populated, and is read-only
//! from then on. Counters over open domains (senders, days, months, words)
//! are maps that only hold keys that were seen; hours and weekdays use
//! fixed-size buckets.
//!
//! Serialized keys: days as `YYYY-MM-DD`, months as `YYYY-MM`, hours as
//! integers 0-23, weekdays as English day names.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc, Weekday};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::Message;
use crate::core::top_k::select_top_words;

/// English weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Returns the English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Message counts per hour of the day (0-23).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourlyCounts([usize; 24]);

impl HourlyCounts {
    /// Count for `hour`; hours outside 0-23 count as zero.
    pub fn get(&self, hour: u32) -> usize {
        self.0.get(hour as usize).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, hour: u32) {
        self.0[hour as usize] += 1;
    }

    /// `(hour, count)` pairs in hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        (0u32..).zip(self.0.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Serialize for HourlyCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(24))?;
        for (hour, count) in self.iter() {
            map.serialize_entry(&hour, &count)?;
        }
        map.end()
    }
}

/// Message counts per day of the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayCounts([usize; 7]);

impl WeekdayCounts {
    pub fn get(&self, day: Weekday) -> usize {
        self.0[day.num_days_from_monday() as usize]
    }

    pub(crate) fn increment(&mut self, day: Weekday) {
        self.0[day.num_days_from_monday() as usize] += 1;
    }

    /// `(weekday, count)` pairs, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, usize)> + '_ {
        WEEKDAYS.iter().copied().zip(self.0.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Serialize for WeekdayCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, count) in self.iter() {
            map.serialize_entry(weekday_name(day), &count)?;
        }
        map.end()
    }
}

/// Aggregate statistics for one conversation.
///
/// Invariants upheld by the aggregator:
/// - `counts_by_sender` sums to `total_messages`
/// - each `daily_counts_by_sender[day]` sums to `daily_counts()[day]`
/// - `messages` holds content-bearing messages only, in timestamp order
/// - `daily_sentiments` only has days with at least one content-bearing message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStats {
    pub title: String,
    pub participants: BTreeSet<String>,
    pub messages: Vec<Message>,
    /// All records, content-less ones included.
    pub total_messages: usize,
    pub counts_by_sender: BTreeMap<String, usize>,
    pub initiations_by_sender: BTreeMap<String, usize>,
    pub daily_counts_by_sender: BTreeMap<String, BTreeMap<String, usize>>,
    pub monthly_counts: BTreeMap<String, usize>,
    pub hourly_counts: HourlyCounts,
    pub day_name_counts: WeekdayCounts,
    pub daily_sticker_counts: BTreeMap<String, usize>,
    pub monthly_sticker_counts: BTreeMap<String, usize>,
    /// Average sentiment per day, in `[-1, 1]`.
    pub daily_sentiments: BTreeMap<String, f64>,
    pub word_frequencies: HashMap<String, usize>,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) top_k: usize,
}

impl ConversationStats {
    /// Total messages per day, derived from `daily_counts_by_sender`.
    pub fn daily_counts(&self) -> BTreeMap<&str, usize> {
        self.daily_counts_by_sender
            .iter()
            .map(|(day, senders)| (day.as_str(), senders.values().sum()))
            .collect()
    }

    /// Instant of the earliest record.
    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.first_timestamp
    }

    /// Instant of the latest record.
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    /// Whole days spanned by the conversation, at least 1.
    pub fn num_days(&self) -> i64 {
        (self.last_timestamp - self.first_timestamp)
            .num_days()
            .max(1)
    }

    /// Average messages on each weekday, Monday first.
    ///
    /// Computed as `count / num_days * 7`.
    pub fn weekday_averages(&self) -> Vec<(Weekday, f64)> {
        let days = self.num_days() as f64;
        self.day_name_counts
            .iter()
            .map(|(day, count)| (day, count as f64 / days * 7.0))
            .collect()
    }

    /// Average messages in each hour of the day.
    pub fn hourly_averages(&self) -> [f64; 24] {
        let days = self.num_days() as f64;
        let mut averages = [0.0; 24];
        for (hour, count) in self.hourly_counts.iter() {
            averages[hour as usize] = count as f64 / days;
        }
        averages
    }

    pub fn total_initiations(&self) -> usize {
        self.initiations_by_sender.values().sum()
    }

    /// Percentage of all messages sent by `sender`.
    pub fn sender_share(&self, sender: &str) -> f64 {
        percentage(
            self.counts_by_sender.get(sender).copied().unwrap_or(0),
            self.total_messages,
        )
    }

    /// Percentage of all initiations credited to `sender`.
    pub fn initiation_share(&self, sender: &str) -> f64 {
        percentage(
            self.initiations_by_sender.get(sender).copied().unwrap_or(0),
            self.total_initiations(),
        )
    }

    /// The most frequent words, using the analyzer's configured count.
    pub fn top_words(&self) -> Vec<(String, usize)> {
        select_top_words(&self.word_frequencies, self.top_k, None)
    }

    /// The `k` most frequent words.
    pub fn top_n_words(&self, k: usize) -> Vec<(String, usize)> {
        select_top_words(&self.word_frequencies, k, None)
    }

    /// The `k` most frequent words at least `min_len` characters long.
    pub fn top_words_with_min_len(&self, k: usize, min_len: usize) -> Vec<(String, usize)> {
        select_top_words(&self.word_frequencies, k, Some(min_len))
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Sorts a count map descending by value; equal counts keep key order.
fn ranked(map: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

impl fmt::Display for ConversationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Convo: {}, total messages: {}",
            self.title, self.total_messages
        )?;
        for (sender, count) in ranked(&self.counts_by_sender) {
            writeln!(
                f,
                "{sender} sent {count} messages, {:.2}% of total messages",
                self.sender_share(sender)
            )?;
        }
        for (sender, count) in ranked(&self.initiations_by_sender) {
            writeln!(
                f,
                "{sender} initiated {count} conversations, {:.2}% of total",
                self.initiation_share(sender)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stats() -> ConversationStats {
        let mut daily = BTreeMap::new();
        daily.insert(
            "2024-01-01".to_string(),
            BTreeMap::from([("A".to_string(), 2), ("B".to_string(), 1)]),
        );
        daily.insert(
            "2024-01-03".to_string(),
            BTreeMap::from([("A".to_string(), 1)]),
        );

        let mut hourly = HourlyCounts::default();
        hourly.increment(9);
        hourly.increment(9);
        hourly.increment(23);
        hourly.increment(0);

        let mut weekdays = WeekdayCounts::default();
        weekdays.increment(Weekday::Mon);
        weekdays.increment(Weekday::Mon);
        weekdays.increment(Weekday::Mon);
        weekdays.increment(Weekday::Wed);

        ConversationStats {
            title: "Chat".into(),
            participants: BTreeSet::from(["A".to_string(), "B".to_string()]),
            messages: Vec::new(),
            total_messages: 4,
            counts_by_sender: BTreeMap::from([("A".to_string(), 3), ("B".to_string(), 1)]),
            initiations_by_sender: BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 1)]),
            daily_counts_by_sender: daily,
            monthly_counts: BTreeMap::from([("2024-01".to_string(), 4)]),
            hourly_counts: hourly,
            day_name_counts: weekdays,
            daily_sticker_counts: BTreeMap::new(),
            monthly_sticker_counts: BTreeMap::new(),
            daily_sentiments: BTreeMap::from([("2024-01-01".to_string(), 0.25)]),
            word_frequencies: HashMap::from([
                ("pizza".to_string(), 3),
                ("tonight".to_string(), 1),
            ]),
            first_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            last_timestamp: Utc.with_ymd_and_hms(2024, 1, 3, 23, 0, 0).unwrap(),
            top_k: 42,
        }
    }

    #[test]
    fn test_daily_counts_sum_senders() {
        let s = stats();
        let daily = s.daily_counts();
        assert_eq!(daily.get("2024-01-01"), Some(&3));
        assert_eq!(daily.get("2024-01-03"), Some(&1));
        assert_eq!(daily.values().sum::<usize>(), s.total_messages);
    }

    #[test]
    fn test_num_days_floors_and_has_minimum() {
        let mut s = stats();
        assert_eq!(s.num_days(), 2);

        s.last_timestamp = s.first_timestamp;
        assert_eq!(s.num_days(), 1);
    }

    #[test]
    fn test_rate_views() {
        let s = stats();
        let weekdays = s.weekday_averages();
        assert_eq!(weekdays[0].0, Weekday::Mon);
        assert!((weekdays[0].1 - 3.0 / 2.0 * 7.0).abs() < 1e-9);
        assert_eq!(weekdays.len(), 7);

        let hourly = s.hourly_averages();
        assert!((hourly[9] - 1.0).abs() < 1e-9);
        assert!((hourly[23] - 0.5).abs() < 1e-9);
        assert_eq!(hourly[12], 0.0);
    }

    #[test]
    fn test_shares() {
        let s = stats();
        assert!((s.sender_share("A") - 75.0).abs() < 1e-9);
        assert!((s.initiation_share("B") - 50.0).abs() < 1e-9);
        assert_eq!(s.sender_share("nobody"), 0.0);
        assert_eq!(s.total_initiations(), 2);
    }

    #[test]
    fn test_display_summary() {
        let text = stats().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Convo: Chat, total messages: 4");
        assert_eq!(lines[1], "A sent 3 messages, 75.00% of total messages");
        assert_eq!(lines[2], "B sent 1 messages, 25.00% of total messages");
        assert_eq!(lines[3], "A initiated 1 conversations, 50.00% of total");
    }

    #[test]
    fn test_display_rounds_shares_to_two_decimals() {
        let mut s = stats();
        s.total_messages = 3;
        s.counts_by_sender = BTreeMap::from([("A".to_string(), 2), ("B".to_string(), 1)]);

        let text = s.to_string();
        assert!(text.contains("A sent 2 messages, 66.67% of total messages\n"));
        assert!(text.contains("B sent 1 messages, 33.33% of total messages\n"));
        assert!((s.sender_share("A") - 200.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_words_views() {
        let s = stats();
        assert_eq!(s.top_words()[0], ("pizza".to_string(), 3));
        assert_eq!(s.top_n_words(1).len(), 1);
        assert_eq!(
            s.top_words_with_min_len(5, 6),
            vec![("tonight".to_string(), 1)]
        );
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(stats()).unwrap();
        assert_eq!(json["totalMessages"], 4);
        assert_eq!(json["dayNameCounts"]["Monday"], 3);
        assert_eq!(json["dayNameCounts"]["Sunday"], 0);
        assert_eq!(json["hourlyCounts"]["9"], 2);
        assert_eq!(json["monthlyCounts"]["2024-01"], 4);
        assert!(json.get("topK").is_none());
    }

    #[test]
    fn test_bucket_accessors() {
        let s = stats();
        assert_eq!(s.hourly_counts.get(9), 2);
        assert_eq!(s.hourly_counts.get(99), 0);
        assert_eq!(s.hourly_counts.total(), 4);
        assert_eq!(s.day_name_counts.get(Weekday::Wed), 1);
        assert_eq!(s.day_name_counts.total(), 4);
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
