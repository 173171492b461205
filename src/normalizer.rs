//! Message normalizer.
//!
//! Validates every raw record once and produces typed [`Message`]s sorted by
//! timestamp. The sort is stable, so records sharing a timestamp keep their
//! merged (pre-sort) order. Everything downstream, time buckets and the
//! initiation heuristic alike, relies on this ordering.

use chrono::{TimeZone, Utc};

use crate::Message;
use crate::error::StatsError;
use crate::parsing::{RawFragment, RawRecord};

/// Converts one raw record into a [`Message`].
///
/// `index` is the record's position in the merged list and is only used for
/// error reporting.
pub fn normalize_record(index: usize, record: RawRecord) -> Result<Message, StatsError> {
    let sender = record
        .sender_name
        .ok_or_else(|| StatsError::invalid_record(index, "sender_name"))?;
    let timestamp_ms = record
        .timestamp_ms
        .ok_or_else(|| StatsError::invalid_record(index, "timestamp_ms"))?;
    let timestamp = Utc
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .ok_or_else(|| StatsError::invalid_record(index, "timestamp_ms"))?;

    Ok(Message {
        sender,
        timestamp,
        content: record.content,
        has_sticker: record.has_sticker,
    })
}

/// Validates and chronologically sorts the records of a fragment.
///
/// # Example
///
/// ```rust
/// use convostats::normalizer::normalize;
/// use convostats::parsing::{RawFragment, RawRecord};
///
/// let record = |sender: &str, ms: i64| RawRecord {
///     sender_name: Some(sender.into()),
///     timestamp_ms: Some(ms),
///     ..RawRecord::default()
/// };
/// let fragment = RawFragment::new("Chat", vec![record("b", 20), record("a", 10)]);
///
/// let messages = normalize(fragment.messages)?;
/// assert_eq!(messages[0].sender(), "a");
/// # Ok::<(), convostats::StatsError>(())
/// ```
pub fn normalize(records: Vec<RawRecord>) -> Result<Vec<Message>, StatsError> {
    let mut messages = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| normalize_record(i, record))
        .collect::<Result<Vec<_>, _>>()?;

    messages.sort_by_key(|m| m.timestamp);
    Ok(messages)
}

/// Splits a fragment into its title and normalized messages.
pub fn normalize_fragment(fragment: RawFragment) -> Result<(String, Vec<Message>), StatsError> {
    let messages = normalize(fragment.messages)?;
    Ok((fragment.title, messages))
}
