//! Normalized message type.
//!
//! [`Message`] is what the [normalizer](crate::normalizer) turns each raw
//! archive record into: a validated sender, a millisecond-precision instant,
//! optional text and a sticker flag. The aggregator keeps the content-bearing
//! ones in [`ConversationStats::messages`](crate::core::ConversationStats).
//!
//! # Examples
//!
//! ```
//! use convostats::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.timestamp_millis_opt(1_600_000_000_000).unwrap();
//! let msg = Message::new("Alice", ts).with_content("Hello!");
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.content(), Some("Hello!"));
//! assert!(!msg.has_sticker());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single validated chat message.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `sender` | `String` | Sender identity, stable across the conversation |
/// | `timestamp` | `DateTime<Utc>` | When the message was sent (millisecond precision) |
/// | `content` | `Option<String>` | Text, absent for sticker/photo-only records |
/// | `has_sticker` | `bool` | Whether the record carried a sticker |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender display name.
    pub sender: String,

    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Text content, if the record had any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub content: Option<String>,

    /// Whether the record carried a sticker.
    #[serde(default)]
    pub has_sticker: bool,
}

impl Message {
    /// Creates a content-less, sticker-less message.
    pub fn new(sender: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: sender.into(),
            timestamp,
            content: None,
            has_sticker: false,
        }
    }

    /// Builder method to set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Builder method to mark the message as carrying a sticker.
    #[must_use]
    pub fn with_sticker(mut self) -> Self {
        self.has_sticker = true;
        self
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the timestamp as Unix epoch milliseconds.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Returns the text content, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns `true` if the record carried a sticker.
    pub fn has_sticker(&self) -> bool {
        self.has_sticker
    }

    /// Returns `true` if the message has text content (possibly empty).
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.sender, self.content.as_deref().unwrap_or(""))
    }
}
