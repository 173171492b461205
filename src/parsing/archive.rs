//! Messenger archive structures and the mis-encoding repair.
//!
//! Meta's "Download Your Information" exports write every UTF-8 byte of a
//! string as its own `\u00XX` escape, so a JSON parser hands back one code
//! point per byte: "Ćao" arrives as "Ä\u{86}ao". [`repair_text`] reverses
//! that by reading each code point back as a byte and decoding the result.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::error::{RepairFailure, StatsError};

/// One message record as it appears in a fragment file.
///
/// Every field is optional at this layer so that a record with a missing
/// sender or timestamp reaches the normalizer and fails there with an
/// [`InvalidRecord`](StatsError::InvalidRecord) error naming the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub sender_name: Option<String>,
    pub timestamp_ms: Option<i64>,
    pub content: Option<String>,
    /// Presence-only: any `sticker` value (even `null`) sets this.
    #[serde(default, rename = "sticker", deserialize_with = "deserialize_present")]
    pub has_sticker: bool,
}

/// Top-level fragment document before the required-field check.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    pub title: Option<String>,
    pub messages: Option<Vec<RawRecord>>,
}

/// A parsed fragment file: conversation title plus its message records.
///
/// Several fragments of one conversation are combined with
/// [`RawFragment::merge`]; the merged message list is in supply order and is
/// not assumed to be sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFragment {
    pub title: String,
    pub messages: Vec<RawRecord>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer).map(|_| true)
}

impl RawDocument {
    /// Checks the required top-level fields.
    pub(crate) fn into_fragment(self) -> Result<RawFragment, StatsError> {
        let title = self
            .title
            .ok_or_else(|| StatsError::missing_field("title", None))?;
        let messages = self
            .messages
            .ok_or_else(|| StatsError::missing_field("messages", None))?;
        Ok(RawFragment { title, messages })
    }
}

impl RawFragment {
    /// Creates a fragment from a title and records.
    pub fn new(title: impl Into<String>, messages: Vec<RawRecord>) -> Self {
        Self {
            title: title.into(),
            messages,
        }
    }

    /// Concatenates fragments in the given order.
    ///
    /// The title comes from the first fragment. Returns `None` for an empty
    /// input.
    pub fn merge(fragments: impl IntoIterator<Item = RawFragment>) -> Option<RawFragment> {
        let mut iter = fragments.into_iter();
        let mut merged = iter.next()?;
        for fragment in iter {
            merged.messages.extend(fragment.messages);
        }
        Some(merged)
    }

    /// Repairs the title and every sender and content field in place.
    pub fn repair_encoding(&mut self) -> Result<(), StatsError> {
        self.title = repair_field(&self.title, || "title".to_string())?;

        for (i, record) in self.messages.iter_mut().enumerate() {
            if let Some(sender) = record.sender_name.as_deref() {
                record.sender_name = Some(repair_field(sender, || {
                    format!("message {i} sender_name")
                })?);
            }
            if let Some(content) = record.content.as_deref() {
                record.content = Some(repair_field(content, || format!("message {i} content"))?);
            }
        }

        Ok(())
    }
}

fn repair_field(s: &str, context: impl FnOnce() -> String) -> Result<String, StatsError> {
    repair_text(s).map_err(|detail| StatsError::encoding_repair(context(), detail))
}

/// Undoes Meta's byte-per-code-point encoding.
///
/// Each character's code point is taken as a raw byte and the byte sequence
/// is decoded as UTF-8. Fails if a character is above U+00FF or if the bytes
/// are not valid UTF-8.
///
/// # Example
///
/// ```rust
/// use convostats::parsing::repair_text;
///
/// assert_eq!(repair_text("Hello").unwrap(), "Hello");
/// assert_eq!(repair_text("\u{c3}\u{a9}t\u{c3}\u{a9}").unwrap(), "été");
/// assert!(repair_text("\u{c3}").is_err());
/// ```
pub fn repair_text(s: &str) -> Result<String, RepairFailure> {
    if s.is_ascii() {
        return Ok(s.to_string());
    }

    let mut bytes = Vec::with_capacity(s.len());
    for (position, ch) in s.chars().enumerate() {
        let code = u32::from(ch);
        let byte = u8::try_from(code).map_err(|_| RepairFailure::NotAByte {
            ch,
            code,
            position,
        })?;
        bytes.push(byte);
    }

    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Produces the mis-encoded form Meta writes for `s`.
    fn mojibake(s: &str) -> String {
        s.bytes().map(char::from).collect()
    }

    #[test]
    fn test_repair_ascii_passthrough() {
        assert_eq!(repair_text("Hello").unwrap(), "Hello");
        assert_eq!(repair_text("").unwrap(), "");
    }

    #[test]
    fn test_repair_cyrillic_and_emoji() {
        for original in ["Привет", "Ćao, šta ima?", "🎉 party", "naïve café"] {
            assert_eq!(repair_text(&mojibake(original)).unwrap(), original);
        }
    }

    #[test]
    fn test_repair_rejects_wide_code_point() {
        let err = repair_text("ab€").unwrap_err();
        match err {
            RepairFailure::NotAByte { ch, position, .. } => {
                assert_eq!(ch, '€');
                assert_eq!(position, 2);
            }
            RepairFailure::InvalidUtf8(_) => panic!("expected NotAByte"),
        }
    }

    #[test]
    fn test_repair_rejects_truncated_sequence() {
        // Lone lead byte of a two-byte sequence
        let err = repair_text("\u{d0}").unwrap_err();
        assert!(matches!(err, RepairFailure::InvalidUtf8(_)));
    }

    #[test]
    fn test_record_sticker_presence() {
        let record: RawRecord = serde_json::from_str(
            r#"{"sender_name": "A", "timestamp_ms": 1, "sticker": {"uri": "x.png"}}"#,
        )
        .unwrap();
        assert!(record.has_sticker);
        assert!(record.content.is_none());

        let record: RawRecord =
            serde_json::from_str(r#"{"sender_name": "A", "timestamp_ms": 1, "content": "hi"}"#)
                .unwrap();
        assert!(!record.has_sticker);

        let record: RawRecord = serde_json::from_str(r#"{"sticker": null}"#).unwrap();
        assert!(record.has_sticker);
        assert!(record.sender_name.is_none());
    }

    #[test]
    fn test_document_requires_title_and_messages() {
        let doc: RawDocument = serde_json::from_str(r#"{"messages": []}"#).unwrap();
        let err = doc.into_fragment().unwrap_err();
        assert!(err.to_string().contains("'title'"));

        let doc: RawDocument = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        let err = doc.into_fragment().unwrap_err();
        assert!(err.to_string().contains("'messages'"));
    }

    #[test]
    fn test_merge_keeps_first_title_and_supply_order() {
        let a = RawFragment::new(
            "First",
            vec![RawRecord {
                timestamp_ms: Some(3),
                ..RawRecord::default()
            }],
        );
        let b = RawFragment::new(
            "Second",
            vec![RawRecord {
                timestamp_ms: Some(1),
                ..RawRecord::default()
            }],
        );
        let merged = RawFragment::merge([a, b]).unwrap();
        assert_eq!(merged.title, "First");
        let stamps: Vec<_> = merged.messages.iter().map(|r| r.timestamp_ms).collect();
        assert_eq!(stamps, vec![Some(3), Some(1)]);

        assert!(RawFragment::merge(Vec::new()).is_none());
    }

    #[test]
    fn test_repair_encoding_reports_field() {
        let mut fragment = RawFragment::new(
            "ok",
            vec![RawRecord {
                sender_name: Some("Bob".into()),
                timestamp_ms: Some(1),
                content: Some("\u{e2}\u{82}".into()),
                has_sticker: false,
            }],
        );
        let err = fragment.repair_encoding().unwrap_err();
        assert!(err.is_encoding_repair());
        assert!(err.to_string().contains("message 0 content"));
    }

    #[test]
    fn test_repair_encoding_fixes_all_fields() {
        let mut fragment = RawFragment::new(
            mojibake("Čet"),
            vec![RawRecord {
                sender_name: Some(mojibake("Željko")),
                timestamp_ms: Some(1),
                content: Some(mojibake("Ćao")),
                has_sticker: false,
            }],
        );
        fragment.repair_encoding().unwrap();
        assert_eq!(fragment.title, "Čet");
        assert_eq!(fragment.messages[0].sender_name.as_deref(), Some("Željko"));
        assert_eq!(fragment.messages[0].content.as_deref(), Some("Ćao"));
    }
}
