//! Archive loader.
//!
//! Reads the fragment files of one conversation, concatenates their message
//! lists in the order the paths were supplied and repairs Meta's text
//! mis-encoding.
//!
//! # Example
//!
//! ```rust,no_run
//! use convostats::loader::ArchiveLoader;
//!
//! let loader = ArchiveLoader::new();
//! let fragment = loader.load(&["inbox/alice_1a2b/message_1.json"])?;
//! println!("{}: {} records", fragment.title, fragment.messages.len());
//! # Ok::<(), convostats::StatsError>(())
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::{ParseErrorKind, StatsError};
use crate::parsing::RawFragment;
use crate::parsing::archive::RawDocument;

/// Loader for Messenger JSON fragments.
#[derive(Debug, Clone, Default)]
pub struct ArchiveLoader {
    config: LoaderConfig,
}

impl ArchiveLoader {
    /// Creates a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Creates a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parses a single fragment document without repairing its text.
    pub fn parse_str(&self, content: &str) -> Result<RawFragment, StatsError> {
        let document: RawDocument =
            serde_json::from_str(content).map_err(|e| StatsError::malformed(e, None))?;
        document.into_fragment()
    }

    /// Reads and parses a single fragment file without repairing its text.
    pub fn read_fragment(&self, path: &Path) -> Result<RawFragment, StatsError> {
        let content =
            fs::read_to_string(path).map_err(|e| StatsError::unreadable(e, path))?;
        let fragment = self
            .parse_str(&content)
            .map_err(|e| e.with_path(path))?;
        debug!(
            path = %path.display(),
            records = fragment.messages.len(),
            "read fragment"
        );
        Ok(fragment)
    }

    /// Loads one conversation from its fragment files.
    ///
    /// Messages are concatenated in supply order, the title is taken from the
    /// first file, and text is repaired when
    /// [`repair_encoding`](LoaderConfig::repair_encoding) is set.
    pub fn load<P: AsRef<Path>>(&self, paths: &[P]) -> Result<RawFragment, StatsError> {
        let fragments = paths
            .iter()
            .map(|p| self.read_fragment(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.finish(fragments)
    }

    /// Same as [`load`](Self::load), for documents already in memory.
    pub fn load_strs(&self, contents: &[&str]) -> Result<RawFragment, StatsError> {
        let fragments = contents
            .iter()
            .map(|c| self.parse_str(c))
            .collect::<Result<Vec<_>, _>>()?;
        self.finish(fragments)
    }

    fn finish(&self, fragments: Vec<RawFragment>) -> Result<RawFragment, StatsError> {
        let mut merged = RawFragment::merge(fragments).ok_or_else(|| {
            StatsError::MalformedArchive {
                path: None,
                source: ParseErrorKind::Other("no fragment files supplied".into()),
            }
        })?;

        if self.config.repair_encoding {
            merged.repair_encoding()?;
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_loader_new() {
        assert!(ArchiveLoader::new().config().repair_encoding);
        assert!(ArchiveLoader::default().config().repair_encoding);
    }

    #[test]
    fn test_parse_str_simple() {
        let loader = ArchiveLoader::new();
        let json = r#"{"title": "Chat", "participants": [], "messages": [
            {"sender_name": "Alice", "timestamp_ms": 1600000000000, "content": "Hello"}
        ]}"#;
        let fragment = loader.parse_str(json).expect("parse failed");
        assert_eq!(fragment.title, "Chat");
        assert_eq!(fragment.messages.len(), 1);
        assert_eq!(fragment.messages[0].sender_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let err = ArchiveLoader::new().parse_str("not json").unwrap_err();
        assert!(err.is_malformed_archive());
    }

    #[test]
    fn test_parse_str_missing_messages() {
        let err = ArchiveLoader::new()
            .parse_str(r#"{"title": "x", "participants": []}"#)
            .unwrap_err();
        assert!(err.is_malformed_archive());
        assert!(err.to_string().contains("messages"));
    }

    #[test]
    fn test_parse_str_wrong_messages_type() {
        let err = ArchiveLoader::new()
            .parse_str(r#"{"title": "x", "messages": "nope"}"#)
            .unwrap_err();
        assert!(err.is_malformed_archive());
    }

    #[test]
    fn test_load_strs_merges_in_supply_order() {
        let a = r#"{"title": "A", "messages": [{"sender_name": "x", "timestamp_ms": 30}]}"#;
        let b = r#"{"title": "B", "messages": [{"sender_name": "y", "timestamp_ms": 20}, {"sender_name": "z", "timestamp_ms": 10}]}"#;
        let fragment = ArchiveLoader::new().load_strs(&[a, b]).unwrap();
        assert_eq!(fragment.title, "A");
        let senders: Vec<_> = fragment
            .messages
            .iter()
            .filter_map(|r| r.sender_name.as_deref())
            .collect();
        assert_eq!(senders, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_load_strs_empty_is_malformed() {
        let err = ArchiveLoader::new().load_strs(&[]).unwrap_err();
        assert!(err.is_malformed_archive());
    }

    #[test]
    fn test_load_repairs_encoding() {
        // "Čao" as written by the exporter
        let json = r#"{"title": "Ä\u008cet", "messages": [
            {"sender_name": "Ä\u008cedo", "timestamp_ms": 1, "content": "Ä\u008cao"}
        ]}"#;
        let fragment = ArchiveLoader::new().load_strs(&[json]).unwrap();
        assert_eq!(fragment.title, "Čet");
        assert_eq!(fragment.messages[0].sender_name.as_deref(), Some("Čedo"));
        assert_eq!(fragment.messages[0].content.as_deref(), Some("Čao"));

        let raw = ArchiveLoader::with_config(LoaderConfig::new().with_repair_encoding(false))
            .load_strs(&[json])
            .unwrap();
        assert_eq!(raw.title, "\u{c4}\u{8c}et");
    }

    #[test]
    fn test_load_encoding_failure() {
        let json = r#"{"title": "Ä", "messages": []}"#;
        let err = ArchiveLoader::new().load_strs(&[json]).unwrap_err();
        assert!(err.is_encoding_repair());
    }

    #[test]
    fn test_load_from_files_attaches_path() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("message_1.json");
        let bad = dir.path().join("message_2.json");
        fs::write(&good, r#"{"title": "T", "messages": []}"#).unwrap();
        fs::write(&bad, "{ broken").unwrap();

        let fragment = ArchiveLoader::new().load(&[&good]).unwrap();
        assert_eq!(fragment.title, "T");

        let err = ArchiveLoader::new().load(&[&good, &bad]).unwrap_err();
        assert!(err.to_string().contains("message_2.json"));
    }

    #[test]
    fn test_load_missing_file_is_malformed() {
        let err = ArchiveLoader::new()
            .load(&[Path::new("/definitely/not/here/message_1.json")])
            .unwrap_err();
        assert!(err.is_malformed_archive());
        assert!(err.to_string().contains("/definitely/not/here/message_1.json"));
    }

    #[test]
    fn test_load_non_utf8_file_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("message_1.json");
        fs::write(&path, b"{\"title\": \"\xff\xfe\", \"messages\": []}").unwrap();

        let err = ArchiveLoader::new().load(&[&path]).unwrap_err();
        assert!(err.is_malformed_archive());
        assert!(!err.is_io());
        assert!(err.to_string().contains("message_1.json"));
    }

    #[test]
    fn test_load_directory_as_fragment_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("message_1.json");
        fs::create_dir(&path).unwrap();

        let err = ArchiveLoader::new().load(&[&path]).unwrap_err();
        assert!(err.is_malformed_archive());
        assert!(err.to_string().contains("message_1.json"));
    }
}
