use std::collections::HashSet;

const ENGLISH: &str = include_str!("../../data/stopwords_en.txt");

/// Words excluded from frequency analysis.
///
/// Matching is exact; the aggregator lowercases tokens before lookup, so the
/// set should hold lowercase entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The fixed English list (179 words, including contractions).
    pub fn english() -> Self {
        Self::from_words(ENGLISH.lines().map(str::trim).filter(|w| !w.is_empty()))
    }

    /// An empty set; every token is eligible.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from arbitrary words (lowercased on insert).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Adds extra words on top of the current set.
    #[must_use]
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list() {
        let set = StopwordSet::english();
        assert_eq!(set.len(), 179);
        for word in ["the", "and", "you're", "wouldn't", "i"] {
            assert!(set.contains(word), "{word} should be a stopword");
        }
        assert!(!set.contains("pizza"));
    }

    #[test]
    fn test_with_words_lowercases() {
        let set = StopwordSet::empty().with_words(["LOL", "Haha"]);
        assert!(set.contains("lol"));
        assert!(set.contains("haha"));
        assert!(!set.contains("LOL"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(StopwordSet::empty().is_empty());
        assert!(!StopwordSet::empty().contains("the"));
    }
}
