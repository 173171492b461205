//! Sentiment scoring.
//!
//! The aggregator only depends on the [`SentimentScorer`] trait, so tests can
//! pass a closure and callers can plug in any model they like. The built-in
//! [`LexiconScorer`] follows the positive/negative/neutral proportion scheme
//! of rule-based lexicon analysers: each token contributes its valence mass
//! to the positive or negative side, or one unit of neutral mass, and the
//! score is `(pos - neg) / (pos + neg + neutral)`.

use std::collections::HashMap;
use std::sync::LazyLock;

const LEXICON: &str = include_str!("../../data/sentiment_lexicon.tsv");

/// Valence multiplier applied to a word preceded by a negator.
const NEGATION_SCALAR: f64 = -0.74;

/// How many preceding tokens are checked for a negator.
const NEGATION_WINDOW: usize = 3;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nor", "without", "cannot",
];

static BASE_LEXICON: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    LEXICON
        .lines()
        .filter_map(|line| {
            let (word, valence) = line.split_once('\t')?;
            Some((word.trim(), valence.trim().parse().ok()?))
        })
        .collect()
});

/// A text-sentiment capability.
///
/// Implementations must return a value in `[-1.0, 1.0]` and `0.0` for text
/// without sentiment. Any `Fn(&str) -> f64` closure is a scorer.
pub trait SentimentScorer: Send + Sync {
    /// Scores a piece of text.
    fn score(&self, text: &str) -> f64;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Lexicon-based English scorer.
///
/// # Example
///
/// ```rust
/// use convostats::core::{LexiconScorer, SentimentScorer};
///
/// let scorer = LexiconScorer::new();
/// assert!(scorer.score("what a great day") > 0.0);
/// assert!(scorer.score("this is terrible") < 0.0);
/// assert_eq!(scorer.score("see you at noon"), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer {
    overrides: HashMap<String, f64>,
}

impl LexiconScorer {
    /// Creates a scorer backed by the embedded lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a word's valence (roughly -4.0 to 4.0).
    #[must_use]
    pub fn with_word(mut self, word: impl Into<String>, valence: f64) -> Self {
        self.overrides.insert(word.into().to_lowercase(), valence);
        self
    }

    fn valence(&self, word: &str) -> Option<f64> {
        self.overrides
            .get(word)
            .or_else(|| BASE_LEXICON.get(word))
            .copied()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let mut positive = 0.0;
        let mut negative = 0.0;
        let mut neutral = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = self.valence(token) else {
                neutral += 1.0;
                continue;
            };

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| is_negator(t)) {
                valence *= NEGATION_SCALAR;
            }

            // Lexicon entries carry one unit of base mass on their side.
            if valence > 0.0 {
                positive += valence + 1.0;
            } else if valence < 0.0 {
                negative += -valence + 1.0;
            } else {
                neutral += 1.0;
            }
        }

        let total = positive + negative + neutral;
        if total == 0.0 {
            return 0.0;
        }
        ((positive - negative) / total).clamp(-1.0, 1.0)
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}
