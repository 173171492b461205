//! Top-K word selection over a frequency table.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Returns the `k` most frequent words, most frequent first.
///
/// With `min_len`, only words with at least that many characters are
/// considered. Equal counts are ordered lexicographically, so the result is
/// deterministic regardless of the table's iteration order.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use convostats::core::select_top_words;
///
/// let freqs = HashMap::from([
///     ("pizza".to_string(), 5),
///     ("beer".to_string(), 5),
///     ("tomorrow".to_string(), 2),
/// ]);
///
/// let top = select_top_words(&freqs, 2, None);
/// assert_eq!(top, vec![("beer".to_string(), 5), ("pizza".to_string(), 5)]);
///
/// let long = select_top_words(&freqs, 2, Some(6));
/// assert_eq!(long, vec![("tomorrow".to_string(), 2)]);
/// ```
pub fn select_top_words(
    frequencies: &HashMap<String, usize>,
    k: usize,
    min_len: Option<usize>,
) -> Vec<(String, usize)> {
    if k == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(&str, usize)> = frequencies
        .iter()
        .filter(|(word, _)| min_len.is_none_or(|min| word.chars().count() >= min))
        .map(|(word, count)| (word.as_str(), *count))
        .collect();

    if entries.len() > k {
        entries.select_nth_unstable_by(k - 1, by_rank);
        entries.truncate(k);
    }
    entries.sort_unstable_by(by_rank);

    entries
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}

fn by_rank(a: &(&str, usize), b: &(&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}
