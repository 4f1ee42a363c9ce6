//! Token counting with a reproducible ranking.
//!
//! Distinct tokens are kept in the order they were first seen. Ranking is a
//! stable sort by descending count over that order, so ties always come out
//! first-seen first. A plain `HashMap` would make tie order vary between runs.

use itertools::Itertools;
use std::collections::HashMap;

/// Occurrence counts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TokenCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, highest count first, ties in first-seen order.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        self.top(None)
    }

    /// The first `n` entries of [`TokenCounter::ranked`]; `None` keeps all.
    pub fn top(&self, n: Option<usize>) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .cloned()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n.unwrap_or(usize::MAX))
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TokenCounter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counter = TokenCounter::new();
        counter.extend(iter);
        counter
    }
}

impl<S: AsRef<str>> Extend<S> for TokenCounter {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.add(token.as_ref());
        }
    }
}

/// Count `tokens` and return the full ranking.
pub fn count<I, S>(tokens: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().collect::<TokenCounter>().ranked()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(v: &[(&str, usize)]) -> Vec<(String, usize)> {
        v.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_count_ranks_by_frequency() {
        assert_eq!(
            count(["中國", "中國", "台灣"]),
            pairs(&[("中國", 2), ("台灣", 1)])
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        // c is seen before b, both end at 3
        let tokens = ["d", "a", "c", "a", "b", "a", "c", "b", "a", "c", "b", "a"];
        let counter: TokenCounter = tokens.into_iter().collect();

        assert_eq!(
            counter.ranked(),
            pairs(&[("a", 5), ("c", 3), ("b", 3), ("d", 1)])
        );
        assert_eq!(counter.top(Some(2)), pairs(&[("a", 5), ("c", 3)]));
    }

    #[test]
    fn test_tie_order_follows_input_not_value() {
        let tokens = ["b", "c", "a", "a", "a", "a", "a", "b", "c", "b", "c", "d"];
        let counter: TokenCounter = tokens.into_iter().collect();
        assert_eq!(counter.top(Some(2)), pairs(&[("a", 5), ("b", 3)]));
    }

    #[test]
    fn test_ranking_is_reproducible() {
        let tokens: Vec<String> = (0..200).map(|i| format!("w{}", i % 37)).collect();
        let first = count(&tokens);
        for _ in 0..5 {
            assert_eq!(count(&tokens), first);
        }
    }

    #[test]
    fn test_top_none_is_unbounded() {
        let counter: TokenCounter = ["x", "y", "z"].into_iter().collect();
        assert_eq!(counter.top(None).len(), 3);
        assert_eq!(counter.top(Some(10)).len(), 3);
        assert!(counter.top(Some(0)).is_empty());
    }

    #[test]
    fn test_extend_accumulates() {
        let mut counter = TokenCounter::new();
        counter.extend(["中國", "台灣"]);
        counter.extend(["中國"]);
        assert_eq!(counter.ranked(), pairs(&[("中國", 2), ("台灣", 1)]));
        assert!(!counter.is_empty());
        assert!(TokenCounter::new().is_empty());
    }
}
