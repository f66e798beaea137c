//! Insertion-ordered frequency counter.
//!
//! Ranking is by count, descending; equal counts keep the order in which keys
//! were first seen. Merging two counters appends unseen keys from the right
//! side, so folding contiguous chunks left to right reproduces the sequential
//! first-seen order.
use indexmap::IndexMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Counter {
    counts: IndexMap<String, usize>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: &str, n: usize) {
        if let Some(count) = self.counts.get_mut(key) {
            *count += n;
        } else {
            self.counts.insert(key.to_string(), n);
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Up to `limit` entries by descending count, ties in first-seen order.
    /// `None` returns every entry.
    pub fn most_common(&self, limit: Option<usize>) -> Vec<(&str, usize)> {
        let mut items: Vec<(&str, usize)> = self.iter().collect();
        // sort_by is stable, which is what keeps ties in first-seen order
        items.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(n) = limit {
            items.truncate(n);
        }
        items
    }

    pub fn merge(&mut self, other: Counter) {
        for (key, n) in other.counts {
            *self.counts.entry(key).or_insert(0) += n;
        }
    }
}

impl<'a> FromIterator<&'a str> for Counter {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counter = Counter::new();
        for key in iter {
            counter.add(key);
        }
        counter
    }
}
