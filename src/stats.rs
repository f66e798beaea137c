//! Statistical summaries over password corpora.
//!
//! Every per-corpus summary implements [`Accumulate`]: it observes one
//! password at a time and can merge with a summary built from the passwords
//! that follow. [`accumulate`] folds a corpus either sequentially or with
//! rayon; both produce identical results, including first-seen order.
use std::collections::BTreeMap;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::classify::{DateFormat, classify_date_format};
use crate::config::{NGRAM_MAX, NGRAM_MIN};
use crate::counter::Counter;
use crate::extract::extract_date_candidates;
use crate::structure::{CharClass, char_class_pattern, date_structure};

pub trait Accumulate: Default + Send {
    fn observe(&mut self, password: &str);
    /// Fold in a summary of passwords that come after the ones seen so far.
    fn merge(&mut self, later: Self);
}

pub fn accumulate<A: Accumulate>(passwords: &[String], parallel: bool) -> A {
    if parallel {
        passwords
            .par_iter()
            .fold(A::default, |mut acc, pw| {
                acc.observe(pw);
                acc
            })
            .reduce(A::default, |mut left, right| {
                left.merge(right);
                left
            })
    } else {
        let mut acc = A::default();
        for pw in passwords {
            acc.observe(pw);
        }
        acc
    }
}

pub(crate) fn pct(n: usize, d: usize) -> String {
    if d == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", (n as f64) / (d as f64) * 100.0)
}

/// Date findings for one corpus.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateStats {
    pub total: usize,
    /// Passwords with at least one classifiable date.
    pub with_dates: usize,
    pub formats: Counter,
    pub dates_by_format: IndexMap<DateFormat, Counter>,
    pub years: Counter,
    /// Month-day keys, always `MMDD`.
    pub month_days: Counter,
    /// Date-aware structures of passwords that contain a date.
    pub structures: Counter,
}

impl DateStats {
    pub fn date_percentage(&self) -> String {
        pct(self.with_dates, self.total)
    }
}

impl Accumulate for DateStats {
    fn observe(&mut self, password: &str) {
        self.total += 1;
        let dated: Vec<(String, DateFormat)> = extract_date_candidates(password)
            .into_iter()
            .map(|d| {
                let fmt = classify_date_format(&d);
                (d, fmt)
            })
            .filter(|(_, fmt)| *fmt != DateFormat::Other)
            .collect();
        if dated.is_empty() {
            return;
        }
        self.with_dates += 1;
        for (date, fmt) in &dated {
            self.formats.add(fmt.as_str());
            self.dates_by_format.entry(*fmt).or_default().add(date);
            fmt.tally(date, &mut self.years, &mut self.month_days);
        }
        let dates: Vec<String> = dated.into_iter().map(|(d, _)| d).collect();
        self.structures.add(&date_structure(password, &dates));
    }

    fn merge(&mut self, later: Self) {
        self.total += later.total;
        self.with_dates += later.with_dates;
        self.formats.merge(later.formats);
        for (fmt, dates) in later.dates_by_format {
            self.dates_by_format.entry(fmt).or_default().merge(dates);
        }
        self.years.merge(later.years);
        self.month_days.merge(later.month_days);
        self.structures.merge(later.structures);
    }
}

/// Counts, lengths and character classes for one corpus.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BasicStats {
    pub total: usize,
    pub total_chars: usize,
    /// Characters per class, first-seen order.
    pub char_classes: IndexMap<CharClass, usize>,
    /// Password length (in characters) -> number of passwords.
    pub lengths: BTreeMap<usize, usize>,
}

impl BasicStats {
    pub fn average_length(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.total_chars as f64 / self.total as f64
    }

    pub fn class_share(&self, class: CharClass) -> String {
        pct(
            self.char_classes.get(&class).copied().unwrap_or(0),
            self.total_chars,
        )
    }
}

impl Accumulate for BasicStats {
    fn observe(&mut self, password: &str) {
        self.total += 1;
        let mut len = 0;
        for c in password.chars() {
            *self.char_classes.entry(CharClass::of(c)).or_insert(0) += 1;
            len += 1;
        }
        self.total_chars += len;
        *self.lengths.entry(len).or_insert(0) += 1;
    }

    fn merge(&mut self, later: Self) {
        self.total += later.total;
        self.total_chars += later.total_chars;
        for (class, n) in later.char_classes {
            *self.char_classes.entry(class).or_insert(0) += n;
        }
        for (len, n) in later.lengths {
            *self.lengths.entry(len).or_insert(0) += n;
        }
    }
}

/// Plain L/U/D/S structure frequencies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatternStats {
    pub patterns: Counter,
}

impl Accumulate for PatternStats {
    fn observe(&mut self, password: &str) {
        self.patterns.add(&char_class_pattern(password));
    }

    fn merge(&mut self, later: Self) {
        self.patterns.merge(later.patterns);
    }
}

/// Character windows of `n` chars, in order of appearance.
pub fn ngrams(s: &str, n: usize) -> impl Iterator<Item = &str> {
    let bounds: Vec<usize> = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect();
    let windows = bounds.len().saturating_sub(n);
    (0..windows).map(move |i| &s[bounds[i]..bounds[i + n]])
}

/// Substring frequencies for lengths `NGRAM_MIN..=NGRAM_MAX`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NgramStats {
    pub ngrams: Counter,
}

impl Accumulate for NgramStats {
    fn observe(&mut self, password: &str) {
        for n in NGRAM_MIN..=NGRAM_MAX {
            for gram in ngrams(password, n) {
                self.ngrams.add(gram);
            }
        }
    }

    fn merge(&mut self, later: Self) {
        self.ngrams.merge(later.ngrams);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPassword {
    pub password: String,
    pub first: usize,
    pub second: usize,
}

impl CommonPassword {
    pub fn total(&self) -> usize {
        self.first + self.second
    }
}

/// Passwords shared by two corpora.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrossComparison {
    pub unique_first: usize,
    pub unique_second: usize,
    pub common_count: usize,
    /// Highest combined count first, ties in first-seen order of the first corpus.
    pub top_common: Vec<CommonPassword>,
}

pub fn compare_corpora(first: &[String], second: &[String], top_n: usize) -> CrossComparison {
    let a: Counter = first.iter().map(String::as_str).collect();
    let b: Counter = second.iter().map(String::as_str).collect();
    let mut common: Vec<CommonPassword> = a
        .iter()
        .filter(|(pw, _)| b.contains(pw))
        .map(|(pw, n)| CommonPassword {
            password: pw.to_string(),
            first: n,
            second: b.get(pw),
        })
        .collect();
    let common_count = common.len();
    common.sort_by(|x, y| y.total().cmp(&x.total()));
    common.truncate(top_n);
    CrossComparison {
        unique_first: a.len(),
        unique_second: b.len(),
        common_count,
        top_common: common,
    }
}
