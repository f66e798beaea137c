//! Date candidate extraction.
//!
//! Two passes over a password collect digit strings that might encode a date:
//!
//! 1. delimited numbers such as `01-02-2020` or `1990.5.3`, separators removed;
//! 2. bare digit runs of 4 to 8 digits bounded by non-digits, skipped when
//!    they overlap any span taken by pass 1.
//!
//! Survivors are filtered (repeated digits, noise numbers, length not 4/6/8)
//! and accepted when at least one calendar template parses them, or when they
//! are two concatenated `19xx`/`20xx` years.
use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use indexmap::IndexSet;
use regex::Regex;

use crate::config::NOISE_NUMBERS;

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
static DELIMITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,4}[-/.][0-9]{1,4}(?:[-/.][0-9]{1,4})?").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
static DOUBLE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19|20)[0-9]{2}(19|20)[0-9]{2}$").expect("valid regex"));

/// A strptime-style layout built from `%Y %y %m %d`.
///
/// Field patterns follow strptime: `%m` and `%d` accept one or two digits and
/// their alternatives are tried in a fixed priority. The leftmost-first match
/// is taken as is and must cover the whole input; a shorter match is a
/// rejection, not a cue to retry with other splits. Missing fields default to
/// year 1900, month 1, day 1, so `%m%d` rejects `0229`.
#[derive(Debug)]
pub struct DateTemplate {
    re: Regex,
}

impl DateTemplate {
    fn new(layout: &'static str) -> Self {
        let mut pattern = String::from("^");
        let mut chars = layout.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                pattern.push_str(&regex::escape(&c.to_string()));
                continue;
            }
            let field = match chars.next() {
                Some('Y') => "(?P<Y>[0-9]{4})",
                Some('y') => "(?P<y>[0-9]{2})",
                Some('m') => "(?P<m>1[0-2]|0[1-9]|[1-9])",
                Some('d') => "(?P<d>3[01]|[12][0-9]|0[1-9]|[1-9])",
                other => unreachable!("unsupported directive {other:?} in {layout}"),
            };
            pattern.push_str(field);
        }
        #[allow(clippy::expect_used)] // Built from the fixed directive table above
        let re = Regex::new(&pattern).expect("valid template regex");
        Self { re }
    }

    /// Parse `s` into a calendar date, `None` if the layout or calendar rejects it.
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        let caps = self.re.captures(s)?;
        if caps.get(0)?.end() != s.len() {
            return None;
        }
        let field = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());
        let year = match (field("Y"), field("y")) {
            (Some(y), _) => y as i32,
            (None, Some(y)) if y < 69 => 2000 + y as i32,
            (None, Some(y)) => 1900 + y as i32,
            (None, None) => 1900,
        };
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, field("m").unwrap_or(1), field("d").unwrap_or(1))
    }
}

/// Calendar templates tried during extraction, any one accepting is enough.
pub static DATE_TEMPLATES: LazyLock<Vec<DateTemplate>> = LazyLock::new(|| {
    ["%Y%m%d", "%y%m%d", "%Y%m", "%y%m", "%d%m%Y", "%d%m%y", "%m%d", "%d%m"]
        .into_iter()
        .map(DateTemplate::new)
        .collect()
});

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// One digit repeated four or more times.
fn is_repeated_digit(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => s.len() >= 4 && chars.all(|c| c == first),
        None => false,
    }
}

fn is_plausible_date(candidate: &str) -> bool {
    if is_repeated_digit(candidate) || NOISE_NUMBERS.contains(&candidate) {
        return false;
    }
    if !matches!(candidate.len(), 4 | 6 | 8) {
        return false;
    }
    DATE_TEMPLATES.iter().any(|t| t.parse(candidate).is_some())
        || DOUBLE_YEAR.is_match(candidate)
}

/// Raw digit strings from both passes, deduplicated, in discovery order.
pub fn raw_candidates(password: &str) -> Vec<String> {
    let mut found: IndexSet<String> = IndexSet::new();
    let mut occupied: Vec<Range<usize>> = Vec::new();

    for m in DELIMITED.find_iter(password) {
        found.insert(m.as_str().replace(['-', '/', '.'], ""));
        occupied.push(m.range());
    }
    for m in DIGIT_RUN.find_iter(password) {
        if !(4..=8).contains(&m.len()) {
            continue;
        }
        let span = m.range();
        if occupied.iter().any(|o| overlaps(o, &span)) {
            continue;
        }
        found.insert(m.as_str().to_string());
    }
    found.into_iter().collect()
}

/// Distinct date-like digit strings found in `password`, in discovery order.
pub fn extract_date_candidates(password: &str) -> Vec<String> {
    raw_candidates(password)
        .into_iter()
        .filter(|c| is_plausible_date(c))
        .collect()
}
