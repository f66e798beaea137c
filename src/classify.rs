//! Date format classification.
//!
//! Each candidate is tested against an ordered rule list; the first rule whose
//! pattern matches the whole string decides the format. The order resolves
//! ambiguous digit strings: two concatenated years are checked before
//! `YYYYMMDD`, so `19992000` is never read as a year plus month and day.
//!
//! These rules are independent of the calendar templates used during
//! extraction. A candidate accepted there may still land in
//! [`DateFormat::Other`] here, and the rules below are what the statistics
//! use.
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::counter::Counter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateFormat {
    YyyyMmDd,
    DdMmYyyy,
    YyyyMm,
    Yyyy,
    MmDd,
    DdMm,
    /// Two concatenated four-digit years.
    YyyyYyyy,
    Other,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::YyyyMmDd => "YYYYMMDD",
            DateFormat::DdMmYyyy => "DDMMYYYY",
            DateFormat::YyyyMm => "YYYYMM",
            DateFormat::Yyyy => "YYYY",
            DateFormat::MmDd => "MMDD",
            DateFormat::DdMm => "DDMM",
            DateFormat::YyyyYyyy => "YYYYYYYY",
            DateFormat::Other => "Other",
        }
    }

    /// Count the year and month-day parts of `date`, which must already have
    /// been classified as `self`. Month-days are always keyed as `MMDD`.
    pub fn tally(&self, date: &str, years: &mut Counter, month_days: &mut Counter) {
        match self {
            DateFormat::YyyyMmDd => {
                years.add(&date[..4]);
                month_days.add(&date[4..8]);
            }
            DateFormat::DdMmYyyy => {
                years.add(&date[date.len() - 4..]);
                month_days.add(&swap_day_month(date));
            }
            DateFormat::YyyyYyyy => {
                years.add(&date[..4]);
                years.add(&date[4..8]);
            }
            DateFormat::YyyyMm => years.add(&date[..4]),
            DateFormat::Yyyy => years.add(date),
            DateFormat::MmDd => month_days.add(date),
            DateFormat::DdMm => month_days.add(&swap_day_month(date)),
            DateFormat::Other => {}
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `DDMM...` -> `MMDD`
fn swap_day_month(date: &str) -> String {
    format!("{}{}", &date[2..4], &date[0..2])
}

const YEAR: &str = "(19|20)[0-9]{2}";
const MONTH: &str = "(0[1-9]|1[0-2])";
const DAY: &str = "(0[1-9]|[12][0-9]|3[01])";

#[allow(clippy::expect_used)] // Static regex patterns are built from constants
static RULES: LazyLock<Vec<(DateFormat, Regex)>> = LazyLock::new(|| {
    [
        (DateFormat::YyyyYyyy, format!("{YEAR}{YEAR}")),
        (DateFormat::YyyyMmDd, format!("{YEAR}{MONTH}{DAY}")),
        (DateFormat::DdMmYyyy, format!("{DAY}{MONTH}{YEAR}")),
        (DateFormat::YyyyMm, format!("{YEAR}{MONTH}")),
        (DateFormat::Yyyy, YEAR.to_string()),
        (DateFormat::MmDd, format!("{MONTH}{DAY}")),
        (DateFormat::DdMm, format!("{DAY}{MONTH}")),
    ]
    .into_iter()
    .map(|(fmt, pat)| (fmt, Regex::new(&format!("^{pat}$")).expect("valid regex")))
    .collect()
});

/// Map a candidate to exactly one format, first matching rule wins.
pub fn classify_date_format(date: &str) -> DateFormat {
    RULES
        .iter()
        .find(|(_, re)| re.is_match(date))
        .map(|(fmt, _)| *fmt)
        .unwrap_or(DateFormat::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_shape() {
        assert_eq!(classify_date_format("19992000"), DateFormat::YyyyYyyy);
        assert_eq!(classify_date_format("20230401"), DateFormat::YyyyMmDd);
        assert_eq!(classify_date_format("01022020"), DateFormat::DdMmYyyy);
        assert_eq!(classify_date_format("199012"), DateFormat::YyyyMm);
        assert_eq!(classify_date_format("1990"), DateFormat::Yyyy);
        assert_eq!(classify_date_format("1231"), DateFormat::MmDd);
        assert_eq!(classify_date_format("3112"), DateFormat::DdMm);
        assert_eq!(classify_date_format("990712"), DateFormat::Other);
    }

    #[test]
    fn order_resolves_ambiguity() {
        // also 20 Dec 1990 as DDMMYYYY
        assert_eq!(classify_date_format("20121990"), DateFormat::YyyyYyyy);
        // also 20 Dec as DDMM
        assert_eq!(classify_date_format("2012"), DateFormat::Yyyy);
        // also 10 Dec as DDMM
        assert_eq!(classify_date_format("1012"), DateFormat::MmDd);
    }

    #[test]
    fn calendar_ranges_enforced() {
        assert_eq!(classify_date_format("19901301"), DateFormat::Other);
        assert_eq!(classify_date_format("1332"), DateFormat::Other);
        assert_eq!(classify_date_format("0000"), DateFormat::Other);
    }

    #[test]
    fn tally_decomposes_per_format() {
        let mut years = Counter::new();
        let mut md = Counter::new();
        DateFormat::YyyyMmDd.tally("20230401", &mut years, &mut md);
        DateFormat::DdMmYyyy.tally("25121988", &mut years, &mut md);
        DateFormat::YyyyYyyy.tally("19992000", &mut years, &mut md);
        DateFormat::YyyyMm.tally("199005", &mut years, &mut md);
        DateFormat::Yyyy.tally("1990", &mut years, &mut md);
        DateFormat::MmDd.tally("0214", &mut years, &mut md);
        DateFormat::DdMm.tally("1402", &mut years, &mut md);
        assert_eq!(years.get("2023"), 1);
        assert_eq!(years.get("1988"), 1);
        assert_eq!(years.get("1999"), 1);
        assert_eq!(years.get("2000"), 1);
        assert_eq!(years.get("1990"), 2);
        assert_eq!(md.get("0401"), 1);
        assert_eq!(md.get("1225"), 1);
        assert_eq!(md.get("0214"), 2);
        assert_eq!(md.len(), 3);
    }
}
