//! Human-readable reports.
//!
//! [`render_report`] produces the plain UTF-8 text written to the report file;
//! [`render_summary`] is a shorter colored digest for the terminal.
use std::fmt::Write as _;

use colored::*;

use crate::config::{NGRAM_MAX, NGRAM_MIN};
use crate::engine::{Analysis, CorpusAnalysis};
use crate::stats::{CrossComparison, pct};

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

fn push_lines(out: &mut String, lines: Vec<String>) {
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
}

fn basic_section(a: &CorpusAnalysis, top_n: usize) -> String {
    let mut out = section_header(&format!("{} Basic Statistics", a.label));
    let b = &a.basic;
    if b.total == 0 {
        out.push_str("(no passwords)\n");
        return out;
    }
    let mut lines = vec![
        format!("Total passwords: {}", b.total),
        format!("Average length: {:.2}", b.average_length()),
        "Character classes: L=lowercase, U=uppercase, D=digit, S=symbol".to_string(),
        String::new(),
    ];
    for (class, count) in &b.char_classes {
        lines.push(format!(
            "{} ({}): {} ({})",
            class.name(),
            class.code(),
            count,
            b.class_share(*class)
        ));
    }
    push_lines(&mut out, lines);

    out.push_str(&section_header(&format!(
        "{} Top-{} Structure Patterns",
        a.label, top_n
    )));
    let lines = a
        .patterns
        .patterns
        .most_common(Some(top_n))
        .into_iter()
        .map(|(p, n)| format!("{p}: {n}"))
        .collect();
    push_lines(&mut out, lines);

    out.push_str(&section_header(&format!(
        "{} Top-{} Substrings (length {}-{})",
        a.label, top_n, NGRAM_MIN, NGRAM_MAX
    )));
    let lines = a
        .ngrams
        .ngrams
        .most_common(Some(top_n))
        .into_iter()
        .map(|(g, n)| format!("'{g}': {n}"))
        .collect();
    push_lines(&mut out, lines);
    out
}

fn date_section(a: &CorpusAnalysis, top_n: usize) -> String {
    let d = &a.dates;
    let mut out = section_header(&format!("{} Date Statistics", a.label));
    let mut lines = vec![
        format!("Total passwords: {}", d.total),
        format!(
            "Passwords containing a date: {} ({})",
            d.with_dates,
            d.date_percentage()
        ),
        String::new(),
        "Date format distribution:".to_string(),
    ];
    for (fmt, n) in d.formats.most_common(None) {
        lines.push(format!("{fmt}: {n}"));
    }
    lines.push(String::new());
    lines.push(format!("Top-{top_n} dates per format:"));
    for (fmt, dates) in &d.dates_by_format {
        lines.push(String::new());
        lines.push(format!("[{fmt}] Top-{top_n}:"));
        for (date, n) in dates.most_common(Some(top_n)) {
            lines.push(format!("{date}: {n}"));
        }
    }
    push_lines(&mut out, lines);

    out.push_str(&section_header(&format!("{} Top-{} Years", a.label, top_n)));
    let lines = d
        .years
        .most_common(Some(top_n))
        .into_iter()
        .map(|(y, n)| format!("{y}: {n}"))
        .collect();
    push_lines(&mut out, lines);

    out.push_str(&section_header(&format!(
        "{} Top-{} Month-Day (MMDD) Combinations",
        a.label, top_n
    )));
    let lines = d
        .month_days
        .most_common(Some(top_n))
        .into_iter()
        .map(|(md, n)| format!("{md}: {n}"))
        .collect();
    push_lines(&mut out, lines);

    out.push_str(&section_header(&format!(
        "{} Top-{} Date Structures (N=date, L=letter, D=digit, S=symbol)",
        a.label, top_n
    )));
    let lines = d
        .structures
        .most_common(Some(top_n))
        .into_iter()
        .map(|(s, n)| format!("{s}: {n}"))
        .collect();
    push_lines(&mut out, lines);
    out
}

fn cross_section(first: &str, second: &str, cross: &CrossComparison) -> String {
    let mut out = section_header("Cross-Corpus Comparison");
    let mut lines = vec![
        format!("{first} unique passwords: {}", cross.unique_first),
        format!("{second} unique passwords: {}", cross.unique_second),
        format!("Passwords common to both: {}", cross.common_count),
        String::new(),
    ];
    if cross.top_common.is_empty() {
        lines.push("(No common passwords)".to_string());
    } else {
        lines.push(format!("Top-{} common passwords:", cross.top_common.len()));
        for c in &cross.top_common {
            lines.push(format!(
                "'{}': {} total ({} {}, {} {})",
                c.password,
                c.total(),
                first,
                c.first,
                second,
                c.second
            ));
        }
    }
    push_lines(&mut out, lines);
    out
}

/// Full plain-text report for both corpora.
pub fn render_report(analysis: &Analysis, top_n: usize) -> String {
    let mut out = String::from("Leaked Password Pattern Analysis\n");
    for a in analysis.corpora() {
        out.push_str(&basic_section(a, top_n));
        out.push_str(&date_section(a, top_n));
    }
    out.push_str(&cross_section(
        &analysis.first.label,
        &analysis.second.label,
        &analysis.cross,
    ));
    out
}

/// Short colored digest for the terminal.
pub fn render_summary(analysis: &Analysis, top_n: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        "LeakStat: Password Pattern Analysis Results".bold().cyan()
    );
    for a in analysis.corpora() {
        let d = &a.dates;
        let mut lines = vec![
            format!("Source: {}", a.kind),
            format!("Total passwords: {}", a.basic.total),
            format!("Average length: {:.2}", a.basic.average_length()),
            format!("With dates: {} ({})", d.with_dates, d.date_percentage()),
        ];
        let formats: Vec<String> = d
            .formats
            .most_common(Some(top_n))
            .into_iter()
            .map(|(f, n)| format!("{f}={n}"))
            .collect();
        if formats.is_empty() {
            lines.push(format!("Formats: {}", "(none)".dimmed()));
        } else {
            lines.push(format!("Formats: {}", formats.join(", ")));
        }
        if let Some((year, n)) = d.years.most_common(Some(1)).first() {
            lines.push(format!(
                "Top year: {} ({}, {} of years)",
                year.green(),
                n,
                pct(*n, d.years.total())
            ));
        }
        if let Some((md, n)) = d.month_days.most_common(Some(1)).first() {
            lines.push(format!("Top month-day: {} ({})", md.green(), n));
        }
        out.push_str(&section_header(&a.label.bold().yellow().to_string()));
        push_lines(&mut out, lines);
    }

    let cross = &analysis.cross;
    let mut lines = vec![format!("Common passwords: {}", cross.common_count)];
    for c in &cross.top_common {
        lines.push(format!("  {}: {}", c.password.red(), c.total()));
    }
    out.push_str(&section_header(
        &"Cross-Corpus Comparison".bold().magenta().to_string(),
    ));
    push_lines(&mut out, lines);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::source::SourceKind;

    fn engine(first: &str, second: &str) -> Engine {
        let mut e = Engine::new();
        e.load_from_strings(
            ("Yahoo", SourceKind::Colon, first),
            ("CSDN", SourceKind::Hash, second),
        );
        e
    }

    #[test]
    fn report_contains_every_section() {
        let e = engine(
            "1:a:alice1990\n2:b:20230401love\n3:c:password\n",
            "u # password # m\nu # 0214love # m\n",
        );
        let r = render_report(&e.analyze(10, false), 10);
        for needle in [
            "Yahoo Basic Statistics",
            "Average length: 9.67",
            "Yahoo Top-10 Structure Patterns",
            "Yahoo Top-10 Substrings (length 3-6)",
            "Passwords containing a date: 2 (66.67%)",
            "[YYYY] Top-10:\n1990: 1",
            "[YYYYMMDD] Top-10:\n20230401: 1",
            "LLLLLNNNN: 1",
            "NNNNNNNNLLLL: 1",
            "CSDN Top-10 Month-Day (MMDD) Combinations\n─",
            "0214: 1",
            "NNNNLLLL: 1",
            "'password': 2 total (Yahoo 1, CSDN 1)",
        ] {
            assert!(r.contains(needle), "missing {needle:?} in\n{r}");
        }
    }

    #[test]
    fn empty_corpus_reports_zero_percent() {
        let e = engine("", "");
        let r = render_report(&e.analyze(10, false), 10);
        assert!(r.contains("(no passwords)"));
        assert!(r.contains("Total passwords: 0\nPasswords containing a date: 0 (0.00%)"));
        assert!(r.contains("(No common passwords)"));
    }

    #[test]
    fn top_limit_applies() {
        let e = engine("1:a:aaa1990\n1:a:bbb1991\n1:a:ccc1991\n", "");
        let r = render_report(&e.analyze(1, false), 1);
        assert!(r.contains("Yahoo Top-1 Years\n"));
        assert!(r.contains("\n1991: 2\n"));
        assert!(!r.contains("1990: 1"));
    }

    #[test]
    fn snapshot_cross_section() {
        let e = engine(
            "1:a:123456\n2:b:123456\n3:c:qwerty\n4:d:letmein\n",
            "u # qwerty # m\nu # 123456 # m\nu # qwerty # m\n",
        );
        let a = e.analyze(10, false);
        let s = cross_section(&a.first.label, &a.second.label, &a.cross);
        insta::assert_snapshot!(s.trim(), @r"
        Cross-Corpus Comparison
        ───────────────────────

        Yahoo unique passwords: 3
        CSDN unique passwords: 2
        Passwords common to both: 2

        Top-2 common passwords:
        '123456': 3 total (Yahoo 2, CSDN 1)
        'qwerty': 3 total (Yahoo 1, CSDN 2)
        ");
    }

    #[test]
    fn summary_mentions_each_corpus() {
        let e = engine("1:a:alice1990\n", "u # bob1990 # m\n");
        let s = render_summary(&e.analyze(10, false), 10);
        assert!(s.contains("Yahoo"));
        assert!(s.contains("CSDN"));
        assert!(s.contains("With dates: 1 (100.00%)"));
        assert!(s.contains("Formats: YYYY=1"));
    }
}
