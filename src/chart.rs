//! Standalone SVG charts.
//!
//! Each corpus gets a fixed set of files named `<label>_<chart>.svg`. A chart
//! whose data is empty is not written at all, so an empty corpus produces no
//! files.
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::config::LENGTH_CHART_MAX;
use crate::engine::CorpusAnalysis;

const BAR_WIDTH: f64 = 800.0;
const BAR_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 110.0;
const PIE_SIZE: f64 = 500.0;
const PIE_COLORS: &[&str] = &["#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860"];

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[derive(Debug, Clone)]
pub struct BarChart<'a> {
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub color: &'a str,
    pub items: Vec<(String, usize)>,
}

impl BarChart<'_> {
    pub fn render(&self) -> String {
        let plot_w = BAR_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = BAR_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let max = self.items.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1) as f64;
        let slot = plot_w / self.items.len().max(1) as f64;
        let base = MARGIN_TOP + plot_h;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{BAR_WIDTH}" height="{BAR_HEIGHT}" font-family="sans-serif" font-size="12">"#
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            BAR_WIDTH / 2.0,
            xml_escape(&self.title)
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{base:.1}" x2="{:.1}" y2="{base:.1}" stroke="black"/>"#,
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{base:.1}" stroke="black"/>"#
        );
        for (i, (label, value)) in self.items.iter().enumerate() {
            let h = *value as f64 / max * plot_h;
            let x = MARGIN_LEFT + slot * i as f64 + slot * 0.1;
            let w = slot * 0.8;
            let cx = x + w / 2.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{:.1}" width="{w:.1}" height="{h:.1}" fill="{}"><title>{}: {value}</title></rect>"#,
                base - h,
                self.color,
                xml_escape(label)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="10">{value}</text>"#,
                base - h - 4.0
            );
            let _ = writeln!(
                svg,
                r#"<text x="{cx:.1}" y="{:.1}" text-anchor="end" transform="rotate(-45 {cx:.1} {:.1})">{}</text>"#,
                base + 14.0,
                base + 14.0,
                xml_escape(label)
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            BAR_HEIGHT - 10.0,
            xml_escape(self.x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{:.1}" text-anchor="middle" transform="rotate(-90 16 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            xml_escape(self.y_label)
        );
        svg.push_str("</svg>\n");
        svg
    }
}

/// Pie chart with one slice per item, labeled with its share.
pub fn render_pie(title: &str, items: &[(String, usize)]) -> String {
    let total: usize = items.iter().map(|(_, v)| *v).sum();
    let cx = PIE_SIZE / 2.0;
    let cy = PIE_SIZE / 2.0 + 10.0;
    let r = PIE_SIZE / 2.0 - 70.0;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PIE_SIZE}" height="{PIE_SIZE}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{cx:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        xml_escape(title)
    );
    // start at twelve o'clock, clockwise
    let mut angle = -std::f64::consts::FRAC_PI_2;
    for (i, (label, value)) in items.iter().enumerate() {
        let share = if total == 0 { 0.0 } else { *value as f64 / total as f64 };
        let color = PIE_COLORS[i % PIE_COLORS.len()];
        let sweep = share * std::f64::consts::TAU;
        if share >= 1.0 {
            let _ = writeln!(
                svg,
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"/>"#
            );
        } else if share > 0.0 {
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
            let _ = writeln!(
                svg,
                r#"<path d="M {cx:.1} {cy:.1} L {x1:.2} {y1:.2} A {r:.1} {r:.1} 0 {large} 1 {x2:.2} {y2:.2} Z" fill="{color}"/>"#
            );
        }
        let mid = angle + sweep / 2.0;
        let (lx, ly) = (cx + (r + 30.0) * mid.cos(), cy + (r + 30.0) * mid.sin());
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle">{} ({:.1}%)</text>"#,
            xml_escape(label),
            share * 100.0
        );
        angle += sweep;
    }
    svg.push_str("</svg>\n");
    svg
}

fn owned(items: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    items.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Safe file-name stem for a corpus label.
pub fn file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "corpus".to_string() } else { stem }
}

/// Every chart for one corpus as `(file name, svg)`, empty data skipped.
pub fn corpus_charts(a: &CorpusAnalysis, top_n: usize) -> Vec<(String, String)> {
    let stem = file_stem(&a.label);
    let color = a.kind.chart_color();
    let d = &a.dates;
    let mut charts = Vec::new();

    let bars = [
        (
            "date_formats",
            format!("{} Date Formats Top-{}", a.label, top_n),
            "Format",
            owned(d.formats.most_common(Some(top_n))),
        ),
        (
            "top_years",
            format!("{} Years Top-{}", a.label, top_n),
            "Year",
            owned(d.years.most_common(Some(top_n))),
        ),
        (
            "top_monthdays",
            format!("{} Month-Days (MMDD) Top-{}", a.label, top_n),
            "MMDD",
            owned(d.month_days.most_common(Some(top_n))),
        ),
        (
            "top_structures",
            format!("{} Date Structures Top-{}", a.label, top_n),
            "Structure",
            owned(d.structures.most_common(Some(top_n))),
        ),
        (
            "patterns",
            format!("{} Top-{} Password Patterns", a.label, top_n),
            "Pattern",
            owned(a.patterns.patterns.most_common(Some(top_n))),
        ),
        (
            "length_distribution",
            format!("{} Password Length Distribution", a.label),
            "Password Length",
            if a.basic.lengths.is_empty() {
                Vec::new()
            } else {
                (1..=LENGTH_CHART_MAX)
                    .map(|len| {
                        let n = a.basic.lengths.get(&len).copied().unwrap_or(0);
                        (len.to_string(), n)
                    })
                    .collect()
            },
        ),
    ];
    for (name, title, x_label, items) in bars {
        if items.is_empty() {
            debug!("skip empty chart {}_{}", stem, name);
            continue;
        }
        let chart = BarChart {
            title,
            x_label,
            y_label: "Count",
            color,
            items,
        };
        charts.push((format!("{stem}_{name}.svg"), chart.render()));
    }

    if !a.basic.char_classes.is_empty() {
        let items: Vec<(String, usize)> = a
            .basic
            .char_classes
            .iter()
            .map(|(class, n)| (format!("{} ({})", class.code(), class.name()), *n))
            .collect();
        let title = format!("{} Character Type Distribution", a.label);
        charts.push((format!("{stem}_char_types.svg"), render_pie(&title, &items)));
    }
    charts
}

/// Write every chart of one corpus into `outdir`, returning the paths written.
pub fn write_corpus_charts<P: AsRef<Path>>(
    a: &CorpusAnalysis,
    outdir: P,
    top_n: usize,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, svg) in corpus_charts(a, top_n) {
        let path = outdir.as_ref().join(name);
        fs::write(&path, svg).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
