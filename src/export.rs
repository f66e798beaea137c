//! CSV exports of the full counters behind the report.
//!
//! - `save_counter_csv` writes `key,count` rows, highest count first.
//! - `save_common_passwords_csv` writes the cross-corpus table.
//! - `save_corpus_csvs` writes every counter of one corpus.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;

use crate::chart::file_stem;
use crate::counter::Counter;
use crate::engine::CorpusAnalysis;
use crate::stats::CrossComparison;

pub fn save_counter_csv<P: AsRef<Path>>(counter: &Counter, key_header: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    wtr.write_record([key_header, "Count"])?;
    for (key, n) in counter.most_common(None) {
        wtr.write_record([key, n.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_common_passwords_csv<P: AsRef<Path>>(
    cross: &CrossComparison,
    first_label: &str,
    second_label: &str,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(["Password", "Total", first_label, second_label])?;
    for c in &cross.top_common {
        wtr.write_record([
            c.password.clone(),
            c.total().to_string(),
            c.first.to_string(),
            c.second.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one CSV per counter of `a` into `outdir`, returning the paths written.
pub fn save_corpus_csvs<P: AsRef<Path>>(a: &CorpusAnalysis, outdir: P) -> Result<Vec<PathBuf>> {
    let stem = file_stem(&a.label);
    let mut tables: Vec<(String, &str, &Counter)> = vec![
        ("formats".to_string(), "Format", &a.dates.formats),
        ("years".to_string(), "Year", &a.dates.years),
        ("monthdays".to_string(), "MMDD", &a.dates.month_days),
        ("date_structures".to_string(), "Structure", &a.dates.structures),
        ("patterns".to_string(), "Pattern", &a.patterns.patterns),
        ("ngrams".to_string(), "Substring", &a.ngrams.ngrams),
    ];
    for (fmt, dates) in &a.dates.dates_by_format {
        tables.push((format!("dates_{}", fmt.as_str()), "Date", dates));
    }
    let mut written = Vec::new();
    for (name, header, counter) in tables {
        let path = outdir.as_ref().join(format!("{stem}_{name}.csv"));
        save_counter_csv(counter, header, &path)?;
        written.push(path);
    }
    Ok(written)
}
