//! A labeled password corpus loaded from one credential dump.
//!
//! Loading never fails outright: a dump that cannot be opened is logged and
//! yields an empty corpus so the other input can still be analyzed.
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::io::{iter_lines_auto, split_lines};
use crate::source::{SourceKind, parse_contents, parse_line};

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("cannot read {}: {reason}", path.display())]
    FileAccess { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    pub label: String,
    pub kind: SourceKind,
    /// Passwords in file order, duplicates kept.
    pub passwords: Vec<String>,
    /// Non-blank lines that did not yield a password.
    pub skipped_lines: usize,
}

impl Corpus {
    pub fn empty(label: &str, kind: SourceKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
            passwords: Vec::new(),
            skipped_lines: 0,
        }
    }

    /// Build a corpus from dump contents already in memory.
    pub fn from_contents(label: &str, kind: SourceKind, contents: &str) -> Self {
        let passwords = parse_contents(kind, contents);
        let non_blank = split_lines(contents).filter(|l| !l.trim().is_empty()).count();
        Self {
            label: label.to_string(),
            kind,
            skipped_lines: non_blank - passwords.len(),
            passwords,
        }
    }

    /// Stream a dump from disk. A read error part way through keeps the
    /// passwords read so far.
    pub fn try_load<P: AsRef<Path>>(
        label: &str,
        kind: SourceKind,
        path: P,
        mmap_threshold_bytes: u64,
    ) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let iter =
            iter_lines_auto(path, mmap_threshold_bytes).map_err(|e| CorpusError::FileAccess {
                path: path.to_path_buf(),
                reason: format!("{e:#}"),
            })?;
        let mut corpus = Self::empty(label, kind);
        for line in iter {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("read error in {} (stopping): {}", path.display(), e);
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match parse_line(kind, trimmed) {
                Ok(pw) => corpus.passwords.push(pw),
                Err(e) => {
                    debug!("skip: {}", e);
                    corpus.skipped_lines += 1;
                }
            }
        }
        info!(
            "read {} passwords from {} ({} lines skipped)",
            corpus.passwords.len(),
            path.display(),
            corpus.skipped_lines
        );
        Ok(corpus)
    }

    /// Like [`Corpus::try_load`], but a file access failure is logged and
    /// produces an empty corpus.
    pub fn load<P: AsRef<Path>>(
        label: &str,
        kind: SourceKind,
        path: P,
        mmap_threshold_bytes: u64,
    ) -> Self {
        match Self::try_load(label, kind, path, mmap_threshold_bytes) {
            Ok(corpus) => corpus,
            Err(e) => {
                error!("{} (continuing with 0 passwords for {})", e, label);
                Self::empty(label, kind)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn counts_skipped_lines() {
        let c = Corpus::from_contents("Yahoo", SourceKind::Colon, "1:a:one\nbad\n\n2:b:two\n");
        assert_eq!(c.passwords, vec!["one", "two"]);
        assert_eq!(c.skipped_lines, 1);
    }

    #[test]
    fn streams_file_through_both_readers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("csdn.sql");
        fs::write(&path, "u1 # pass1990 # a@b\r\nbroken line\nu2 # 0214love # c@d\n").unwrap();
        for threshold in [1, u64::MAX] {
            let c = Corpus::try_load("CSDN", SourceKind::Hash, &path, threshold).unwrap();
            assert_eq!(c.passwords, vec!["pass1990", "0214love"]);
            assert_eq!(c.skipped_lines, 1);
        }
    }

    #[test]
    fn classic_mac_line_endings_are_separate_lines() {
        let contents = "u1 # alice1990 # a@b\rbroken\ru2 # 0214love # c@d\r";
        let c = Corpus::from_contents("CSDN", SourceKind::Hash, contents);
        assert_eq!(c.passwords, vec!["alice1990", "0214love"]);
        assert_eq!(c.skipped_lines, 1);

        let dir = tempdir().unwrap();
        let path = dir.path().join("mac.sql");
        fs::write(&path, contents).unwrap();
        for threshold in [1, u64::MAX] {
            let loaded = Corpus::try_load("CSDN", SourceKind::Hash, &path, threshold).unwrap();
            assert_eq!(loaded.passwords, c.passwords);
            assert_eq!(loaded.skipped_lines, 1);
        }
    }

    #[test]
    fn missing_file_yields_empty_corpus() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = Corpus::try_load("X", SourceKind::Plain, &path, 0).unwrap_err();
        assert!(matches!(err, CorpusError::FileAccess { .. }));
        assert!(err.to_string().contains("missing.txt"));
        let c = Corpus::load("X", SourceKind::Plain, &path, 0);
        assert!(c.is_empty());
        assert_eq!(c.label, "X");
    }
}
