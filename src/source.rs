use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::io::split_lines;

/// Line layout of a credential dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SourceKind {
    /// `field1:field2:...:password`, at least three fields.
    Colon,
    /// `... # password # ...`, first `#`-delimited span.
    Hash,
    /// The whole trimmed line is the password.
    Plain,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Colon => "colon",
            SourceKind::Hash => "hash",
            SourceKind::Plain => "plain",
        }
    }

    /// Fill color used for this source's charts.
    pub fn chart_color(&self) -> &'static str {
        match self {
            SourceKind::Colon => "steelblue",
            SourceKind::Hash => "darkorange",
            SourceKind::Plain => "gray",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("expected at least 3 colon-separated fields: {0}")]
    MissingFields(String),
    #[error("no #-delimited password: {0}")]
    MissingMarkers(String),
    #[error("empty password: {0}")]
    EmptyPassword(String),
}

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
static HASH_DELIMITED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*(.*?)\s*#").expect("valid regex"));

/// Extract the password from one already-trimmed dump line.
pub fn parse_line(kind: SourceKind, line: &str) -> Result<String, SourceError> {
    let password = match kind {
        SourceKind::Colon => {
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() < 3 {
                return Err(SourceError::MissingFields(line.to_string()));
            }
            fields[fields.len() - 1].trim()
        }
        SourceKind::Hash => HASH_DELIMITED
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .ok_or_else(|| SourceError::MissingMarkers(line.to_string()))?,
        SourceKind::Plain => line.trim(),
    };
    if password.is_empty() {
        return Err(SourceError::EmptyPassword(line.to_string()));
    }
    Ok(password.to_string())
}

/// Parse every line of an in-memory dump, skipping blank and malformed lines.
pub fn parse_contents(kind: SourceKind, contents: &str) -> Vec<String> {
    split_lines(contents)
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            parse_line(kind, trimmed).ok()
        })
        .collect()
}
