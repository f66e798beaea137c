//! Compile-time defaults. The CLI can override the top-K size and the output
//! directory; everything else is fixed.

/// Number of entries shown in every "top" table and chart.
pub const TOP_K: usize = 10;

/// Inclusive n-gram length range for substring analysis.
pub const NGRAM_MIN: usize = 3;
pub const NGRAM_MAX: usize = 6;

pub const DEFAULT_OUTPUT_DIR: &str = "analysis_results";
pub const REPORT_FILE_NAME: &str = "password_analysis_report.txt";

/// Numeric passwords that look like dates but almost never are.
pub const NOISE_NUMBERS: &[&str] = &[
    "123456", "654321", "123123", "1234", "4321", "1314", "123321",
];

/// Longest password length given its own bar in the length chart.
pub const LENGTH_CHART_MAX: usize = 20;
