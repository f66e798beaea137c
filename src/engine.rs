//! Engine: loads the two corpora and runs every analysis over them.
//!
//! Typical usage:
//!
//! ```no_run
//! use leakstat::engine::Engine;
//! use leakstat::source::SourceKind;
//! let mut engine = Engine::new();
//! engine.load_from_file_paths(
//!     ("Yahoo", SourceKind::Colon, "plaintxt_yahoo.txt"),
//!     ("CSDN", SourceKind::Hash, "www.csdn.net.sql"),
//! );
//! let analysis = engine.analyze(10, false);
//! println!("{}", leakstat::report::render_report(&analysis, 10));
//! ```
use std::path::Path;

use log::info;

use crate::corpus::Corpus;
use crate::io::DEFAULT_MMAP_THRESHOLD_BYTES;
use crate::source::SourceKind;
use crate::stats::{
    BasicStats, CrossComparison, DateStats, NgramStats, PatternStats, accumulate, compare_corpora,
};

/// Label, line layout and location of one input.
pub type Input<'a, P> = (&'a str, SourceKind, P);

/// Every statistic computed for one corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusAnalysis {
    pub label: String,
    pub kind: SourceKind,
    pub basic: BasicStats,
    pub patterns: PatternStats,
    pub ngrams: NgramStats,
    pub dates: DateStats,
}

impl CorpusAnalysis {
    pub fn compute(corpus: &Corpus, parallel: bool) -> Self {
        let pw = &corpus.passwords;
        let (basic, (patterns, (ngrams, dates))): (
            BasicStats,
            (PatternStats, (NgramStats, DateStats)),
        ) = if parallel {
            rayon::join(
                || accumulate(pw, true),
                || {
                    rayon::join(
                        || accumulate(pw, true),
                        || rayon::join(|| accumulate(pw, true), || accumulate(pw, true)),
                    )
                },
            )
        } else {
            (
                accumulate(pw, false),
                (
                    accumulate(pw, false),
                    (accumulate(pw, false), accumulate(pw, false)),
                ),
            )
        };
        info!(
            "{}: {} passwords, {} with dates",
            corpus.label, dates.total, dates.with_dates
        );
        Self {
            label: corpus.label.clone(),
            kind: corpus.kind,
            basic,
            patterns,
            ngrams,
            dates,
        }
    }
}

/// Results for both corpora plus their comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub first: CorpusAnalysis,
    pub second: CorpusAnalysis,
    pub cross: CrossComparison,
}

impl Analysis {
    pub fn corpora(&self) -> [&CorpusAnalysis; 2] {
        [&self.first, &self.second]
    }
}

#[derive(Debug)]
pub struct Engine {
    pub first: Corpus,
    pub second: Corpus,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Two empty corpora with the default labels.
    pub fn new() -> Self {
        Self {
            first: Corpus::empty("Yahoo", SourceKind::Colon),
            second: Corpus::empty("CSDN", SourceKind::Hash),
        }
    }

    /// Load inputs already in memory. Intended for tests and small programmatic
    /// integrations.
    pub fn load_from_strings(&mut self, first: Input<&str>, second: Input<&str>) {
        self.first = Corpus::from_contents(first.0, first.1, first.2);
        self.second = Corpus::from_contents(second.0, second.1, second.2);
    }

    /// Stream both dumps from disk. Unreadable files become empty corpora.
    pub fn load_from_file_paths_with_threshold<P: AsRef<Path> + Sync>(
        &mut self,
        first: Input<P>,
        second: Input<P>,
        mmap_threshold_bytes: u64,
        parallel: bool,
    ) {
        let load = |input: &Input<'_, P>| {
            Corpus::load(input.0, input.1, &input.2, mmap_threshold_bytes)
        };
        (self.first, self.second) = if parallel {
            rayon::join(|| load(&first), || load(&second))
        } else {
            (load(&first), load(&second))
        };
    }

    /// Convenience wrapper that uses the default mmap threshold, sequentially.
    pub fn load_from_file_paths<P: AsRef<Path> + Sync>(&mut self, first: Input<P>, second: Input<P>) {
        self.load_from_file_paths_with_threshold(first, second, DEFAULT_MMAP_THRESHOLD_BYTES, false);
    }

    pub fn analyze(&self, top_n: usize, parallel: bool) -> Analysis {
        let (first, second) = if parallel {
            rayon::join(
                || CorpusAnalysis::compute(&self.first, true),
                || CorpusAnalysis::compute(&self.second, true),
            )
        } else {
            (
                CorpusAnalysis::compute(&self.first, false),
                CorpusAnalysis::compute(&self.second, false),
            )
        };
        Analysis {
            first,
            second,
            cross: compare_corpora(&self.first.passwords, &self.second.passwords, top_n),
        }
    }
}
