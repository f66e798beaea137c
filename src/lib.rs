pub mod chart;
pub mod classify;
pub mod config;
pub mod corpus;
pub mod counter;
pub mod engine;
pub mod export;
pub mod extract;
pub mod io;
pub mod report;
pub mod source;
pub mod stats;
pub mod structure;

pub mod prelude {
    pub use crate::classify::{DateFormat, classify_date_format};
    pub use crate::corpus::Corpus;
    pub use crate::extract::extract_date_candidates;
    pub use crate::source::SourceKind;
    pub use crate::structure::date_structure;
}
