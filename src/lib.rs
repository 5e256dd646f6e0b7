//! Seqfeat - Offline featurization engine for labeled symbol-sequence captures
//!
//! Seqfeat turns whitespace-delimited capture files into model-ready feature
//! tables through a deterministic pipeline: line reading → per-record symbol
//! classification → proportion normalization → CSV encoding.
//!
//! Each input record is one line: an integer gesture label followed by the
//! captured symbol codes. Codes "0" through "6" each map to their own
//! proportion bucket; everything else is folded into the catch-all bucket 7
//! (see [`types::SymbolPolicy`] for the strict alternative).

pub mod encoder;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod reader;
pub mod types;

pub use encoder::{CsvEncoder, DEFAULT_OUTPUT_PATH};
pub use error::ExtractError;
pub use features::FeatureExtractor;
pub use pipeline::{extract_file_to_csv, RunSummary, SeqfeatProcessor};
pub use reader::DEFAULT_INPUT_PATH;
pub use types::{FeatureRow, FeatureTable, SymbolPolicy};

/// Seqfeat version reported in CLI output and run summaries
pub const SEQFEAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "seqfeat";
