//! Feature extraction
//!
//! This module turns one raw record line into a normalized feature row:
//! tokenize, classify each symbol into a proportion bucket, then divide the
//! bucket counts by the record's symbol count.

use crate::error::ExtractError;
use crate::types::{FeatureRow, FeatureTable, SymbolCounts, SymbolPolicy, BUCKETS};

/// Index of the catch-all bucket
const CATCH_ALL_BUCKET: usize = BUCKETS - 1;

/// Per-record feature extractor
///
/// Extraction is a pure function of the input line; the extractor itself only
/// carries the symbol classification policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    policy: SymbolPolicy,
}

impl FeatureExtractor {
    pub fn new(policy: SymbolPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SymbolPolicy {
        self.policy
    }

    /// Extract the feature row for one record line
    ///
    /// `line_no` is the 1-based position of the line in the capture file and
    /// is only used for error reporting.
    ///
    /// The first token is the record label, parsed as an integer with no
    /// range validation. Every remaining token is classified into exactly one
    /// of the 8 buckets; the denominator for normalization is the symbol
    /// count, excluding the label token.
    pub fn extract_line(&self, line_no: usize, line: &str) -> Result<FeatureRow, ExtractError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(ExtractError::EmptyLine { line: line_no });
        }

        // Capture files are single-space delimited; consecutive spaces yield
        // empty tokens, which classify like any other unrecognized symbol.
        let mut tokens = trimmed.split(' ');

        let label_token = match tokens.next() {
            Some(token) => token,
            None => return Err(ExtractError::EmptyLine { line: line_no }),
        };
        let label: i64 = label_token
            .parse()
            .map_err(|_| ExtractError::LabelParse {
                line: line_no,
                token: label_token.to_owned(),
            })?;

        let mut counts = SymbolCounts::new();
        let mut symbol_count: u32 = 0;
        for token in tokens {
            let bucket = self.classify(line_no, token)?;
            counts.increment(bucket);
            symbol_count += 1;
        }

        if symbol_count == 0 {
            return Err(ExtractError::EmptyRecord {
                line: line_no,
                label,
            });
        }

        Ok(FeatureRow {
            proportions: counts.into_proportions(symbol_count),
            label,
        })
    }

    /// Extract all lines into a feature table, preserving input order
    ///
    /// Stops at the first malformed record; output row `i` always corresponds
    /// to input line `i`.
    pub fn extract_all<I, S>(&self, lines: I) -> Result<FeatureTable, ExtractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| self.extract_line(i + 1, line.as_ref()))
            .collect()
    }

    /// Map a symbol token to its bucket index
    fn classify(&self, line_no: usize, token: &str) -> Result<usize, ExtractError> {
        match token {
            "0" => Ok(0),
            "1" => Ok(1),
            "2" => Ok(2),
            "3" => Ok(3),
            "4" => Ok(4),
            "5" => Ok(5),
            "6" => Ok(6),
            "7" => Ok(CATCH_ALL_BUCKET),
            _ => match self.policy {
                SymbolPolicy::CatchAll => Ok(CATCH_ALL_BUCKET),
                SymbolPolicy::Strict => Err(ExtractError::UnknownSymbol {
                    line: line_no,
                    token: token.to_owned(),
                }),
            },
        }
    }
}
