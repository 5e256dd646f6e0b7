//! Core types for the Seqfeat pipeline
//!
//! This module defines the data that flows through each stage: per-record
//! symbol counts, normalized feature rows, and the assembled feature table.

use serde::{Deserialize, Serialize};

/// Number of proportion buckets in a feature row
pub const BUCKETS: usize = 8;

/// Column names for the eight proportion buckets, in digit order
pub const PROPORTION_COLUMNS: [&str; BUCKETS] = [
    "0_Proportion",
    "1_Proportion",
    "2_Proportion",
    "3_Proportion",
    "4_Proportion",
    "5_Proportion",
    "6_Proportion",
    "7_Proportion",
];

/// Name of the label column
pub const LABEL_COLUMN: &str = "label";

/// Classification policy for symbol tokens outside "0".."6"
///
/// The capture tool upstream emits direction codes 0-7, but historical data
/// files contain stray tokens that were always folded into bucket 7. The
/// default preserves that behavior; `Strict` rejects anything outside "0".."7".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPolicy {
    /// Any token other than "0".."6" counts into bucket 7
    #[default]
    CatchAll,
    /// Tokens other than "0".."7" are rejected
    Strict,
}

impl SymbolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolPolicy::CatchAll => "catch_all",
            SymbolPolicy::Strict => "strict",
        }
    }
}

/// Fixed-size accumulator for per-record symbol occurrence counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolCounts([u32; BUCKETS]);

impl SymbolCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for `bucket`
    ///
    /// # Panics
    /// Panics if `bucket >= BUCKETS`; callers classify into 0..8 only.
    pub fn increment(&mut self, bucket: usize) {
        self.0[bucket] += 1;
    }

    pub fn get(&self, bucket: usize) -> u32 {
        self.0[bucket]
    }

    /// Total number of classified symbols
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Normalize each bucket count by `symbol_count`, rounding to 3 decimals
    ///
    /// `symbol_count` is the number of symbol tokens in the record (the label
    /// token is excluded), so the resulting proportions sum to 1.0 up to
    /// rounding.
    pub fn into_proportions(self, symbol_count: u32) -> [f64; BUCKETS] {
        let denom = symbol_count as f64;
        self.0.map(|count| round3(count as f64 / denom))
    }
}

/// Round to 3 decimal places using the host float rounding rule
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// One normalized output record: eight rounded proportions plus the label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Proportion of record symbols that fell into each bucket, in digit order
    pub proportions: [f64; BUCKETS],
    /// Record label, copied verbatim from the first input token
    pub label: i64,
}

/// Ordered collection of feature rows with the fixed column layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: FeatureRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header columns in output order: index (unnamed), proportions, label
    pub fn columns() -> Vec<&'static str> {
        let mut cols = Vec::with_capacity(BUCKETS + 2);
        cols.push("");
        cols.extend(PROPORTION_COLUMNS);
        cols.push(LABEL_COLUMN);
        cols
    }
}

impl FromIterator<FeatureRow> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = FeatureRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_accumulate_and_total() {
        let mut counts = SymbolCounts::new();
        counts.increment(0);
        counts.increment(0);
        counts.increment(7);

        assert_eq!(counts.get(0), 2);
        assert_eq!(counts.get(7), 1);
        assert_eq!(counts.get(3), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let mut counts = SymbolCounts::new();
        for bucket in [0, 0, 1, 5, 7, 7, 7] {
            counts.increment(bucket);
        }

        let proportions = counts.into_proportions(7);
        let sum: f64 = proportions.iter().sum();
        assert!((sum - 1.0).abs() < 0.001, "sum was {sum}");
    }

    #[test]
    fn test_proportions_round_to_three_places() {
        let mut counts = SymbolCounts::new();
        counts.increment(2);
        counts.increment(2);
        counts.increment(4);

        let proportions = counts.into_proportions(3);
        // 2/3 -> 0.667, 1/3 -> 0.333
        assert_eq!(proportions[2], 0.667);
        assert_eq!(proportions[4], 0.333);
        assert_eq!(proportions[0], 0.0);
    }

    #[test]
    fn test_column_layout() {
        let cols = FeatureTable::columns();
        assert_eq!(cols.len(), 10);
        assert_eq!(cols[0], "");
        assert_eq!(cols[1], "0_Proportion");
        assert_eq!(cols[8], "7_Proportion");
        assert_eq!(cols[9], "label");
    }

    #[test]
    fn test_default_policy_is_catch_all() {
        assert_eq!(SymbolPolicy::default(), SymbolPolicy::CatchAll);
        assert_eq!(SymbolPolicy::Strict.as_str(), "strict");
    }
}
