//! Pipeline orchestration
//!
//! This module provides the public API for Seqfeat. It wires the full
//! pipeline from a capture file to the feature CSV: read → extract → encode.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encoder::CsvEncoder;
use crate::error::ExtractError;
use crate::features::FeatureExtractor;
use crate::reader;
use crate::types::{FeatureTable, SymbolPolicy, BUCKETS};

/// Summary of a completed extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of records written
    pub records: usize,
    /// Number of output columns, index column included
    pub columns: usize,
    /// When the run finished
    pub computed_at_utc: DateTime<Utc>,
}

impl RunSummary {
    fn for_table(table: &FeatureTable) -> Self {
        Self {
            records: table.len(),
            // index + proportions + label
            columns: BUCKETS + 2,
            computed_at_utc: Utc::now(),
        }
    }
}

/// Run the full pipeline from `input` to `output` with the given policy
///
/// Reads the capture file, extracts one feature row per line, and writes the
/// CSV, truncating any existing output. Any malformed record aborts the run
/// before the output is finalized.
///
/// # Example
/// ```ignore
/// let summary = extract_file_to_csv(
///     "./OriginData.txt",
///     "./data.csv",
///     SymbolPolicy::CatchAll,
/// )?;
/// println!("wrote {} records", summary.records);
/// ```
pub fn extract_file_to_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    policy: SymbolPolicy,
) -> Result<RunSummary, ExtractError> {
    SeqfeatProcessor::new(policy).process_file(input, output)
}

/// Configured processor for running extractions
///
/// Use this when several captures are processed with one configuration, or
/// when the caller owns the input lines or the output sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqfeatProcessor {
    extractor: FeatureExtractor,
    encoder: CsvEncoder,
}

impl SeqfeatProcessor {
    pub fn new(policy: SymbolPolicy) -> Self {
        Self {
            extractor: FeatureExtractor::new(policy),
            encoder: CsvEncoder::new(),
        }
    }

    pub fn policy(&self) -> SymbolPolicy {
        self.extractor.policy()
    }

    /// Extract a feature table from raw record lines
    pub fn process_lines<I, S>(&self, lines: I) -> Result<FeatureTable, ExtractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extractor.extract_all(lines)
    }

    /// Extract raw record lines and write the feature table to `writer`
    pub fn process_lines_to_writer<I, S, W>(
        &self,
        lines: I,
        writer: W,
    ) -> Result<RunSummary, ExtractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write,
    {
        let table = self.extractor.extract_all(lines)?;
        self.encoder.write_table(&table, writer)?;
        Ok(RunSummary::for_table(&table))
    }

    /// Extract `input` and write the feature table to `writer`
    pub fn process_to_writer<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        writer: W,
    ) -> Result<RunSummary, ExtractError> {
        let lines = reader::read_lines(input)?;
        self.process_lines_to_writer(&lines, writer)
    }

    /// Extract `input` and write the feature table to `output`
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<RunSummary, ExtractError> {
        let lines = reader::read_lines(input)?;
        let table = self.extractor.extract_all(&lines)?;
        self.encoder.write_file(&table, output)?;
        Ok(RunSummary::for_table(&table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Write as _;

    fn write_capture(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("OriginData.txt");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn test_end_to_end_two_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_capture(&dir, "3 0 0 1 7\n1 2 2\n");
        let output = dir.path().join("data.csv");

        let summary =
            extract_file_to_csv(&input, &output, SymbolPolicy::CatchAll).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.columns, 10);

        let csv = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            ",0_Proportion,1_Proportion,2_Proportion,3_Proportion,\
             4_Proportion,5_Proportion,6_Proportion,7_Proportion,label"
        );
        assert_eq!(lines[1], "0,0.5,0.25,0.0,0.0,0.0,0.0,0.0,0.25,3");
        assert_eq!(lines[2], "1,0.0,0.0,1.0,0.0,0.0,0.0,0.0,0.0,1");
    }

    #[test]
    fn test_runs_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_capture(&dir, "3 0 0 1 7\n0 7 7 7\n2 5 5 6\n");
        let output = dir.path().join("data.csv");

        extract_file_to_csv(&input, &output, SymbolPolicy::CatchAll).unwrap();
        let first = fs::read(&output).unwrap();

        extract_file_to_csv(&input, &output, SymbolPolicy::CatchAll).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_row_count_matches_line_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_capture(&dir, "0 1\n1 2\n2 3\n3 4\n4 5\n");

        let processor = SeqfeatProcessor::default();
        let lines = crate::reader::read_lines(&input).unwrap();
        let table = processor.process_lines(&lines).unwrap();

        assert_eq!(table.len(), lines.len());
    }

    #[test]
    fn test_missing_input_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data.csv");

        let err = extract_file_to_csv(
            dir.path().join("absent.txt"),
            &output,
            SymbolPolicy::CatchAll,
        )
        .unwrap_err();

        assert!(matches!(err, ExtractError::Io(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_malformed_record_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_capture(&dir, "3 0 1\nbogus 2 2\n");
        let output = dir.path().join("data.csv");

        let err =
            extract_file_to_csv(&input, &output, SymbolPolicy::CatchAll).unwrap_err();

        assert!(matches!(err, ExtractError::LabelParse { line: 2, .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_strict_processor_rejects_stray_tokens() {
        let processor = SeqfeatProcessor::new(SymbolPolicy::Strict);
        let err = processor.process_lines(["1 0 x"]).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownSymbol { .. }));
    }

    #[test]
    fn test_process_to_writer_matches_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_capture(&dir, "1 0 0 7\n");
        let output = dir.path().join("data.csv");

        let processor = SeqfeatProcessor::default();
        processor.process_file(&input, &output).unwrap();

        let mut buf = Vec::new();
        processor.process_to_writer(&input, &mut buf).unwrap();

        assert_eq!(buf, fs::read(&output).unwrap());
    }
}
