//! CSV encoding
//!
//! This module serializes a feature table to the fixed tabular layout: a
//! leading unnamed row-index column, the eight proportion columns in digit
//! order, then the label column. The table is written fully materialized, in
//! one pass, so repeated runs over the same input are byte-identical.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExtractError;
use crate::types::FeatureTable;

/// Default feature table path consumed by the training stage
pub const DEFAULT_OUTPUT_PATH: &str = "./data.csv";

/// Encoder for the fixed-schema feature CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvEncoder;

impl CsvEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Write `table` to `out` with the header row and 0-based row indices
    pub fn write_table<W: Write>(&self, table: &FeatureTable, out: W) -> Result<(), ExtractError> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

        writer.write_record(FeatureTable::columns())?;

        for (index, row) in table.rows().iter().enumerate() {
            let p = &row.proportions;
            writer.serialize((
                index as u64,
                p[0],
                p[1],
                p[2],
                p[3],
                p[4],
                p[5],
                p[6],
                p[7],
                row.label,
            ))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write `table` to `path`, truncating any existing file
    pub fn write_file<P: AsRef<Path>>(
        &self,
        table: &FeatureTable,
        path: P,
    ) -> Result<(), ExtractError> {
        let file = File::create(path)?;
        self.write_table(table, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureRow;
    use pretty_assertions::assert_eq;

    fn encode(table: &FeatureTable) -> String {
        let mut buf = Vec::new();
        CsvEncoder::new().write_table(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_row() {
        let output = encode(&FeatureTable::new());
        assert_eq!(
            output,
            ",0_Proportion,1_Proportion,2_Proportion,3_Proportion,\
             4_Proportion,5_Proportion,6_Proportion,7_Proportion,label\n"
        );
    }

    #[test]
    fn test_rows_carry_sequential_indices() {
        let table: FeatureTable = vec![
            FeatureRow {
                proportions: [0.5, 0.25, 0.0, 0.0, 0.0, 0.0, 0.0, 0.25],
                label: 3,
            },
            FeatureRow {
                proportions: [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                label: 1,
            },
        ]
        .into_iter()
        .collect();

        let output = encode(&table);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0,0.5,0.25,0.0,0.0,0.0,0.0,0.0,0.25,3");
        assert_eq!(lines[2], "1,0.0,0.0,1.0,0.0,0.0,0.0,0.0,0.0,1");
    }

    #[test]
    fn test_write_file_truncates_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "stale contents that are longer than the table\n").unwrap();

        let table: FeatureTable = std::iter::once(FeatureRow {
            proportions: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            label: 0,
        })
        .collect();

        CsvEncoder::new().write_file(&table, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(written.starts_with(",0_Proportion"));
        assert!(written.ends_with("0,1.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0\n"));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let table: FeatureTable = std::iter::once(FeatureRow {
            proportions: [0.0, 0.333, 0.667, 0.0, 0.0, 0.0, 0.0, 0.0],
            label: 2,
        })
        .collect();

        assert_eq!(encode(&table), encode(&table));
    }
}
