//! In-memory tabular data passed between pipeline stages.

use std::io;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{IngestError, IngestResult};

/// An ordered set of rows with named columns.
///
/// Every row has exactly one cell per column. Cells are kept as text; the
/// label encoding done by the preprocessor writes `"1"` / `"0"`, which is what
/// ends up in the output CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordSet {
    /// Build a record set, rejecting rows whose width does not match the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> IngestResult<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(IngestError::schema(format!(
                "row {} has {} fields, expected {}",
                idx + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Parse headered CSV.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn from_csv_str(content: &str) -> Result<Self, csv::Error> {
        Self::from_csv_reader(content.as_bytes())
    }

    /// Write headered CSV without any row index column.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column in row order, or `None` if the column is absent.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Same columns, different rows. Caller guarantees row widths.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == self.columns.len()));
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Copy out the rows at `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> Self {
        self.with_rows(indices.iter().map(|&i| self.rows[i].clone()).collect())
    }
}
