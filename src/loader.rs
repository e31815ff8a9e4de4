//! Loading of the incident table
//!
//! Reads a delimited text file into memory with the `csv` crate. The file is
//! opened, read to the end and closed before anything else happens with it.
//! Column lookup is deferred: a missing column is only reported when
//! [`Table::records`] asks for it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;

/// Default input file name
pub const DEFAULT_INPUT: &str = "violencia_mulher.csv";

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

/// Default name of the victim/suspect relationship column
pub const DEFAULT_RELATIONSHIP_COLUMN: &str = "Relação_vítima_suspeito";

/// Default name of the incident frequency column
pub const DEFAULT_FREQUENCY_COLUMN: &str = "Frequência";

/// Errors that can occur while reading the input file
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data file has no header row")]
    Empty,
}

/// A required column is not present in the table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing column '{column}' (available: {})", .available.join(", "))]
pub struct MissingColumnError {
    pub column: String,
    pub available: Vec<String>,
}

/// One complete row: both fields present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub relationship: String,
    pub frequency_text: String,
}

impl Record {
    pub fn new(relationship: impl Into<String>, frequency_text: impl Into<String>) -> Self {
        Self {
            relationship: relationship.into(),
            frequency_text: frequency_text.into(),
        }
    }
}

/// Records extracted from a table, plus how many rows were dropped as incomplete
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub dropped: usize,
}

/// In-memory delimited table
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Resolve a column name to its index
    pub fn column(&self, name: &str) -> Result<usize, MissingColumnError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MissingColumnError {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Distinct non-empty values of a column, in first-seen order
    pub fn distinct_values(&self, name: &str) -> Result<Vec<String>, MissingColumnError> {
        let index = self.column(name)?;
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .rows
            .iter()
            .filter_map(|row| cell(row, index))
            .filter(|value| seen.insert(value.to_string()))
            .map(str::to_string)
            .collect())
    }

    /// Extract the two fields the pipeline needs, dropping incomplete rows
    pub fn records(
        &self,
        relationship_column: &str,
        frequency_column: &str,
    ) -> Result<RecordSet, MissingColumnError> {
        let rel = self.column(relationship_column)?;
        let freq = self.column(frequency_column)?;

        let mut set = RecordSet::default();
        for row in &self.rows {
            match (cell(row, rel), cell(row, freq)) {
                (Some(relationship), Some(frequency_text)) => {
                    set.records.push(Record::new(relationship, frequency_text))
                }
                _ => set.dropped += 1,
            }
        }

        debug!(
            kept = set.records.len(),
            dropped = set.dropped,
            "Extracted records"
        );
        Ok(set)
    }
}

/// A cell counts as missing when the row is too short or the value is blank
fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Read a delimited file into a [`Table`]
pub fn load_table(path: &Path, delimiter: u8) -> Result<Table, DataLoadError> {
    let mut content = Vec::new();
    {
        let mut file = File::open(path)?;
        file.read_to_end(&mut content)?;
    }
    debug!(path = %path.display(), bytes = content.len(), "Read data file");

    parse_table(&content, delimiter)
}

/// Parse delimited bytes into a [`Table`]
pub fn parse_table(content: &[u8], delimiter: u8) -> Result<Table, DataLoadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataLoadError::Empty);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semicolon_table() {
        let data = "Relação_vítima_suspeito;Frequência\nESPOSA(O);DIARIAMENTE\nPAI;MENSALMENTE\n";
        let table = parse_table(data.as_bytes(), b';').unwrap();

        assert_eq!(table.headers().len(), 2);
        assert_eq!(table.row_count(), 2);

        let set = table
            .records(DEFAULT_RELATIONSHIP_COLUMN, DEFAULT_FREQUENCY_COLUMN)
            .unwrap();
        assert_eq!(set.records[0], Record::new("ESPOSA(O)", "DIARIAMENTE"));
        assert_eq!(set.dropped, 0);
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let data = "rel;freq;other\nPAI;DIARIAMENTE;x\n;SEMANALMENTE;x\nMÃE;;x\nTIO(A)\n";
        let table = parse_table(data.as_bytes(), b';').unwrap();
        let set = table.records("rel", "freq").unwrap();

        assert_eq!(set.records.len(), 1);
        assert_eq!(set.dropped, 3);
    }

    #[test]
    fn test_missing_column_surfaces_on_use() {
        let data = "rel;something_else\nPAI;x\n";
        let table = parse_table(data.as_bytes(), b';').unwrap();

        let err = table.records("rel", "freq").unwrap_err();
        assert_eq!(err.column, "freq");
        assert_eq!(err.available, vec!["rel", "something_else"]);
    }

    #[test]
    fn test_wrong_delimiter_means_missing_column() {
        let data = "rel;freq\nPAI;DIARIAMENTE\n";
        let table = parse_table(data.as_bytes(), b',').unwrap();

        assert_eq!(table.headers(), &["rel;freq".to_string()]);
        assert!(table.records("rel", "freq").is_err());
    }

    #[test]
    fn test_empty_input() {
        let result = parse_table(b"", b';');
        assert!(matches!(result, Err(DataLoadError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        let result = load_table(Path::new("/definitely/not/here.csv"), b';');
        assert!(matches!(result, Err(DataLoadError::Io(_))));
    }

    #[test]
    fn test_blank_cells_are_missing_but_na_text_is_kept() {
        let data = "rel;freq\nPAI; \nNA;DIARIAMENTE\nN/A;OUTROS\n";
        let table = parse_table(data.as_bytes(), b';').unwrap();
        let set = table.records("rel", "freq").unwrap();

        assert_eq!(set.dropped, 1);
        assert_eq!(
            set.records,
            vec![Record::new("NA", "DIARIAMENTE"), Record::new("N/A", "OUTROS")]
        );
    }

    #[test]
    fn test_distinct_values() {
        let data = "rel;freq\nPAI;A\nMÃE;B\nPAI;C\n;D\n";
        let table = parse_table(data.as_bytes(), b';').unwrap();

        assert_eq!(table.distinct_values("rel").unwrap(), vec!["PAI", "MÃE"]);
    }
}
