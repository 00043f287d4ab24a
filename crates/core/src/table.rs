//! Result table and its CSV / JSON export.

use std::io::Write;

use serde::Serialize;

use crate::extract::{ExtractionResult, Outcome};
use crate::{Result, SiftError};

/// File name offered for the CSV download.
pub const DEFAULT_EXPORT_FILENAME: &str = "extracted_content.csv";

/// Header of the URL column, in both the import and the export CSV.
pub const URL_COLUMN: &str = "URL";

/// Header of the extracted text column in the export CSV.
pub const CONTENT_COLUMN: &str = "Extracted Content";

/// Per-outcome row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub text: usize,
    pub not_found: usize,
    pub error: usize,
}

/// Rows of one run, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ExtractionResult>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "URL")]
    url: &'a str,
    #[serde(rename = "Extracted Content")]
    content: &'a Outcome,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    url: &'a str,
    status: &'static str,
    content: &'a Outcome,
}

impl From<Vec<ExtractionResult>> for ResultTable {
    fn from(rows: Vec<ExtractionResult>) -> Self {
        Self { rows }
    }
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ExtractionResult] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtractionResult> {
        self.rows.iter()
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.rows.iter().fold(OutcomeCounts::default(), |mut counts, row| {
            match row.outcome {
                Outcome::Text(_) => counts.text += 1,
                Outcome::NotFound => counts.not_found += 1,
                Outcome::Error(_) => counts.error += 1,
            }
            counts
        })
    }

    /// Writes the table as CSV with a `URL,Extracted Content` header.
    ///
    /// The header is written even when the table is empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        csv.write_record([URL_COLUMN, CONTENT_COLUMN])?;

        for row in &self.rows {
            csv.serialize(CsvRow { url: &row.url, content: &row.outcome })?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Returns the CSV export as UTF-8 bytes.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }

    /// Returns the table as a JSON array of `{url, status, content}` objects.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rows: Vec<JsonRow<'_>> = self
            .rows
            .iter()
            .map(|row| JsonRow { url: &row.url, status: row.outcome.kind(), content: &row.outcome })
            .collect();

        let json = if pretty { serde_json::to_string_pretty(&rows) } else { serde_json::to_string(&rows) };
        json.map_err(|e| SiftError::Serialize(e.to_string()))
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ExtractionResult;
    type IntoIter = std::slice::Iter<'a, ExtractionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
