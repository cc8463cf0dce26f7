use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::Submission;

pub const DATA_FILE: &str = "form_data.csv";

const HEADERS: [&str; 3] = ["timestamp", "endpoint", "form_data"];

/// Flat-file store for submissions: one CSV file with a fixed header row,
/// appended on write and scanned front-to-back on read. There is no locking;
/// concurrent writers may interleave.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    pub fn ensure_header(&self) -> Result<(), AppError> {
        if self.path.exists() {
            return Ok(());
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(HEADERS)?;
        writer.flush()?;
        Ok(())
    }

    pub fn append(&self, submission: &Submission) -> Result<(), AppError> {
        self.ensure_header()?;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(submission.to_record()?)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads every row back as a header-keyed map, in file order. An absent
    /// file is an empty store, not an error.
    pub fn read_all(&self) -> Result<Vec<Map<String, Value>>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Map::new();
            for (name, field) in headers.iter().zip(record.iter()) {
                row.insert(name.to_string(), Value::String(field.to_string()));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
