//! Append-only JSONL store for dialogue records.
//!
//! Each record is written as one JSON object per line. The file is opened,
//! appended to and closed once per record so that an interrupted sweep
//! leaves exactly the records written so far.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::types::DialogueRecord;
use crate::error::GeneratorError;

/// A line-delimited JSON file of [`DialogueRecord`]s.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file, or truncate it to empty if it exists.
    ///
    /// Any prior content is lost. Missing parent directories are created.
    pub fn truncate(&self) -> Result<(), GeneratorError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
        }
        File::create(&self.path).map_err(|e| self.store_error(e))?;
        tracing::info!(path = %self.path.display(), "Output file cleared");
        Ok(())
    }

    /// Append one record as a single line.
    ///
    /// The JSON and its trailing newline are written in a single call.
    pub fn append(&self, record: &DialogueRecord) -> Result<(), GeneratorError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.store_error(e))?;
        file.write_all(line.as_bytes()).map_err(|e| self.store_error(e))?;
        file.flush().map_err(|e| self.store_error(e))?;
        Ok(())
    }

    /// Read every record back in file order. Blank lines are skipped.
    pub fn read_all(&self) -> Result<Vec<DialogueRecord>, GeneratorError> {
        let file = File::open(&self.path).map_err(|e| self.store_error(e))?;
        let reader = BufReader::new(file);

        let mut records: Vec<DialogueRecord> = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| self.store_error(e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }
        Ok(records)
    }

    fn store_error(&self, source: std::io::Error) -> GeneratorError {
        GeneratorError::Store {
            path: self.path.clone(),
            source,
        }
    }
}
