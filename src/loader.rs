//! Scored-record loading
//!
//! Reads a `RecordTable` from CSV using the column names in `DataConfig`,
//! and memoizes loaded tables per file so repeated evaluations over the same
//! snapshot do not re-read it.

use crate::config::DataConfig;
use crate::models::{Record, RecordTable};
use anyhow::{anyhow, Context, Result};
use csv::{Reader, StringRecord};
use dashmap::DashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Load a table from a CSV file
pub fn load_csv<P: AsRef<Path>>(path: P, columns: &DataConfig) -> Result<RecordTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let table = read_csv(file, columns)
        .with_context(|| format!("Failed to load records from {}", path.display()))?;
    info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Read a table from any CSV source with a header row
pub fn read_csv<R: Read>(source: R, columns: &DataConfig) -> Result<RecordTable> {
    let mut reader = Reader::from_reader(source);
    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let score_idx = column_index(&headers, &columns.score_column)?;
    let outcome_idx = column_index(&headers, &columns.outcome_column)?;
    let id_idx = columns
        .id_column
        .as_deref()
        .and_then(|name| headers.iter().position(|h| h.trim() == name));
    if id_idx.is_none() {
        debug!("No id column found, using row numbers");
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = result.with_context(|| format!("Failed to parse CSV line {}", line))?;

        let raw_score = field(&row, score_idx, line)?;
        let score: f64 = raw_score
            .parse()
            .with_context(|| format!("Invalid score '{}' on line {}", raw_score, line))?;
        let raw_outcome = field(&row, outcome_idx, line)?;
        let outcome = parse_outcome(raw_outcome)
            .ok_or_else(|| anyhow!("Invalid outcome '{}' on line {}", raw_outcome, line))?;

        let mut record = Record::new(score, outcome);
        if let Some(id) = id_idx.and_then(|idx| row.get(idx)) {
            record = record.with_id(id.trim());
        }
        records.push(record);
    }

    Ok(RecordTable::new(records)?)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
        anyhow!(
            "Missing column '{}' (found: {})",
            name,
            headers.iter().collect::<Vec<_>>().join(", ")
        )
    })
}

fn field<'r>(row: &'r StringRecord, idx: usize, line: usize) -> Result<&'r str> {
    row.get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow!("Line {} has too few fields", line))
}

/// Parse an outcome cell: 0/1 (also as floats), true/false, yes/no
fn parse_outcome(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Memoized table snapshots keyed by file.
///
/// Meant for long-lived embedders (a dashboard server, a notebook kernel)
/// that evaluate the same file many times; one-shot commands should call
/// `load_csv` directly. An entry is reused while the file's modification time is unchanged. Tables
/// are handed out as `Arc`s and never mutated, so holders of an older
/// snapshot are unaffected by a reload.
#[derive(Clone, Default)]
pub struct TableCache {
    tables: Arc<DashMap<PathBuf, (Option<SystemTime>, Arc<RecordTable>)>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on a miss or when the
    /// file changed since it was cached.
    pub fn get_or_load(&self, path: &Path, columns: &DataConfig) -> Result<Arc<RecordTable>> {
        let key = path
            .canonicalize()
            .with_context(|| format!("Path does not exist: {}", path.display()))?;
        let modified = std::fs::metadata(&key).and_then(|m| m.modified()).ok();

        if let Some(entry) = self.tables.get(&key) {
            let (cached_at, table) = entry.value();
            if modified.is_some() && *cached_at == modified {
                debug!("Table cache hit for {}", key.display());
                return Ok(Arc::clone(table));
            }
        }

        let table = Arc::new(load_csv(&key, columns)?);
        self.tables.insert(key, (modified, Arc::clone(&table)));
        Ok(table)
    }

    /// Drop every cached table
    pub fn clear(&self) {
        self.tables.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
