//! Provenance of a loaded dataset.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::dataset::Dataset;

/// On-disk layout of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    Tsv,
    /// Semicolon-separated, as exported by spreadsheets in comma-decimal locales.
    Semicolon,
    Pipe,
    /// Delimited by a configured byte outside the usual set.
    Delimited,
    /// Array of row objects.
    Json,
}

impl SourceFormat {
    /// Format implied by a field delimiter.
    pub fn from_delimiter(delimiter: u8) -> Self {
        match delimiter {
            b',' => SourceFormat::Csv,
            b'\t' => SourceFormat::Tsv,
            b';' => SourceFormat::Semicolon,
            b'|' => SourceFormat::Pipe,
            _ => SourceFormat::Delimited,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Tsv => "tsv",
            SourceFormat::Semicolon => "semicolon",
            SourceFormat::Pipe => "pipe",
            SourceFormat::Delimited => "delimited",
            SourceFormat::Json => "json",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a dataset came from and what it looked like on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without directories.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:<hex>` digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    pub format: SourceFormat,
    /// Rows materialized into the dataset.
    pub row_count: usize,
    /// Column names in first-seen order.
    pub columns: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a dataset loaded from `bytes` read at `path`.
    pub fn describe(path: &Path, bytes: &[u8], format: SourceFormat, dataset: &Dataset) -> Self {
        Self {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash: format!("sha256:{:x}", Sha256::digest(bytes)),
            size_bytes: bytes.len() as u64,
            format,
            row_count: dataset.row_count(),
            columns: dataset.columns().into_iter().map(String::from).collect(),
            loaded_at: Utc::now(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// First 12 hex digits of the content hash, for display.
    pub fn short_hash(&self) -> &str {
        let hex = self.hash.strip_prefix("sha256:").unwrap_or(&self.hash);
        &hex[..hex.len().min(12)]
    }
}
