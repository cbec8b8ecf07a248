//! CSV/TSV/JSON loader producing datasets.

use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use super::dataset::{Dataset, Row};
use super::source::{SourceFormat, SourceMetadata};
use super::value::RawValue;
use crate::error::{Result, TabulaError};

/// Delimiters to try when auto-detecting, in tie-break order.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Spreadsheet and columnar formats users commonly upload by mistake.
const BINARY_EXTENSIONS: &[&str] = &["xlsx", "xls", "ods", "parquet"];

/// Non-blank lines sampled for delimiter detection.
const SNIFF_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Field delimiter; None sniffs it from the first lines.
    pub delimiter: Option<u8>,
    /// First record names the columns.
    pub has_header: bool,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    pub quote: u8,
    /// Type whole columns as numbers/booleans when every cell allows it.
    pub infer_types: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            infer_types: true,
        }
    }
}

/// How a delimited column is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    Boolean,
    Text,
}

/// Loads tabular data files into datasets.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Load a file into a dataset named after it.
    ///
    /// `.json` files hold an array of row objects; anything else is
    /// delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        if let Some(ext) = binary_extension(path) {
            return Err(TabulaError::UnsupportedFormat(format!(
                "{} files are not supported; export the sheet as CSV",
                ext
            )));
        }

        let bytes = std::fs::read(path).map_err(|source| TabulaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (mut dataset, format) = if is_json_path(path) {
            (self.parse_json(&bytes)?, SourceFormat::Json)
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => detect_delimiter(&bytes)?,
            };
            (self.parse_bytes(&bytes, delimiter)?, SourceFormat::from_delimiter(delimiter))
        };

        let metadata = SourceMetadata::describe(path, &bytes, format, &dataset);
        dataset.name = metadata.file.clone();

        debug!(
            file = %metadata.file,
            format = %metadata.format,
            rows = metadata.row_count,
            columns = metadata.column_count(),
            "loaded dataset"
        );

        Ok((dataset, metadata))
    }

    /// Parse a JSON array of row objects.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut rows: Vec<Row> = serde_json::from_slice(bytes)?;
        if let Some(max) = self.config.max_rows {
            rows.truncate(max);
        }
        if rows.is_empty() {
            return Err(TabulaError::EmptyData("no data rows".to_string()));
        }
        Ok(Dataset::new("", rows))
    }

    /// Parse delimited bytes.
    ///
    /// Short records read as blank in their missing trailing fields; extra
    /// fields past the header are dropped.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        if delimiter == self.config.quote || matches!(delimiter, b'\n' | b'\r') {
            return Err(TabulaError::InvalidDelimiter(format!(
                "{:?} cannot separate fields",
                delimiter as char
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.config.quote)
            .has_headers(self.config.has_header)
            .flexible(true)
            .from_reader(bytes);

        let named: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|h| h.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let records = reader
            .records()
            .take(limit)
            .collect::<std::result::Result<Vec<StringRecord>, _>>()?;

        let headers = if self.config.has_header {
            named
        } else {
            let width = records.first().map(StringRecord::len).unwrap_or(0);
            (1..=width).map(|i| format!("column_{}", i)).collect()
        };

        if headers.is_empty() {
            return Err(TabulaError::EmptyData("no columns".to_string()));
        }
        if records.is_empty() {
            return Err(TabulaError::EmptyData("no data rows".to_string()));
        }

        let kinds: Vec<CellKind> = (0..headers.len())
            .map(|idx| {
                if self.config.infer_types {
                    infer_cell_kind(records.iter().map(|r| field(r, idx)))
                } else {
                    CellKind::Text
                }
            })
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .zip(&kinds)
                    .enumerate()
                    .map(|(idx, (header, kind))| (header.clone(), materialize(field(record, idx), *kind)))
                    .collect::<Row>()
            })
            .collect();

        Ok(Dataset::new("", rows))
    }
}

/// Field `idx` of a record, blank when the record is short.
fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn binary_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    BINARY_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Decide how a whole column should be typed from its non-empty cells.
fn infer_cell_kind<'a>(cells: impl Iterator<Item = &'a str>) -> CellKind {
    let mut all_numeric = true;
    let mut all_boolean = true;
    let mut seen = false;

    for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
        seen = true;
        if all_numeric && !cell.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
            all_numeric = false;
        }
        if all_boolean && !(cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false")) {
            all_boolean = false;
        }
        if !all_numeric && !all_boolean {
            return CellKind::Text;
        }
    }

    match (seen, all_numeric, all_boolean) {
        (false, _, _) => CellKind::Text,
        (true, true, _) => CellKind::Number,
        (true, false, true) => CellKind::Boolean,
        _ => CellKind::Text,
    }
}

/// Convert one cell according to its column kind.
fn materialize(raw: &str, kind: CellKind) -> RawValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return RawValue::Null;
    }
    match kind {
        CellKind::Number => trimmed
            .parse::<f64>()
            .map(RawValue::Number)
            .unwrap_or_else(|_| RawValue::String(raw.to_string())),
        CellKind::Boolean => RawValue::Boolean(trimmed.eq_ignore_ascii_case("true")),
        CellKind::Text => RawValue::String(raw.to_string()),
    }
}

/// Pick the delimiter whose per-line field count is most stable.
///
/// A candidate appearing the same number of times on every sampled line
/// beats one that wobbles; among equals the higher count wins, and tabs
/// win ties with commas.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    if lines.is_empty() {
        return Err(TabulaError::EmptyData("no lines to sniff".to_string()));
    }

    let mut best = (b',', 0);
    for &delimiter in DELIMITERS {
        let score = delimiter_score(&lines, delimiter);
        if score > best.1 {
            best = (delimiter, score);
        }
    }

    Ok(best.0)
}

fn delimiter_score(lines: &[&str], delimiter: u8) -> usize {
    let counts: Vec<usize> = lines
        .iter()
        .map(|line| unquoted_count(line, delimiter as char))
        .collect();

    let first = counts[0];
    if first == 0 {
        return 0;
    }

    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    match max - min {
        0 => first * 1000 + if delimiter == b'\t' { 100 } else { 0 },
        1 => first * 100,
        _ => first,
    }
}

/// Occurrences of `delimiter` outside double quotes.
fn unquoted_count(line: &str, delimiter: char) -> usize {
    line.chars()
        .scan(false, |in_quotes, ch| {
            if ch == '"' {
                *in_quotes = !*in_quotes;
            }
            Some(ch == delimiter && !*in_quotes)
        })
        .filter(|hit| *hit)
        .count()
}
