//! Raw table parsing — whitespace-separated numeric tables with `%` comment
//! lines, the format optimizer benchmark loggers write.
//!
//! Parsing stops at the first malformed field and reports the file, the
//! 1-based line number, and the offending token. No retries: the input is
//! on disk and re-reading would not change it.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Lines whose first non-blank character is this are skipped.
pub const COMMENT_CHAR: char = '%';

/// Errors from the table-parsing layer.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: invalid numeric field '{field}'")]
    BadNumber {
        path: String,
        line: usize,
        field: String,
    },

    #[error("{path}: no data rows")]
    Empty { path: String },
}

/// Read and parse one data file into a 2D numeric table.
pub fn parse_table(path: &Path) -> Result<Vec<Vec<f64>>, ParseError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: display.clone(),
        source,
    })?;
    parse_table_str(&text, &display)
}

/// Parse table text. `name` labels the source in error messages.
pub fn parse_table_str(text: &str, name: &str) -> Result<Vec<Vec<f64>>, ParseError> {
    let mut rows = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_CHAR) {
            continue;
        }
        let mut row = Vec::new();
        for field in trimmed.split_whitespace() {
            let value: f64 = field.parse().map_err(|_| ParseError::BadNumber {
                path: name.to_string(),
                line: lineno + 1,
                field: field.to_string(),
            })?;
            row.push(value);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(ParseError::Empty {
            path: name.to_string(),
        });
    }
    Ok(rows)
}
