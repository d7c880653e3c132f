//! Column discovery for dropped files.
//!
//! A file's extension picks one of a closed set of strategies. Only delimited
//! text is actually inspected: the header line is split on commas and each
//! cell is normalized. Spreadsheet and other binary formats return fixed
//! placeholder names so the mapping step can still run; a real parser can
//! replace either strategy without touching the callers.
//!
//! Reading the blob itself and waiting out the simulated latency belong to
//! the caller (`frontend::reader`), which only hands finished bytes here.

use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::data_file::FileMeta;
use crate::model::file_kind::extension_of;

/// Errors raised while turning a file into column names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("File '{file}' is not valid UTF-8 text")]
    Decode { file: String },

    #[error("File '{file}' is {size} bytes, above the {limit} byte limit")]
    TooLarge { file: String, size: u64, limit: u64 },

    #[error("Failed to read file '{file}': {reason}")]
    Io { file: String, reason: String },
}

/// How the columns of a file are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderStrategy {
    /// `.csv`: the first line is parsed.
    DelimitedText,
    /// `.xlsx` / `.xls`: placeholder `Column A` … `Column F`.
    Spreadsheet,
    /// Anything else, parquet included: placeholder `Column 1` … `Column 6`
    /// after a simulated delay.
    Opaque,
}

impl ReaderStrategy {
    pub fn for_file_name(name: &str) -> Self {
        match extension_of(name).as_str() {
            "csv" => Self::DelimitedText,
            "xlsx" | "xls" => Self::Spreadsheet,
            _ => Self::Opaque,
        }
    }

    /// Whether the strategy needs the file content at all.
    pub fn needs_content(&self) -> bool {
        matches!(self, Self::DelimitedText)
    }

    pub fn placeholder_columns(&self) -> Option<Vec<String>> {
        match self {
            Self::DelimitedText => None,
            Self::Spreadsheet => Some(
                ["A", "B", "C", "D", "E", "F"]
                    .iter()
                    .map(|letter| format!("Column {}", letter))
                    .collect(),
            ),
            Self::Opaque => Some((1..=6).map(|n| format!("Column {}", n)).collect()),
        }
    }
}

/// Strategy selection plus the size guard, configured once per session.
#[derive(Debug, Clone)]
pub struct FileColumnReader {
    max_file_size: u64,
    placeholder_delay: Duration,
}

impl FileColumnReader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes(),
            placeholder_delay: config.placeholder_read_delay(),
        }
    }

    pub fn strategy(&self, file: &FileMeta) -> ReaderStrategy {
        ReaderStrategy::for_file_name(&file.name)
    }

    /// Simulated latency the caller should wait before `read`, if any.
    pub fn delay(&self, strategy: ReaderStrategy) -> Option<Duration> {
        match strategy {
            ReaderStrategy::Opaque => Some(self.placeholder_delay),
            _ => None,
        }
    }

    /// Rejects files above the configured limit before any bytes are read.
    pub fn check_size(&self, file: &FileMeta) -> Result<(), ReadError> {
        if file.size > self.max_file_size {
            return Err(ReadError::TooLarge {
                file: file.name.clone(),
                size: file.size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Produces the ordered column names of `file`.
    ///
    /// `content` is only inspected for delimited text; placeholder strategies
    /// accept an empty slice.
    pub fn read(&self, file: &FileMeta, content: &[u8]) -> Result<Vec<String>, ReadError> {
        self.check_size(file)?;

        let strategy = self.strategy(file);
        if let Some(columns) = strategy.placeholder_columns() {
            log::debug!("{:?} placeholder columns for '{}'", strategy, file.name);
            return Ok(columns);
        }

        // Only the header line has to be valid UTF-8; data rows are never decoded.
        let header = content.split(|b| *b == b'\n').next().unwrap_or_default();
        let text = std::str::from_utf8(header).map_err(|_| ReadError::Decode {
            file: file.name.clone(),
        })?;
        let columns = header_columns(text);
        log::debug!("Read {} columns from '{}'", columns.len(), file.name);
        Ok(columns)
    }
}

/// Splits the first line of `text` on commas and normalizes every cell.
/// Empty input yields no columns; later lines are ignored.
pub fn header_columns(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let header = text.split('\n').next().unwrap_or_default();
    let header = header.strip_suffix('\r').unwrap_or(header);

    if header.trim().is_empty() {
        return Vec::new();
    }

    header.split(',').map(normalize_cell).collect()
}

/// Trims a header cell and removes one pair of surrounding quotes.
fn normalize_cell(cell: &str) -> String {
    let s = cell.trim();
    let s = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s);
    s.trim().to_string()
}
