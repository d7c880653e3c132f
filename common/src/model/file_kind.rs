use serde::{Deserialize, Serialize};

/// MIME types accepted by the upload drop zone. `application/octet-stream`
/// stands in for parquet, which has no registered type browsers report.
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/octet-stream",
];

/// Value for the `accept` attribute of the file input.
pub fn accept_attribute() -> String {
    let extensions = FileKind::all()
        .iter()
        .flat_map(|kind| kind.extensions().iter().map(|ext| format!(".{}", ext)));
    ACCEPTED_MIME_TYPES
        .iter()
        .map(|mime| mime.to_string())
        .chain(extensions)
        .collect::<Vec<_>>()
        .join(",")
}

/// File type the user declares in the wizard's first step.
///
/// Only used for messaging; the reader strategy is chosen from the real file
/// name, never from this declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Excel,
    Parquet,
}

impl FileKind {
    pub fn all() -> &'static [Self] {
        &[Self::Csv, Self::Excel, Self::Parquet]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV File",
            Self::Excel => "Excel File",
            Self::Parquet => "Parquet File",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Csv => "Comma-separated values",
            Self::Excel => "Microsoft Excel spreadsheet",
            Self::Parquet => "Columnar storage format",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Csv => &["csv"],
            Self::Excel => &["xlsx", "xls"],
            Self::Parquet => &["parquet"],
        }
    }

    /// Best guess from the file name's extension. Unknown extensions are
    /// treated as parquet, the same catch-all the reader uses.
    pub fn from_file_name(name: &str) -> Self {
        let ext = extension_of(name);
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
            .unwrap_or(Self::Parquet)
    }
}

/// Lower-cased extension without the dot, or an empty string.
pub(crate) fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
