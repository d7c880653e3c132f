use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::mapping::ColumnMapping;

/// Processing state of an uploaded file.
///
/// A file is registered as `Processing` while its columns are read, becomes
/// `Ready` once a complete mapping is attached and `Error` when the read
/// fails. `Pending` is accepted from older session documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Ready,
    Error,
}

impl FileStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            FileStatus::Pending => "Pending",
            FileStatus::Processing => "Processing",
            FileStatus::Ready => "Ready",
            FileStatus::Error => "Error",
        }
    }
}

/// Name and size of a dropped file, captured before its content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// A file uploaded under a company.
///
/// `status == Ready` holds exactly when `column_mapping` is present; the store
/// is the only writer of both fields and keeps them in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    pub id: String, // UUID
    pub company_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    pub status: FileStatus,
    #[serde(default)]
    pub column_mapping: Option<ColumnMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DataFile {
    pub fn is_ready(&self) -> bool {
        self.status == FileStatus::Ready
    }

    /// Whether the attached mapping names all required fields. A consumer
    /// that needs usable data checks this rather than `column_mapping.is_some()`.
    pub fn has_complete_mapping(&self) -> bool {
        self.column_mapping
            .as_ref()
            .is_some_and(ColumnMapping::is_complete)
    }

    /// Brings a record restored from the session back in line with the
    /// ready/mapping invariant. Returns `true` if anything changed.
    pub(crate) fn repair(&mut self) -> bool {
        match (self.status, self.column_mapping.is_some()) {
            (FileStatus::Ready, false) => {
                self.status = FileStatus::Processing;
                true
            }
            (status, true) if status != FileStatus::Ready => {
                self.status = FileStatus::Ready;
                self.error_message = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(status: FileStatus, mapping: Option<ColumnMapping>) -> DataFile {
        DataFile {
            id: "f1".into(),
            company_id: "c1".into(),
            file_name: "sales.csv".into(),
            file_size: 10,
            upload_date: Utc::now(),
            status,
            column_mapping: mapping,
            error_message: None,
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&FileStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn repair_demotes_ready_without_mapping() {
        let mut f = file(FileStatus::Ready, None);
        assert!(f.repair());
        assert_eq!(f.status, FileStatus::Processing);
    }

    #[test]
    fn repair_promotes_mapped_file() {
        let mut f = file(FileStatus::Processing, Some(ColumnMapping::default()));
        assert!(f.repair());
        assert_eq!(f.status, FileStatus::Ready);
    }

    #[test]
    fn repair_leaves_consistent_records_alone() {
        let mut f = file(FileStatus::Error, None);
        assert!(!f.repair());
        assert_eq!(f.status, FileStatus::Error);
    }

    #[test]
    fn present_but_incomplete_mapping_is_not_complete() {
        let f = file(FileStatus::Ready, Some(ColumnMapping::default()));
        assert!(f.is_ready());
        assert!(!f.has_complete_mapping());
    }
}
