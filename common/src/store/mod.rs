//! Session registry of company profiles and uploaded files.
//!
//! The store is an explicitly constructed value, owned by whoever drives the
//! upload workflow, rather than a process-wide singleton. Its lifecycle is:
//!
//! - `DataRecordStore::open`: restores the document persisted under a key in a
//!   `SessionStorage` backend, or starts empty when there is none.
//! - mutations: every change is written back as one JSON document holding the
//!   current company and file ids, the company records and the file records
//!   with their embedded column mappings.
//! - `DataRecordStore::close`: flushes and returns the backend.
//!
//! Read accessors hand out clones. Callers never hold a reference into the
//! store, so a snapshot cannot drift or be mutated behind the store's back.
//!
//! Persistence is best effort: a backend failure is logged and the in-memory
//! state stays authoritative for the rest of the session.

mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::company::{CompanyProfile, IndustryTag};
use crate::model::data_file::{DataFile, FileMeta, FileStatus};
use crate::model::mapping::{CanonicalField, ColumnMapping};

pub use storage::{MemoryStorage, SessionStorage, StorageError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Column mapping for file '{file_id}' is missing required fields: {missing:?}")]
    IncompleteMapping {
        file_id: String,
        missing: Vec<CanonicalField>,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Stored session document is corrupt: {0}")]
    Corrupt(String),
}

/// Everything the store persists, in one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoreDocument {
    current_company_id: Option<String>,
    current_file_id: Option<String>,
    companies: Vec<CompanyProfile>,
    files: Vec<DataFile>,
}

impl StoreDocument {
    fn decode(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

pub struct DataRecordStore<S: SessionStorage> {
    storage: S,
    key: String,
    doc: StoreDocument,
}

impl<S: SessionStorage> DataRecordStore<S> {
    /// Opens the store over `storage`, restoring whatever is saved under
    /// `key`. A corrupt document is discarded and the session starts fresh.
    pub fn open(storage: S, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let doc = match storage.load(&key)? {
            Some(raw) => match StoreDocument::decode(&raw) {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("Discarding session state under '{}': {}", key, e);
                    StoreDocument::default()
                }
            },
            None => StoreDocument::default(),
        };

        let mut store = Self { storage, key, doc };
        let repaired = store
            .doc
            .files
            .iter_mut()
            .map(DataFile::repair)
            .filter(|changed| *changed)
            .count();
        if repaired > 0 {
            log::warn!("Repaired status of {} restored file record(s)", repaired);
            store.persist();
        }
        log::debug!(
            "Opened record store: {} companies, {} files",
            store.doc.companies.len(),
            store.doc.files.len()
        );
        Ok(store)
    }

    /// A store with no restored state, for when the backend cannot be read.
    pub fn empty(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            doc: StoreDocument::default(),
        }
    }

    /// Writes the final state and hands the backend back.
    pub fn close(mut self) -> Result<S, StoreError> {
        self.save()?;
        Ok(self.storage)
    }

    /// Forgets every record and removes the persisted document.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.doc = StoreDocument::default();
        self.storage.remove(&self.key)?;
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn create_company(&mut self, name: &str, industry_tag: IndustryTag) -> CompanyProfile {
        let company = CompanyProfile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            industry_tag,
            created_at: Utc::now(),
        };
        log::info!("Created company '{}' ({})", company.name, company.id);
        self.doc.current_company_id = Some(company.id.clone());
        self.doc.companies.push(company.clone());
        self.persist();
        company
    }

    pub fn set_industry(
        &mut self,
        company_id: &str,
        industry_tag: IndustryTag,
    ) -> Result<CompanyProfile, StoreError> {
        let company = self
            .doc
            .companies
            .iter_mut()
            .find(|c| c.id == company_id)
            .ok_or_else(|| not_found("Company", company_id))?;
        company.industry_tag = industry_tag;
        let snapshot = company.clone();
        self.doc.current_company_id = Some(snapshot.id.clone());
        self.persist();
        Ok(snapshot)
    }

    /// Registers a dropped file under `company_id` with status `Processing`.
    /// The company id is not checked; the caller creates the company first.
    pub fn upload_file(&mut self, file: &FileMeta, company_id: &str) -> DataFile {
        self.upload_file_at(file, company_id, Utc::now())
    }

    pub fn upload_file_at(
        &mut self,
        file: &FileMeta,
        company_id: &str,
        upload_date: DateTime<Utc>,
    ) -> DataFile {
        let record = DataFile {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            file_name: file.name.clone(),
            file_size: file.size,
            upload_date,
            status: FileStatus::Processing,
            column_mapping: None,
            error_message: None,
        };
        log::info!(
            "Registered file '{}' ({} bytes) as {}",
            record.file_name,
            record.file_size,
            record.id
        );
        self.doc.current_file_id = Some(record.id.clone());
        self.doc.files.push(record.clone());
        self.persist();
        record
    }

    /// Attaches `mapping` to the file and marks it ready.
    ///
    /// Applying the same mapping twice leaves the same state as applying it
    /// once. An incomplete mapping is refused so that a ready file always
    /// names every required field.
    pub fn update_column_mapping(
        &mut self,
        file_id: &str,
        mapping: ColumnMapping,
    ) -> Result<(), StoreError> {
        let missing = mapping.missing_required();
        let file = self
            .doc
            .files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| not_found("File", file_id))?;

        if !missing.is_empty() {
            log::error!(
                "Rejected incomplete mapping for '{}': missing {:?}",
                file.file_name,
                missing
            );
            return Err(StoreError::IncompleteMapping {
                file_id: file_id.to_string(),
                missing,
            });
        }

        file.column_mapping = Some(mapping);
        file.status = FileStatus::Ready;
        file.error_message = None;
        log::info!("File '{}' is ready", file.file_name);
        self.doc.current_file_id = Some(file_id.to_string());
        self.persist();
        Ok(())
    }

    /// Moves a file to `Error` after its content could not be read. Any
    /// previous mapping is dropped with the ready status.
    pub fn mark_file_error(&mut self, file_id: &str, message: &str) -> Result<(), StoreError> {
        let file = self
            .doc
            .files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| not_found("File", file_id))?;
        file.status = FileStatus::Error;
        file.column_mapping = None;
        file.error_message = Some(message.to_string());
        self.persist();
        Ok(())
    }

    /// Makes `file_id` the current file, and its company the current company.
    pub fn select_file(&mut self, file_id: &str) -> Result<DataFile, StoreError> {
        let file = self
            .file(file_id)
            .ok_or_else(|| not_found("File", file_id))?;
        self.doc.current_file_id = Some(file.id.clone());
        self.doc.current_company_id = Some(file.company_id.clone());
        self.persist();
        Ok(file)
    }

    pub fn company(&self, company_id: &str) -> Option<CompanyProfile> {
        self.doc
            .companies
            .iter()
            .find(|c| c.id == company_id)
            .cloned()
    }

    pub fn file(&self, file_id: &str) -> Option<DataFile> {
        self.doc.files.iter().find(|f| f.id == file_id).cloned()
    }

    /// Files of a company in upload order.
    pub fn get_company_files(&self, company_id: &str) -> Vec<DataFile> {
        self.doc
            .files
            .iter()
            .filter(|f| f.company_id == company_id)
            .cloned()
            .collect()
    }

    pub fn current_company(&self) -> Option<CompanyProfile> {
        self.doc
            .current_company_id
            .as_deref()
            .and_then(|id| self.company(id))
    }

    pub fn current_file(&self) -> Option<DataFile> {
        self.doc
            .current_file_id
            .as_deref()
            .and_then(|id| self.file(id))
    }

    /// Keeps only the latest upload of each file name within a company.
    ///
    /// "Latest" is the greatest `upload_date`; on equal dates the record
    /// inserted later wins. A record that is not ready never displaces a
    /// ready one, so an unfinished or failed re-upload cannot drop a mapped
    /// file. Returns how many records were removed.
    pub fn dedupe_company_files(&mut self, company_id: &str) -> usize {
        let mut keep: Vec<(String, usize)> = Vec::new();
        for (idx, file) in self.doc.files.iter().enumerate() {
            if file.company_id != company_id {
                continue;
            }
            match keep.iter_mut().find(|(name, _)| *name == file.file_name) {
                Some(entry) => {
                    let kept = &self.doc.files[entry.1];
                    let rank = (file.is_ready(), file.upload_date);
                    if rank >= (kept.is_ready(), kept.upload_date) {
                        entry.1 = idx;
                    }
                }
                None => keep.push((file.file_name.clone(), idx)),
            }
        }

        let survivors: Vec<String> = keep
            .iter()
            .map(|(_, idx)| self.doc.files[*idx].id.clone())
            .collect();
        let current_name = self.current_file().map(|f| f.file_name);
        let before = self.doc.files.len();
        self.doc
            .files
            .retain(|f| f.company_id != company_id || survivors.contains(&f.id));
        let removed = before - self.doc.files.len();

        if removed > 0 {
            // A removed current file hands over to the surviving upload of the same name.
            if self.current_file().is_none() {
                if let Some(name) = current_name {
                    self.doc.current_file_id = keep
                        .iter()
                        .position(|(kept, _)| *kept == name)
                        .map(|pos| survivors[pos].clone());
                }
            }
            log::info!("Removed {} duplicate upload(s)", removed);
            self.persist();
        }
        removed
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.doc).map_err(|e| StorageError(e.to_string()))?;
        self.storage.save(&self.key, &raw)?;
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            log::warn!("Could not persist session state: {}", e);
        }
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    const KEY: &str = "test.session";

    fn store() -> DataRecordStore<MemoryStorage> {
        DataRecordStore::open(MemoryStorage::new(), KEY).unwrap()
    }

    fn complete_mapping() -> ColumnMapping {
        ColumnMapping {
            date: "Date".into(),
            amount: "Amount".into(),
            order_id: "Order_ID".into(),
            customer_id: "Customer_ID".into(),
            product: "Product".into(),
            channel: String::new(),
        }
    }

    #[test]
    fn new_file_is_processing_without_mapping() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Retail);
        let file = store.upload_file(&FileMeta::new("sales.csv", 120), &company.id);

        assert_eq!(file.status, FileStatus::Processing);
        assert_eq!(file.column_mapping, None);
        assert_eq!(file.file_size, 120);
        assert_eq!(store.current_file(), Some(file));
        assert_eq!(store.current_company(), Some(company));
    }

    #[test]
    fn mapping_makes_file_ready() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let file = store.upload_file(&FileMeta::new("sales.csv", 1), &company.id);

        store
            .update_column_mapping(&file.id, complete_mapping())
            .unwrap();

        let stored = store.file(&file.id).unwrap();
        assert_eq!(stored.status, FileStatus::Ready);
        assert_eq!(stored.column_mapping, Some(complete_mapping()));
    }

    #[test]
    fn update_column_mapping_is_idempotent() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let file = store.upload_file(&FileMeta::new("sales.csv", 1), &company.id);

        store
            .update_column_mapping(&file.id, complete_mapping())
            .unwrap();
        let once = store.get_company_files(&company.id);
        let persisted_once = store.storage().get(KEY).map(str::to_string);

        store
            .update_column_mapping(&file.id, complete_mapping())
            .unwrap();
        assert_eq!(store.get_company_files(&company.id), once);
        assert_eq!(store.storage().get(KEY).map(str::to_string), persisted_once);
    }

    #[test]
    fn unknown_file_is_not_found() {
        let mut store = store();
        let err = store
            .update_column_mapping("missing", complete_mapping())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                kind: "File",
                id: "missing".into()
            }
        );
    }

    #[test]
    fn incomplete_mapping_is_rejected_and_file_stays_processing() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let file = store.upload_file(&FileMeta::new("sales.csv", 1), &company.id);
        let partial = ColumnMapping {
            date: "Date".into(),
            amount: "Amount".into(),
            ..Default::default()
        };

        let err = store.update_column_mapping(&file.id, partial).unwrap_err();

        assert!(matches!(err, StoreError::IncompleteMapping { ref missing, .. }
            if *missing == vec![CanonicalField::OrderId, CanonicalField::CustomerId]));
        let stored = store.file(&file.id).unwrap();
        assert_eq!(stored.status, FileStatus::Processing);
        assert_eq!(stored.column_mapping, None);
    }

    #[test]
    fn ready_iff_mapping_across_transitions() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let a = store.upload_file(&FileMeta::new("a.csv", 1), &company.id);
        let b = store.upload_file(&FileMeta::new("b.csv", 1), &company.id);
        store.update_column_mapping(&a.id, complete_mapping()).unwrap();
        store.mark_file_error(&b.id, "bad bytes").unwrap();
        store.update_column_mapping(&b.id, complete_mapping()).unwrap();
        store.mark_file_error(&a.id, "re-read failed").unwrap();

        for file in store.get_company_files(&company.id) {
            assert_eq!(
                file.status == FileStatus::Ready,
                file.column_mapping.is_some(),
                "{:?}",
                file
            );
        }
        assert_eq!(store.file(&b.id).unwrap().error_message, None);
        assert_eq!(
            store.file(&a.id).unwrap().error_message.as_deref(),
            Some("re-read failed")
        );
    }

    #[test]
    fn company_files_keep_insertion_order_and_owner() {
        let mut store = store();
        let acme = store.create_company("Acme", IndustryTag::Generic);
        let other = store.create_company("Other", IndustryTag::SaaS);
        store.upload_file(&FileMeta::new("one.csv", 1), &acme.id);
        store.upload_file(&FileMeta::new("elsewhere.csv", 1), &other.id);
        store.upload_file(&FileMeta::new("two.csv", 1), &acme.id);

        let names: Vec<String> = store
            .get_company_files(&acme.id)
            .into_iter()
            .map(|f| f.file_name)
            .collect();
        assert_eq!(names, vec!["one.csv", "two.csv"]);
    }

    #[test]
    fn dedupe_keeps_latest_upload_per_name() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let now = Utc::now();
        let first = store.upload_file_at(&FileMeta::new("sales.csv", 10), &company.id, now);
        store
            .update_column_mapping(&first.id, complete_mapping())
            .unwrap();
        let other = store.upload_file_at(&FileMeta::new("other.csv", 5), &company.id, now);
        let second = store.upload_file_at(
            &FileMeta::new("sales.csv", 20),
            &company.id,
            now + Duration::seconds(5),
        );
        store
            .update_column_mapping(&second.id, complete_mapping())
            .unwrap();
        let second = store.file(&second.id).unwrap();

        assert_eq!(store.dedupe_company_files(&company.id), 1);

        let files = store.get_company_files(&company.id);
        assert_eq!(files, vec![other, second.clone()]);
        assert_eq!(store.current_file(), Some(second));
    }

    #[test]
    fn dedupe_never_replaces_a_ready_file_with_an_unmapped_one() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let now = Utc::now();
        let mapped = store.upload_file_at(&FileMeta::new("sales.csv", 10), &company.id, now);
        store
            .update_column_mapping(&mapped.id, complete_mapping())
            .unwrap();
        let failed = store.upload_file_at(
            &FileMeta::new("sales.csv", 20),
            &company.id,
            now + Duration::seconds(5),
        );
        store.mark_file_error(&failed.id, "unreadable").unwrap();
        store.upload_file_at(
            &FileMeta::new("sales.csv", 30),
            &company.id,
            now + Duration::seconds(10),
        );

        assert_eq!(store.dedupe_company_files(&company.id), 2);

        let files = store.get_company_files(&company.id);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, mapped.id);
        assert!(files[0].is_ready());
        assert_eq!(store.current_file().map(|f| f.id), Some(mapped.id));
    }

    #[test]
    fn dedupe_prefers_later_date_even_if_inserted_first() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let now = Utc::now();
        let newer = store.upload_file_at(
            &FileMeta::new("sales.csv", 1),
            &company.id,
            now + Duration::minutes(1),
        );
        store.upload_file_at(&FileMeta::new("sales.csv", 2), &company.id, now);

        store.dedupe_company_files(&company.id);

        assert_eq!(store.get_company_files(&company.id), vec![newer.clone()]);
        assert_eq!(store.current_file(), Some(newer));
    }

    #[test]
    fn dedupe_is_scoped_to_one_company() {
        let mut store = store();
        let acme = store.create_company("Acme", IndustryTag::Generic);
        let other = store.create_company("Other", IndustryTag::Generic);
        store.upload_file(&FileMeta::new("sales.csv", 1), &acme.id);
        store.upload_file(&FileMeta::new("sales.csv", 1), &other.id);

        assert_eq!(store.dedupe_company_files(&acme.id), 0);
        assert_eq!(store.get_company_files(&other.id).len(), 1);
    }

    #[test]
    fn state_survives_reopen() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Marketplace);
        let file = store.upload_file(&FileMeta::new("sales.csv", 7), &company.id);
        store
            .update_column_mapping(&file.id, complete_mapping())
            .unwrap();

        let storage = store.close().unwrap();
        let reopened = DataRecordStore::open(storage, KEY).unwrap();

        assert_eq!(reopened.current_company(), Some(company.clone()));
        assert_eq!(reopened.current_file().map(|f| f.id), Some(file.id));
        assert!(reopened.get_company_files(&company.id)[0].has_complete_mapping());
    }

    #[test]
    fn persisted_document_uses_camel_case_layout() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        store.upload_file(&FileMeta::new("sales.csv", 7), &company.id);

        let raw = store.storage().get(KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(json["currentCompanyId"], company.id.as_str());
        assert_eq!(json["files"][0]["companyId"], company.id.as_str());
        assert_eq!(json["files"][0]["status"], "processing");
        assert_eq!(json["companies"][0]["industryTag"], "Generic");
    }

    #[test]
    fn corrupt_document_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.save(KEY, "{ definitely not json").unwrap();

        let store = DataRecordStore::open(storage, KEY).unwrap();
        assert_eq!(store.current_company(), None);
        assert_eq!(store.current_file(), None);
    }

    #[test]
    fn restored_ready_file_without_mapping_is_repaired() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let file = store.upload_file(&FileMeta::new("sales.csv", 7), &company.id);
        let raw = store.storage().get(KEY).unwrap().replace("processing", "ready");
        let mut storage = MemoryStorage::new();
        storage.save(KEY, &raw).unwrap();

        let reopened = DataRecordStore::open(storage, KEY).unwrap();
        assert_eq!(
            reopened.file(&file.id).unwrap().status,
            FileStatus::Processing
        );
    }

    #[test]
    fn snapshots_are_detached_from_the_store() {
        let mut store = store();
        let company = store.create_company("Acme", IndustryTag::Generic);
        let mut snapshot = store.upload_file(&FileMeta::new("sales.csv", 7), &company.id);
        snapshot.status = FileStatus::Ready;
        snapshot.file_name = "tampered.csv".into();

        let stored = store.file(&snapshot.id).unwrap();
        assert_eq!(stored.status, FileStatus::Processing);
        assert_eq!(stored.file_name, "sales.csv");
    }

    #[test]
    fn set_industry_and_select_file() {
        let mut store = store();
        let acme = store.create_company("Acme", IndustryTag::Generic);
        let file = store.upload_file(&FileMeta::new("a.csv", 1), &acme.id);
        let other = store.create_company("Other", IndustryTag::Generic);
        store.upload_file(&FileMeta::new("b.csv", 1), &other.id);

        let updated = store.set_industry(&acme.id, IndustryTag::SaaS).unwrap();
        assert_eq!(updated.industry_tag, IndustryTag::SaaS);

        store.select_file(&file.id).unwrap();
        assert_eq!(store.current_file().map(|f| f.id), Some(file.id));
        assert_eq!(store.current_company().map(|c| c.id), Some(acme.id));
        assert!(store.select_file("nope").is_err());
        assert!(store.set_industry("nope", IndustryTag::Retail).is_err());
    }

    #[test]
    fn empty_store_ignores_saved_state() {
        let mut saved = store();
        saved.create_company("Acme", IndustryTag::Generic);
        let storage = saved.close().unwrap();

        let store = DataRecordStore::empty(storage, KEY);
        assert_eq!(store.current_company(), None);
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = store();
        store.create_company("Acme", IndustryTag::Generic);
        store.clear().unwrap();
        assert_eq!(store.current_company(), None);
        assert_eq!(store.storage().get(KEY), None);
    }
}
