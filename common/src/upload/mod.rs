//! Sequences a dropped file through registration, column discovery and the
//! mapping wizard.
//!
//! The orchestrator owns the record store and the wizard. It never performs
//! I/O or waits itself: the host reads the file and runs the timers, then
//! reports back with the `UploadTicket` it was given. That keeps the flow a
//! plain state machine:
//!
//! 1. `accept_drop`: ensure a company, register the file as `processing`,
//!    hand out a fresh ticket (`Reading`).
//! 2. `columns_read`: on success keep the columns and return the settle delay
//!    (`Settling`); on failure mark the file `error` (`Failed`).
//! 3. `settle_elapsed`: open the wizard on the mapping step (`Mapping`).
//! 4. `confirm_mapping`: persist the wizard's mapping, refresh the file list
//!    and return the processing delay.
//! 5. `processing_elapsed`: close the wizard (`Idle`).
//!
//! Only one upload slot exists. Dropping another file while one is in flight
//! supersedes it: the old record is marked `error` and results that arrive
//! for the old ticket are dropped. Duplicate names are collapsed only once an
//! upload has an outcome (mapped, failed or cancelled) and on restore.

mod phase;

use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::company::{CompanyProfile, IndustryTag};
use crate::model::data_file::{DataFile, FileMeta};
use crate::model::file_kind::FileKind;
use crate::model::mapping::CanonicalField;
use crate::reader::{FileColumnReader, ReadError};
use crate::store::{DataRecordStore, SessionStorage, StoreError};
use crate::wizard::{ColumnMappingWizard, WizardError};

pub use phase::{UploadPhase, UploadTicket};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No upload is waiting for a mapping")]
    NoActiveUpload,
}

#[derive(Debug, Clone)]
struct PendingUpload {
    ticket: UploadTicket,
    file_name: String,
    columns: Vec<String>,
}

pub struct UploadOrchestrator<S: SessionStorage> {
    store: DataRecordStore<S>,
    config: AppConfig,
    reader: FileColumnReader,
    generation: u64,
    phase: UploadPhase,
    pending: Option<PendingUpload>,
    wizard: ColumnMappingWizard,
    files: Vec<DataFile>,
}

impl<S: SessionStorage> UploadOrchestrator<S> {
    /// Takes over an opened store, cleans up duplicate uploads of the current
    /// company and loads its file list.
    pub fn new(store: DataRecordStore<S>, config: AppConfig) -> Self {
        let reader = FileColumnReader::new(&config);
        let mut orchestrator = Self {
            store,
            config,
            reader,
            generation: 0,
            phase: UploadPhase::Idle,
            pending: None,
            wizard: ColumnMappingWizard::default(),
            files: Vec::new(),
        };
        orchestrator.collapse_duplicates();
        orchestrator
    }

    /// Ends the session: flushes the store and returns its backend.
    pub fn shutdown(self) -> Result<S, StoreError> {
        self.store.close()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn reader(&self) -> &FileColumnReader {
        &self.reader
    }

    pub fn store(&self) -> &DataRecordStore<S> {
        &self.store
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn wizard(&self) -> &ColumnMappingWizard {
        &self.wizard
    }

    pub fn current_company(&self) -> Option<CompanyProfile> {
        self.store.current_company()
    }

    pub fn current_file(&self) -> Option<DataFile> {
        self.store.current_file()
    }

    /// Files of the current company in upload order.
    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    pub fn active_ticket(&self) -> Option<UploadTicket> {
        self.pending.as_ref().map(|p| p.ticket.clone())
    }

    pub fn is_current(&self, ticket: &UploadTicket) -> bool {
        self.pending.as_ref().is_some_and(|p| p.ticket == *ticket)
    }

    /// Starts an upload for the first of `files`; the rest are ignored.
    /// Returns `None` when nothing was dropped.
    pub fn accept_drop(&mut self, files: &[FileMeta]) -> Option<UploadTicket> {
        let file = files.first()?;
        if files.len() > 1 {
            log::warn!(
                "{} files dropped, only '{}' will be uploaded",
                files.len(),
                file.name
            );
        }

        if let Some(previous) = self.pending.take() {
            log::debug!("Upload of '{}' supersedes the one in flight", file.name);
            self.abandon(&previous.ticket.file_id, "Upload superseded");
        }

        let company = self.ensure_company();
        let record = self.store.upload_file(file, &company.id);

        self.generation += 1;
        let ticket = UploadTicket {
            generation: self.generation,
            file_id: record.id.clone(),
        };
        self.pending = Some(PendingUpload {
            ticket: ticket.clone(),
            file_name: file.name.clone(),
            columns: Vec::new(),
        });
        self.wizard = ColumnMappingWizard::default();
        self.phase = UploadPhase::Reading { file_id: record.id };
        self.refresh_files();
        Some(ticket)
    }

    /// Records the outcome of the column read for `ticket`.
    ///
    /// Returns the delay to wait before `settle_elapsed` when the read
    /// succeeded, `None` when it failed or the ticket is stale.
    pub fn columns_read(
        &mut self,
        ticket: &UploadTicket,
        result: Result<Vec<String>, ReadError>,
    ) -> Option<Duration> {
        if !self.is_current(ticket) || !matches!(self.phase, UploadPhase::Reading { .. }) {
            log::debug!("Dropping column read for superseded file {}", ticket.file_id);
            return None;
        }

        match result {
            Ok(columns) => {
                log::debug!("Columns for {}: {:?}", ticket.file_id, columns);
                if let Some(pending) = self.pending.as_mut() {
                    pending.columns = columns;
                }
                self.phase = UploadPhase::Settling {
                    file_id: ticket.file_id.clone(),
                };
                Some(self.config.settle_delay())
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Error reading file: {}", message);
                if let Err(store_err) = self.store.mark_file_error(&ticket.file_id, &message) {
                    log::error!("Could not mark file as failed: {}", store_err);
                }
                self.pending = None;
                self.phase = UploadPhase::Failed {
                    file_id: ticket.file_id.clone(),
                    message,
                };
                self.collapse_duplicates();
                None
            }
        }
    }

    /// Opens the wizard once the settle delay for `ticket` has passed. The
    /// file type is pre-selected from the file name, so the wizard starts on
    /// the mapping step; `back` returns to the type choice.
    pub fn settle_elapsed(&mut self, ticket: &UploadTicket) -> bool {
        if !self.is_current(ticket) || !matches!(self.phase, UploadPhase::Settling { .. }) {
            return false;
        }
        let Some(pending) = self.pending.as_ref() else {
            return false;
        };

        let mut wizard = ColumnMappingWizard::open(pending.columns.clone());
        if let Err(e) = wizard.select_file_type(FileKind::from_file_name(&pending.file_name)) {
            log::warn!("Could not pre-select file type: {}", e);
        }
        self.wizard = wizard;
        self.phase = UploadPhase::Mapping {
            file_id: ticket.file_id.clone(),
        };
        true
    }

    pub fn select_file_type(&mut self, kind: FileKind) -> Result<(), OrchestratorError> {
        Ok(self.wizard.select_file_type(kind)?)
    }

    pub fn assign_column(
        &mut self,
        field: CanonicalField,
        column: &str,
    ) -> Result<(), OrchestratorError> {
        Ok(self.wizard.assign(field, column)?)
    }

    pub fn suggest_mapping(&mut self) -> Result<(), OrchestratorError> {
        Ok(self.wizard.suggest()?)
    }

    pub fn wizard_back(&mut self) -> Result<(), OrchestratorError> {
        Ok(self.wizard.back()?)
    }

    /// Abandons the mapping; the file is marked `error` so it does not sit
    /// in `processing` forever.
    pub fn dismiss_wizard(&mut self) -> Result<(), OrchestratorError> {
        self.wizard.dismiss()?;
        if let Some(pending) = self.pending.take() {
            self.abandon(&pending.ticket.file_id, "Mapping cancelled");
        }
        self.phase = UploadPhase::Idle;
        self.collapse_duplicates();
        Ok(())
    }

    /// Persists the wizard's mapping against the file being mapped and
    /// returns how long the processing screen should stay up.
    pub fn confirm_mapping(&mut self) -> Result<Duration, OrchestratorError> {
        let file_id = match &self.phase {
            UploadPhase::Mapping { file_id } => file_id.clone(),
            _ => return Err(OrchestratorError::NoActiveUpload),
        };

        let mapping = self.wizard.confirm()?;
        if let Err(e) = self.store.update_column_mapping(&file_id, mapping) {
            log::error!("Failed to save column mapping: {}", e);
            self.wizard = ColumnMappingWizard::default();
            self.pending = None;
            self.phase = UploadPhase::Idle;
            return Err(e.into());
        }

        self.collapse_duplicates();
        Ok(self.config.processing_delay())
    }

    /// Closes the wizard after the processing screen for `ticket`.
    pub fn processing_elapsed(&mut self, ticket: &UploadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if let Err(e) = self.wizard.finish_processing() {
            log::debug!("Processing timer fired out of step: {}", e);
            return false;
        }
        self.pending = None;
        self.phase = UploadPhase::Idle;
        true
    }

    /// Clears a failure message so the drop zone is shown again.
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.phase, UploadPhase::Failed { .. }) {
            self.phase = UploadPhase::Idle;
        }
    }

    pub fn select_file(&mut self, file_id: &str) -> Result<DataFile, OrchestratorError> {
        let file = self.store.select_file(file_id)?;
        self.refresh_files();
        Ok(file)
    }

    /// Changes the industry of the current company, creating the company if
    /// the session has none yet.
    pub fn set_industry(&mut self, tag: IndustryTag) -> Result<CompanyProfile, OrchestratorError> {
        let company = self.ensure_company();
        Ok(self.store.set_industry(&company.id, tag)?)
    }

    fn ensure_company(&mut self) -> CompanyProfile {
        match self.store.current_company() {
            Some(company) => company,
            None => self
                .store
                .create_company(&self.config.default_company_name, IndustryTag::Generic),
        }
    }

    /// Marks an upload that will never be mapped as failed. Files that
    /// already reached `ready` are left alone.
    fn abandon(&mut self, file_id: &str, reason: &str) {
        if self.store.file(file_id).is_none_or(|f| f.is_ready()) {
            return;
        }
        if let Err(e) = self.store.mark_file_error(file_id, reason) {
            log::error!("Could not mark file as failed: {}", e);
        }
    }

    fn collapse_duplicates(&mut self) {
        if let Some(company) = self.store.current_company() {
            self.store.dedupe_company_files(&company.id);
        }
        self.refresh_files();
    }

    fn refresh_files(&mut self) {
        self.files = match self.store.current_company() {
            Some(company) => self.store.get_company_files(&company.id),
            None => Vec::new(),
        };
    }
}
