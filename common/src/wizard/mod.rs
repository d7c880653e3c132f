//! Three-step column-mapping wizard.
//!
//! `SelectFileType` → `MapColumns` → `Processing` → `Closed`. The wizard only
//! holds local draft state; the mapping it emits on confirm is persisted by
//! the caller. The processing step is purely visual: the caller waits out the
//! configured delay and then calls `finish_processing`, which closes the
//! wizard and resets it. Reopening always starts again at `SelectFileType`.

use thiserror::Error;

use crate::model::file_kind::FileKind;
use crate::model::mapping::{suggest_mapping, CanonicalField, ColumnMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    SelectFileType,
    MapColumns,
    Processing,
    #[default]
    Closed,
}

impl WizardStep {
    pub fn title(&self) -> &'static str {
        match self {
            Self::SelectFileType => "Upload Your Data",
            Self::MapColumns => "Map Your Columns",
            Self::Processing => "Processing Data...",
            Self::Closed => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Action not available while the wizard is at {0:?}")]
    WrongStep(WizardStep),

    #[error("Column '{0}' is not one of the file's columns")]
    UnknownColumn(String),

    #[error("Required fields are not mapped: {0:?}")]
    Incomplete(Vec<CanonicalField>),

    #[error("The wizard cannot be closed while processing")]
    Busy,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnMappingWizard {
    step: WizardStep,
    declared_kind: Option<FileKind>,
    columns: Vec<String>,
    draft: ColumnMapping,
}

impl ColumnMappingWizard {
    /// A fresh wizard at `SelectFileType` offering `columns` as sources.
    pub fn open(columns: Vec<String>) -> Self {
        Self {
            step: WizardStep::SelectFileType,
            declared_kind: None,
            columns,
            draft: ColumnMapping::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_open(&self) -> bool {
        self.step != WizardStep::Closed
    }

    pub fn declared_kind(&self) -> Option<FileKind> {
        self.declared_kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn draft(&self) -> &ColumnMapping {
        &self.draft
    }

    pub fn select_file_type(&mut self, kind: FileKind) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SelectFileType)?;
        self.declared_kind = Some(kind);
        self.step = WizardStep::MapColumns;
        log::debug!("Wizard: declared {:?}, mapping columns", kind);
        Ok(())
    }

    /// Maps `field` to `column`; an empty `column` unmaps the field.
    pub fn assign(&mut self, field: CanonicalField, column: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::MapColumns)?;
        if !column.is_empty() && !self.columns.iter().any(|c| c == column) {
            return Err(WizardError::UnknownColumn(column.to_string()));
        }
        self.draft.set(field, column);
        Ok(())
    }

    /// Replaces the draft with a guess based on the column names.
    pub fn suggest(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::MapColumns)?;
        self.draft = suggest_mapping(&self.columns);
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::MapColumns)?;
        self.step = WizardStep::SelectFileType;
        Ok(())
    }

    /// Whether "Process Data" is enabled.
    pub fn can_confirm(&self) -> bool {
        self.step == WizardStep::MapColumns && self.draft.is_complete()
    }

    /// Emits the drafted mapping and moves to `Processing`.
    pub fn confirm(&mut self) -> Result<ColumnMapping, WizardError> {
        self.expect_step(WizardStep::MapColumns)?;
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            return Err(WizardError::Incomplete(missing));
        }
        self.step = WizardStep::Processing;
        log::debug!("Wizard: processing mapping {:?}", self.draft);
        Ok(self.draft.clone())
    }

    /// Ends the processing screen: the wizard closes and forgets everything.
    pub fn finish_processing(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Processing)?;
        *self = Self::default();
        Ok(())
    }

    /// Closes the wizard from one of its interactive steps.
    pub fn dismiss(&mut self) -> Result<(), WizardError> {
        if self.step == WizardStep::Processing {
            return Err(WizardError::Busy);
        }
        *self = Self::default();
        Ok(())
    }

    fn expect_step(&self, step: WizardStep) -> Result<(), WizardError> {
        if self.step != step {
            return Err(WizardError::WrongStep(self.step));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<String> {
        ["Date", "Amount", "Customer_ID", "Product_Name", "Channel", "Order_ID"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn mapping_wizard() -> ColumnMappingWizard {
        let mut wizard = ColumnMappingWizard::open(columns());
        wizard.select_file_type(FileKind::Csv).unwrap();
        wizard
    }

    #[test]
    fn opens_at_file_type_selection() {
        let wizard = ColumnMappingWizard::open(columns());
        assert_eq!(wizard.step(), WizardStep::SelectFileType);
        assert!(!wizard.can_confirm());
        assert_eq!(wizard.declared_kind(), None);
    }

    #[test]
    fn selecting_type_moves_to_mapping() {
        let wizard = mapping_wizard();
        assert_eq!(wizard.step(), WizardStep::MapColumns);
        assert_eq!(wizard.declared_kind(), Some(FileKind::Csv));
    }

    #[test]
    fn confirm_enabled_only_with_all_required_fields() {
        let mut wizard = mapping_wizard();
        let required = [
            (CanonicalField::Date, "Date"),
            (CanonicalField::Amount, "Amount"),
            (CanonicalField::OrderId, "Order_ID"),
            (CanonicalField::CustomerId, "Customer_ID"),
        ];
        for (field, column) in required {
            assert!(!wizard.can_confirm());
            wizard.assign(field, column).unwrap();
        }
        assert!(wizard.can_confirm());

        wizard.assign(CanonicalField::Channel, "Channel").unwrap();
        assert!(wizard.can_confirm());
        wizard.assign(CanonicalField::Channel, "").unwrap();
        assert!(wizard.can_confirm());

        wizard.assign(CanonicalField::OrderId, "").unwrap();
        assert!(!wizard.can_confirm());
    }

    #[test]
    fn optional_fields_alone_never_enable_confirm() {
        let mut wizard = mapping_wizard();
        wizard.assign(CanonicalField::Product, "Product_Name").unwrap();
        wizard.assign(CanonicalField::Channel, "Channel").unwrap();
        assert!(!wizard.can_confirm());
    }

    #[test]
    fn confirm_refuses_partial_mapping() {
        let mut wizard = mapping_wizard();
        wizard.assign(CanonicalField::Date, "Date").unwrap();
        wizard.assign(CanonicalField::Amount, "Amount").unwrap();

        let err = wizard.confirm().unwrap_err();
        assert_eq!(
            err,
            WizardError::Incomplete(vec![CanonicalField::OrderId, CanonicalField::CustomerId])
        );
        assert_eq!(wizard.step(), WizardStep::MapColumns);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut wizard = mapping_wizard();
        let err = wizard.assign(CanonicalField::Date, "When").unwrap_err();
        assert_eq!(err, WizardError::UnknownColumn("When".into()));
    }

    #[test]
    fn full_run_emits_mapping_and_resets() {
        let mut wizard = mapping_wizard();
        wizard.suggest().unwrap();
        let mapping = wizard.confirm().unwrap();

        assert_eq!(mapping.date, "Date");
        assert_eq!(mapping.customer_id, "Customer_ID");
        assert_eq!(mapping.product, "Product_Name");
        assert_eq!(wizard.step(), WizardStep::Processing);
        assert_eq!(wizard.dismiss(), Err(WizardError::Busy));

        wizard.finish_processing().unwrap();
        assert_eq!(wizard.step(), WizardStep::Closed);
        assert!(wizard.columns().is_empty());
        assert_eq!(wizard.draft(), &ColumnMapping::default());
    }

    #[test]
    fn reopening_does_not_resume() {
        let mut wizard = mapping_wizard();
        wizard.assign(CanonicalField::Date, "Date").unwrap();
        wizard.dismiss().unwrap();

        let wizard = ColumnMappingWizard::open(columns());
        assert_eq!(wizard.step(), WizardStep::SelectFileType);
        assert_eq!(wizard.draft(), &ColumnMapping::default());
    }

    #[test]
    fn back_keeps_draft() {
        let mut wizard = mapping_wizard();
        wizard.assign(CanonicalField::Date, "Date").unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), WizardStep::SelectFileType);

        wizard.select_file_type(FileKind::Excel).unwrap();
        assert_eq!(wizard.draft().date, "Date");
        assert_eq!(wizard.declared_kind(), Some(FileKind::Excel));
    }

    #[test]
    fn actions_out_of_step_are_refused() {
        let mut wizard = ColumnMappingWizard::open(columns());
        assert_eq!(
            wizard.assign(CanonicalField::Date, "Date"),
            Err(WizardError::WrongStep(WizardStep::SelectFileType))
        );
        assert!(wizard.confirm().is_err());
        assert!(wizard.finish_processing().is_err());
    }
}
