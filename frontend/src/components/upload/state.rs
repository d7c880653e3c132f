//! Runtime state of the upload dashboard.
//!
//! The component owns the session's `UploadOrchestrator`, which in turn owns
//! the record store. Everything the view shows is read from it; the only
//! purely visual state kept here is the drag highlight and the file input.

use common::config::AppConfig;
use common::store::DataRecordStore;
use common::upload::UploadOrchestrator;
use yew::prelude::*;

use crate::storage::BrowserSessionStorage;

const APP_CONFIG: &str = include_str!("../../../app_config.json");

pub struct UploadDashboard {
    /// Upload workflow and the session's records.
    pub orchestrator: UploadOrchestrator<BrowserSessionStorage>,

    /// Hidden `<input type="file">` opened by the drop zone's button.
    pub file_input_ref: NodeRef,

    /// Whether a drag is hovering over the drop zone.
    pub drag_active: bool,
}

impl UploadDashboard {
    /// Restores the session from `sessionStorage`. If the stored state cannot
    /// be read, the dashboard starts empty and keeps working in memory.
    pub fn new() -> Self {
        let config = AppConfig::from_json(APP_CONFIG);
        let key = config.storage_key.clone();
        let store = match DataRecordStore::open(BrowserSessionStorage::new(), key.clone()) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Could not restore session, starting empty: {}", e);
                DataRecordStore::empty(BrowserSessionStorage::detached(), key)
            }
        };

        Self {
            orchestrator: UploadOrchestrator::new(store, config),
            file_input_ref: NodeRef::default(),
            drag_active: false,
        }
    }
}
