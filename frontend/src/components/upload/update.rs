//! Update function for the upload dashboard.
//!
//! Elm-style: receives the component state and a `Msg`, drives the
//! orchestrator, and returns whether the view should re-render. Asynchronous
//! work (the column read and the UX delays) is spawned here and reports back
//! as messages carrying the upload's ticket, so a result for a superseded
//! upload is recognized and ignored.

use gloo_file::File;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::data_file::FileMeta;
use common::upload::UploadPhase;

use crate::reader::{file_meta, read_columns};

use super::helpers::{send_after, show_toast};
use super::messages::Msg;
use super::state::UploadDashboard;

pub fn update(component: &mut UploadDashboard, ctx: &Context<UploadDashboard>, msg: Msg) -> bool {
    match msg {
        Msg::OpenFilePicker => {
            if let Some(input) = component.file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
            false
        }
        Msg::DragActive(active) => {
            let changed = component.drag_active != active;
            component.drag_active = active;
            changed
        }
        Msg::FilesSelected(files) => {
            component.drag_active = false;
            let files: Vec<File> = files.into_iter().map(File::from).collect();
            let metas: Vec<FileMeta> = files.iter().map(file_meta).collect();

            let Some(ticket) = component.orchestrator.accept_drop(&metas) else {
                return true;
            };
            let Some(file) = files.into_iter().next() else {
                return true;
            };

            let reader = component.orchestrator.reader().clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = read_columns(reader, file).await;
                link.send_message(Msg::ColumnsRead { ticket, result });
            });
            true
        }
        Msg::ColumnsRead { ticket, result } => {
            if let Some(delay) = component.orchestrator.columns_read(&ticket, result) {
                send_after(ctx.link(), delay, Msg::SettleElapsed(ticket));
            } else if let UploadPhase::Failed { file_id, message } = component.orchestrator.phase() {
                if *file_id == ticket.file_id {
                    show_toast(message);
                }
            }
            true
        }
        Msg::SettleElapsed(ticket) => component.orchestrator.settle_elapsed(&ticket),
        Msg::SelectFileType(kind) => report(component.orchestrator.select_file_type(kind)),
        Msg::AssignColumn(field, column) => {
            report(component.orchestrator.assign_column(field, &column))
        }
        Msg::SuggestMapping => report(component.orchestrator.suggest_mapping()),
        Msg::WizardBack => report(component.orchestrator.wizard_back()),
        Msg::DismissWizard => report(component.orchestrator.dismiss_wizard()),
        Msg::ConfirmMapping => {
            match component.orchestrator.confirm_mapping() {
                Ok(delay) => {
                    if let Some(ticket) = component.orchestrator.active_ticket() {
                        send_after(ctx.link(), delay, Msg::ProcessingElapsed(ticket));
                    }
                }
                Err(e) => {
                    log::error!("Mapping not saved: {}", e);
                    show_toast(&format!("Mapping not saved: {}", e));
                }
            }
            true
        }
        Msg::ProcessingElapsed(ticket) => {
            let closed = component.orchestrator.processing_elapsed(&ticket);
            if closed {
                show_toast("Your data is ready for analysis.");
            }
            closed
        }
        Msg::DismissError => {
            component.orchestrator.acknowledge_failure();
            true
        }
        Msg::SelectFile(file_id) => report(component.orchestrator.select_file(&file_id).map(|_| ())),
        Msg::SetIndustry(tag) => report(component.orchestrator.set_industry(tag).map(|_| ())),
    }
}

/// Logs a refused action; the view is redrawn either way so it reflects
/// whatever state the orchestrator ended up in.
fn report<E: std::fmt::Display>(result: Result<(), E>) -> bool {
    if let Err(e) = result {
        log::warn!("Action refused: {}", e);
    }
    true
}
