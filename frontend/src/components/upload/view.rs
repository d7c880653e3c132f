//! Dashboard rendering: company header, drop zone, uploaded file list and the
//! mapping wizard sheet.

use common::model::company::IndustryTag;
use common::model::data_file::{DataFile, FileStatus};
use common::model::file_kind::accept_attribute;
use common::upload::UploadPhase;
use web_sys::{DragEvent, Event, HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::components::sheet::ModalSheet;

use super::helpers::{files_from_list, format_size, mapping_summary};
use super::messages::Msg;
use super::state::UploadDashboard;
use super::wizard::wizard_body;

pub fn view(component: &UploadDashboard, ctx: &Context<UploadDashboard>) -> Html {
    let link = ctx.link();
    let wizard = component.orchestrator.wizard();

    html! {
        <div class="dashboard-root">
            { build_company_header(component, link) }
            { build_drop_zone(component, link) }
            { build_file_list(component, link) }
            <ModalSheet open={wizard.is_open()} title={wizard.step().title().to_string()}>
                { wizard_body(wizard, link) }
            </ModalSheet>
        </div>
    }
}

fn build_company_header(component: &UploadDashboard, link: &Scope<UploadDashboard>) -> Html {
    let company = component.orchestrator.current_company();
    let industry = company
        .as_ref()
        .map(|c| c.industry_tag)
        .unwrap_or_default();
    let on_industry = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        IndustryTag::from_name(&select.value()).map(Msg::SetIndustry)
    });

    html! {
        <header class="company-header">
            <div>
                <h2>{ company.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| "No company yet".to_string()) }</h2>
                <p class="muted">{ industry.description() }</p>
            </div>
            <label class="industry-picker">
                {"Industry"}
                <select onchange={on_industry}>
                    { for IndustryTag::all().iter().map(|tag| html! {
                        <option value={tag.display_name()} selected={*tag == industry}>
                            { tag.display_name() }
                        </option>
                    }) }
                </select>
            </label>
        </header>
    }
}

fn build_drop_zone(component: &UploadDashboard, link: &Scope<UploadDashboard>) -> Html {
    let phase = component.orchestrator.phase();
    let ondragover = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::DragActive(true)
    });
    let ondragleave = link.callback(|_: DragEvent| Msg::DragActive(false));
    let ondrop = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::FilesSelected(files_from_list(e.data_transfer().and_then(|dt| dt.files())))
    });
    let onchange = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = files_from_list(input.files());
        // Reset so that picking the same file again still fires `change`.
        input.set_value("");
        Msg::FilesSelected(files)
    });

    let body = match phase {
        UploadPhase::Reading { .. } | UploadPhase::Settling { .. } => html! {
            <div class="processing">
                <div class="spinner" />
                <p>{"Processing your file..."}</p>
            </div>
        },
        UploadPhase::Failed { message, .. } => html! {
            <div class="upload-error" role="alert">
                <p>{"We couldn't read that file."}</p>
                <p class="muted">{ message.clone() }</p>
                <button class="button-secondary" onclick={link.callback(|_| Msg::DismissError)}>
                    {"Try another file"}
                </button>
            </div>
        },
        UploadPhase::Idle | UploadPhase::Mapping { .. } => html! {
            <div class="drop-prompt">
                <i class="material-icons">{"cloud_upload"}</i>
                <p>{"Drop a CSV, Excel or Parquet file here"}</p>
                <button class="button-primary" onclick={link.callback(|_| Msg::OpenFilePicker)}>
                    {"Choose file"}
                </button>
            </div>
        },
    };

    html! {
        <section
            class={classes!("drop-zone", component.drag_active.then_some("drag-active"))}
            {ondragover}
            {ondragleave}
            {ondrop}
        >
            <input
                type="file"
                ref={component.file_input_ref.clone()}
                accept={accept_attribute()}
                style="display:none"
                {onchange}
            />
            { body }
        </section>
    }
}

fn build_file_list(component: &UploadDashboard, link: &Scope<UploadDashboard>) -> Html {
    let files = component.orchestrator.files();
    if files.is_empty() {
        return html! {};
    }
    let current_id = component.orchestrator.current_file().map(|f| f.id);

    html! {
        <section class="file-list">
            <h3>{"Your files"}</h3>
            <ul>
                { for files.iter().map(|file| file_row(file, current_id.as_deref() == Some(file.id.as_str()), link)) }
            </ul>
        </section>
    }
}

fn file_row(file: &DataFile, is_current: bool, link: &Scope<UploadDashboard>) -> Html {
    let id = file.id.clone();
    let status_class = match file.status {
        FileStatus::Ready => "status-ready",
        FileStatus::Error => "status-error",
        FileStatus::Pending | FileStatus::Processing => "status-processing",
    };

    html! {
        <li
            class={classes!("file-row", is_current.then_some("current"))}
            onclick={link.callback(move |_| Msg::SelectFile(id.clone()))}
        >
            <div class="file-main">
                <span class="file-name">{ file.file_name.clone() }</span>
                <span class="muted">
                    { format!("{} · {}", format_size(file.file_size), file.upload_date.format("%Y-%m-%d %H:%M")) }
                </span>
            </div>
            <span class={classes!("status-badge", status_class)}>{ file.status.display_name() }</span>
            {
                if let Some(mapping) = &file.column_mapping {
                    html! {
                        <ul class="mapping-summary">
                            { for mapping_summary(mapping).into_iter().map(|line| html! { <li>{ line }</li> }) }
                        </ul>
                    }
                } else if let Some(message) = &file.error_message {
                    html! { <p class="muted">{ message.clone() }</p> }
                } else {
                    html! {}
                }
            }
        </li>
    }
}
