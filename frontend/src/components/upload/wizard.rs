//! Body of the column-mapping wizard sheet, one builder per step.

use common::model::file_kind::FileKind;
use common::model::mapping::CanonicalField;
use common::wizard::{ColumnMappingWizard, WizardStep};
use web_sys::{Event, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::UploadDashboard;

pub fn wizard_body(wizard: &ColumnMappingWizard, link: &Scope<UploadDashboard>) -> Html {
    match wizard.step() {
        WizardStep::SelectFileType => build_file_type_step(wizard, link),
        WizardStep::MapColumns => build_mapping_step(wizard, link),
        WizardStep::Processing => build_processing_step(wizard),
        WizardStep::Closed => html! {},
    }
}

fn build_file_type_step(wizard: &ColumnMappingWizard, link: &Scope<UploadDashboard>) -> Html {
    html! {
        <div class="wizard-step">
            <p class="muted">{"Choose the type of file you're uploading to help us process it correctly."}</p>
            <div class="file-type-list">
                { for FileKind::all().iter().map(|kind| {
                    let kind = *kind;
                    html! {
                        <button
                            class={classes!("file-type", (wizard.declared_kind() == Some(kind)).then_some("selected"))}
                            onclick={link.callback(move |_| Msg::SelectFileType(kind))}
                        >
                            <span class="file-type-name">{ kind.display_name() }</span>
                            <span class="muted">{ kind.description() }</span>
                        </button>
                    }
                }) }
            </div>
            <div class="wizard-actions">
                <button class="button-secondary" onclick={link.callback(|_| Msg::DismissWizard)}>
                    {"Cancel"}
                </button>
            </div>
        </div>
    }
}

fn build_mapping_step(wizard: &ColumnMappingWizard, link: &Scope<UploadDashboard>) -> Html {
    let missing = wizard.draft().missing_required();

    html! {
        <div class="wizard-step">
            <p class="muted">{"Map your data columns to the correct field types for accurate analysis."}</p>
            {
                if wizard.columns().is_empty() {
                    html! { <p class="upload-error">{"No columns were found in this file."}</p> }
                } else {
                    html! {}
                }
            }
            <div class="mapping-grid">
                { for CanonicalField::all().iter().map(|field| field_row(*field, wizard, link)) }
            </div>
            {
                if missing.is_empty() {
                    html! {}
                } else {
                    let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
                    html! { <p class="muted">{ format!("Still required: {}", names.join(", ")) }</p> }
                }
            }
            <div class="wizard-actions">
                <button class="button-secondary" onclick={link.callback(|_| Msg::SuggestMapping)}>
                    {"Auto-detect"}
                </button>
                <button class="button-secondary" onclick={link.callback(|_| Msg::WizardBack)}>
                    {"Back"}
                </button>
                <button class="button-secondary" onclick={link.callback(|_| Msg::DismissWizard)}>
                    {"Cancel"}
                </button>
                <button
                    class="button-primary"
                    disabled={!wizard.can_confirm()}
                    onclick={link.callback(|_| Msg::ConfirmMapping)}
                >
                    {"Process Data"}
                </button>
            </div>
        </div>
    }
}

fn field_row(field: CanonicalField, wizard: &ColumnMappingWizard, link: &Scope<UploadDashboard>) -> Html {
    let selected = wizard.draft().get(field).to_string();
    let onchange = link.callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::AssignColumn(field, select.value())
    });

    html! {
        <div class="mapping-row">
            <div>
                <p class="field-label">
                    { field.label() }
                    { if field.is_required() { html! { <span class="required">{" *"}</span> } } else { html! {} } }
                </p>
                <p class="muted">{ field.description() }</p>
            </div>
            <select {onchange}>
                <option value="" selected={selected.is_empty()}>{"Select column..."}</option>
                { for wizard.columns().iter().map(|column| html! {
                    <option value={column.clone()} selected={*column == selected}>{ column.clone() }</option>
                }) }
            </select>
        </div>
    }
}

fn build_processing_step(wizard: &ColumnMappingWizard) -> Html {
    let kind = wizard
        .declared_kind()
        .map(|k| k.display_name())
        .unwrap_or("file");

    html! {
        <div class="wizard-step processing">
            <div class="spinner" />
            <p>{"Processing your data..."}</p>
            <p class="muted">
                { format!("We're analyzing your {} and preparing insights.", kind.to_lowercase()) }
            </p>
        </div>
    }
}
