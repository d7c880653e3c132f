//! Small helpers shared by the dashboard's update and view code.

use common::model::mapping::{CanonicalField, ColumnMapping};
use num_format::{Locale, ToFormattedString};
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys::{FileList, HtmlElement};
use yew::html::Scope;

use super::messages::Msg;
use super::state::UploadDashboard;

/// Collects the files of a drop or file-input event.
pub fn files_from_list(list: Option<FileList>) -> Vec<web_sys::File> {
    match list {
        Some(list) => (0..list.length()).filter_map(|i| list.get(i)).collect(),
        None => Vec::new(),
    }
}

/// Sends `msg` to the component after `delay`. If the component is gone by
/// then, Yew drops the message.
pub fn send_after(link: &Scope<UploadDashboard>, delay: Duration, msg: Msg) {
    let link = link.clone();
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(millis).await;
        link.send_message(msg);
    });
}

/// "12,345 bytes", "1.5 KB" or "3.2 MB".
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} bytes", bytes.to_formatted_string(&Locale::en))
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// One line per mapped field, e.g. `Date → order_date`.
pub fn mapping_summary(mapping: &ColumnMapping) -> Vec<String> {
    CanonicalField::all()
        .iter()
        .filter(|field| mapping.is_mapped(**field))
        .map(|field| format!("{} → {}", field.label(), mapping.get(*field)))
        .collect()
}

pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                toast.set_class_name("toast");
                let html_toast: HtmlElement = toast.unchecked_into();
                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_scale_with_units() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1000), "1,000 bytes");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn summary_lists_only_mapped_fields_in_order() {
        let mapping = ColumnMapping {
            date: "order_date".into(),
            amount: "total".into(),
            channel: "source".into(),
            ..Default::default()
        };
        assert_eq!(
            mapping_summary(&mapping),
            vec!["Date → order_date", "Amount → total", "Channel → source"]
        );
    }
}
