//! Format listings, breadcrumbs and notifications as text.

use crate::notify::{Notification, Severity};
use crate::views::{ListItem, StoreSnapshot, ViewMode};
use crate::types::ItemKind;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// `Home / Docs / 2024` style trail for the current folder.
pub fn format_breadcrumbs(snapshot: &StoreSnapshot) -> String {
    std::iter::once("Home")
        .chain(snapshot.breadcrumbs().iter().map(|b| b.name.as_str()))
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn kind_label(item: &ListItem) -> &'static str {
    match item.kind {
        ItemKind::Folder => "dir",
        ItemKind::File => "file",
    }
}

/// Listing of the current folder, laid out for the snapshot's view mode.
pub fn format_listing_text(snapshot: &StoreSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format_breadcrumbs(snapshot))
    ));
    if let Some(error) = snapshot.error() {
        out.push_str(&format!("  {}\n\n", error.red()));
    }
    let items = snapshot.items();
    if items.is_empty() {
        out.push_str("  (empty)\n");
        return out;
    }
    match snapshot.view_mode {
        ViewMode::List => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Name", "Type", "Size", "Modified", "Id"]);
            for item in items {
                table.add_row(vec![
                    item.name.clone(),
                    kind_label(item).to_string(),
                    item.size.map(format_size).unwrap_or_else(|| "-".to_string()),
                    item.modified_on.clone().unwrap_or_else(|| "-".to_string()),
                    item.id.clone(),
                ]);
            }
            out.push_str(&format!("{}\n", table));
        }
        ViewMode::Grid => {
            for row in items.chunks(4) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|item| match item.kind {
                        ItemKind::Folder => format!("[{}]", item.name),
                        ItemKind::File => item.name.clone(),
                    })
                    .collect();
                out.push_str(&format!("  {}\n", cells.join("    ")));
            }
        }
    }
    out.push_str(&format!("\n{} file(s)\n", snapshot.total()));
    out
}

/// Listing of the current folder as JSON.
pub fn format_listing_json(snapshot: &StoreSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "folderId": snapshot.current_folder_id(),
        "breadcrumbs": snapshot.breadcrumbs(),
        "items": snapshot.items(),
        "total": snapshot.total(),
        "error": snapshot.error(),
    }))
}

pub fn format_notification(n: &Notification) -> String {
    let label = match n.severity {
        Severity::Success => format!("{}", "ok".green()),
        Severity::Info => format!("{}", "info".blue()),
        Severity::Warn => format!("{}", "warn".yellow()),
        Severity::Error => format!("{}", "error".red()),
    };
    match &n.detail {
        Some(detail) => format!("[{}] {}: {}", label, n.summary, detail),
        None => format!("[{}] {}", label, n.summary),
    }
}

pub fn format_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(format_notification)
        .collect::<Vec<_>>()
        .join("\n")
}
