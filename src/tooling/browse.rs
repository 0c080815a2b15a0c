//! Interactive browser
//!
//! A prompt loop over the store: pick a folder to open it, pick a file or folder
//! to act on it. Each step prints the notifications the store raised.

use crate::error::ApiError;
use crate::tooling::cli::CliContext;
use crate::tooling::format::{format_breadcrumbs, format_listing_text, format_size};
use crate::types::{FolderId, ItemKind};
use crate::validation::{split_extension, validate_item_name};
use crate::views::{ListItem, StoreSnapshot};
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use tracing::warn;

/// One line of the browse menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEntry {
    Up,
    JumpTo,
    Item { item: ListItem, selected: bool },
    NewFolder,
    Upload,
    DeleteSelected(usize),
    ToggleView,
    Refresh,
    Quit,
}

impl BrowseEntry {
    pub fn label(&self) -> String {
        match self {
            BrowseEntry::Up => "..".to_string(),
            BrowseEntry::JumpTo => "> Jump to...".to_string(),
            BrowseEntry::Item { item, selected } => {
                let mark = if *selected { "[x]" } else { "[ ]" };
                match item.kind {
                    ItemKind::Folder => format!("{} {}/", mark, item.name),
                    ItemKind::File => format!(
                        "{} {}  ({})",
                        mark,
                        item.name,
                        item.size.map(format_size).unwrap_or_default()
                    ),
                }
            }
            BrowseEntry::NewFolder => "+ New folder".to_string(),
            BrowseEntry::Upload => "+ Upload files".to_string(),
            BrowseEntry::DeleteSelected(count) => format!("- Delete selected ({})", count),
            BrowseEntry::ToggleView => "~ Toggle view".to_string(),
            BrowseEntry::Refresh => "~ Refresh".to_string(),
            BrowseEntry::Quit => "x Quit".to_string(),
        }
    }
}

/// Menu for the current snapshot: navigation, items, then actions. Entries
/// that cannot apply (up at the root, delete with nothing selected) are left out.
pub fn menu_entries(snapshot: &StoreSnapshot) -> Vec<BrowseEntry> {
    let mut entries = Vec::with_capacity(snapshot.items().len() + 8);
    if snapshot.current_folder_id().is_some() {
        entries.push(BrowseEntry::Up);
    }
    if !snapshot.breadcrumbs().is_empty() {
        entries.push(BrowseEntry::JumpTo);
    }
    entries.extend(snapshot.items().iter().map(|item| BrowseEntry::Item {
        item: item.clone(),
        selected: snapshot.is_selected(item),
    }));
    entries.push(BrowseEntry::NewFolder);
    entries.push(BrowseEntry::Upload);
    if snapshot.can_delete() {
        entries.push(BrowseEntry::DeleteSelected(snapshot.selection_count()));
    }
    entries.extend([BrowseEntry::ToggleView, BrowseEntry::Refresh, BrowseEntry::Quit]);
    entries
}

/// Actions offered for a picked item.
pub fn item_actions(kind: ItemKind) -> &'static [&'static str] {
    match kind {
        ItemKind::Folder => &["Open", "Toggle selection", "Rename", "Delete", "Back"],
        ItemKind::File => &["Download", "Toggle selection", "Rename", "Delete", "Back"],
    }
}

/// Choices for the breadcrumb jump: the root followed by the trail. Choice `i`
/// maps to breadcrumb index `i - 1`.
pub fn jump_targets(snapshot: &StoreSnapshot) -> Vec<String> {
    std::iter::once("Home".to_string())
        .chain(snapshot.breadcrumbs().iter().map(|b| b.name.clone()))
        .collect()
}

/// Split a comma-separated list of paths, ignoring blanks.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn prompt_error(e: dialoguer::Error) -> ApiError {
    ApiError::InvalidInput(format!("Failed to get user input: {}", e))
}

pub(crate) struct Browser<'a> {
    context: &'a CliContext,
}

impl<'a> Browser<'a> {
    pub(crate) fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub(crate) fn run(&self, start: Option<FolderId>) -> Result<String, ApiError> {
        self.context.enter(start)?;
        loop {
            let snapshot = self.context.store().snapshot();
            println!("\n{}", format_listing_text(&snapshot));
            let entries = menu_entries(&snapshot);
            let labels: Vec<String> = entries.iter().map(BrowseEntry::label).collect();
            let choice = Select::new()
                .with_prompt(format_breadcrumbs(&snapshot))
                .items(labels.as_slice())
                .default(0)
                .interact()
                .map_err(prompt_error)?;

            let step = match &entries[choice] {
                BrowseEntry::Quit => return Ok("Bye".to_string()),
                BrowseEntry::Up => {
                    if let Some(fetch) = self.context.store().navigate_up() {
                        self.context.block_on(fetch);
                    }
                    Ok(())
                }
                BrowseEntry::JumpTo => self.jump(&snapshot),
                BrowseEntry::Item { item, .. } => self.act_on(item),
                BrowseEntry::NewFolder => self.new_folder(&snapshot),
                BrowseEntry::Upload => self.upload(&snapshot),
                BrowseEntry::DeleteSelected(count) => self.delete_selected(*count),
                BrowseEntry::ToggleView => {
                    let store = self.context.store();
                    store.set_view_mode(store.snapshot().view_mode.toggled());
                    Ok(())
                }
                BrowseEntry::Refresh => {
                    self.context.block_on(self.context.store().refresh());
                    Ok(())
                }
            };
            let notes = self.context.drain_notifications();
            if !notes.is_empty() {
                println!("{}", notes);
            }
            if let Err(e) = step {
                warn!(error = %e, "Browse action failed");
                println!("Error: {}", e);
            }
        }
    }

    fn jump(&self, snapshot: &StoreSnapshot) -> Result<(), ApiError> {
        let targets = jump_targets(snapshot);
        let choice = Select::new()
            .with_prompt("Jump to")
            .items(targets.as_slice())
            .default(targets.len().saturating_sub(1))
            .interact()
            .map_err(prompt_error)?;
        let index = choice as isize - 1;
        if let Some(fetch) = self.context.store().navigate_to_breadcrumb_index(index) {
            self.context.block_on(fetch);
        }
        Ok(())
    }

    fn act_on(&self, item: &ListItem) -> Result<(), ApiError> {
        let actions = item_actions(item.kind);
        let choice = Select::new()
            .with_prompt(&item.name)
            .items(actions)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        match actions[choice] {
            "Open" => {
                if let Some(fetch) = self.context.store().open_item(item) {
                    self.context.block_on(fetch);
                }
                Ok(())
            }
            "Toggle selection" => {
                self.context.store().toggle_selection(item.selection_key());
                Ok(())
            }
            "Download" => self.download(item),
            "Rename" => self.rename(item),
            "Delete" => self.delete(item),
            _ => Ok(()),
        }
    }

    fn new_folder(&self, snapshot: &StoreSnapshot) -> Result<(), ApiError> {
        let name: String = Input::new()
            .with_prompt("Folder name")
            .validate_with(|input: &String| validate_item_name(input).map(|_| ()))
            .interact_text()
            .map_err(prompt_error)?;
        let name = validate_item_name(&name).map_err(ApiError::InvalidInput)?;
        let parent = snapshot.current_folder_id().cloned();
        self.context
            .block_on(self.context.store().create_folder(name, parent))?;
        Ok(())
    }

    fn upload(&self, snapshot: &StoreSnapshot) -> Result<(), ApiError> {
        let input: String = Input::new()
            .with_prompt("Files to upload (comma separated)")
            .interact_text()
            .map_err(prompt_error)?;
        let screened = self.context.screen_paths(&parse_path_list(&input))?;
        for rejection in &screened.rejected {
            println!("Skipped {}", rejection);
        }
        let parent = snapshot.current_folder_id().cloned();
        self.context
            .block_on(self.context.store().upload_files(screened.accepted, parent))?;
        Ok(())
    }

    fn rename(&self, item: &ListItem) -> Result<(), ApiError> {
        // Files keep their extension; only the stem is edited.
        let (stem, extension) = match item.kind {
            ItemKind::File => split_extension(&item.name),
            ItemKind::Folder => (item.name.as_str(), ""),
        };
        let edited: String = Input::new()
            .with_prompt("New name")
            .with_initial_text(stem)
            .validate_with(|input: &String| validate_item_name(input).map(|_| ()))
            .interact_text()
            .map_err(prompt_error)?;
        let name = validate_item_name(&format!("{}{}", edited.trim(), extension))
            .map_err(ApiError::InvalidInput)?;
        if name == item.name {
            return Ok(());
        }
        self.context.block_on(
            self.context
                .store()
                .rename_item(name, item.id.clone(), item.kind),
        )?;
        Ok(())
    }

    fn confirm(&self, prompt: String) -> Result<bool, ApiError> {
        Confirm::new()
            .with_prompt(prompt)
            .interact()
            .map_err(prompt_error)
    }

    fn delete(&self, item: &ListItem) -> Result<(), ApiError> {
        if !self.confirm(format!("Delete {} '{}'?", item.kind, item.name))? {
            return Ok(());
        }
        let store = self.context.store();
        store.clear_selection();
        store.toggle_selection(item.selection_key());
        self.context.block_on(store.delete_selected())?;
        Ok(())
    }

    fn delete_selected(&self, count: usize) -> Result<(), ApiError> {
        if !self.confirm(format!("Delete {} selected item(s)?", count))? {
            return Ok(());
        }
        self.context
            .block_on(self.context.store().delete_selected())?;
        Ok(())
    }

    fn download(&self, item: &ListItem) -> Result<(), ApiError> {
        let target: String = Input::new()
            .with_prompt("Save as")
            .with_initial_text(item.name.clone())
            .interact_text()
            .map_err(prompt_error)?;
        let content = self
            .context
            .block_on(self.context.store().file_content(&item.id))?;
        std::fs::write(&target, &content.bytes)?;
        println!("Saved {} bytes to {}", content.bytes.len(), target);
        Ok(())
    }
}
