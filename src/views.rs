//! Published views
//!
//! Everything the presentation layer reads: the client-facing item projection,
//! the tagged fetch state, and `StoreSnapshot` with its derived read-only views.

use crate::remote::{BreadcrumbEntry, FileNode, FolderChildren, FolderNode};
use crate::store::navigation::NavigationState;
use crate::store::selection::{SelectionKey, SelectionSet};
use crate::types::{FolderId, ItemId, ItemKind};
use serde::{Deserialize, Serialize};

/// How the presentation layer lays out items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Grid,
    #[default]
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// A folder or file projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}

impl ListItem {
    pub fn from_folder(folder: &FolderNode) -> Self {
        Self {
            id: folder.id.clone(),
            name: folder.name.clone(),
            kind: ItemKind::Folder,
            size: None,
            created_on: folder.created_on.clone(),
            modified_on: folder.modified_on.clone(),
        }
    }

    pub fn from_file(file: &FileNode) -> Self {
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            kind: ItemKind::File,
            size: Some(file.size_in_bytes),
            created_on: file.created_on.clone(),
            modified_on: file.modified_on.clone(),
        }
    }

    pub fn selection_key(&self) -> SelectionKey {
        SelectionKey::new(self.id.clone(), self.kind)
    }
}

/// Items of one folder plus the file count reported as `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub items: Vec<ListItem>,
    /// Number of files only; folders are not counted.
    pub total: usize,
}

impl Listing {
    /// Folders first, then files, each in server order.
    pub fn from_children(children: &FolderChildren) -> Self {
        let items = children
            .folders
            .iter()
            .map(ListItem::from_folder)
            .chain(children.files.iter().map(ListItem::from_file))
            .collect();
        Self {
            items,
            total: children.files.len(),
        }
    }
}

/// Progress of the most recent fetch.
///
/// `Loading` and `Failed` keep the listing that was on screen before the attempt,
/// which stays visible until a fetch succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading {
        previous: Option<Listing>,
    },
    Ready(Listing),
    Failed {
        message: String,
        previous: Option<Listing>,
    },
}

impl FetchState {
    /// The listing currently on screen, if any fetch ever succeeded.
    pub fn listing(&self) -> Option<&Listing> {
        match self {
            FetchState::Idle => None,
            FetchState::Loading { previous } | FetchState::Failed { previous, .. } => {
                previous.as_ref()
            }
            FetchState::Ready(listing) => Some(listing),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn take_listing(self) -> Option<Listing> {
        match self {
            FetchState::Idle => None,
            FetchState::Loading { previous } | FetchState::Failed { previous, .. } => previous,
            FetchState::Ready(listing) => Some(listing),
        }
    }

    pub(crate) fn into_loading(self) -> FetchState {
        FetchState::Loading {
            previous: self.take_listing(),
        }
    }

    pub(crate) fn into_failed(self, message: String) -> FetchState {
        FetchState::Failed {
            message,
            previous: self.take_listing(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading { .. } => "loading",
            FetchState::Ready(_) => "ready",
            FetchState::Failed { .. } => "failed",
        }
    }
}

/// Immutable picture of the store, published after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub view_mode: ViewMode,
    pub fetch_state: FetchState,
    pub navigation: NavigationState,
    pub selection: SelectionSet,
    pub busy: bool,
}

impl StoreSnapshot {
    pub fn items(&self) -> &[ListItem] {
        self.fetch_state
            .listing()
            .map(|l| l.items.as_slice())
            .unwrap_or_default()
    }

    pub fn folders(&self) -> Vec<&ListItem> {
        self.items_of(ItemKind::Folder)
    }

    pub fn files(&self) -> Vec<&ListItem> {
        self.items_of(ItemKind::File)
    }

    fn items_of(&self, kind: ItemKind) -> Vec<&ListItem> {
        self.items().iter().filter(|i| i.kind == kind).collect()
    }

    pub fn find_item(&self, id: &str, kind: ItemKind) -> Option<&ListItem> {
        self.items().iter().find(|i| i.id == id && i.kind == kind)
    }

    pub fn total(&self) -> usize {
        self.fetch_state.listing().map(|l| l.total).unwrap_or(0)
    }

    pub fn loading(&self) -> bool {
        self.fetch_state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.fetch_state.error()
    }

    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    pub fn can_rename(&self) -> bool {
        self.selection.can_rename()
    }

    pub fn can_delete(&self) -> bool {
        self.selection.can_delete()
    }

    pub fn is_selected(&self, item: &ListItem) -> bool {
        self.selection.contains(&item.selection_key())
    }

    pub fn current_folder_id(&self) -> Option<&FolderId> {
        self.navigation.current_folder_id()
    }

    pub fn breadcrumbs(&self) -> &[BreadcrumbEntry] {
        self.navigation.breadcrumbs()
    }

    pub fn path(&self) -> &[FolderId] {
        self.navigation.path()
    }

    pub fn path_names(&self) -> &[String] {
        self.navigation.path_names()
    }
}
