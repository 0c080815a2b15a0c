//! Fetch coordinator
//!
//! Loads a folder's children and its breadcrumb path concurrently. Each fetch is
//! issued with a ticket; the store applies a result only while its ticket is the
//! latest one and its folder is still the current folder.

use crate::error::ApiError;
use crate::remote::{BreadcrumbEntry, FileService};
use crate::types::FolderId;
use crate::views::Listing;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Monotonic id of an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FetchTicket(pub(crate) u64);

impl FetchTicket {
    pub(crate) fn next(self) -> Self {
        FetchTicket(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A fetch that has been issued and not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub folder_id: Option<FolderId>,
}

impl PendingFetch {
    /// Staleness guard: still the newest fetch, for the folder the user is in.
    pub fn is_current(&self, latest: FetchTicket, current_folder: Option<&FolderId>) -> bool {
        self.ticket == latest && self.folder_id.as_ref() == current_folder
    }
}

/// How a fetch ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "lowercase")]
pub enum FetchOutcome {
    /// The result was published.
    Applied,
    /// A newer fetch was issued first; the result was dropped.
    Stale,
    /// The fetch failed and the failure was published.
    Failed(String),
}

/// Children and breadcrumb trail of one folder, fetched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLoad {
    pub listing: Listing,
    pub trail: Vec<BreadcrumbEntry>,
}

pub struct FetchCoordinator {
    service: Arc<dyn FileService>,
}

impl FetchCoordinator {
    pub fn new(service: Arc<dyn FileService>) -> Self {
        Self { service }
    }

    /// Fetch children and trail; the root has an empty trail and no trail request.
    pub async fn load(&self, folder_id: Option<&FolderId>) -> Result<FolderLoad, ApiError> {
        let children = self.service.folder_children(folder_id);
        let trail = async {
            match folder_id {
                Some(id) => self.service.breadcrumb_path(id).await,
                None => Ok(Vec::new()),
            }
        };
        let (children, trail) = futures::future::try_join(children, trail).await?;
        debug!(
            folder_id = ?folder_id,
            folders = children.folders.len(),
            files = children.files.len(),
            depth = trail.len(),
            "Loaded folder"
        );
        Ok(FolderLoad {
            listing: Listing::from_children(&children),
            trail,
        })
    }
}
