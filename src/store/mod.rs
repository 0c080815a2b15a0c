//! File manager store
//!
//! The single object the presentation layer talks to. It owns navigation,
//! selection and fetch state, publishes a `StoreSnapshot` after every change and
//! runs mutations through one single-flight gate.
//!
//! Navigation intents apply their state change synchronously and return the
//! fetch as a future. The caller decides whether to await it or spawn it; a
//! fetch that settles after a newer one was issued is discarded.

pub mod fetch;
pub mod mutation;
pub mod navigation;
pub mod selection;

use crate::concurrency::{BusyGate, BusyGuard};
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::remote::{
    CreateFolderRequest, FileContent, FileService, RenameItemRequest, UploadFile,
    UploadFilesRequest,
};
use crate::routing;
use crate::types::{FolderId, ItemId, ItemKind};
use crate::views::{FetchState, ListItem, StoreSnapshot, ViewMode};
use fetch::{FetchCoordinator, FetchTicket, FolderLoad, PendingFetch};
use mutation::MutationOrchestrator;
use navigation::NavigationState;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use fetch::FetchOutcome;
pub use mutation::{MutationKind, MutationReport, UploadSummary};
pub use navigation::BreadcrumbTarget;
pub use selection::{SelectionKey, SelectionSet};

#[derive(Debug, Default)]
struct StoreState {
    view_mode: ViewMode,
    fetch_state: FetchState,
    navigation: NavigationState,
    selection: SelectionSet,
    latest_ticket: FetchTicket,
}

impl StoreState {
    fn begin_fetch(&mut self) -> PendingFetch {
        self.latest_ticket = self.latest_ticket.next();
        self.fetch_state = std::mem::take(&mut self.fetch_state).into_loading();
        PendingFetch {
            ticket: self.latest_ticket,
            folder_id: self.navigation.current_folder_id().cloned(),
        }
    }

    fn settle_fetch(
        &mut self,
        pending: &PendingFetch,
        result: Result<FolderLoad, ApiError>,
    ) -> FetchOutcome {
        if !pending.is_current(self.latest_ticket, self.navigation.current_folder_id()) {
            debug!(
                ticket = pending.ticket.value(),
                latest = self.latest_ticket.value(),
                folder_id = ?pending.folder_id,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(load) => {
                self.navigation.confirm_trail(load.trail);
                self.fetch_state = FetchState::Ready(load.listing);
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(folder_id = ?pending.folder_id, error = %err, "Failed to load folder");
                let message = err.user_message();
                self.fetch_state =
                    std::mem::take(&mut self.fetch_state).into_failed(message.clone());
                self.navigation.reset_trail();
                FetchOutcome::Failed(message)
            }
        }
    }

    fn snapshot(&self, busy: bool) -> StoreSnapshot {
        StoreSnapshot {
            view_mode: self.view_mode,
            fetch_state: self.fetch_state.clone(),
            navigation: self.navigation.clone(),
            selection: self.selection.clone(),
            busy,
        }
    }
}

/// Holds the mutation gate and republishes the snapshot when released.
struct BusyClaim<'a> {
    store: &'a FileManagerStore,
    guard: Option<BusyGuard>,
}

impl Drop for BusyClaim<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.store.publish();
    }
}

/// Navigation, listing, selection and mutation state for one file manager view.
///
/// Every state change is published as a [`StoreSnapshot`]. At most one
/// mutation runs at a time; fetches are never blocked by the gate.
pub struct FileManagerStore {
    service: Arc<dyn FileService>,
    fetcher: FetchCoordinator,
    mutations: MutationOrchestrator,
    gate: BusyGate,
    state: Mutex<StoreState>,
    publisher: watch::Sender<StoreSnapshot>,
}

impl FileManagerStore {
    /// Store at the root with nothing loaded. Call `navigate_to_folder` to load.
    pub fn new(service: Arc<dyn FileService>, notifier: Arc<dyn Notifier>) -> Self {
        let (publisher, _) = watch::channel(StoreSnapshot::default());
        Self {
            fetcher: FetchCoordinator::new(Arc::clone(&service)),
            mutations: MutationOrchestrator::new(Arc::clone(&service), notifier),
            service,
            gate: BusyGate::new(),
            state: Mutex::new(StoreState::default()),
            publisher,
        }
    }

    /// Builder form of `set_view_mode`, for the configured initial mode.
    pub fn with_view_mode(self, view_mode: ViewMode) -> Self {
        self.set_view_mode(view_mode);
        self
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.publisher.subscribe()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.publisher.borrow().clone()
    }

    /// Whether a mutation currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    fn publish(&self) {
        let state = self.state.lock();
        self.publisher
            .send_replace(state.snapshot(self.gate.is_busy()));
    }

    /// Apply `f` to the state and publish the result.
    fn update<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut state = self.state.lock();
        let out = f(&mut state);
        self.publisher
            .send_replace(state.snapshot(self.gate.is_busy()));
        out
    }

    // ---- navigation ----

    /// Make `folder_id` current (`None` is the root), clear the selection and
    /// start loading it. The state change is visible before this returns.
    pub fn navigate_to_folder(
        &self,
        folder_id: Option<FolderId>,
    ) -> impl Future<Output = FetchOutcome> + Send + '_ {
        let pending = self.update(|state| {
            state.navigation.set_current(folder_id);
            state.selection.clear();
            state.begin_fetch()
        });
        info!(
            folder_id = ?pending.folder_id,
            ticket = pending.ticket.value(),
            "Navigating"
        );
        self.run_fetch(pending)
    }

    /// Jump to a breadcrumb: `-1` is the root, `0..len` an entry of the trail.
    /// Out-of-range indices do nothing and return `None`.
    pub fn navigate_to_breadcrumb_index(
        &self,
        index: isize,
    ) -> Option<impl Future<Output = FetchOutcome> + Send + '_> {
        let target = self.state.lock().navigation.resolve_breadcrumb(index);
        match target {
            Some(target) => Some(self.navigate_to_folder(target.into_folder_id())),
            None => {
                debug!(index, "Ignoring breadcrumb index outside the trail");
                None
            }
        }
    }

    /// Go one level up. `None` when already at the root.
    pub fn navigate_up(&self) -> Option<impl Future<Output = FetchOutcome> + Send + '_> {
        let target = self.state.lock().navigation.parent_target()?;
        Some(self.navigate_to_folder(target.into_folder_id()))
    }

    /// Navigate to the folder a route points at.
    pub fn navigate_to_route<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> impl Future<Output = FetchOutcome> + Send + '_ {
        self.navigate_to_folder(routing::folder_id_from_segments(segments))
    }

    /// Open a listed item. Folders are navigated into; files are left to the
    /// presentation layer and return `None`.
    pub fn open_item(
        &self,
        item: &ListItem,
    ) -> Option<impl Future<Output = FetchOutcome> + Send + '_> {
        match item.kind {
            ItemKind::Folder => Some(self.navigate_to_folder(Some(item.id.clone()))),
            ItemKind::File => None,
        }
    }

    /// Reload the current folder. Selection is left alone.
    pub fn refresh(&self) -> impl Future<Output = FetchOutcome> + Send + '_ {
        let pending = self.update(StoreState::begin_fetch);
        self.run_fetch(pending)
    }

    async fn run_fetch(&self, pending: PendingFetch) -> FetchOutcome {
        let result = self.fetcher.load(pending.folder_id.as_ref()).await;
        self.update(|state| state.settle_fetch(&pending, result))
    }

    // ---- selection and presentation ----

    /// Returns whether the key is selected afterwards.
    pub fn toggle_selection(&self, key: SelectionKey) -> bool {
        self.update(|state| state.selection.toggle(key))
    }

    /// Deselect everything.
    pub fn clear_selection(&self) {
        self.update(|state| state.selection.clear());
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.update(|state| state.view_mode = view_mode);
    }

    // ---- mutations ----

    fn claim(&self, kind: MutationKind) -> Result<BusyClaim<'_>, ApiError> {
        let guard = self.gate.try_acquire().ok_or_else(|| {
            warn!(operation = kind.as_str(), "Rejected: another operation is in progress");
            ApiError::Busy
        })?;
        let claim = BusyClaim {
            store: self,
            guard: Some(guard),
        };
        self.publish();
        Ok(claim)
    }

    async fn clear_and_refresh(&self, kind: MutationKind) -> MutationReport {
        self.clear_selection();
        MutationReport::refreshed(kind, self.refresh().await)
    }

    /// Create `name` under `parent_id` (`None` is the root), then clear the
    /// selection and reload. Fails with `Busy` while another mutation runs.
    pub async fn create_folder(
        &self,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
    ) -> Result<MutationReport, ApiError> {
        let _claim = self.claim(MutationKind::CreateFolder)?;
        let request = CreateFolderRequest {
            name: name.into(),
            parent_id,
        };
        self.mutations.create_folder(&request).await?;
        Ok(self.clear_and_refresh(MutationKind::CreateFolder).await)
    }

    /// Rename an item, routed to the folder or file endpoint by `kind`.
    pub async fn rename_item(
        &self,
        new_name: impl Into<String>,
        item_id: ItemId,
        kind: ItemKind,
    ) -> Result<MutationReport, ApiError> {
        let _claim = self.claim(MutationKind::Rename)?;
        let request = RenameItemRequest {
            id: item_id,
            name: new_name.into(),
        };
        self.mutations.rename(&request, kind).await?;
        Ok(self.clear_and_refresh(MutationKind::Rename).await)
    }

    /// Rename the single selected item.
    pub async fn rename_selected(
        &self,
        new_name: impl Into<String>,
    ) -> Result<MutationReport, ApiError> {
        let key = self.state.lock().selection.single().cloned().ok_or_else(|| {
            ApiError::InvalidInput("Select exactly one item to rename".to_string())
        })?;
        self.rename_item(new_name, key.id, key.kind).await
    }

    /// Delete everything selected. An empty selection is a no-op.
    pub async fn delete_selected(&self) -> Result<MutationReport, ApiError> {
        let request = self.state.lock().selection.to_delete_request();
        if request.is_empty() {
            debug!("Nothing selected to delete");
            return Ok(MutationReport::skipped(MutationKind::Delete));
        }
        let _claim = self.claim(MutationKind::Delete)?;
        self.mutations.delete(&request).await?;
        Ok(self.clear_and_refresh(MutationKind::Delete).await)
    }

    /// Upload `files` into `parent_id`. The selection is not touched and the
    /// current folder is reloaded whenever the service answered.
    pub async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        parent_id: Option<FolderId>,
    ) -> Result<MutationReport, ApiError> {
        if files.is_empty() {
            return Ok(MutationReport::skipped(MutationKind::Upload));
        }
        let _claim = self.claim(MutationKind::Upload)?;
        let request = UploadFilesRequest { files, parent_id };
        let summary = self.mutations.upload(&request).await?;
        let refresh = self.refresh().await;
        Ok(MutationReport {
            kind: MutationKind::Upload,
            refresh: Some(refresh),
            upload: Some(summary),
        })
    }

    /// Raw content of a file, for download or preview.
    pub async fn file_content(&self, file_id: &ItemId) -> Result<FileContent, ApiError> {
        self.service.file_content(file_id).await
    }
}
