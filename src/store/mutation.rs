//! Mutation orchestrator
//!
//! Runs create/rename/delete/upload against the file service and reports the
//! result through the notifier. It does not touch store state; the store decides
//! what to clear and when to refetch once an operation returns.

use crate::error::ApiError;
use crate::notify::{Notification, Notifier};
use crate::remote::{
    CreateFolderRequest, DeleteItemsRequest, FileService, RenameItemRequest, UploadFilesRequest,
    UploadResponse,
};
use crate::store::fetch::FetchOutcome;
use crate::types::ItemKind;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Which mutation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    CreateFolder,
    Rename,
    Delete,
    Upload,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::CreateFolder => "create_folder",
            MutationKind::Rename => "rename",
            MutationKind::Delete => "delete",
            MutationKind::Upload => "upload",
        }
    }
}

/// What an upload achieved, as far as the server reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the response counts as a success worth announcing.
    pub announced: bool,
}

impl UploadSummary {
    /// Summarise a response for `attempted` files.
    ///
    /// The uploaded count is the length of `uploadedFiles` when present, else the
    /// attempted count minus the reported errors.
    pub fn from_response(response: &UploadResponse, attempted: usize) -> Self {
        let uploaded = match &response.uploaded_files {
            Some(files) => files.len(),
            None => attempted.saturating_sub(response.errors().len()),
        };
        Self {
            uploaded,
            failed: response.failed_names(),
            message: response.message.clone(),
            announced: uploaded > 0 || response.success != Some(false),
        }
    }
}

/// Result of a mutation that the service accepted (or had nothing to do).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationReport {
    pub kind: MutationKind,
    /// `None` when the operation was skipped before reaching the service.
    pub refresh: Option<FetchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadSummary>,
}

impl MutationReport {
    pub(crate) fn refreshed(kind: MutationKind, refresh: FetchOutcome) -> Self {
        Self {
            kind,
            refresh: Some(refresh),
            upload: None,
        }
    }

    pub(crate) fn skipped(kind: MutationKind) -> Self {
        Self {
            kind,
            refresh: None,
            upload: None,
        }
    }

    pub fn was_skipped(&self) -> bool {
        self.refresh.is_none()
    }
}

/// Sends mutation requests and turns each outcome into a notification.
///
/// It neither holds the busy gate nor touches store state; the store does both
/// around each call.
pub struct MutationOrchestrator {
    service: Arc<dyn FileService>,
    notifier: Arc<dyn Notifier>,
}

impl MutationOrchestrator {
    pub fn new(service: Arc<dyn FileService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { service, notifier }
    }

    /// Create a folder, announcing it by name on success.
    pub async fn create_folder(&self, request: &CreateFolderRequest) -> Result<(), ApiError> {
        let result = self.service.create_folder(request).await;
        self.report(
            result,
            || format!("Folder '{}' created", request.name),
            "Could not create folder",
        )
    }

    /// Route the rename to the folder or file endpoint by kind.
    pub async fn rename(&self, request: &RenameItemRequest, kind: ItemKind) -> Result<(), ApiError> {
        let result = match kind {
            ItemKind::Folder => self.service.rename_folder(request).await,
            ItemKind::File => self.service.rename_file(request).await,
        };
        self.report(
            result,
            || format!("Renamed to '{}'", request.name),
            "Could not rename item",
        )
    }

    /// Delete folders and files in one batch call.
    pub async fn delete(&self, request: &DeleteItemsRequest) -> Result<(), ApiError> {
        let result = self.service.delete_items(request).await;
        let count = request.folder_ids.len() + request.file_ids.len();
        self.report(
            result,
            || format!("{} selected item(s) deleted", count),
            "Could not delete selected items",
        )
    }

    /// Upload files. A response that reports per-file errors is still `Ok`; the
    /// failed names go out as a warning and land in the summary.
    pub async fn upload(&self, request: &UploadFilesRequest) -> Result<UploadSummary, ApiError> {
        let response = match self.service.upload_files(request).await {
            Ok(response) => response,
            Err(err) => {
                self.notifier
                    .notify(Notification::error("Upload failed", err.user_message()));
                return Err(err);
            }
        };

        let summary = UploadSummary::from_response(&response, request.files.len());
        if !summary.failed.is_empty() {
            warn!(failed = ?summary.failed, "Some files were rejected by the server");
            self.notifier.notify(Notification::warning(
                "Some files were not uploaded",
                summary.failed.join(", "),
            ));
        }
        if summary.announced {
            info!(uploaded = summary.uploaded, "Upload complete");
            self.notifier.notify(Notification::success(
                "Upload complete",
                format!("{} file(s) uploaded", summary.uploaded),
            ));
        }
        Ok(summary)
    }

    fn report(
        &self,
        result: Result<(), ApiError>,
        success: impl FnOnce() -> String,
        failure: &str,
    ) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                self.notifier.notify(Notification::success("Success", success()));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "{}", failure);
                self.notifier
                    .notify(Notification::error(failure, err.user_message()));
                Err(err)
            }
        }
    }
}
