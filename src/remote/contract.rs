//! File service contract consumed by the store.

use super::dto::{
    BreadcrumbEntry, CreateFolderRequest, DeleteItemsRequest, FileContent, FolderChildren,
    RenameItemRequest, UploadFilesRequest, UploadResponse,
};
use crate::error::ApiError;
use crate::types::{FolderId, ItemId};
use async_trait::async_trait;

/// Remote operations against the file service.
///
/// Implementations own transport concerns (retries, timeouts, status
/// classification). Callers see either the decoded payload or a classified
/// `ApiError::Remote`.
#[async_trait]
pub trait FileService: Send + Sync {
    /// Children of a folder; `None` lists the root.
    async fn folder_children(&self, folder_id: Option<&FolderId>)
        -> Result<FolderChildren, ApiError>;

    /// Path from the root down to `folder_id`, inclusive.
    async fn breadcrumb_path(&self, folder_id: &FolderId) -> Result<Vec<BreadcrumbEntry>, ApiError>;

    async fn delete_items(&self, request: &DeleteItemsRequest) -> Result<(), ApiError>;

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<(), ApiError>;

    async fn rename_folder(&self, request: &RenameItemRequest) -> Result<(), ApiError>;

    async fn rename_file(&self, request: &RenameItemRequest) -> Result<(), ApiError>;

    async fn upload_files(&self, request: &UploadFilesRequest) -> Result<UploadResponse, ApiError>;

    async fn file_content(&self, file_id: &ItemId) -> Result<FileContent, ApiError>;
}
