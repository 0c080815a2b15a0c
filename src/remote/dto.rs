//! Wire types exchanged with the remote file service.

use crate::error::ApiError;
use crate::types::{FolderId, ItemId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server-side record for a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub modified_on: Option<String>,
}

/// Server-side record for a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub size_in_bytes: u64,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub modified_on: Option<String>,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

/// Response of `GET /file-manager/{folderId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderChildren {
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default)]
    pub folders: Vec<FolderNode>,
}

/// One segment of the path from the root to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbEntry {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemsRequest {
    pub folder_ids: Vec<ItemId>,
    pub file_ids: Vec<ItemId>,
}

impl DeleteItemsRequest {
    pub fn is_empty(&self) -> bool {
        self.folder_ids.is_empty() && self.file_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<FolderId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameItemRequest {
    pub id: ItemId,
    pub name: String,
}

/// A local file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name).map(str::to_string);
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, naming the upload after the file name.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn guess_content_type(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFilesRequest {
    pub files: Vec<UploadFile>,
    pub parent_id: Option<FolderId>,
}

/// Response of `POST /file/upload`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub uploaded_files: Option<Vec<FileNode>>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Names of the files the server rejected.
    ///
    /// Server errors read `"<name>: <reason>"`; entries without a separator are
    /// reported whole.
    pub fn failed_names(&self) -> Vec<String> {
        self.errors()
            .iter()
            .map(|e| match e.split_once(':') {
                Some((name, _)) => name.trim().to_string(),
                None => e.trim().to_string(),
            })
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Raw content of a file as returned by `GET /file/{id}/content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
