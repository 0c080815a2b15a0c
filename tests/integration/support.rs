//! In-memory file service used by the integration tests.

use async_trait::async_trait;
use canopy::error::{ApiError, ErrorKind, RemoteError};
use canopy::remote::{
    BreadcrumbEntry, CreateFolderRequest, DeleteItemsRequest, FileContent, FileNode,
    FileService, FolderChildren, FolderNode, RenameItemRequest, UploadFilesRequest,
    UploadResponse,
};
use canopy::types::{FolderId, ItemId};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Tree {
    folders: Vec<FolderNode>,
    files: Vec<FileNode>,
    contents: HashMap<ItemId, Vec<u8>>,
    next_id: u64,
}

impl Tree {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("00000000-0000-4000-8000-{:012x}", self.next_id)
    }

    fn has_folder(&self, id: &str) -> bool {
        self.folders.iter().any(|f| f.id == id)
    }

    fn remove_folder(&mut self, id: &str) {
        let children: Vec<String> = self
            .folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == Some(id))
            .map(|f| f.id.clone())
            .collect();
        for child in children {
            self.remove_folder(&child);
        }
        self.folders.retain(|f| f.id != id);
        self.files.retain(|f| f.folder_id.as_deref() != Some(id));
    }
}

/// A file service backed by an in-memory folder tree. Ids look like UUIDs so
/// routes resolve to them.
#[derive(Default)]
pub struct InMemoryFileService {
    tree: Mutex<Tree>,
    calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<ErrorKind>>,
}

impl InMemoryFileService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_folder(&self, name: &str, parent: Option<&str>) -> String {
        let mut tree = self.tree.lock();
        let id = tree.allocate_id();
        tree.folders.push(FolderNode {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent.map(str::to_string),
            created_on: Some("2024-05-01T10:00:00".to_string()),
            modified_on: Some("2024-05-01T10:00:00".to_string()),
        });
        id
    }

    pub fn seed_file(&self, name: &str, parent: Option<&str>, bytes: &[u8]) -> String {
        let mut tree = self.tree.lock();
        let id = tree.allocate_id();
        tree.files.push(FileNode {
            id: id.clone(),
            name: name.to_string(),
            content_type: "text/plain".to_string(),
            size_in_bytes: bytes.len() as u64,
            created_on: None,
            modified_on: None,
            folder_id: parent.map(str::to_string),
        });
        tree.contents.insert(id.clone(), bytes.to_vec());
        id
    }

    /// Make the next call fail with `kind`.
    pub fn fail_next(&self, kind: ErrorKind) {
        *self.fail_next.lock() = Some(kind);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn folder_names(&self, parent: Option<&str>) -> Vec<String> {
        self.tree
            .lock()
            .folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn file_names(&self, parent: Option<&str>) -> Vec<String> {
        self.tree
            .lock()
            .files
            .iter()
            .filter(|f| f.folder_id.as_deref() == parent)
            .map(|f| f.name.clone())
            .collect()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().push(call);
        match self.fail_next.lock().take() {
            Some(kind) => Err(remote(kind)),
            None => Ok(()),
        }
    }
}

fn remote(kind: ErrorKind) -> ApiError {
    let (message, status) = match kind {
        ErrorKind::NotFound => ("Resource not found", 404),
        ErrorKind::Validation => ("Invalid request", 400),
        ErrorKind::Unauthorized => ("Unauthorized", 401),
        ErrorKind::Forbidden => ("Access denied", 403),
        _ => ("Server error", 500),
    };
    RemoteError::new(kind, message).with_status(status).into()
}

#[async_trait]
impl FileService for InMemoryFileService {
    async fn folder_children(
        &self,
        folder_id: Option<&FolderId>,
    ) -> Result<FolderChildren, ApiError> {
        self.record(format!(
            "children:{}",
            folder_id.map(String::as_str).unwrap_or("")
        ))?;
        let tree = self.tree.lock();
        if let Some(id) = folder_id {
            if !tree.has_folder(id) {
                return Err(remote(ErrorKind::NotFound));
            }
        }
        let parent = folder_id.map(String::as_str);
        Ok(FolderChildren {
            folder_id: folder_id.cloned(),
            folders: tree
                .folders
                .iter()
                .filter(|f| f.parent_id.as_deref() == parent)
                .cloned()
                .collect(),
            files: tree
                .files
                .iter()
                .filter(|f| f.folder_id.as_deref() == parent)
                .cloned()
                .collect(),
        })
    }

    async fn breadcrumb_path(&self, folder_id: &FolderId) -> Result<Vec<BreadcrumbEntry>, ApiError> {
        self.record(format!("breadcrumb:{}", folder_id))?;
        let tree = self.tree.lock();
        let mut chain = Vec::new();
        let mut cursor = Some(folder_id.clone());
        while let Some(id) = cursor {
            let folder = tree
                .folders
                .iter()
                .find(|f| f.id == id)
                .ok_or_else(|| remote(ErrorKind::NotFound))?;
            chain.push((folder.id.clone(), folder.name.clone()));
            cursor = folder.parent_id.clone();
        }
        chain.reverse();
        Ok(chain
            .into_iter()
            .enumerate()
            .map(|(level, (id, name))| BreadcrumbEntry {
                id,
                name,
                level: level as u32,
            })
            .collect())
    }

    async fn delete_items(&self, request: &DeleteItemsRequest) -> Result<(), ApiError> {
        self.record(format!(
            "delete:{}|{}",
            request.folder_ids.join(","),
            request.file_ids.join(",")
        ))?;
        let mut tree = self.tree.lock();
        for id in &request.folder_ids {
            tree.remove_folder(id);
        }
        tree.files.retain(|f| !request.file_ids.contains(&f.id));
        Ok(())
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<(), ApiError> {
        self.record(format!("create:{}", request.name))?;
        let mut tree = self.tree.lock();
        if let Some(parent) = &request.parent_id {
            if !tree.has_folder(parent) {
                return Err(remote(ErrorKind::NotFound));
            }
        }
        let id = tree.allocate_id();
        tree.folders.push(FolderNode {
            id,
            name: request.name.clone(),
            parent_id: request.parent_id.clone(),
            created_on: None,
            modified_on: None,
        });
        Ok(())
    }

    async fn rename_folder(&self, request: &RenameItemRequest) -> Result<(), ApiError> {
        self.record(format!("rename_folder:{}", request.id))?;
        let mut tree = self.tree.lock();
        let folder = tree
            .folders
            .iter_mut()
            .find(|f| f.id == request.id)
            .ok_or_else(|| remote(ErrorKind::NotFound))?;
        folder.name = request.name.clone();
        Ok(())
    }

    async fn rename_file(&self, request: &RenameItemRequest) -> Result<(), ApiError> {
        self.record(format!("rename_file:{}", request.id))?;
        let mut tree = self.tree.lock();
        let file = tree
            .files
            .iter_mut()
            .find(|f| f.id == request.id)
            .ok_or_else(|| remote(ErrorKind::NotFound))?;
        file.name = request.name.clone();
        Ok(())
    }

    async fn upload_files(&self, request: &UploadFilesRequest) -> Result<UploadResponse, ApiError> {
        self.record(format!("upload:{}", request.files.len()))?;
        let mut tree = self.tree.lock();
        let mut uploaded = Vec::new();
        let mut errors = Vec::new();
        for file in &request.files {
            if file.name.to_ascii_lowercase().ends_with(".png") && file.size() > 4 {
                errors.push(format!("{}: File exceeds the size limit", file.name));
                continue;
            }
            let id = tree.allocate_id();
            let node = FileNode {
                id: id.clone(),
                name: file.name.clone(),
                content_type: file.content_type.clone().unwrap_or_default(),
                size_in_bytes: file.size(),
                created_on: None,
                modified_on: None,
                folder_id: request.parent_id.clone(),
            };
            tree.contents.insert(id, file.bytes.clone());
            tree.files.push(node.clone());
            uploaded.push(node);
        }
        Ok(UploadResponse {
            success: Some(errors.is_empty()),
            uploaded_files: Some(uploaded),
            errors: Some(errors),
            message: None,
        })
    }

    async fn file_content(&self, file_id: &ItemId) -> Result<FileContent, ApiError> {
        self.record(format!("content:{}", file_id))?;
        let tree = self.tree.lock();
        let bytes = tree
            .contents
            .get(file_id)
            .cloned()
            .ok_or_else(|| remote(ErrorKind::NotFound))?;
        Ok(FileContent {
            bytes,
            content_type: Some("text/plain".to_string()),
        })
    }
}
