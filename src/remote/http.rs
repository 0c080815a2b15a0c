//! HTTP implementation of the file service contract.

use super::classify::{classify_status, classify_transport};
use super::contract::FileService;
use super::dto::{
    BreadcrumbEntry, CreateFolderRequest, DeleteItemsRequest, FileContent, FolderChildren,
    RenameItemRequest, UploadFilesRequest, UploadResponse,
};
use crate::config::ServiceConfig;
use crate::error::{ApiError, ErrorKind, RemoteError};
use crate::types::{FolderId, ItemId};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

fn children_endpoint(folder_id: Option<&FolderId>) -> String {
    format!("/file-manager/{}", folder_id.map(String::as_str).unwrap_or(""))
}

fn breadcrumb_endpoint(folder_id: &FolderId) -> String {
    format!("/file-manager/breadcrumb/{}", folder_id)
}

fn content_endpoint(file_id: &ItemId) -> String {
    format!("/file/{}/content", file_id)
}

const DELETE_ENDPOINT: &str = "/file-manager/batch/delete";
const CREATE_FOLDER_ENDPOINT: &str = "/folder/create";
const RENAME_FOLDER_ENDPOINT: &str = "/folder/rename";
const RENAME_FILE_ENDPOINT: &str = "/file/rename";
const UPLOAD_ENDPOINT: &str = "/file/upload";

/// File service client backed by `reqwest`.
///
/// GET requests are retried `get_retries` times; POST requests are sent once.
pub struct HttpFileService {
    client: reqwest::Client,
    base_url: String,
    get_retries: u32,
}

impl HttpFileService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            get_retries: config.get_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, RemoteError> {
        let response = request.send().await.map_err(|e| {
            let err = classify_transport(&e);
            log_failure(endpoint, &err);
            err
        })?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let err = classify_status(status.as_u16());
            log_failure(endpoint, &err);
            Err(err)
        }
    }

    async fn get(&self, endpoint: &str) -> Result<reqwest::Response, ApiError> {
        let url = self.url(endpoint);
        let mut attempt = 0;
        loop {
            match self.send(self.client.get(&url), endpoint).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.get_retries => {
                    attempt += 1;
                    debug!(endpoint, attempt, error = %err, "Retrying GET");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self.get(endpoint).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| invalid_body(endpoint, e.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let request = self.client.post(self.url(endpoint)).json(body);
        Ok(self.send(request, endpoint).await?)
    }
}

fn log_failure(endpoint: &str, err: &RemoteError) {
    warn!(
        endpoint,
        kind = %err.kind,
        status = ?err.status,
        timestamp = %err.occurred_at.to_rfc3339(),
        "Remote call failed: {}",
        err.message
    );
}

fn invalid_body(endpoint: &str, detail: String) -> ApiError {
    let err = RemoteError::new(ErrorKind::Network, format!("Invalid response body: {}", detail));
    log_failure(endpoint, &err);
    err.into()
}

#[async_trait]
impl FileService for HttpFileService {
    async fn folder_children(
        &self,
        folder_id: Option<&FolderId>,
    ) -> Result<FolderChildren, ApiError> {
        self.get_json(&children_endpoint(folder_id)).await
    }

    async fn breadcrumb_path(&self, folder_id: &FolderId) -> Result<Vec<BreadcrumbEntry>, ApiError> {
        self.get_json(&breadcrumb_endpoint(folder_id)).await
    }

    async fn delete_items(&self, request: &DeleteItemsRequest) -> Result<(), ApiError> {
        self.post_json(DELETE_ENDPOINT, request).await?;
        Ok(())
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<(), ApiError> {
        self.post_json(CREATE_FOLDER_ENDPOINT, request).await?;
        Ok(())
    }

    async fn rename_folder(&self, request: &RenameItemRequest) -> Result<(), ApiError> {
        self.post_json(RENAME_FOLDER_ENDPOINT, request).await?;
        Ok(())
    }

    async fn rename_file(&self, request: &RenameItemRequest) -> Result<(), ApiError> {
        self.post_json(RENAME_FILE_ENDPOINT, request).await?;
        Ok(())
    }

    async fn upload_files(&self, request: &UploadFilesRequest) -> Result<UploadResponse, ApiError> {
        let mut form = Form::new();
        for file in &request.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|e| {
                    ApiError::InvalidInput(format!(
                        "Invalid content type {} for {}: {}",
                        content_type, file.name, e
                    ))
                })?;
            }
            form = form.part("Files", part);
        }
        if let Some(parent_id) = &request.parent_id {
            form = form.text("ParentId", parent_id.clone());
        }

        let request = self.client.post(self.url(UPLOAD_ENDPOINT)).multipart(form);
        let response = self.send(request, UPLOAD_ENDPOINT).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| invalid_body(UPLOAD_ENDPOINT, e.to_string()))?;
        parse_upload_body(&body).map_err(|detail| invalid_body(UPLOAD_ENDPOINT, detail))
    }

    async fn file_content(&self, file_id: &ItemId) -> Result<FileContent, ApiError> {
        let endpoint = content_endpoint(file_id);
        let response = self.get(&endpoint).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| invalid_body(&endpoint, e.to_string()))?;
        Ok(FileContent {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Upload responses may be empty; that reads as "no details".
fn parse_upload_body(body: &[u8]) -> Result<UploadResponse, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UploadResponse::default());
    }
    serde_json::from_slice(body).map_err(|e| e.to_string())
}
