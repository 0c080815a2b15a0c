//! Remote file service: wire types, the service contract and its HTTP client.

pub mod classify;
pub mod contract;
pub mod dto;
pub mod http;

pub use classify::{classify_status, classify_transport};
pub use contract::FileService;
pub use dto::{
    BreadcrumbEntry, CreateFolderRequest, DeleteItemsRequest, FileContent, FileNode,
    FolderChildren, FolderNode, RenameItemRequest, UploadFile, UploadFilesRequest,
    UploadResponse,
};
pub use http::HttpFileService;
