//! Canopy: client and navigation store for a remote file manager
//!
//! The store keeps track of where the user is in a remote folder hierarchy, what
//! they have selected, and what the current folder contains. It talks to the
//! file service through the `FileService` contract and publishes immutable
//! snapshots for the presentation layer.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod remote;
pub mod routing;
pub mod store;
pub mod tooling;
pub mod types;
pub mod validation;
pub mod views;

pub use error::{ApiError, ErrorKind, RemoteError};
pub use store::FileManagerStore;
pub use views::StoreSnapshot;
