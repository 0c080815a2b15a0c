//! CLI Tooling
//!
//! Command-line front end for the file manager store. Each command runs against
//! one `FileManagerStore` on a runtime owned by the context; notifications the
//! store raises are collected and printed after the command.

use crate::config::{CanopyConfig, ConfigLoader};
use crate::error::ApiError;
use crate::logging::{LogFormat, LogOutput};
use crate::notify::CollectingNotifier;
use crate::remote::{FileService, HttpFileService};
use crate::store::{FetchOutcome, FileManagerStore, SelectionKey};
use crate::tooling::browse::Browser;
use crate::tooling::format::{format_listing_json, format_listing_text, format_notifications};
use crate::types::{FolderId, ItemKind};
use crate::validation::{validate_item_name, UploadCandidates};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Canopy CLI - browse and manage a remote file manager
#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Browse and manage folders and files on a remote file service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the file service API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load configuration and apply the global flags on top of it.
    pub fn resolve_config(&self) -> Result<CanopyConfig, ApiError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(base_url) = &self.base_url {
            config.service.base_url = base_url.clone();
        }
        config.logging = config.logging.with_overrides(
            self.log_level.as_deref(),
            self.log_format,
            self.log_output,
            self.log_file.clone(),
        );
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a folder (the root when no folder id is given)
    Ls {
        folder: Option<FolderId>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a folder
    Mkdir {
        name: String,
        /// Parent folder id (root when omitted)
        #[arg(long)]
        parent: Option<FolderId>,
    },
    /// Rename a folder or file
    Rename {
        id: String,
        name: String,
        /// Item kind (folder or file)
        #[arg(long, default_value = "file")]
        kind: ItemKind,
    },
    /// Delete folders and files in one batch
    Rm {
        /// Folder id to delete (repeatable)
        #[arg(long = "folder")]
        folders: Vec<String>,
        /// File id to delete (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Upload local files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Destination folder id (root when omitted)
        #[arg(long)]
        parent: Option<FolderId>,
    },
    /// Download a file's content
    Download {
        id: String,
        /// Destination path (defaults to the file id in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Browse folders interactively
    Browse { folder: Option<FolderId> },
    /// Print the effective configuration
    Config,
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Ls { .. } => "ls",
        Commands::Mkdir { .. } => "mkdir",
        Commands::Rename { .. } => "rename",
        Commands::Rm { .. } => "rm",
        Commands::Upload { .. } => "upload",
        Commands::Download { .. } => "download",
        Commands::Browse { .. } => "browse",
        Commands::Config => "config",
    }
}

/// CLI context: one store, its notifier, and the runtime commands block on.
pub struct CliContext {
    store: FileManagerStore,
    notifier: Arc<CollectingNotifier>,
    config: CanopyConfig,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    /// Create a context talking to the configured HTTP service.
    pub fn new(config: CanopyConfig) -> Result<Self, ApiError> {
        let service = Arc::new(HttpFileService::new(&config.service)?);
        Self::with_service(service, config)
    }

    /// Create a context over any service implementation.
    pub fn with_service(
        service: Arc<dyn FileService>,
        config: CanopyConfig,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))?;
        let notifier = Arc::new(CollectingNotifier::new());
        let store =
            FileManagerStore::new(service, notifier.clone()).with_view_mode(config.ui.view_mode);
        Ok(Self {
            store,
            notifier,
            config,
            runtime,
        })
    }

    pub fn store(&self) -> &FileManagerStore {
        &self.store
    }

    pub fn config(&self) -> &CanopyConfig {
        &self.config
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Take the notifications raised since the last call, formatted one per line.
    pub(crate) fn drain_notifications(&self) -> String {
        format_notifications(&self.notifier.drain())
    }

    /// Navigate to `folder_id` and wait for the listing.
    pub(crate) fn enter(&self, folder_id: Option<FolderId>) -> Result<(), ApiError> {
        match self.block_on(self.store.navigate_to_folder(folder_id)) {
            FetchOutcome::Failed(message) => Err(ApiError::LoadFailed(message)),
            FetchOutcome::Applied | FetchOutcome::Stale => Ok(()),
        }
    }

    /// Execute a command and return its output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command_name(command), "Executing command");
        self.execute_inner(command).map_err(|e| {
            debug!(command = command_name(command), error = %e, "Command failed");
            let notes = self.drain_notifications();
            if notes.is_empty() {
                e
            } else {
                ApiError::Notified {
                    notes,
                    error: Box::new(e),
                }
            }
        })
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Ls { folder, format } => self.handle_ls(folder.clone(), format),
            Commands::Mkdir { name, parent } => self.handle_mkdir(name, parent.clone()),
            Commands::Rename { id, name, kind } => self.handle_rename(id, name, *kind),
            Commands::Rm {
                folders,
                files,
                force,
            } => self.handle_rm(folders, files, *force),
            Commands::Upload { paths, parent } => self.handle_upload(paths, parent.clone()),
            Commands::Download { id, out } => self.handle_download(id, out.as_deref()),
            Commands::Browse { folder } => Browser::new(self).run(folder.clone()),
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn handle_ls(&self, folder: Option<FolderId>, format: &str) -> Result<String, ApiError> {
        self.enter(folder)?;
        let snapshot = self.store.snapshot();
        match format {
            "json" => format_listing_json(&snapshot).map_err(|e| {
                ApiError::InvalidInput(format!("Failed to serialize listing: {}", e))
            }),
            "text" => Ok(format_listing_text(&snapshot)),
            other => Err(ApiError::InvalidInput(format!(
                "Invalid format: {}. Must be 'text' or 'json'",
                other
            ))),
        }
    }

    /// Notifications from the last operation followed by the refreshed listing.
    fn with_listing(&self) -> String {
        let notes = self.drain_notifications();
        let listing = format_listing_text(&self.store.snapshot());
        if notes.is_empty() {
            listing
        } else {
            format!("{}\n\n{}", notes, listing)
        }
    }

    fn handle_mkdir(&self, name: &str, parent: Option<FolderId>) -> Result<String, ApiError> {
        let name = validate_item_name(name).map_err(ApiError::InvalidInput)?;
        self.enter(parent.clone())?;
        let result = self.block_on(self.store.create_folder(name, parent));
        self.finish(result.map(|_| ()))
    }

    fn handle_rename(&self, id: &str, name: &str, kind: ItemKind) -> Result<String, ApiError> {
        let name = validate_item_name(name).map_err(ApiError::InvalidInput)?;
        let result = self.block_on(self.store.rename_item(name, id.to_string(), kind));
        self.finish(result.map(|_| ()))
    }

    fn handle_rm(&self, folders: &[String], files: &[String], force: bool) -> Result<String, ApiError> {
        if folders.is_empty() && files.is_empty() {
            return Err(ApiError::InvalidInput(
                "Nothing to delete. Pass --folder or --file".to_string(),
            ));
        }
        if !force {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete {} folder(s) and {} file(s)?",
                    folders.len(),
                    files.len()
                ))
                .interact()
                .map_err(|e| ApiError::InvalidInput(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }
        self.store.clear_selection();
        for id in folders {
            self.store.toggle_selection(SelectionKey::folder(id.clone()));
        }
        for id in files {
            self.store.toggle_selection(SelectionKey::file(id.clone()));
        }
        let result = self.block_on(self.store.delete_selected());
        self.finish(result.map(|_| ()))
    }

    /// Apply the upload rules to local paths. Fails when nothing is left to
    /// upload.
    pub(crate) fn screen_paths(&self, paths: &[PathBuf]) -> Result<UploadCandidates, ApiError> {
        let screened = UploadCandidates::screen_paths(paths, &[]);
        if screened.accepted.is_empty() {
            return Err(ApiError::InvalidInput(screened.rejected.join("; ")));
        }
        Ok(screened)
    }

    fn handle_upload(&self, paths: &[PathBuf], parent: Option<FolderId>) -> Result<String, ApiError> {
        let screened = self.screen_paths(paths)?;
        self.enter(parent.clone())?;
        let result = self.block_on(self.store.upload_files(screened.accepted, parent));
        let output = self.finish(result.map(|_| ()))?;
        if screened.rejected.is_empty() {
            Ok(output)
        } else {
            Ok(format!(
                "Skipped:\n  {}\n\n{}",
                screened.rejected.join("\n  "),
                output
            ))
        }
    }

    fn handle_download(&self, id: &str, out: Option<&Path>) -> Result<String, ApiError> {
        let content = self.block_on(self.store.file_content(&id.to_string()))?;
        let out = out.unwrap_or_else(|| Path::new(id));
        std::fs::write(out, &content.bytes)?;
        Ok(format!(
            "Saved {} bytes to {}",
            content.bytes.len(),
            out.display()
        ))
    }

    /// On error the collected notifications travel with the error from `execute`.
    fn finish(&self, result: Result<(), ApiError>) -> Result<String, ApiError> {
        result.map(|()| self.with_listing())
    }
}
