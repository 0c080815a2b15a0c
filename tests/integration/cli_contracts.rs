use std::fs;
use std::sync::Arc;

use canopy::config::CanopyConfig;
use canopy::error::{ApiError, ErrorKind};
use canopy::tooling::cli::{CliContext, Commands};
use canopy::types::ItemKind;
use tempfile::TempDir;

use crate::integration::support::InMemoryFileService;

fn context_with(service: &Arc<InMemoryFileService>) -> CliContext {
    CliContext::with_service(service.clone(), CanopyConfig::default()).unwrap()
}

fn ls_json(cli: &CliContext, folder: Option<String>) -> serde_json::Value {
    let output = cli
        .execute(&Commands::Ls {
            folder,
            format: "json".to_string(),
        })
        .unwrap();
    serde_json::from_str(&output).unwrap()
}

#[test]
fn ls_json_contract_has_required_fields() {
    let service = Arc::new(InMemoryFileService::new());
    let docs = service.seed_folder("Docs", None);
    service.seed_file("a.txt", Some(&docs), b"abc");
    let cli = context_with(&service);

    let parsed = ls_json(&cli, Some(docs.clone()));

    assert_eq!(parsed.get("folderId").and_then(|v| v.as_str()), Some(docs.as_str()));
    assert_eq!(parsed.get("total").and_then(|v| v.as_u64()), Some(1));
    let crumbs = parsed.get("breadcrumbs").and_then(|v| v.as_array()).unwrap();
    assert_eq!(crumbs.len(), 1);
    assert_eq!(crumbs[0].get("name").and_then(|v| v.as_str()), Some("Docs"));
    let items = parsed.get("items").and_then(|v| v.as_array()).unwrap();
    assert_eq!(items[0].get("kind").and_then(|v| v.as_str()), Some("file"));
    assert_eq!(items[0].get("size").and_then(|v| v.as_u64()), Some(3));
    assert!(parsed.get("error").map(|v| v.is_null()).unwrap_or(false));
}

#[test]
fn ls_text_shows_breadcrumbs_and_items() {
    let service = Arc::new(InMemoryFileService::new());
    let docs = service.seed_folder("Docs", None);
    service.seed_folder("Archive", Some(&docs));
    let cli = context_with(&service);

    let output = cli
        .execute(&Commands::Ls {
            folder: Some(docs),
            format: "text".to_string(),
        })
        .unwrap();

    assert!(output.contains("Home / Docs"));
    assert!(output.contains("Archive"));
}

#[test]
fn ls_rejects_unknown_format() {
    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);
    let result = cli.execute(&Commands::Ls {
        folder: None,
        format: "yaml".to_string(),
    });
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn ls_of_missing_folder_fails() {
    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);
    let result = cli.execute(&Commands::Ls {
        folder: Some("00000000-0000-4000-8000-000000000abc".to_string()),
        format: "text".to_string(),
    });
    assert!(matches!(result, Err(ApiError::LoadFailed(ref m)) if m == "Resource not found"));
}

#[test]
fn mkdir_creates_folder_and_prints_refreshed_listing() {
    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);

    let output = cli
        .execute(&Commands::Mkdir {
            name: "  Reports ".to_string(),
            parent: None,
        })
        .unwrap();

    assert_eq!(service.folder_names(None), vec!["Reports"]);
    assert!(output.contains("Folder 'Reports' created"));
    assert!(output.contains("Reports"));
}

#[test]
fn mkdir_rejects_invalid_names_without_calling_the_service() {
    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);

    let result = cli.execute(&Commands::Mkdir {
        name: "a/b".to_string(),
        parent: None,
    });

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert!(service.calls().is_empty());
}

#[test]
fn rename_routes_by_kind() {
    let service = Arc::new(InMemoryFileService::new());
    let file = service.seed_file("old.txt", None, b"x");
    let cli = context_with(&service);

    cli.execute(&Commands::Rename {
        id: file.clone(),
        name: "new.txt".to_string(),
        kind: ItemKind::File,
    })
    .unwrap();

    assert_eq!(service.file_names(None), vec!["new.txt"]);
    assert_eq!(service.calls()[0], format!("rename_file:{}", file));
}

#[test]
fn rm_sends_one_batch_partitioned_by_kind() {
    let service = Arc::new(InMemoryFileService::new());
    let folder = service.seed_folder("Old", None);
    let file = service.seed_file("old.txt", None, b"x");
    let cli = context_with(&service);

    cli.execute(&Commands::Rm {
        folders: vec![folder.clone()],
        files: vec![file.clone()],
        force: true,
    })
    .unwrap();

    assert!(service.folder_names(None).is_empty());
    assert!(service.file_names(None).is_empty());
    assert!(service
        .calls()
        .contains(&format!("delete:{}|{}", folder, file)));
}

#[test]
fn rm_without_ids_is_rejected() {
    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);
    let result = cli.execute(&Commands::Rm {
        folders: vec![],
        files: vec![],
        force: true,
    });
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn failed_rm_reports_the_failure_notification_with_the_error() {
    let service = Arc::new(InMemoryFileService::new());
    let file = service.seed_file("keep.txt", None, b"x");
    let cli = context_with(&service);
    service.fail_next(ErrorKind::Server);

    let result = cli.execute(&Commands::Rm {
        folders: vec![],
        files: vec![file],
        force: true,
    });

    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Could not delete selected items"));
    assert!(message.contains("Server error"));
    assert_eq!(err.kind(), Some(ErrorKind::Server));
    assert!(matches!(err, ApiError::Notified { .. }));
    assert_eq!(service.file_names(None), vec!["keep.txt"]);
}

#[test]
fn upload_skips_locally_rejected_files() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("notes.txt");
    let bad = temp_dir.path().join("tool.exe");
    fs::write(&good, "hello").unwrap();
    fs::write(&bad, "MZ").unwrap();

    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);

    let output = cli
        .execute(&Commands::Upload {
            paths: vec![good, bad],
            parent: None,
        })
        .unwrap();

    assert_eq!(service.file_names(None), vec!["notes.txt"]);
    assert!(output.contains("tool.exe: File type not allowed"));
    assert!(output.contains("1 file(s) uploaded"));
}

#[test]
fn upload_with_only_rejected_files_fails() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("tool.exe");
    fs::write(&bad, "MZ").unwrap();

    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);

    let result = cli.execute(&Commands::Upload {
        paths: vec![bad],
        parent: None,
    });

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert!(service.calls().is_empty());
}

#[test]
fn download_writes_file_content() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("copy.txt");
    let service = Arc::new(InMemoryFileService::new());
    let file = service.seed_file("a.txt", None, b"payload");
    let cli = context_with(&service);

    let output = cli
        .execute(&Commands::Download {
            id: file,
            out: Some(out.clone()),
        })
        .unwrap();

    assert_eq!(fs::read(&out).unwrap(), b"payload");
    assert!(output.contains("Saved 7 bytes"));
}

#[test]
fn config_renders_effective_toml() {
    let service = Arc::new(InMemoryFileService::new());
    let cli = context_with(&service);

    let output = cli.execute(&Commands::Config).unwrap();
    let parsed: toml::Value = toml::from_str(&output).unwrap();

    assert_eq!(
        parsed
            .get("service")
            .and_then(|s| s.get("base_url"))
            .and_then(|v| v.as_str()),
        Some("https://localhost:44396/api")
    );
    assert_eq!(
        parsed
            .get("ui")
            .and_then(|s| s.get("view_mode"))
            .and_then(|v| v.as_str()),
        Some("list")
    );
}
