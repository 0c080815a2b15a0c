use std::sync::Arc;

use canopy::error::{ApiError, ErrorKind};
use canopy::notify::{CollectingNotifier, Severity};
use canopy::remote::UploadFile;
use canopy::routing;
use canopy::store::{FetchOutcome, FileManagerStore, SelectionKey};
use canopy::types::ItemKind;

use crate::integration::support::InMemoryFileService;

fn setup() -> (FileManagerStore, Arc<InMemoryFileService>, Arc<CollectingNotifier>) {
    let service = Arc::new(InMemoryFileService::new());
    let notifier = Arc::new(CollectingNotifier::new());
    let store = FileManagerStore::new(service.clone(), notifier.clone());
    (store, service, notifier)
}

fn names(store: &FileManagerStore) -> Vec<String> {
    store
        .snapshot()
        .items()
        .iter()
        .map(|i| i.name.clone())
        .collect()
}

#[tokio::test]
async fn walking_down_and_back_up_follows_the_server_trail() {
    let (store, service, _) = setup();
    let docs = service.seed_folder("Docs", None);
    let reports = service.seed_folder("Reports", Some(&docs));
    service.seed_file("q1.txt", Some(&reports), b"q1");

    assert_eq!(store.navigate_to_folder(None).await, FetchOutcome::Applied);
    let docs_item = store.snapshot().items()[0].clone();
    if let Some(fetch) = store.open_item(&docs_item) {
        assert_eq!(fetch.await, FetchOutcome::Applied);
    }
    store.navigate_to_folder(Some(reports.clone())).await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.path_names(), &["Docs".to_string(), "Reports".to_string()]);
    assert_eq!(snapshot.path(), &[docs.clone(), reports.clone()]);
    assert_eq!(names(&store), vec!["q1.txt"]);
    assert_eq!(routing::route_for(snapshot.path()), format!("/file-manager/{}/{}", docs, reports));

    if let Some(fetch) = store.navigate_up() {
        fetch.await;
    }
    assert_eq!(store.snapshot().current_folder_id(), Some(&docs));
    assert_eq!(names(&store), vec!["Reports"]);
}

#[tokio::test]
async fn route_segments_resolve_to_the_last_folder() {
    let (store, service, _) = setup();
    let docs = service.seed_folder("Docs", None);
    let reports = service.seed_folder("Reports", Some(&docs));

    let route = format!("/file-manager/{}/{}", docs, reports);
    let outcome = store.navigate_to_route(&routing::segments_of(&route)).await;

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(store.snapshot().current_folder_id(), Some(&reports));
    assert_eq!(store.snapshot().breadcrumbs().len(), 2);
}

#[tokio::test]
async fn missing_folder_reports_not_found_and_keeps_the_old_listing() {
    let (store, service, _) = setup();
    service.seed_file("a.txt", None, b"a");
    store.navigate_to_folder(None).await;

    let outcome = store
        .navigate_to_folder(Some("00000000-0000-4000-8000-0000000000ff".to_string()))
        .await;

    assert_eq!(outcome, FetchOutcome::Failed("Resource not found".to_string()));
    let snapshot = store.snapshot();
    assert_eq!(snapshot.error(), Some("Resource not found"));
    assert_eq!(names(&store), vec!["a.txt"]);
    assert!(snapshot.breadcrumbs().is_empty());
}

#[tokio::test]
async fn create_then_rename_then_delete_round_trip() {
    let (store, service, notifier) = setup();
    store.navigate_to_folder(None).await;

    store.create_folder("Drafts", None).await.map(|_| ()).unwrap();
    assert_eq!(names(&store), vec!["Drafts"]);

    let drafts = store.snapshot().items()[0].id.clone();
    store
        .rename_item("Final", drafts.clone(), ItemKind::Folder)
        .await
        .map(|_| ())
        .unwrap();
    assert_eq!(service.folder_names(None), vec!["Final"]);
    assert_eq!(names(&store), vec!["Final"]);

    store.toggle_selection(SelectionKey::folder(drafts.clone()));
    store.delete_selected().await.map(|_| ()).unwrap();
    assert!(names(&store).is_empty());
    assert_eq!(store.snapshot().selection_count(), 0);

    let severities: Vec<Severity> = notifier.drain().iter().map(|n| n.severity).collect();
    assert_eq!(severities, vec![Severity::Success; 3]);
}

#[tokio::test]
async fn failed_create_leaves_state_alone() {
    let (store, service, notifier) = setup();
    store.navigate_to_folder(None).await;
    store.toggle_selection(SelectionKey::file("x1"));
    service.fail_next(ErrorKind::Validation);

    let result = store.create_folder("Dup", None).await;

    assert!(matches!(result, Err(ApiError::Remote(ref e)) if e.kind == ErrorKind::Validation));
    assert_eq!(store.snapshot().selection_count(), 1);
    let received = notifier.drain();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].severity, Severity::Error);
    assert_eq!(received[0].detail.as_deref(), Some("Invalid request"));
    assert!(!store.is_busy());
}

#[tokio::test]
async fn upload_reports_partial_success_and_refreshes() {
    let (store, service, notifier) = setup();
    let docs = service.seed_folder("Docs", None);
    store.navigate_to_folder(Some(docs.clone())).await;

    let report = store
        .upload_files(
            vec![
                UploadFile::new("notes.txt", b"hello".to_vec()),
                UploadFile::new("big.png", vec![0; 16]),
            ],
            Some(docs.clone()),
        )
        .await
        .unwrap();

    let summary = report.upload.unwrap();
    assert_eq!(summary.uploaded, 1);
    assert_eq!(summary.failed, vec!["big.png"]);
    assert_eq!(report.refresh, Some(FetchOutcome::Applied));
    assert_eq!(names(&store), vec!["notes.txt"]);

    let received = notifier.drain();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].severity, Severity::Warn);
    assert_eq!(received[0].detail.as_deref(), Some("big.png"));
    assert_eq!(received[1].severity, Severity::Success);
    assert_eq!(received[1].detail.as_deref(), Some("1 file(s) uploaded"));
}

#[tokio::test]
async fn upload_failure_does_not_refetch() {
    let (store, service, _) = setup();
    store.navigate_to_folder(None).await;
    service.fail_next(ErrorKind::Server);

    let result = store
        .upload_files(vec![UploadFile::new("a.txt", b"a".to_vec())], None)
        .await;

    assert!(result.is_err());
    assert_eq!(service.calls(), vec!["children:", "upload:1"]);
}

#[tokio::test]
async fn snapshots_are_published_to_other_tasks() {
    let (store, service, _) = setup();
    service.seed_file("a.txt", None, b"a");
    let store = Arc::new(store);
    let mut rx = store.subscribe();

    let watcher = tokio::spawn(async move {
        loop {
            if rx.borrow_and_update().total() == 1 {
                return true;
            }
            if rx.changed().await.is_err() {
                return false;
            }
        }
    });

    let background = Arc::clone(&store);
    tokio::spawn(async move { background.navigate_to_folder(None).await })
        .await
        .unwrap();

    assert!(watcher.await.unwrap());
}
