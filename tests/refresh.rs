use axum::{routing::get, Router};
use nbh_dashboard::server::spawn_refresh;
use nbh_dashboard::{
    Dashboard, DatasetLoader, DatasetSource, LoadError, Palette, SharedDashboard,
};
use std::sync::Arc;
use std::time::Duration;

const FIXTURE: &str = include_str!("fixtures/incidents.csv");

/// Serves the fixture at `/incidents.csv` on an ephemeral port; any other
/// path answers 404.
async fn serve_fixture() -> String {
    let app = Router::new().route("/incidents.csv", get(|| async { FIXTURE }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn loads_dataset_over_http() {
    let base = serve_fixture().await;
    let loader = DatasetLoader::new().unwrap();

    let report = loader
        .load(&DatasetSource::Url(format!("{}/incidents.csv", base)))
        .await
        .unwrap();
    assert_eq!(report.incidents.len(), 16);
    assert_eq!(report.skipped.len(), 2);
}

#[tokio::test]
async fn non_success_status_is_a_load_error() {
    let base = serve_fixture().await;
    let loader = DatasetLoader::new().unwrap();

    let result = loader
        .load(&DatasetSource::Url(format!("{}/gone.csv", base)))
        .await;
    assert!(
        matches!(result, Err(LoadError::Status(404, _))),
        "{result:?}"
    );
}

#[tokio::test]
async fn refresh_swaps_in_new_snapshot() {
    let base = serve_fixture().await;
    let loader = DatasetLoader::new().unwrap();
    let shared = SharedDashboard::new(Dashboard::from_incidents(&[], Palette::default()));
    let before = shared.snapshot().await.generation();

    let snapshot = shared
        .refresh(&loader, &DatasetSource::Url(format!("{}/incidents.csv", base)))
        .await
        .unwrap();
    assert_ne!(snapshot.generation(), before);
    assert_eq!(snapshot.incident_count(), 16);
    assert_eq!(snapshot.skipped_count(), 2);
    assert_eq!(shared.snapshot().await.generation(), snapshot.generation());
}

#[tokio::test]
async fn scheduled_refresh_replaces_snapshot() {
    let base = serve_fixture().await;
    let shared = Arc::new(SharedDashboard::new(Dashboard::from_incidents(
        &[],
        Palette::default(),
    )));
    let before = shared.snapshot().await.generation();

    let handle = spawn_refresh(
        shared.clone(),
        DatasetLoader::new().unwrap(),
        DatasetSource::Url(format!("{}/incidents.csv", base)),
        Duration::from_secs(1),
    );

    let mut refreshed = None;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let current = shared.snapshot().await;
        if current.generation() != before {
            refreshed = Some(current);
            break;
        }
    }
    handle.abort();

    let refreshed = refreshed.expect("snapshot was not refreshed within 5s");
    assert_eq!(refreshed.incident_count(), 16);
}

#[tokio::test]
async fn scheduled_refresh_keeps_snapshot_on_failure() {
    let base = serve_fixture().await;
    let shared = Arc::new(SharedDashboard::new(Dashboard::from_incidents(
        &[],
        Palette::default(),
    )));
    let before = shared.snapshot().await.generation();

    let handle = spawn_refresh(
        shared.clone(),
        DatasetLoader::new().unwrap(),
        DatasetSource::Url(format!("{}/gone.csv", base)),
        Duration::from_secs(1),
    );
    tokio::time::sleep(Duration::from_millis(1500)).await;
    handle.abort();

    assert_eq!(shared.snapshot().await.generation(), before);
    assert_eq!(shared.snapshot().await.incident_count(), 0);
}
