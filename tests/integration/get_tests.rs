use crate::common::{test_config, test_station, RecordingReporter};
use chrono::NaiveDate;
use radio_music_collector::collector::{run_get, GetOptions, StationStatus};
use radio_music_collector::storage::{FileStorage, Storage};
use radio_music_collector::CollectorError;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SONGS: &str = r#"[
    {"rs_track":"Hello","rs_artist":"Adele","rs_time":"12:04"},
    {"rs_track":"","rs_artist":"Station ID"},
    {"rs_track":"Anti-Hero","rs_artist":"Taylor Swift","rs_time":"12:00"}
]"#;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
}

fn options(require_all: bool, write_list: bool) -> GetOptions {
    GetOptions {
        date: date(),
        fetch_delay: Duration::from_millis(50),
        include_unfetchable: false,
        require_all,
        write_list,
    }
}

async fn mount_songs(server: &MockServer, prefix: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/get-song", prefix)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_saves_raw_response() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/nl/get-song"))
        .and(header("user-agent", "TestCollector/1.0"))
        .and(body_string_contains("rid=60"))
        .and(body_string_contains("date=2024-03-07"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SONGS))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![test_station("Joe", &server.uri(), "nl", 60)],
    );
    let storage = FileStorage::new(dir.path());
    let reporter = RecordingReporter::default();

    let report = run_get(&config, &storage, &options(false, false), &reporter)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert!(matches!(
        report.outcomes[0].status,
        StationStatus::Saved { songs: 3, .. }
    ));

    let raw = dir.path().join("Joe/2024/03/07/raw.json");
    assert_eq!(std::fs::read_to_string(raw).unwrap(), SONGS);
    assert!(!dir.path().join("Joe/2024/03/07/list.txt").exists());

    let summaries = reporter.summaries.borrow();
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].contains("| Joe | saved | 3 |"));
}

#[tokio::test]
async fn test_get_writes_list_when_asked() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_songs(&server, "nl", SONGS).await;

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![test_station("Joe", &server.uri(), "nl", 60)],
    );
    let storage = FileStorage::new(dir.path());

    run_get(
        &config,
        &storage,
        &options(false, true),
        &RecordingReporter::default(),
    )
    .await
    .unwrap();

    let list = std::fs::read_to_string(dir.path().join("Joe/2024/03/07/list.txt")).unwrap();
    assert_eq!(list, "Taylor Swift - AntiHero\nAdele - Hello");
}

#[tokio::test]
async fn test_malformed_response_is_station_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_songs(&server, "nl", SONGS).await;
    mount_songs(&server, "pl", r#"{"error":"not an array"}"#).await;

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![
            test_station("Joe", &server.uri(), "nl", 60),
            test_station("Pogoda", &server.uri(), "pl", 184),
        ],
    );
    let storage = FileStorage::new(dir.path());
    let reporter = RecordingReporter::default();

    let report = run_get(&config, &storage, &options(false, false), &reporter)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.outcomes[1].status,
        StationStatus::Failed { .. }
    ));
    assert!(storage.has_raw("Joe", date()));
    assert!(!storage.has_raw("Pogoda", date()));
    assert!(reporter.has_event("warn Request for Pogoda failed"));
}

#[tokio::test]
async fn test_require_all_fails_after_attempting_every_station() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/pl/get-song"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_songs(&server, "nl", SONGS).await;

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![
            test_station("Pogoda", &server.uri(), "pl", 184),
            test_station("Joe", &server.uri(), "nl", 60),
        ],
    );
    let storage = FileStorage::new(dir.path());
    let reporter = RecordingReporter::default();

    let result = run_get(&config, &storage, &options(true, false), &reporter).await;

    assert!(matches!(
        result,
        Err(CollectorError::FetchFailures { failed: 1, total: 2 })
    ));
    // the station after the failure was still fetched
    assert!(storage.has_raw("Joe", date()));
    assert!(reporter.has_event("error Fetch failed"));
}

#[tokio::test]
async fn test_all_stations_failing_fails_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_songs(&server, "nl", "[]").await;

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![test_station("Joe", &server.uri(), "nl", 60)],
    );
    let storage = FileStorage::new(dir.path());

    let result = run_get(
        &config,
        &storage,
        &options(false, false),
        &RecordingReporter::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(CollectorError::FetchFailures { failed: 1, total: 1 })
    ));
}

#[tokio::test]
async fn test_unfetchable_stations_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_songs(&server, "nl", SONGS).await;

    Mock::given(method("POST"))
        .and(path("/off/get-song"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SONGS))
        .expect(0)
        .mount(&server)
        .await;

    let mut off = test_station("Off Air", &server.uri(), "off", 1);
    off.fetchable = false;

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![test_station("Joe", &server.uri(), "nl", 60), off],
    );
    let storage = FileStorage::new(dir.path());

    let report = run_get(
        &config,
        &storage,
        &options(false, false),
        &RecordingReporter::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.total(), 1);
}

#[tokio::test]
async fn test_requests_are_paced() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    for prefix in ["a", "b", "c"] {
        mount_songs(&server, prefix, SONGS).await;
    }

    let config = test_config(
        dir.path().to_str().unwrap(),
        vec![
            test_station("A", &server.uri(), "a", 1),
            test_station("B", &server.uri(), "b", 2),
            test_station("C", &server.uri(), "c", 3),
        ],
    );
    let storage = FileStorage::new(dir.path());

    let started = Instant::now();
    run_get(
        &config,
        &storage,
        &options(false, false),
        &RecordingReporter::default(),
    )
    .await
    .unwrap();

    // two pauses separate three requests
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
