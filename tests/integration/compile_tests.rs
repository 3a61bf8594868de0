use crate::common::{test_station, RecordingReporter};
use chrono::NaiveDate;
use radio_music_collector::compile::{run_compile, CompileOptions, OutputFormat, SongOrder};
use radio_music_collector::date_range::resolve_date_ranges;
use radio_music_collector::station::select_stations;
use radio_music_collector::storage::{FileStorage, Storage};
use radio_music_collector::{CollectorError, DateRangeSet, Station};
use serde_json::Value;
use tempfile::TempDir;

fn stations() -> Vec<Station> {
    vec![
        test_station("Joe", "https://myonlineradio.nl", "joe", 60),
        test_station("Pogoda", "https://myradioonline.pl", "pogoda", 184),
    ]
}

fn dates(input: &str) -> DateRangeSet {
    let now = NaiveDate::from_ymd_opt(2024, 5, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    resolve_date_ranges(input, &now).unwrap()
}

fn store(
    storage: &FileStorage,
    station: &str,
    (y, m, d): (i32, u32, u32),
    songs: &[(&str, &str)],
) {
    let body: Vec<Value> = songs
        .iter()
        .map(|(track, artist)| serde_json::json!({"rs_track": track, "rs_artist": artist}))
        .collect();
    let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    storage
        .write_raw(station, date, &serde_json::to_string(&body).unwrap())
        .unwrap();
}

/// Two days of Joe, stored newest first like the stations report them
fn setup() -> (TempDir, FileStorage) {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    store(
        &storage,
        "Joe",
        (2024, 4, 30),
        &[("Hello", "Adele"), ("Yellow", "Coldplay")],
    );
    store(
        &storage,
        "Joe",
        (2024, 5, 1),
        &[("Hello", "Adele"), ("", "News"), ("Clocks", "Coldplay")],
    );
    store(&storage, "Pogoda", (2024, 5, 1), &[("Hello", "Adele")]);

    (dir, storage)
}

#[test]
fn test_compile_chronological_json() {
    let (dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["Joe"]).unwrap();

    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024-04-30 to 2024-05-01"),
        &CompileOptions::default(),
        &RecordingReporter::default(),
    )
    .unwrap();

    assert_eq!(reports.len(), 1);
    let path = dir.path().join("Joe/2024-04-30 to 2024-05-01.json");
    assert_eq!(reports[0].path, path);

    let body = std::fs::read_to_string(path).unwrap();
    let json: Vec<Value> = serde_json::from_str(&body).unwrap();
    let tracks: Vec<_> = json.iter().map(|s| s["rs_track"].as_str().unwrap()).collect();
    assert_eq!(tracks, vec!["Yellow", "Hello", "Clocks", "Hello"]);
}

#[test]
fn test_compile_frequency_unique_text() {
    let (dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["Joe"]).unwrap();
    let reporter = RecordingReporter::default();

    let options = CompileOptions {
        order: SongOrder::Frequency,
        format: OutputFormat::Text,
        unique: true,
        ..CompileOptions::default()
    };

    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024-04-30 to 2024-05-01"),
        &options,
        &reporter,
    )
    .unwrap();

    let text = std::fs::read_to_string(&reports[0].path).unwrap();
    assert_eq!(text, "Adele - Hello\nColdplay - Yellow\nColdplay - Clocks");
    assert!(reports[0].path.ends_with("2024-04-30 to 2024-05-01.txt"));
    assert!(reporter.has_event("info: highest frequency song Hello by Adele played 2 times"));
    assert!(reporter.has_event("group: compiling for Joe"));
}

#[test]
fn test_compile_reverse_and_limit() {
    let (_dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["Joe"]).unwrap();

    let options = CompileOptions {
        format: OutputFormat::Text,
        reverse: true,
        limit: Some(2),
        ..CompileOptions::default()
    };

    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024-04-30 to 2024-05-01"),
        &options,
        &RecordingReporter::default(),
    )
    .unwrap();

    let text = std::fs::read_to_string(&reports[0].path).unwrap();
    assert_eq!(text, "Adele - Hello\nColdplay - Clocks");
    assert_eq!(reports[0].songs_written, 2);
}

#[test]
fn test_compile_all_stations_skips_missing_days() {
    let (dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["all"]).unwrap();
    let reporter = RecordingReporter::default();

    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024-04-30 to 2024-05-01"),
        &CompileOptions::default(),
        &reporter,
    )
    .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].station, "Pogoda");
    assert_eq!(reports[1].days_loaded, 1);
    assert_eq!(reports[1].days_skipped, 1);
    assert!(dir
        .path()
        .join("Pogoda/2024-04-30 to 2024-05-01.json")
        .is_file());
    assert!(reporter.has_event("warn Missing data for Pogoda"));
    assert!(reporter.summaries.borrow()[0].contains("| Pogoda | 1 | 1 | 1 | - |"));
}

#[test]
fn test_compile_no_missing_fails() {
    let (_dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["Pogoda"]).unwrap();

    let options = CompileOptions {
        require_all_days: true,
        ..CompileOptions::default()
    };

    let result = run_compile(
        &storage,
        &selected,
        &dates("2024-04-30 to 2024-05-01"),
        &options,
        &RecordingReporter::default(),
    );

    assert!(matches!(
        result,
        Err(CollectorError::MissingDay { station, .. }) if station == "Pogoda"
    ));
}

#[test]
fn test_compile_multiple_ranges() {
    let (_dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["Joe"]).unwrap();

    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024-05-01, 2024-04-30"),
        &CompileOptions {
            format: OutputFormat::Text,
            ..CompileOptions::default()
        },
        &RecordingReporter::default(),
    )
    .unwrap();

    let text = std::fs::read_to_string(&reports[0].path).unwrap();
    assert_eq!(
        text,
        "Coldplay - Clocks\nAdele - Hello\nColdplay - Yellow\nAdele - Hello"
    );
}

#[test]
fn test_compile_sanitizes_output_name() {
    let (dir, storage) = setup();
    let stations = stations();
    let selected = select_stations(&stations, &["Joe"]).unwrap();

    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024/04/30"),
        &CompileOptions::default(),
        &RecordingReporter::default(),
    )
    .unwrap();

    assert_eq!(reports[0].path, dir.path().join("Joe/2024-04-30.json"));
    assert_eq!(reports[0].songs_written, 2);
}

#[test]
fn test_unknown_station() {
    let stations = stations();
    let result = select_stations(&stations, &["Radio Nowhere"]);
    assert!(matches!(
        result,
        Err(CollectorError::UnknownStation(name)) if name == "Radio Nowhere"
    ));
}

#[test]
fn test_compile_json_keeps_stored_objects() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    let body = r#"[{"rs_time":"12:00","zz":1.10,"rs_track":"Hello","rs_artist":"Adele","id":7}]"#;
    storage
        .write_raw("Joe", NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), body)
        .unwrap();

    let stations = stations();
    let selected = select_stations(&stations, &["Joe"]).unwrap();
    let reports = run_compile(
        &storage,
        &selected,
        &dates("2024-04-30"),
        &CompileOptions::default(),
        &RecordingReporter::default(),
    )
    .unwrap();

    assert_eq!(std::fs::read_to_string(&reports[0].path).unwrap(), body);
}
