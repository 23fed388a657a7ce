use benkyo::history::{CsvHistoryStore, HistoryStore, SessionRecord};
use benkyo::session::{Durations, Session};
use chrono::Local;
use tempfile::tempdir;

// End-to-end persistence flow across simulated process lifetimes: each
// "launch" loads the file into a fresh session, appends, and saves.
#[test]
fn history_survives_across_launches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session_data.csv");

    // First launch: empty history, one session saved.
    let store = CsvHistoryStore::with_path(&path);
    let mut session = Session::new(Durations::new(25, 5), store.load().unwrap());
    assert!(session.log.is_empty());
    store.save(session.record_session()).unwrap();

    // Second launch: prior record is loaded, another is appended, and the
    // whole-file rewrite keeps both.
    let store = CsvHistoryStore::with_path(&path);
    let mut session = Session::new(Durations::new(40, 5), store.load().unwrap());
    assert_eq!(session.log.len(), 1);
    assert_eq!(session.log[0].focus_time, 25);
    store.save(session.record_session()).unwrap();

    // Third launch: both records present, sorted by date ascending.
    let loaded = CsvHistoryStore::with_path(&path).load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].focus_time, 25);
    assert_eq!(loaded[1].focus_time, 40);
    assert!(loaded[0].date <= loaded[1].date);
}

#[test]
fn saved_record_date_is_within_the_same_second() {
    let dir = tempdir().unwrap();
    let store = CsvHistoryStore::with_path(dir.path().join("session_data.csv"));

    let before = Local::now();
    let mut session = Session::new(Durations::new(25, 5), Vec::new());
    store.save(session.record_session()).unwrap();

    let loaded = store.load().unwrap();
    let last = loaded.last().unwrap();
    assert_eq!(last.focus_time, 25);
    assert!((last.date - before).num_seconds().abs() <= 1);
}

#[test]
fn fresh_environment_loads_empty_history() {
    let dir = tempdir().unwrap();
    let store = CsvHistoryStore::with_path(dir.path().join("does_not_exist.csv"));

    let loaded = store.load().unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn on_disk_format_is_two_column_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session_data.csv");
    let store = CsvHistoryStore::with_path(&path);

    store.save(&[SessionRecord::now(25)]).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,focus_time"));

    let row = lines.next().unwrap();
    let (date, focus) = row.rsplit_once(',').unwrap();
    assert_eq!(focus, "25");
    // The date column must parse back as a timestamp.
    assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok());
}

#[test]
fn files_written_by_prior_versions_keep_loading() {
    // A hand-written file in the documented format, rows out of order.
    let dir = tempdir().unwrap();
    let path = dir.path().join("session_data.csv");
    std::fs::write(
        &path,
        "date,focus_time\n\
         2026-08-20T09:00:00+00:00,30\n\
         2026-08-01T09:00:00+00:00,25\n",
    )
    .unwrap();

    let loaded = CsvHistoryStore::with_path(&path).load().unwrap();
    assert_eq!(loaded.len(), 2);
    // Display order is by date ascending regardless of file order.
    assert_eq!(loaded[0].focus_time, 25);
    assert_eq!(loaded[1].focus_time, 30);
}
