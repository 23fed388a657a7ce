use crate::app_dirs::AppDirs;
use crate::error::Result;
use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One persisted entry logging a completed focus interval.
///
/// Serialized through the `csv` crate; the field names are the on-disk
/// header (`date,focus_time`), which must stay stable so files written by
/// prior runs keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: DateTime<Local>,
    pub focus_time: u32,
}

impl SessionRecord {
    pub fn now(focus_minutes: u32) -> Self {
        Self {
            date: Local::now(),
            focus_time: focus_minutes,
        }
    }
}

pub trait HistoryStore {
    /// Loads all persisted records, sorted by date ascending.
    /// A missing file is an empty history, not an error.
    fn load(&self) -> Result<Vec<SessionRecord>>;

    /// Rewrites the whole history file from `records`.
    ///
    /// Append happens in memory; on disk the entire table is rewritten on
    /// every save. That is the compatibility contract with the existing
    /// file format, not an oversight.
    fn save(&self, records: &[SessionRecord]) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::history_path()
            .unwrap_or_else(|| PathBuf::from("benkyo_session_data.csv"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for CsvHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for CsvHistoryStore {
    fn load(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<csv::Result<Vec<SessionRecord>>>()?;

        Ok(records
            .into_iter()
            .sorted_by_key(|record| record.date)
            .collect())
    }

    fn save(&self, records: &[SessionRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record_at(y: i32, m: u32, d: u32, focus_time: u32) -> SessionRecord {
        SessionRecord {
            date: Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            focus_time,
        }
    }

    #[test]
    fn load_missing_file_yields_empty_history() {
        let dir = tempdir().unwrap();
        let store = CsvHistoryStore::with_path(dir.path().join("session_data.csv"));

        assert_eq!(store.load().unwrap(), Vec::new());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = CsvHistoryStore::with_path(dir.path().join("session_data.csv"));

        let saved_at = Local::now();
        let records = vec![SessionRecord::now(25)];
        store.save(&records).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].focus_time, 25);
        let drift = (loaded[0].date - saved_at).num_seconds().abs();
        assert!(drift <= 1, "round-tripped date drifted by {drift}s");
    }

    #[test]
    fn save_writes_two_column_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session_data.csv");
        let store = CsvHistoryStore::with_path(&path);

        store.save(&[record_at(2026, 8, 1, 25)]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("date,focus_time"));
        assert_eq!(lines.clone().count(), 1);
        assert!(lines.next().unwrap().ends_with(",25"));
    }

    #[test]
    fn save_rewrites_the_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session_data.csv");
        let store = CsvHistoryStore::with_path(&path);

        let mut records = vec![record_at(2026, 8, 1, 25)];
        store.save(&records).unwrap();
        records.push(record_at(2026, 8, 2, 40));
        store.save(&records).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        // One header plus one line per record; nothing appended twice.
        assert_eq!(contents.lines().count(), 3);
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("session_data.csv");
        let store = CsvHistoryStore::with_path(&path);

        store.save(&[record_at(2026, 8, 1, 25)]).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn load_sorts_records_by_date_ascending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session_data.csv");
        let store = CsvHistoryStore::with_path(&path);

        let newest = record_at(2026, 8, 20, 30);
        let oldest = record_at(2026, 8, 1, 25);
        let middle = record_at(2026, 8, 10, 45);
        store
            .save(&[newest.clone(), oldest.clone(), middle.clone()])
            .unwrap();

        assert_eq!(store.load().unwrap(), vec![oldest, middle, newest]);
    }

    #[test]
    fn load_malformed_row_is_a_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session_data.csv");
        fs::write(&path, "date,focus_time\nnot-a-date,25\n").unwrap();

        let store = CsvHistoryStore::with_path(&path);
        assert!(matches!(store.load(), Err(Error::Csv(_))));
    }

    #[test]
    fn save_into_unwritable_target_is_an_error() {
        let dir = tempdir().unwrap();
        // A path whose parent is a regular file cannot be created.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let store = CsvHistoryStore::with_path(blocker.join("session_data.csv"));

        assert!(store.save(&[record_at(2026, 8, 1, 25)]).is_err());
    }
}
