use crate::error::{Result, TrendError};
use crate::trends::{RepositoryRecord, Snapshot};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default number of days a comparison snapshot may be off target
pub const DEFAULT_TOLERANCE_DAYS: u32 = 2;

const SNAPSHOT_PATTERN: &str = r"^data_(\d{4}-\d{2}-\d{2})\.json$";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored snapshot and the date encoded in its file name
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLocator {
    pub path: PathBuf,
    pub captured_on: NaiveDate,
}

/// File name for the snapshot captured on `date` (`data_YYYY-MM-DD.json`)
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("data_{}.json", date.format(DATE_FORMAT))
}

/// The date `days_ago` days before `today`, saturating at the earliest
/// representable date
pub fn target_date(today: NaiveDate, days_ago: u32) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(days_ago as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// Pick the candidate whose capture date is closest to `target`.
///
/// Returns `None` when no candidate lies within `tolerance_days`. On a tie
/// the candidate that comes first wins.
pub fn find_closest_snapshot(
    candidates: &[SnapshotLocator],
    target: NaiveDate,
    tolerance_days: u32,
) -> Option<&SnapshotLocator> {
    let mut closest: Option<(&SnapshotLocator, u64)> = None;

    for candidate in candidates {
        let diff = (target - candidate.captured_on).num_days().unsigned_abs();
        match closest {
            Some((_, best)) if diff >= best => {}
            _ => closest = Some((candidate, diff)),
        }
    }

    closest
        .filter(|(_, diff)| *diff <= tolerance_days as u64)
        .map(|(candidate, _)| candidate)
}

/// Date-keyed snapshot files in a single directory
pub struct SnapshotStore {
    dir: PathBuf,
    pattern: Regex,
}

impl SnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            dir: dir.into(),
            pattern: Regex::new(SNAPSHOT_PATTERN)?,
        })
    }

    /// Path of the snapshot file for a date
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(snapshot_file_name(date))
    }

    /// Extract the capture date from a snapshot file name
    pub fn parse_date(&self, file_name: &str) -> Option<NaiveDate> {
        let captures = self.pattern.captures(file_name)?;
        NaiveDate::parse_from_str(captures.get(1)?.as_str(), DATE_FORMAT).ok()
    }

    /// Write a snapshot, replacing any snapshot from the same day
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(snapshot.captured_on);
        let json = serde_json::to_string_pretty(&snapshot.repositories)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    /// Read a snapshot file; its capture date comes from the file name
    pub fn load(&self, path: &Path) -> Result<Snapshot> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let captured_on = self
            .parse_date(file_name)
            .ok_or_else(|| TrendError::InvalidSnapshotName(path.display().to_string()))?;

        let contents = fs::read_to_string(path)?;
        let repositories: Vec<RepositoryRecord> = serde_json::from_str(&contents)?;

        Ok(Snapshot::new(captured_on, repositories))
    }

    /// List stored snapshots sorted by file name.
    ///
    /// A missing directory yields an empty list. Files that do not follow the
    /// naming convention are skipped.
    pub fn list(&self) -> Result<Vec<SnapshotLocator>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut locators = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            match self.parse_date(&file_name) {
                Some(captured_on) => locators.push(SnapshotLocator { path, captured_on }),
                None => debug!(file = %file_name, "skipping non-snapshot file"),
            }
        }

        locators.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(locators)
    }

    /// Find the stored snapshot closest to `target` within `tolerance_days`,
    /// ignoring the snapshot captured on `exclude` if given
    pub fn find_closest(
        &self,
        target: NaiveDate,
        tolerance_days: u32,
        exclude: Option<NaiveDate>,
    ) -> Result<Option<SnapshotLocator>> {
        let mut locators = self.list()?;
        if let Some(excluded) = exclude {
            locators.retain(|locator| locator.captured_on != excluded);
        }
        Ok(find_closest_snapshot(&locators, target, tolerance_days).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::test_support::record;
    use crate::trends::UNSPECIFIED_LANGUAGE;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn locator(captured_on: NaiveDate) -> SnapshotLocator {
        SnapshotLocator {
            path: PathBuf::from(snapshot_file_name(captured_on)),
            captured_on,
        }
    }

    #[test]
    fn test_snapshot_file_name() {
        assert_eq!(snapshot_file_name(date(2025, 7, 4)), "data_2025-07-04.json");
    }

    #[test]
    fn test_target_date() {
        assert_eq!(target_date(date(2025, 3, 3), 7), date(2025, 2, 24));
    }

    #[test]
    fn test_target_date_saturates() {
        let target = target_date(date(2025, 3, 3), u32::MAX);
        assert_eq!(target, NaiveDate::MIN);

        let candidates = vec![locator(date(2025, 3, 1))];
        assert!(find_closest_snapshot(&candidates, target, DEFAULT_TOLERANCE_DAYS).is_none());
    }

    #[test]
    fn test_find_closest_picks_smallest_difference() {
        let today = date(2025, 8, 1);
        let target = target_date(today, 7);
        let candidates = vec![
            locator(target - Duration::days(9)),
            locator(target + Duration::days(4)),
            locator(target - Duration::days(1)),
        ];

        let found = find_closest_snapshot(&candidates, target, 2).unwrap();
        assert_eq!(found.captured_on, target - Duration::days(1));
    }

    #[test]
    fn test_find_closest_outside_tolerance() {
        let target = date(2025, 8, 1);
        let candidates = vec![
            locator(target - Duration::days(3)),
            locator(target + Duration::days(5)),
        ];

        assert!(find_closest_snapshot(&candidates, target, 2).is_none());
        assert!(find_closest_snapshot(&[], target, 2).is_none());
    }

    #[test]
    fn test_find_closest_tie_keeps_first() {
        let target = date(2025, 8, 10);
        let candidates = vec![
            locator(target - Duration::days(1)),
            locator(target + Duration::days(1)),
        ];

        let found = find_closest_snapshot(&candidates, target, DEFAULT_TOLERANCE_DAYS).unwrap();
        assert_eq!(found.captured_on, date(2025, 8, 9));
    }

    #[test]
    fn test_find_closest_exact_tolerance_boundary() {
        let target = date(2025, 8, 10);
        let candidates = vec![locator(target + Duration::days(2))];

        assert!(find_closest_snapshot(&candidates, target, 2).is_some());
        assert!(find_closest_snapshot(&candidates, target, 1).is_none());
    }

    #[test]
    fn test_parse_date() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path()).unwrap();

        assert_eq!(store.parse_date("data_2025-07-24.json"), Some(date(2025, 7, 24)));
        assert!(store.parse_date("data_2025-13-40.json").is_none());
        assert!(store.parse_date("data_latest.json").is_none());
        assert!(store.parse_date("notes.txt").is_none());
        assert!(store.parse_date("old_data_2025-07-24.json").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("data")).unwrap();

        let snapshot = Snapshot::new(
            date(2025, 7, 24),
            vec![
                record("o/a", 100, 4, "Rust"),
                record("o/b", 50, 0, UNSPECIFIED_LANGUAGE),
            ],
        );

        let path = store.save(&snapshot).unwrap();
        assert!(path.ends_with("data_2025-07-24.json"));

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.captured_on, date(2025, 7, 24));
        assert_eq!(loaded.repositories, snapshot.repositories);
    }

    #[test]
    fn test_load_rejects_unconventional_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path()).unwrap();
        let path = temp_dir.path().join("trending_repos.json");
        fs::write(&path, "[]").unwrap();

        assert!(matches!(
            store.load(&path),
            Err(TrendError::InvalidSnapshotName(_))
        ));
    }

    #[test]
    fn test_load_raw_search_items() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path()).unwrap();
        let path = temp_dir.path().join("data_2025-07-20.json");
        fs::write(
            &path,
            r#"[
                {"full_name": "o/a", "name": "a", "html_url": "https://github.com/o/a",
                 "stargazers_count": 10, "forks_count": 2, "language": "Go"},
                {"full_name": "o/b", "name": "b", "html_url": "https://github.com/o/b",
                 "stargazers_count": 5, "language": null}
            ]"#,
        )
        .unwrap();

        let snapshot = store.load(&path).unwrap();
        assert_eq!(snapshot.repositories.len(), 2);
        assert_eq!(snapshot.repositories[1].forks, 0);
        assert_eq!(snapshot.repositories[1].language, UNSPECIFIED_LANGUAGE);
    }

    #[test]
    fn test_list_skips_unparsable_and_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = SnapshotStore::new(temp_dir.path().join("nope")).unwrap();
        assert!(missing.list().unwrap().is_empty());

        let store = SnapshotStore::new(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("data_2025-07-22.json"), "[]").unwrap();
        fs::write(temp_dir.path().join("data_2025-07-20.json"), "[]").unwrap();
        fs::write(temp_dir.path().join("data_bad.json"), "[]").unwrap();
        fs::write(temp_dir.path().join("README.md"), "").unwrap();
        fs::create_dir(temp_dir.path().join("data_2025-07-21.json")).unwrap();

        let dates: Vec<NaiveDate> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|l| l.captured_on)
            .collect();
        assert_eq!(dates, vec![date(2025, 7, 20), date(2025, 7, 22)]);
    }

    #[test]
    fn test_store_find_closest() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path()).unwrap();
        for name in ["data_2025-07-10.json", "data_2025-07-16.json", "data_2025-07-18.json"] {
            fs::write(temp_dir.path().join(name), "[]").unwrap();
        }

        let found = store.find_closest(date(2025, 7, 17), 2, None).unwrap().unwrap();
        assert_eq!(found.captured_on, date(2025, 7, 16));

        let found = store
            .find_closest(date(2025, 7, 17), 2, Some(date(2025, 7, 16)))
            .unwrap()
            .unwrap();
        assert_eq!(found.captured_on, date(2025, 7, 18));

        assert!(store.find_closest(date(2025, 7, 13), 2, None).unwrap().is_none());
    }
}
