use crate::slides::Slide;
use log::*;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// The last slide set that was fetched successfully, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub timestamp: String,
    pub slides: Vec<Slide>,
}

impl CacheSnapshot {
    /// Stamps `slides` with the current UTC time.
    pub fn now(slides: Vec<Slide>) -> Self {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string());
        Self { timestamp, slides }
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("cache file is not a valid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable storage for a single [`CacheSnapshot`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replaces the stored snapshot. The new content is written next to the target and then
    /// renamed over it, so readers see either the old file or the new one.
    pub fn save(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();

        let write = || -> io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(
            "Saved {} slides to cache at {}",
            snapshot.slides.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Reads the stored snapshot. A missing or unreadable file is reported as `None`.
    pub fn load(&self) -> Option<CacheSnapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No cache file at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str::<CacheSnapshot>(&content) {
            Ok(snapshot) => {
                info!(
                    "Loaded {} slides from cache (timestamp: {})",
                    snapshot.slides.len(),
                    snapshot.timestamp
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Failed to parse cache file {}: {e}", self.path.display());
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::slides::{StandingsRow, StandingsSlide, UnknownSlide};
    use serde_json::json;

    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("sign-common-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub(crate) fn standings(abbreviations: &[&str]) -> Slide {
        Slide::Standings(StandingsSlide {
            division_name: Some("AL West".to_string()),
            teams: abbreviations
                .iter()
                .zip(1..)
                .map(|(abbreviation, rank)| StandingsRow {
                    rank,
                    abbreviation: abbreviation.to_string(),
                    wins: 80 + rank,
                    losses: 82 - rank,
                    colors: None,
                })
                .collect(),
        })
    }

    #[test]
    fn test_round_trip() {
        let dir = scratch_dir("round-trip");
        let store = CacheStore::new(dir.join("standings_cache.json"));
        let snapshot = CacheSnapshot {
            timestamp: "2024-09-14T23:10:00Z".to_string(),
            slides: vec![
                standings(&["HOU", "SEA"]),
                Slide::Unknown(UnknownSlide {
                    slide_type: "weather".to_string(),
                    raw: json!({"slideType": "weather", "tempF": 72}),
                }),
                standings(&["NYY"]),
            ],
        };

        store.save(&snapshot).unwrap();
        assert_eq!(store.load(), Some(snapshot));
    }

    #[test]
    fn test_save_replaces_and_leaves_no_temp_file() {
        let dir = scratch_dir("replace");
        let store = CacheStore::new(dir.join("cache.json"));

        store.save(&CacheSnapshot::now(vec![standings(&["HOU"])])).unwrap();
        let second = CacheSnapshot::now(vec![standings(&["SEA", "TEX"])]);
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().slides, second.slides);
        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("cache.json")]);
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = scratch_dir("parent");
        let store = CacheStore::new(dir.join("nested").join("cache.json"));
        store.save(&CacheSnapshot::now(vec![])).unwrap();
        assert_eq!(store.load().unwrap().slides, vec![]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = scratch_dir("missing");
        assert_eq!(CacheStore::new(dir.join("nope.json")).load(), None);
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("cache.json");
        fs::write(&path, "{\"timestamp\": \"2024-09-14T23:10:00Z\", \"slides\": [").unwrap();
        assert_eq!(CacheStore::new(path).load(), None);
    }

    #[test]
    fn test_save_into_unwritable_location() {
        let dir = scratch_dir("unwritable");
        let blocker = dir.join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let store = CacheStore::new(blocker.join("cache.json"));
        assert!(store.save(&CacheSnapshot::now(vec![])).is_err());
    }

    #[test]
    fn test_snapshot_timestamp_is_rfc3339() {
        let snapshot = CacheSnapshot::now(vec![]);
        assert!(OffsetDateTime::parse(&snapshot.timestamp, &Rfc3339).is_ok());
    }
}
