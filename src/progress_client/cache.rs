// Local write-through shadow of remote progress.
//
// One JSON map file under the platform config directory:
// - Linux: ~/.config/era-player/progress.json
// - macOS: ~/Library/Application Support/com.digitalera.era-player/progress.json
// - Windows: C:\Users\<User>\AppData\Roaming\digitalera\era-player\progress.json

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;
use serde_json::Value;

use crate::domain::models::{ProgressKey, ProgressRecord};

#[derive(Clone)]
pub struct ProgressCache {
    cache_path: PathBuf,
    entries: Arc<RwLock<HashMap<String, ProgressRecord>>>,
}

impl Default for ProgressCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCache {
    /// Open the cache at the platform-specific location, loading whatever is
    /// already on disk.
    pub fn new() -> Self {
        let cache_path = if let Some(dirs) = ProjectDirs::from("com", "digitalera", "era-player") {
            dirs.config_dir().join("progress.json")
        } else {
            // Fallback to the working directory if project dirs are unavailable
            PathBuf::from("era_player_progress.json")
        };
        Self::at_path(cache_path)
    }

    /// Open the cache at an explicit path. Tests point this at a temp dir.
    pub fn at_path(cache_path: PathBuf) -> Self {
        let entries = if cache_path.exists() {
            match fs::read_to_string(&cache_path) {
                Ok(data) => parse_entries(&data),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read progress cache, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!(path = ?cache_path, entries = entries.len(), "progress cache initialized");

        ProgressCache {
            cache_path,
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn load(&self, key: &ProgressKey) -> Option<ProgressRecord> {
        match self.entries.read() {
            Ok(guard) => guard.get(&key.cache_key()).cloned(),
            Err(e) => {
                tracing::error!(error = %e, "failed to acquire read lock for progress cache");
                None
            }
        }
    }

    pub fn save(&self, key: &ProgressKey, record: &ProgressRecord) {
        match self.entries.write() {
            Ok(mut guard) => {
                guard.insert(key.cache_key(), record.clone());
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to acquire write lock for progress cache");
            }
        }
    }

    /// Persist the in-memory map to disk as one file.
    fn persist(&self) {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::error!(error = %e, "failed to create progress cache directory");
                    return;
                }
            }
        }

        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!(error = %e, "failed to acquire read lock for progress cache");
                return;
            }
        };

        match serde_json::to_string_pretty(&*entries) {
            Ok(data) => {
                if let Err(e) = fs::write(&self.cache_path, data) {
                    tracing::error!(error = %e, "failed to write progress cache");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize progress cache");
            }
        }
    }
}

/// Parse the cache file entry by entry: one unreadable record drops that
/// lesson only, not everything else stored alongside it.
fn parse_entries(data: &str) -> HashMap<String, ProgressRecord> {
    let raw: HashMap<String, Value> = match serde_json::from_str(data) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse progress cache, starting empty");
            return HashMap::new();
        }
    };

    let mut entries = HashMap::new();
    for (key, value) in raw {
        match serde_json::from_value::<ProgressRecord>(value) {
            Ok(record) => {
                entries.insert(key, record);
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "dropping unreadable progress cache entry");
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ProgressKey {
        ProgressKey::new("u1", "sales-foundations", "intro")
    }

    #[test]
    fn save_then_load_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let record = ProgressRecord::default().with_watched(60);

        ProgressCache::at_path(path.clone()).save(&key(), &record);

        let reopened = ProgressCache::at_path(path);
        assert_eq!(reopened.load(&key()), Some(record));
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ProgressCache::at_path(dir.path().join("progress.json"));
        assert_eq!(cache.load(&key()), None);
    }

    #[test]
    fn unparseable_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json at all {{{").unwrap();

        let cache = ProgressCache::at_path(path);
        assert_eq!(cache.load(&key()), None);
    }

    #[test]
    fn corrupt_entry_is_dropped_without_losing_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(
            &path,
            r#"{
                "lib:prog:u1:sales-foundations:intro": {"watchedPct": 45, "completed": false},
                "lib:prog:u1:sales-foundations:pitch": "garbage"
            }"#,
        )
        .unwrap();

        let cache = ProgressCache::at_path(path);
        assert_eq!(cache.load(&key()).map(|r| r.watched_pct), Some(45));
        assert_eq!(
            cache.load(&ProgressKey::new("u1", "sales-foundations", "pitch")),
            None
        );
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("progress.json");

        ProgressCache::at_path(path.clone()).save(&key(), &ProgressRecord::default());
        assert!(path.exists());
    }

    #[test]
    fn cache_file_uses_wire_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let record = ProgressRecord::default()
            .with_watched(80)
            .with_completed(true, chrono::Utc::now());

        ProgressCache::at_path(path.clone()).save(&key(), &record);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("lib:prog:u1:sales-foundations:intro"));
        assert!(written.contains("watchedPct"));
        assert!(written.contains("completedAt"));
    }
}
