use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    models::store::{CURRENT_VERSION, Store},
    storage::{
        Storage, StorageError,
        migrations::{apply_migrations, detect_version},
    },
};

/// Number of previous store files kept in the `backups` directory
const MAX_BACKUPS: usize = 5;

pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn backup_dir(&self) -> PathBuf {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        parent.join("backups")
    }

    /// Copies the current store file aside. Nothing to do on first save.
    fn create_backup(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }

        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir).map_err(|e| StorageError::BackupFailed {
            path: backup_dir.clone(),
            source: e,
        })?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        // Zero-padded so that name order is age order
        let stamp = jiff::Timestamp::now().as_nanosecond();
        let backup_path = backup_dir.join(format!("{}-{:020}", file_name, stamp));

        fs::copy(&self.path, &backup_path).map_err(|e| StorageError::BackupFailed {
            path: backup_path.clone(),
            source: e,
        })?;
        debug!(path = %backup_path.display(), "store backup written");
        Ok(())
    }

    /// Best effort: a failed cleanup never blocks a save
    fn cleanup_old_backups(&self) {
        let backup_dir = self.backup_dir();
        let Ok(entries) = fs::read_dir(&backup_dir) else {
            return;
        };

        let mut backups: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(MAX_BACKUPS);
        for path in &backups[..excess] {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove old backup");
            }
        }
    }

    fn parse(&self, content: &str) -> Result<Store, StorageError> {
        let parse_failed = |source| StorageError::ParseFailed {
            path: self.path.clone(),
            source,
        };

        let mut data: Value = serde_json::from_str(content).map_err(parse_failed)?;
        let file_version = detect_version(&data)?;

        if file_version > CURRENT_VERSION {
            return Err(StorageError::FutureVersion(file_version));
        }
        if file_version < CURRENT_VERSION {
            data = apply_migrations(data, file_version, CURRENT_VERSION)?;
        }
        if let Some(obj) = data.as_object_mut() {
            obj.insert("version".to_string(), Value::from(CURRENT_VERSION));
        }

        serde_json::from_value(data).map_err(parse_failed)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Store, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let store = self.parse(&content)?;
                debug!(
                    path = %self.path.display(),
                    assignments = store.assignments.len(),
                    classes = store.classes.len(),
                    "store loaded"
                );
                Ok(store)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file yet, starting empty");
                Ok(Store::default())
            }
            Err(e) => Err(StorageError::LoadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(store)
            .map_err(|e| StorageError::SerializeFailed { source: e })?;

        let lock_file_path = self.path.with_extension("lock");
        let lock_failed = |e| StorageError::SaveFailed {
            path: lock_file_path.clone(),
            source: e,
        };
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_file_path)
            .map_err(lock_failed)?;
        lock_file.lock_exclusive().map_err(lock_failed)?;

        self.create_backup()?;
        self.cleanup_old_backups();

        let temp_path = PathBuf::from(format!("{}.tmp.{}", self.path.display(), Uuid::new_v4()));
        let replaced = fs::write(&temp_path, json)
            .map_err(|e| StorageError::SaveFailed {
                path: temp_path.clone(),
                source: e,
            })
            .and_then(|()| {
                fs::rename(&temp_path, &self.path).map_err(|e| StorageError::SaveFailed {
                    path: self.path.clone(),
                    source: e,
                })
            });
        if let Err(e) = replaced {
            if let Err(cleanup) = fs::remove_file(&temp_path)
                && cleanup.kind() != ErrorKind::NotFound
            {
                warn!(path = %temp_path.display(), error = %cleanup, "failed to remove temp file");
            }
            return Err(e);
        }

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        assignment::{Assignment, Priority},
        class_slot::{ClassSlot, Weekday},
    };

    /// Fresh, uniquely named directory under the system temp dir
    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("studydash_{}_{}", name, Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_store() -> Store {
        Store {
            version: CURRENT_VERSION,
            assignments: vec![Assignment {
                id: Uuid::new_v4(),
                number: 1,
                title: String::from("Some Assignment"),
                description: String::from("Chapters 3-4"),
                due_date: "2026-03-05T17:00:00Z".parse().unwrap(),
                priority: Priority::High,
                progress: 40,
                course: Some(String::from("CS101")),
            }],
            classes: vec![ClassSlot {
                id: String::from("Monday-09:00"),
                weekday: Weekday::Monday,
                subject: String::from("Some Class"),
                start_time: "09:00".parse().unwrap(),
                end_time: "10:00".parse().unwrap(),
                professor: None,
                location: Some(String::from("Room 101")),
                color: None,
            }],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = test_dir("save_load");
        let storage = JsonFileStorage::new(dir.join("store.json"));
        let store = sample_store();

        if storage.save(&store).is_err() {
            panic!("Should correctly save the store");
        }
        match storage.load() {
            Ok(loaded) => assert_eq!(loaded, store),
            Err(e) => panic!("Should correctly load the saved store, got {:?}", e),
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_empty_store() {
        let dir = test_dir("missing");
        let storage = JsonFileStorage::new(dir.join("store.json"));

        let store = storage.load().unwrap();
        assert_eq!(store, Store::default());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = test_dir("invalid");
        let path = dir.join("store.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        let result = JsonFileStorage::new(path).load();
        assert!(matches!(result, Err(StorageError::ParseFailed { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_v1_without_version_field() {
        let dir = test_dir("v1");
        let path = dir.join("store.json");
        let old_json = r#"{
            "assignments": [],
            "classes": [
                {
                    "id": "Tuesday-11:00",
                    "subject": "History",
                    "start_time": "11:00",
                    "end_time": "12:00",
                    "professor": null,
                    "location": null,
                    "color": null
                }
            ]
        }"#;
        fs::write(&path, old_json).unwrap();

        let store = JsonFileStorage::new(path).load().unwrap();
        assert_eq!(store.version, CURRENT_VERSION);
        assert_eq!(store.classes[0].weekday, Weekday::Tuesday);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_future_version() {
        let dir = test_dir("future");
        let path = dir.join("store.json");
        fs::write(&path, r#"{"version": 999, "assignments": [], "classes": []}"#).unwrap();

        let result = JsonFileStorage::new(path).load();
        assert!(matches!(result, Err(StorageError::FutureVersion(999))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_backup_creation_and_cleanup() {
        let dir = test_dir("backups");
        let storage = JsonFileStorage::new(dir.join("store.json"));

        for _ in 0..7 {
            storage.save(&Store::default()).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let backup_count = fs::read_dir(dir.join("backups"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .count();
        assert_eq!(backup_count, MAX_BACKUPS, "Should keep exactly 5 backups");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_no_backup_on_first_save() {
        let dir = test_dir("first_save");
        let storage = JsonFileStorage::new(dir.join("store.json"));
        let backups_dir = dir.join("backups");

        storage.save(&Store::default()).unwrap();
        assert!(!backups_dir.exists(), "Backups dir should not exist after first save");

        storage.save(&sample_store()).unwrap();
        assert!(backups_dir.is_dir(), "Backups dir should be created on second save");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = test_dir("failed_save");
        let path = dir.join("store.json");
        let storage = JsonFileStorage::new(path.clone());

        storage.save(&Store::default()).unwrap();
        // A plain file where the backups directory should go
        fs::write(dir.join("backups"), "").unwrap();

        let result = storage.save(&sample_store());
        assert!(matches!(result, Err(StorageError::BackupFailed { .. })));

        let leftovers: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty(), "Found temp files: {:?}", leftovers);
        assert_eq!(storage.load().unwrap(), Store::default());

        fs::remove_dir_all(&dir).unwrap();
    }
}
