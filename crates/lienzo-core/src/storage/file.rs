//! File-based storage implementation for native platforms.

use super::{BoxFuture, ProjectRecord, ProjectStore, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as a JSON file in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/lienzo/projects/`
    /// On Windows: `%LOCALAPPDATA%\lienzo\projects\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("lienzo").join("projects"))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        // Keep ids filename-safe
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ProjectStore for FileStorage {
    fn save(&self, id: &str, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        let json = match record.to_json() {
            Ok(j) => j,
            Err(e) => return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) }),
        };

        Box::pin(async move {
            // Write then rename so a crash never leaves a truncated record.
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e))
            })?;
            fs::rename(&tmp, &path).map_err(|e| {
                StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
            })
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectRecord>> {
        let path = self.project_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;

            ProjectRecord::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Geometry, Item, ShapeKind};
    use crate::scene::Scene;
    use crate::storage::block_on;
    use tempfile::tempdir;

    fn record() -> ProjectRecord {
        let mut record = ProjectRecord::empty("Moodboard");
        record.history_present = Scene::new()
            .with(Item::shape("s1", Geometry::new(40.0, 40.0, 100.0, 80.0), ShapeKind::Rectangle).with_z_index(1));
        record
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("project-1", &record())).unwrap();
        let loaded = block_on(storage.load("project-1")).unwrap();

        assert_eq!(loaded, record());
        assert!(!dir.path().join("project-1.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_corrupt_record() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("bad.json"), "{ nope").unwrap();

        let result = block_on(storage.load("bad"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_reads_legacy_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let legacy = r#"{
            "name": "Legacy",
            "history_past": [],
            "history_present": {
                "1700000000000": {
                    "id": "1700000000000", "type": "text", "text": "hi",
                    "left_pos": 5, "top_pos": 6, "width": 150, "height": 50, "zIndex": 3
                }
            },
            "history_future": []
        }"#;
        fs::write(dir.path().join("legacy.json"), legacy).unwrap();

        let loaded = block_on(storage.load("legacy")).unwrap();
        let item = loaded.history_present.get("1700000000000").unwrap();
        assert_eq!(item.content(), Some("hi"));
        assert!((item.geometry.left - 5.0).abs() < f64::EPSILON);
        assert_eq!(item.z_index, 3);
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("p1", &record())).unwrap();
        block_on(storage.save("p2", &record())).unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"p1".to_string()));

        block_on(storage.delete("p1")).unwrap();
        assert!(!block_on(storage.exists("p1")).unwrap());
        assert!(block_on(storage.exists("p2")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("team/board:with*special", &record())).unwrap();
        let loaded = block_on(storage.load("team/board:with*special")).unwrap();
        assert_eq!(loaded.name, "Moodboard");
    }
}
