//! File-backed storage backend.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a uniquely named
//! temporary file in the same directory which is then renamed over the
//! target, so a crash mid-write leaves the previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{KeyValueStore, StorageError, check_key};

/// Directory of JSON files, one per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `temp` with `write`, then rename it over `target`.
///
/// The temp file is removed if either step fails, including a write that
/// fails after creating a partial file.
fn replace_file<F>(temp: &Path, target: &Path, write: F) -> Result<(), StorageError>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    let result = write(temp)
        .map_err(|e| io_error(temp, e))
        .and_then(|()| std::fs::rename(temp, target).map_err(|e| io_error(target, e)));
    if result.is_err() {
        let _ = std::fs::remove_file(temp);
    }
    result
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(&path, error)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let path = self.path_for(key);
        let temp_path = self
            .dir
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        replace_file(&temp_path, &path, |temp| std::fs::write(temp, value))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&path, error)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path().join("not-yet-created"));
        assert_eq!(store.get("mall_state").unwrap(), None);
    }

    #[test]
    fn test_set_creates_dir_and_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path().join("state"));

        store.set("mall_state", r#"{"favorites":[]}"#).unwrap();
        store.set("mall_state", r#"{"orders":[]}"#).unwrap();

        assert_eq!(
            store.get("mall_state").unwrap().as_deref(),
            Some(r#"{"orders":[]}"#)
        );
        assert!(store.path_for("mall_state").exists());
    }

    #[test]
    fn test_leaves_no_temp_files() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());
        store.set("mall_state", "{}").unwrap();

        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("mall_state.json")]);
    }

    #[test]
    fn test_failed_write_removes_partial_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("mall_state.json");
        std::fs::write(&target, "{}").unwrap();
        let temp_path = temp.path().join(".mall_state.partial.tmp");

        let err = replace_file(&temp_path, &target, |path| {
            std::fs::write(path, "{\"favor")?;
            Err(std::io::Error::other("disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, StorageError::Io { .. }));
        assert!(!temp_path.exists());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = temp.path().join("mall_state.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "").unwrap();
        let temp_path = temp.path().join(".mall_state.rename.tmp");

        assert!(replace_file(&temp_path, &target, |path| std::fs::write(path, "{}")).is_err());
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());
        store.set("mall_state", "{}").unwrap();
        store.remove("mall_state").unwrap();
        store.remove("mall_state").unwrap();
        assert_eq!(store.get("mall_state").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path());
        assert!(matches!(
            store.set("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
