//! Atomic JSON file operations.
//!
//! Provides a thin layer for safe access to a single JSON document file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Errors that can occur during atomic JSON operations.
#[derive(Debug)]
pub enum AtomicJsonError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicJsonError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicJsonError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtomicJsonError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicJsonError {}

impl From<std::io::Error> for AtomicJsonError {
    fn from(e: std::io::Error) -> Self {
        AtomicJsonError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicJsonError {
    fn from(e: serde_json::Error) -> Self {
        AtomicJsonError::JsonError(e)
    }
}

/// A handle to a JSON file written atomically.
///
/// - **Atomicity**: writes go to a sibling tmp file that is renamed into place
/// - **Isolation**: an exclusive lock file is held while writing
/// - **Durability**: explicit fsync before rename
#[derive(Debug, Clone)]
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data as pretty JSON, atomically, under the file lock.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write(data)
    }

    /// Moves the current file aside to `<name>.<suffix>` and returns the new path.
    ///
    /// Used to keep an unreadable document instead of overwriting it. An
    /// earlier quarantined copy is never replaced: `-1`, `-2`, ... is
    /// appended until the name is free.
    pub fn quarantine(&self, suffix: &str) -> Result<PathBuf, AtomicJsonError> {
        let file_name = self.file_name()?;
        let parent = self.parent()?;
        let mut target = parent.join(format!("{}.{}", file_name, suffix));
        let mut attempt = 0;
        while target.exists() {
            attempt += 1;
            target = parent.join(format!("{}.{}-{}", file_name, suffix, attempt));
        }
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn write(&self, data: &T) -> Result<(), AtomicJsonError> {
        let json_string = serde_json::to_string_pretty(data)?;

        let tmp_path = self.get_temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json_string.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn parent(&self) -> Result<&Path, AtomicJsonError> {
        self.path.parent().ok_or_else(|| {
            AtomicJsonError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })
    }

    fn file_name(&self) -> Result<String, AtomicJsonError> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AtomicJsonError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Path has no file name",
                ))
            })
    }

    fn get_temp_path(&self) -> Result<PathBuf, AtomicJsonError> {
        let tmp_name = format!(".{}.tmp", self.file_name()?);
        Ok(self.parent()?.join(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicJsonError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("counter.json"));

        let counter = Counter {
            name: "visits".to_string(),
            count: 42,
        };
        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
    }

    #[test]
    fn test_load_missing_and_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        fs::write(&path, "{\"name\": ").unwrap();

        let file = AtomicJsonFile::<Counter>::new(path);
        assert!(matches!(file.load(), Err(AtomicJsonError::JsonError(_))));
    }

    #[test]
    fn test_no_leftovers_after_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        file.save(&Counter {
            name: "visits".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".counter.json.tmp").exists());
        assert!(!temp_dir.path().join("counter.lock").exists());
    }

    #[test]
    fn test_quarantine() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        fs::write(&path, "garbage").unwrap();

        let file = AtomicJsonFile::<Counter>::new(path.clone());
        let moved = file.quarantine("corrupt-test").unwrap();

        assert!(!path.exists());
        assert_eq!(moved, temp_dir.path().join("counter.json.corrupt-test"));
        assert_eq!(fs::read_to_string(moved).unwrap(), "garbage");
    }

    #[test]
    fn test_quarantine_never_replaces_earlier_copy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        fs::write(&path, "first").unwrap();
        let first = file.quarantine("corrupt-test").unwrap();
        fs::write(&path, "second").unwrap();
        let second = file.quarantine("corrupt-test").unwrap();

        assert_ne!(first, second);
        assert_eq!(second, temp_dir.path().join("counter.json.corrupt-test-1"));
        assert_eq!(fs::read_to_string(first).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
    }
}
