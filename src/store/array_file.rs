// Array file module
// A single file holding one serialized list of values

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::StoreError;
use crate::logger;

/// File-backed list of values, rewritten in full on every save
#[derive(Debug, Clone)]
pub struct ArrayFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ArrayFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the array file at `path`, creating it with an empty list if absent.
    ///
    /// An existing file is left untouched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = Self {
            path: path.as_ref().to_path_buf(),
            _marker: PhantomData,
        };

        if !file.path.is_file() {
            if let Some(parent) = file.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            file.save(&[])?;
            logger::log_debug(&format!("Created empty store at {}", file.path.display()));
        }

        Ok(file)
    }

    /// Read the whole list back from disk
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        let content = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Overwrite the file with `items`
    pub fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let content = serde_json::to_vec(items)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mydatabase.db");

        let file: ArrayFile<String> = ArrayFile::open(&path).unwrap();
        assert!(path.is_file());
        assert!(file.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_open_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mydatabase.db");
        fs::write(&path, r#"["5","5we"]"#).unwrap();

        let file: ArrayFile<String> = ArrayFile::open(&path).unwrap();
        assert_eq!(file.load().unwrap(), vec!["5", "5we"]);
    }

    #[test]
    fn test_load_integers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ints.db");
        fs::write(&path, "[5,1234]").unwrap();

        let file: ArrayFile<i64> = ArrayFile::open(&path).unwrap();
        assert_eq!(file.load().unwrap(), vec![5, 1234]);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let file: ArrayFile<String> = ArrayFile::open(dir.path().join("a.db")).unwrap();

        file.save(&["use".to_string(), "no".to_string()]).unwrap();
        file.save(&["second".to_string(), "save".to_string()]).unwrap();
        assert_eq!(file.load().unwrap(), vec!["second", "save"]);
    }

    #[test]
    fn test_save_after_load_extends_list() {
        let dir = tempfile::tempdir().unwrap();
        let file: ArrayFile<String> = ArrayFile::open(dir.path().join("a.db")).unwrap();
        file.save(&["Hello".to_string()]).unwrap();

        let mut items = file.load().unwrap();
        items.push("World".to_string());
        file.save(&items).unwrap();
        assert_eq!(file.load().unwrap(), vec!["Hello", "World"]);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/a.db");

        let file: ArrayFile<String> = ArrayFile::open(&path).unwrap();
        assert!(path.is_file());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.db");
        fs::write(&path, "not json").unwrap();

        let file: ArrayFile<String> = ArrayFile::open(&path).unwrap();
        assert!(matches!(file.load(), Err(StoreError::Corrupt(_))));
    }
}
