// Flat-file storage backend
// Keeps the whole collection as one serialized list of records

use std::path::Path;

use super::{parse_id, ArrayFile, Squirrel, SquirrelId, SquirrelStore, StoreError};

/// Squirrel store persisted as an `ArrayFile<Squirrel>`.
///
/// Records stay in insertion order. New ids are one past the largest id
/// currently stored.
#[derive(Debug, Clone)]
pub struct FileStore {
    file: ArrayFile<Squirrel>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            file: ArrayFile::open(path)?,
        })
    }

    fn position(records: &[Squirrel], id: &str) -> Result<usize, StoreError> {
        let wanted = parse_id(id)?;
        records
            .iter()
            .position(|s| s.id == wanted)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl SquirrelStore for FileStore {
    fn list_all(&self) -> Result<Vec<Squirrel>, StoreError> {
        self.file.load()
    }

    fn get_one(&self, id: &str) -> Result<Squirrel, StoreError> {
        let mut records = self.file.load()?;
        let index = Self::position(&records, id)?;
        Ok(records.swap_remove(index))
    }

    fn create(&mut self, name: &str, size: &str) -> Result<SquirrelId, StoreError> {
        let mut records = self.file.load()?;
        let id = records
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;
        records.push(Squirrel {
            id,
            name: name.to_string(),
            size: size.to_string(),
        });
        self.file.save(&records)?;
        Ok(id)
    }

    fn update(&mut self, id: &str, name: &str, size: &str) -> Result<(), StoreError> {
        let mut records = self.file.load()?;
        let index = Self::position(&records, id)?;
        let record = &mut records[index];
        record.name = name.to_string();
        record.size = size.to_string();
        self.file.save(&records)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let mut records = self.file.load()?;
        let index = Self::position(&records, id)?;
        records.remove(index);
        self.file.save(&records)
    }
}
