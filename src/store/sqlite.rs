// SQLite storage backend
// One connection per store; the `squirrels` table holds id/name/size

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use super::{parse_id, Squirrel, SquirrelId, SquirrelStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS squirrels (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    size TEXT NOT NULL
)";

/// Squirrel store backed by a SQLite database file
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the `squirrels` table if it does not exist yet
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn row_to_squirrel(row: &Row<'_>) -> rusqlite::Result<Squirrel> {
        Ok(Squirrel {
            id: row.get(0)?,
            name: row.get(1)?,
            size: row.get(2)?,
        })
    }

    /// Map "no row touched" onto `NotFound`
    fn expect_one(changed: usize, id: &str) -> Result<(), StoreError> {
        if changed == 0 {
            Err(StoreError::NotFound(id.to_string()))
        } else {
            Ok(())
        }
    }
}

impl SquirrelStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<Squirrel>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, size FROM squirrels ORDER BY id")?;
        let squirrels = stmt
            .query_map([], Self::row_to_squirrel)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(squirrels)
    }

    fn get_one(&self, id: &str) -> Result<Squirrel, StoreError> {
        let key = parse_id(id)?;
        self.conn
            .query_row(
                "SELECT id, name, size FROM squirrels WHERE id = ?1",
                params![key],
                Self::row_to_squirrel,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(&mut self, name: &str, size: &str) -> Result<SquirrelId, StoreError> {
        self.conn.execute(
            "INSERT INTO squirrels (name, size) VALUES (?1, ?2)",
            params![name, size],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&mut self, id: &str, name: &str, size: &str) -> Result<(), StoreError> {
        let key = parse_id(id)?;
        let changed = self.conn.execute(
            "UPDATE squirrels SET name = ?1, size = ?2 WHERE id = ?3",
            params![name, size, key],
        )?;
        Self::expect_one(changed, id)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let key = parse_id(id)?;
        let changed = self
            .conn
            .execute("DELETE FROM squirrels WHERE id = ?1", params![key])?;
        Self::expect_one(changed, id)
    }
}
