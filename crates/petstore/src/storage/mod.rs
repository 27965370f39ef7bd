//! Storage layer for petstore.
//!
//! This module provides `SQLite`-based persistent storage for pet records.
//! It executes already-validated payloads; the business rules live in the
//! provider, with the table's `CHECK` constraint as the last line.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params_from_iter, Connection, Row};
use serde::Serialize;
use tracing::{debug, info};

use crate::contract::pet_entry;
use crate::error::{Error, Result};
use crate::values::{ColumnValue, ContentValues, Cursor};

/// Storage engine for pet records.
#[derive(Debug)]
pub struct PetStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl PetStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL lets other processes read while this one writes
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Set how long a statement waits on a lock held by another connection.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` rejects the setting.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a row and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a column outside the writable set,
    /// or an error if the database rejects the row.
    pub fn insert(&self, values: &ContentValues) -> Result<i64> {
        let (columns, params) = split_writable(values)?;
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            pet_entry::TABLE_NAME,
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(params.iter()))?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted pet with id {}", id);
        Ok(id)
    }

    /// Select `columns` from one row (`Some(id)`) or every row, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a column outside the contract,
    /// or an error if the database operation fails.
    pub fn select(&self, columns: &[&str], id: Option<i64>) -> Result<Cursor> {
        let columns: Vec<&'static str> = columns
            .iter()
            .map(|name| {
                pet_entry::column(name).ok_or_else(|| Error::UnknownColumn {
                    column: (*name).to_string(),
                })
            })
            .collect::<Result<_>>()?;
        let columns = if columns.is_empty() {
            pet_entry::ALL_COLUMNS.to_vec()
        } else {
            columns
        };

        let filter = if id.is_some() {
            format!(" WHERE {} = ?1", pet_entry::ID)
        } else {
            String::new()
        };
        let sql = format!(
            "SELECT {} FROM {}{filter} ORDER BY {} ASC",
            columns.join(", "),
            pet_entry::TABLE_NAME,
            pet_entry::ID
        );

        let width = columns.len();
        let read_row = |row: &Row<'_>| {
            (0..width)
                .map(|index| row.get::<_, ColumnValue>(index))
                .collect::<rusqlite::Result<Vec<_>>>()
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match id {
            Some(id) => stmt
                .query_map([id], read_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], read_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };

        Ok(Cursor::new(
            columns.iter().map(ToString::to_string).collect(),
            rows,
        ))
    }

    /// Write `values` to one row (`Some(id)`) or every row.
    ///
    /// Returns the number of rows changed. An empty payload changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a column outside the writable set,
    /// or an error if the database rejects the change.
    pub fn update(&self, values: &ContentValues, id: Option<i64>) -> Result<usize> {
        if values.is_empty() {
            return Ok(0);
        }

        let (columns, mut params) = split_writable(values)?;
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();

        let mut sql = format!(
            "UPDATE {} SET {}",
            pet_entry::TABLE_NAME,
            assignments.join(", ")
        );
        if let Some(id) = id {
            params.push(ColumnValue::Integer(id));
            sql.push_str(&format!(" WHERE {} = ?{}", pet_entry::ID, params.len()));
        }

        let affected = self.conn.execute(&sql, params_from_iter(params.iter()))?;
        debug!("Updated {} pet row(s)", affected);
        Ok(affected)
    }

    /// Delete one row (`Some(id)`) or every row.
    ///
    /// Returns the number of rows deleted; deleting a missing row returns 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: Option<i64>) -> Result<usize> {
        let affected = match id {
            Some(id) => self.conn.execute(
                &format!(
                    "DELETE FROM {} WHERE {} = ?1",
                    pet_entry::TABLE_NAME,
                    pet_entry::ID
                ),
                [id],
            )?,
            None => self
                .conn
                .execute(&format!("DELETE FROM {}", pet_entry::TABLE_NAME), [])?,
        };

        if affected > 0 {
            info!("Deleted {} pet row(s)", affected);
        }
        Ok(affected)
    }

    /// Count stored pets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", pet_entry::TABLE_NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let mut stats = StoreStats {
            total_pets: self.count()?,
            ..StoreStats::default()
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {gender}, COUNT(*) FROM {table} GROUP BY {gender}",
            gender = pet_entry::COLUMN_PET_GENDER,
            table = pet_entry::TABLE_NAME
        ))?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (gender, count) in counts {
            match gender {
                pet_entry::GENDER_MALE => stats.male = count,
                pet_entry::GENDER_FEMALE => stats.female = count,
                _ => stats.unknown += count,
            }
        }

        stats.db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(stats)
    }
}

/// Split a payload into writable column names and their values.
fn split_writable(values: &ContentValues) -> Result<(Vec<&'static str>, Vec<ColumnValue>)> {
    let mut columns = Vec::with_capacity(values.len());
    let mut params = Vec::with_capacity(values.len() + 1);

    for (name, value) in values.iter() {
        let column = pet_entry::writable_column(name).ok_or_else(|| Error::UnknownColumn {
            column: name.to_string(),
        })?;
        columns.push(column);
        params.push(value.clone());
    }

    Ok((columns, params))
}

/// Statistics about the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of pets stored.
    pub total_pets: i64,
    /// Pets of unknown gender.
    pub unknown: i64,
    /// Male pets.
    pub male: i64,
    /// Female pets.
    pub female: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
