//! `SQLite` schema definitions for petstore.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the pets table.
///
/// The `CHECK` on `gender` keeps the enumeration closed even for writers
/// that bypass the provider.
pub const CREATE_PETS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS pets (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    breed TEXT,
    gender INTEGER NOT NULL CHECK (gender IN (0, 1, 2)),
    weight INTEGER
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_PETS_TABLE, CREATE_METADATA_TABLE];
