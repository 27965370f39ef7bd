//! Column-keyed payloads and query results.
//!
//! [`ContentValues`] carries the fields of an insert or update, keyed by
//! column name. [`Cursor`] is the row set returned by a query. Both are built
//! on [`ColumnValue`], the three storage classes the pet table uses.

use std::collections::BTreeMap;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A single cell: null, integer or text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    /// SQL `NULL`.
    Null,
    /// A 64-bit integer.
    Integer(i64),
    /// UTF-8 text.
    Text(String),
}

impl ColumnValue {
    /// Check if the value is `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The integer, if this is an integer cell.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The text, if this is a text cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Storage class name, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ColumnValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Self::Integer(value) => ToSqlOutput::Borrowed(ValueRef::Integer(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
        })
    }
}

impl FromSql for ColumnValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::Null),
            ValueRef::Integer(value) => Ok(Self::Integer(value)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|text| Self::Text(text.to_string()))
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            ValueRef::Real(_) | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Field mapping for insert and update payloads.
///
/// Keys are column names. A column that is absent is left alone by an
/// update and defaulted by an insert; a column present with
/// [`ColumnValue::Null`] is written as `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentValues {
    values: BTreeMap<String, ColumnValue>,
}

impl ContentValues {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`, replacing any previous value.
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> &mut Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Set `column` to `NULL`.
    pub fn put_null(&mut self, column: impl Into<String>) -> &mut Self {
        self.values.insert(column.into(), ColumnValue::Null);
        self
    }

    /// Builder form of [`ContentValues::put`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.put(column, value);
        self
    }

    /// The value stored for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.values.get(column)
    }

    /// Check if `column` is present.
    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Remove `column`, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<ColumnValue> {
        self.values.remove(column)
    }

    /// Number of columns present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no columns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(column, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.values.iter().map(|(column, value)| (column.as_str(), value))
    }
}

/// Rows returned by a query, with the projected column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    columns: Vec<String>,
    rows: Vec<Vec<ColumnValue>>,
}

impl Cursor {
    /// Create a cursor over `rows`, each holding one value per column.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<ColumnValue>>) -> Self {
        Self { columns, rows }
    }

    /// Projected column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of `column` in the projection.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the query matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first row, if any.
    #[must_use]
    pub fn first(&self) -> Option<CursorRow<'_>> {
        self.row(0)
    }

    /// The row at `index`, if any.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<CursorRow<'_>> {
        self.rows.get(index).map(|values| CursorRow {
            cursor: self,
            values,
        })
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> impl Iterator<Item = CursorRow<'_>> {
        self.rows.iter().map(move |values| CursorRow {
            cursor: self,
            values,
        })
    }

    /// Render rows as JSON objects keyed by column name.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.rows().map(|row| row.to_json()).collect())
    }
}

/// A borrowed view of one cursor row.
#[derive(Debug, Clone, Copy)]
pub struct CursorRow<'a> {
    cursor: &'a Cursor,
    values: &'a [ColumnValue],
}

impl<'a> CursorRow<'a> {
    /// Value of `column`, or `None` if it was not projected.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a ColumnValue> {
        self.cursor
            .column_index(column)
            .and_then(|index| self.values.get(index))
    }

    /// Text value of `column`; `None` for null, non-text or unprojected.
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(ColumnValue::as_str)
    }

    /// Integer value of `column`; `None` for null, non-integer or unprojected.
    #[must_use]
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(ColumnValue::as_i64)
    }

    /// Values in projection order.
    #[must_use]
    pub fn values(&self) -> &'a [ColumnValue] {
        self.values
    }

    fn to_json(self) -> serde_json::Value {
        let object = self
            .cursor
            .columns
            .iter()
            .zip(self.values)
            .map(|(column, value)| {
                let json = match value {
                    ColumnValue::Null => serde_json::Value::Null,
                    ColumnValue::Integer(value) => serde_json::Value::from(*value),
                    ColumnValue::Text(value) => serde_json::Value::from(value.as_str()),
                };
                (column.clone(), json)
            })
            .collect();
        serde_json::Value::Object(object)
    }
}
