//! Address-based CRUD facade over the pet store.
//!
//! The provider resolves an [`Address`] to the collection or a single row,
//! validates payloads against the contract before anything is written, and
//! publishes a [`ChangeEvent`] after every mutation that touched a row.
//!
//! Absence is not failure: querying, updating or deleting a missing item
//! yields an empty cursor or zero rows rather than an error.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::address::{Address, Target};
use crate::config::Config;
use crate::contract::{self, pet_entry};
use crate::error::{Error, Result};
use crate::pet::{invalid_gender, Pet};
use crate::storage::{PetStore, StoreStats};
use crate::values::{ColumnValue, ContentValues, Cursor};

/// Default number of change events buffered per subscriber.
pub const DEFAULT_CHANGE_CAPACITY: usize = 64;

/// Kind of mutation reported by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A row was inserted.
    Inserted,
    /// One or more rows were updated.
    Updated,
    /// One or more rows were deleted.
    Deleted,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inserted => write!(f, "inserted"),
            Self::Updated => write!(f, "updated"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Notification that data behind an address changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    /// Address whose data changed. For inserts this is the new item.
    pub address: Address,
    /// What happened.
    pub kind: ChangeKind,
    /// Number of rows affected.
    pub rows: usize,
}

/// CRUD facade dispatching addresses to the store.
#[derive(Debug)]
pub struct PetProvider {
    store: PetStore,
    authority: String,
    changes: broadcast::Sender<ChangeEvent>,
}

impl PetProvider {
    /// Create a provider serving `authority` on top of `store`.
    #[must_use]
    pub fn new(store: PetStore, authority: impl Into<String>) -> Self {
        Self::with_change_capacity(store, authority, DEFAULT_CHANGE_CAPACITY)
    }

    /// Create a provider with a custom change-event buffer size.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_change_capacity(
        store: PetStore,
        authority: impl Into<String>,
        capacity: usize,
    ) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            store,
            authority: authority.into(),
            changes,
        }
    }

    /// Open the store described by `config` and serve its authority.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or configured.
    pub fn open(config: &Config) -> Result<Self> {
        let store = PetStore::open(config.database_path())?;
        store.set_busy_timeout(config.busy_timeout())?;
        Ok(Self::with_change_capacity(
            store,
            config.provider.authority.clone(),
            config.provider.change_capacity,
        ))
    }

    /// Create a provider over an in-memory store, for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(
            PetStore::open_in_memory()?,
            contract::CONTENT_AUTHORITY,
        ))
    }

    /// The authority this provider serves.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Address of the pet collection served by this provider.
    #[must_use]
    pub fn collection_address(&self) -> Address {
        Address::collection(self.authority.clone())
    }

    /// Address of one pet served by this provider.
    #[must_use]
    pub fn item_address(&self, id: i64) -> Address {
        Address::item(self.authority.clone(), id)
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &PetStore {
        &self.store
    }

    /// Subscribe to change events published after successful mutations.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// MIME type of the data behind `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAddress`] if the address belongs to another authority.
    pub fn get_type(&self, address: &Address) -> Result<String> {
        self.resolve(address)?;
        Ok(address.mime_type())
    }

    /// Insert a pet into the collection and return the new item's address.
    ///
    /// `name` and `gender` are required; `breed` and `weight` default to null.
    ///
    /// # Errors
    ///
    /// Returns a validation error, with nothing written, if the payload breaks
    /// the contract; [`Error::UnsupportedOperation`] for an item address; or
    /// the store's error if the write fails.
    pub fn insert(&mut self, address: &Address, values: &ContentValues) -> Result<Address> {
        match self.resolve(address)? {
            Target::Collection => {}
            Target::Item(_) => return Err(Error::unsupported("insert", address)),
        }

        let values = normalize(values, true)?;
        let id = self.store.insert(&values)?;
        let inserted = address.with_id(id);

        info!("Inserted pet at {}", inserted);
        self.notify(inserted.clone(), ChangeKind::Inserted, 1);
        Ok(inserted)
    }

    /// Query rows behind `address`.
    ///
    /// `projection` lists the columns to return; `None` returns every column
    /// in table order. An item address returns at most one row, and a missing
    /// item returns an empty cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a projected column outside the
    /// contract, [`Error::UnknownAddress`] for a foreign authority, or the
    /// store's error if the read fails.
    pub fn query(&self, address: &Address, projection: Option<&[&str]>) -> Result<Cursor> {
        let id = match self.resolve(address)? {
            Target::Collection => None,
            Target::Item(id) => Some(id),
        };
        let columns = projection.unwrap_or(pet_entry::ALL_COLUMNS);

        let cursor = self.store.select(columns, id)?;
        debug!("Query on {} returned {} row(s)", address, cursor.len());
        Ok(cursor)
    }

    /// Load the pet behind an item address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] for the collection address, or
    /// any error [`PetProvider::query`] returns.
    pub fn get(&self, address: &Address) -> Result<Option<Pet>> {
        if !address.is_item() {
            return Err(Error::unsupported("get", address));
        }
        let cursor = self.query(address, None)?;
        cursor.first().map(|row| Pet::from_row(&row)).transpose()
    }

    /// Update rows behind `address` with the columns present in `values`.
    ///
    /// The collection address updates every row. Returns the number of rows
    /// changed; an empty payload or a missing item returns 0.
    ///
    /// # Errors
    ///
    /// Returns a validation error, with nothing written, if a present column
    /// breaks the contract, or the store's error if the write fails.
    pub fn update(&mut self, address: &Address, values: &ContentValues) -> Result<usize> {
        let id = match self.resolve(address)? {
            Target::Collection => None,
            Target::Item(id) => Some(id),
        };

        let values = normalize(values, false)?;
        if values.is_empty() {
            return Ok(0);
        }

        let rows = self.store.update(&values, id)?;
        if rows > 0 {
            self.notify(address.clone(), ChangeKind::Updated, rows);
        }
        Ok(rows)
    }

    /// Delete rows behind `address`.
    ///
    /// The collection address deletes every row. Deleting a missing item is
    /// a no-op returning 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAddress`] for a foreign authority, or the
    /// store's error if the write fails.
    pub fn delete(&mut self, address: &Address) -> Result<usize> {
        let id = match self.resolve(address)? {
            Target::Collection => None,
            Target::Item(id) => Some(id),
        };

        let rows = self.store.delete(id)?;
        if rows > 0 {
            self.notify(address.clone(), ChangeKind::Deleted, rows);
        }
        Ok(rows)
    }

    /// Store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    fn resolve(&self, address: &Address) -> Result<Target> {
        if address.authority() != self.authority {
            warn!(
                "Rejected address {} (provider serves {})",
                address, self.authority
            );
            return Err(Error::unknown_address(address.to_string()));
        }
        Ok(address.target())
    }

    fn notify(&self, address: Address, kind: ChangeKind, rows: usize) {
        // No subscribers is fine
        let _ = self.changes.send(ChangeEvent {
            address,
            kind,
            rows,
        });
    }
}

/// Validate a payload and return a trimmed copy.
///
/// With `require_all`, `name` and `gender` must be present.
fn normalize(values: &ContentValues, require_all: bool) -> Result<ContentValues> {
    let mut normalized = ContentValues::new();

    for (name, value) in values.iter() {
        let column = pet_entry::writable_column(name).ok_or_else(|| Error::UnknownColumn {
            column: name.to_string(),
        })?;
        let value = match column {
            pet_entry::COLUMN_PET_NAME => match value {
                ColumnValue::Text(text) => ColumnValue::from(text.trim()),
                ColumnValue::Null => {
                    return Err(Error::validation(column, "pet requires a name"))
                }
                ColumnValue::Integer(_) => return Err(type_mismatch(column, "text", value)),
            },
            pet_entry::COLUMN_PET_BREED => match value {
                ColumnValue::Text(text) => ColumnValue::from(text.trim()),
                ColumnValue::Null => ColumnValue::Null,
                ColumnValue::Integer(_) => return Err(type_mismatch(column, "text", value)),
            },
            pet_entry::COLUMN_PET_WEIGHT => match value {
                ColumnValue::Integer(_) | ColumnValue::Null => value.clone(),
                ColumnValue::Text(_) => return Err(type_mismatch(column, "integer", value)),
            },
            pet_entry::COLUMN_PET_GENDER => match value {
                ColumnValue::Integer(code) if contract::is_valid_gender(*code) => value.clone(),
                ColumnValue::Integer(code) => return Err(invalid_gender(*code)),
                ColumnValue::Null | ColumnValue::Text(_) => {
                    return Err(Error::validation(column, "pet requires a valid gender"))
                }
            },
            _ => return Err(Error::internal(format!("unhandled column `{column}`"))),
        };
        normalized.put(column, value);
    }

    if require_all {
        for column in [pet_entry::COLUMN_PET_NAME, pet_entry::COLUMN_PET_GENDER] {
            if !normalized.contains_key(column) {
                return Err(Error::MissingColumn { column });
            }
        }
    }

    Ok(normalized)
}

fn type_mismatch(column: &'static str, expected: &str, value: &ColumnValue) -> Error {
    Error::validation(
        column,
        format!("expected {expected}, got {}", value.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::{Gender, NewPet};

    fn provider() -> PetProvider {
        PetProvider::open_in_memory().expect("failed to create provider")
    }

    fn rex() -> ContentValues {
        NewPet::new("Rex")
            .breed("Lab")
            .weight(20)
            .gender(Gender::Male)
            .to_values()
    }

    #[test]
    fn test_get_type() {
        let provider = provider();
        assert_eq!(
            provider.get_type(&provider.collection_address()).unwrap(),
            "vnd.android.cursor.dir/com.example.android.pets/pets"
        );
        assert_eq!(
            provider.get_type(&provider.item_address(1)).unwrap(),
            "vnd.android.cursor.item/com.example.android.pets/pets"
        );
    }

    #[test]
    fn test_foreign_authority_rejected() {
        let mut provider = provider();
        let foreign = Address::collection("org.example.other");

        assert!(matches!(
            provider.query(&foreign, None),
            Err(Error::UnknownAddress { .. })
        ));
        assert!(matches!(
            provider.insert(&foreign, &rex()),
            Err(Error::UnknownAddress { .. })
        ));
        assert!(provider.get_type(&foreign).is_err());
    }

    #[test]
    fn test_insert_returns_item_address() {
        let mut provider = provider();
        let address = provider.insert(&provider.collection_address(), &rex()).unwrap();

        assert!(address.is_item());
        assert!(address
            .to_string()
            .starts_with("content://com.example.android.pets/pets/"));
    }

    #[test]
    fn test_insert_into_item_address_unsupported() {
        let mut provider = provider();
        let err = provider.insert(&provider.item_address(1), &rex()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { operation: "insert", .. }));
    }

    #[test]
    fn test_insert_invalid_gender() {
        let mut provider = provider();
        let err = provider
            .insert(&provider.collection_address(), &rex().with("gender", 3))
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("gender"));
        assert_eq!(provider.store().count().unwrap(), 0);
    }

    #[test]
    fn test_insert_gender_wrong_type() {
        let mut provider = provider();
        for gender in [ColumnValue::Null, ColumnValue::from("male")] {
            let err = provider
                .insert(&provider.collection_address(), &rex().with("gender", gender))
                .unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_insert_requires_name_and_gender() {
        let mut provider = provider();
        let collection = provider.collection_address();

        let mut values = rex();
        values.remove("name");
        assert!(matches!(
            provider.insert(&collection, &values),
            Err(Error::MissingColumn { column: "name" })
        ));

        let mut values = rex();
        values.remove("gender");
        assert!(matches!(
            provider.insert(&collection, &values),
            Err(Error::MissingColumn { column: "gender" })
        ));
    }

    #[test]
    fn test_insert_null_name_rejected() {
        let mut provider = provider();
        let err = provider
            .insert(
                &provider.collection_address(),
                &rex().with("name", None::<String>),
            )
            .unwrap_err();
        assert!(err.to_string().contains("requires a name"));
    }

    #[test]
    fn test_insert_empty_name_accepted() {
        let mut provider = provider();
        let address = provider
            .insert(&provider.collection_address(), &rex().with("name", "   "))
            .unwrap();
        let pet = provider.get(&address).unwrap().unwrap();
        assert_eq!(pet.name, "");
    }

    #[test]
    fn test_insert_rejects_id_column() {
        let mut provider = provider();
        let err = provider
            .insert(&provider.collection_address(), &rex().with("_id", 7))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { column } if column == "_id"));
    }

    #[test]
    fn test_insert_weight_type_checked() {
        let mut provider = provider();
        let err = provider
            .insert(&provider.collection_address(), &rex().with("weight", "heavy"))
            .unwrap_err();
        assert!(err.to_string().contains("expected integer, got text"));
    }

    #[test]
    fn test_insert_trims_text() {
        let mut provider = provider();
        let address = provider
            .insert(
                &provider.collection_address(),
                &rex().with("name", "  Rex ").with("breed", " Lab\t"),
            )
            .unwrap();
        let pet = provider.get(&address).unwrap().unwrap();
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.breed.as_deref(), Some("Lab"));
    }

    #[test]
    fn test_query_projection() {
        let mut provider = provider();
        let address = provider.insert(&provider.collection_address(), &rex()).unwrap();

        let cursor = provider.query(&address, Some(&["name", "gender"])).unwrap();
        assert_eq!(cursor.columns().len(), 2);
        let row = cursor.first().unwrap();
        assert_eq!(row.get_str("name"), Some("Rex"));
        assert_eq!(row.get_i64("gender"), Some(1));
        assert!(row.get("breed").is_none());
    }

    #[test]
    fn test_query_collection() {
        let mut provider = provider();
        let collection = provider.collection_address();
        provider.insert(&collection, &rex()).unwrap();
        provider.insert(&collection, &rex().with("name", "Tom")).unwrap();

        assert_eq!(provider.query(&collection, None).unwrap().len(), 2);
    }

    #[test]
    fn test_query_missing_item_is_empty() {
        let provider = provider();
        let cursor = provider.query(&provider.item_address(404), None).unwrap();
        assert!(cursor.is_empty());
        assert!(provider.get(&provider.item_address(404)).unwrap().is_none());
    }

    #[test]
    fn test_get_requires_item_address() {
        let provider = provider();
        let err = provider.get(&provider.collection_address()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { operation: "get", .. }));
    }

    #[test]
    fn test_update_partial() {
        let mut provider = provider();
        let address = provider.insert(&provider.collection_address(), &rex()).unwrap();

        let rows = provider
            .update(&address, &ContentValues::new().with("weight", 25))
            .unwrap();
        assert_eq!(rows, 1);

        let pet = provider.get(&address).unwrap().unwrap();
        assert_eq!(pet.weight, Some(25));
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.gender, Gender::Male);
    }

    #[test]
    fn test_update_invalid_gender_leaves_row() {
        let mut provider = provider();
        let address = provider.insert(&provider.collection_address(), &rex()).unwrap();

        let err = provider
            .update(
                &address,
                &ContentValues::new().with("name", "Max").with("gender", 7),
            )
            .unwrap_err();
        assert!(err.is_validation());

        let pet = provider.get(&address).unwrap().unwrap();
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.gender, Gender::Male);
    }

    #[test]
    fn test_update_empty_payload() {
        let mut provider = provider();
        let address = provider.insert(&provider.collection_address(), &rex()).unwrap();
        assert_eq!(provider.update(&address, &ContentValues::new()).unwrap(), 0);
    }

    #[test]
    fn test_update_missing_item() {
        let mut provider = provider();
        let rows = provider
            .update(&provider.item_address(77), &ContentValues::new().with("name", "X"))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_update_collection() {
        let mut provider = provider();
        let collection = provider.collection_address();
        provider.insert(&collection, &rex()).unwrap();
        provider.insert(&collection, &rex()).unwrap();

        let rows = provider
            .update(&collection, &ContentValues::new().with("breed", None::<String>))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_delete_item_and_missing() {
        let mut provider = provider();
        let address = provider.insert(&provider.collection_address(), &rex()).unwrap();

        assert_eq!(provider.delete(&address).unwrap(), 1);
        assert_eq!(provider.delete(&address).unwrap(), 0);
        assert!(provider.query(&address, None).unwrap().is_empty());
    }

    #[test]
    fn test_delete_collection() {
        let mut provider = provider();
        let collection = provider.collection_address();
        provider.insert(&collection, &rex()).unwrap();
        provider.insert(&collection, &rex()).unwrap();

        assert_eq!(provider.delete(&collection).unwrap(), 2);
        assert_eq!(provider.stats().unwrap().total_pets, 0);
    }

    #[test]
    fn test_change_events() {
        let mut provider = provider();
        let mut changes = provider.subscribe();
        let collection = provider.collection_address();

        let address = provider.insert(&collection, &rex()).unwrap();
        provider
            .update(&address, &ContentValues::new().with("weight", 1))
            .unwrap();
        provider.delete(&address).unwrap();

        let inserted = changes.try_recv().unwrap();
        assert_eq!(inserted.kind, ChangeKind::Inserted);
        assert_eq!(inserted.address, address);
        assert_eq!(inserted.rows, 1);

        assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Updated);
        assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Deleted);
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_no_event_when_nothing_changed() {
        let mut provider = provider();
        let mut changes = provider.subscribe();

        provider.delete(&provider.item_address(5)).unwrap();
        let _ = provider.insert(&provider.collection_address(), &rex().with("gender", 9));

        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_normalize_update_allows_partial() {
        let values = normalize(&ContentValues::new().with("breed", " Pug "), false).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("breed"), Some(&ColumnValue::from("Pug")));
    }

    #[test]
    fn test_change_kind_display() {
        assert_eq!(ChangeKind::Inserted.to_string(), "inserted");
        assert_eq!(ChangeKind::Updated.to_string(), "updated");
        assert_eq!(ChangeKind::Deleted.to_string(), "deleted");
    }
}
