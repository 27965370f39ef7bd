//! Naming and addressing contract for the pet table.
//!
//! Everything a caller needs to reach the store lives here: the content
//! authority, the collection path, table and column names, MIME types and
//! the gender enumeration values. The module holds no state.

/// Scheme prefix of every address served by the provider.
pub const CONTENT_SCHEME: &str = "content";

/// Default content authority, unique to this store.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";

/// Path appended to the authority to reach the pet collection.
pub const PATH_PETS: &str = "pets";

/// MIME base type for a cursor over many rows.
pub const CURSOR_DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";

/// MIME base type for a cursor over a single row.
pub const CURSOR_ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

/// Table and column names for pet records.
pub mod pet_entry {
    /// Name of the backing table.
    pub const TABLE_NAME: &str = "pets";

    /// Row identifier column, assigned by the store.
    pub const ID: &str = "_id";
    /// Pet name column.
    pub const COLUMN_PET_NAME: &str = "name";
    /// Pet breed column.
    pub const COLUMN_PET_BREED: &str = "breed";
    /// Pet gender column.
    pub const COLUMN_PET_GENDER: &str = "gender";
    /// Pet weight column.
    pub const COLUMN_PET_WEIGHT: &str = "weight";

    /// Gender value for an unknown gender.
    pub const GENDER_UNKNOWN: i64 = 0;
    /// Gender value for a male pet.
    pub const GENDER_MALE: i64 = 1;
    /// Gender value for a female pet.
    pub const GENDER_FEMALE: i64 = 2;

    /// Every column in table order.
    pub const ALL_COLUMNS: &[&str] = &[
        ID,
        COLUMN_PET_NAME,
        COLUMN_PET_BREED,
        COLUMN_PET_GENDER,
        COLUMN_PET_WEIGHT,
    ];

    /// Columns a caller may supply in an insert or update payload.
    pub const WRITABLE_COLUMNS: &[&str] = &[
        COLUMN_PET_NAME,
        COLUMN_PET_BREED,
        COLUMN_PET_GENDER,
        COLUMN_PET_WEIGHT,
    ];

    /// Resolve a column name to its contract constant.
    #[must_use]
    pub fn column(name: &str) -> Option<&'static str> {
        ALL_COLUMNS.iter().copied().find(|column| *column == name)
    }

    /// Resolve a writable column name to its contract constant.
    #[must_use]
    pub fn writable_column(name: &str) -> Option<&'static str> {
        WRITABLE_COLUMNS
            .iter()
            .copied()
            .find(|column| *column == name)
    }
}

/// Base address for everything under `authority`.
#[must_use]
pub fn base_content_uri(authority: &str) -> String {
    format!("{CONTENT_SCHEME}://{authority}")
}

/// Address of the whole pet collection.
#[must_use]
pub fn content_uri(authority: &str) -> String {
    format!("{}/{PATH_PETS}", base_content_uri(authority))
}

/// MIME type of a query over the pet collection.
#[must_use]
pub fn content_list_type(authority: &str) -> String {
    format!("{CURSOR_DIR_BASE_TYPE}/{authority}/{PATH_PETS}")
}

/// MIME type of a query over a single pet.
#[must_use]
pub fn content_item_type(authority: &str) -> String {
    format!("{CURSOR_ITEM_BASE_TYPE}/{authority}/{PATH_PETS}")
}

/// Returns `true` iff `gender` is one of the defined gender values.
#[must_use]
pub fn is_valid_gender(gender: i64) -> bool {
    matches!(
        gender,
        pet_entry::GENDER_UNKNOWN | pet_entry::GENDER_MALE | pet_entry::GENDER_FEMALE
    )
}
