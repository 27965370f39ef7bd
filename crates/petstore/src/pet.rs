//! Typed pet records.
//!
//! The provider speaks in column-keyed payloads and cursors; this module
//! gives callers a typed [`Pet`] and [`Gender`] on top of them.

use serde::{Deserialize, Serialize};

use crate::contract::{self, pet_entry};
use crate::error::{Error, Result};
use crate::values::{ContentValues, CursorRow};

/// Selection label for a male pet.
pub const GENDER_LABEL_MALE: &str = "Male";
/// Selection label for a female pet.
pub const GENDER_LABEL_FEMALE: &str = "Female";
/// Selection label for a pet of unknown gender.
pub const GENDER_LABEL_UNKNOWN: &str = "Unknown";

/// Gender of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Gender not known.
    #[default]
    Unknown,
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Stored integer code.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => pet_entry::GENDER_UNKNOWN,
            Self::Male => pet_entry::GENDER_MALE,
            Self::Female => pet_entry::GENDER_FEMALE,
        }
    }

    /// Decode a stored integer code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            pet_entry::GENDER_UNKNOWN => Some(Self::Unknown),
            pet_entry::GENDER_MALE => Some(Self::Male),
            pet_entry::GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }

    /// Map a selection label from a fixed-option picker.
    ///
    /// Anything other than the male or female label is treated as unknown.
    #[must_use]
    pub fn from_selection(label: &str) -> Self {
        match label {
            GENDER_LABEL_MALE => Self::Male,
            GENDER_LABEL_FEMALE => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Label shown for this gender in a picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => GENDER_LABEL_UNKNOWN,
            Self::Male => GENDER_LABEL_MALE,
            Self::Female => GENDER_LABEL_FEMALE,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl TryFrom<i64> for Gender {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Self::from_code(code).ok_or_else(|| invalid_gender(code))
    }
}

pub(crate) fn invalid_gender(code: i64) -> Error {
    debug_assert!(!contract::is_valid_gender(code));
    Error::validation(
        pet_entry::COLUMN_PET_GENDER,
        format!("pet requires a valid gender (0, 1 or 2), got {code}"),
    )
}

/// Field values for a pet that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPet {
    /// Pet name.
    pub name: String,
    /// Breed, if known.
    pub breed: Option<String>,
    /// Weight, if known.
    pub weight: Option<i64>,
    /// Gender.
    pub gender: Gender,
}

impl NewPet {
    /// Create a pet with the given name, unknown gender and no breed or weight.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the breed.
    #[must_use]
    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    /// Set the weight.
    #[must_use]
    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the gender.
    #[must_use]
    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Payload writing every column.
    #[must_use]
    pub fn to_values(&self) -> ContentValues {
        ContentValues::new()
            .with(pet_entry::COLUMN_PET_NAME, self.name.as_str())
            .with(pet_entry::COLUMN_PET_BREED, self.breed.clone())
            .with(pet_entry::COLUMN_PET_WEIGHT, self.weight)
            .with(pet_entry::COLUMN_PET_GENDER, self.gender.code())
    }
}

/// A stored pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Row id assigned by the store.
    pub id: i64,
    /// Pet name.
    pub name: String,
    /// Breed, if known.
    pub breed: Option<String>,
    /// Weight, if known.
    pub weight: Option<i64>,
    /// Gender.
    pub gender: Gender,
}

impl Pet {
    /// Build a pet from a cursor row projecting every column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if a column was not projected or holds
    /// an unexpected type, and a validation error if the stored gender is not
    /// a defined value.
    pub fn from_row(row: &CursorRow<'_>) -> Result<Self> {
        let id = row.get_i64(pet_entry::ID).ok_or(Error::MissingColumn {
            column: pet_entry::ID,
        })?;
        let name = row
            .get_str(pet_entry::COLUMN_PET_NAME)
            .ok_or(Error::MissingColumn {
                column: pet_entry::COLUMN_PET_NAME,
            })?
            .to_string();
        let gender_code = row
            .get_i64(pet_entry::COLUMN_PET_GENDER)
            .ok_or(Error::MissingColumn {
                column: pet_entry::COLUMN_PET_GENDER,
            })?;

        Ok(Self {
            id,
            name,
            breed: row.get_str(pet_entry::COLUMN_PET_BREED).map(str::to_string),
            weight: row.get_i64(pet_entry::COLUMN_PET_WEIGHT),
            gender: Gender::try_from(gender_code)?,
        })
    }

    /// The field values of this pet, without the id.
    #[must_use]
    pub fn fields(&self) -> NewPet {
        NewPet {
            name: self.name.clone(),
            breed: self.breed.clone(),
            weight: self.weight,
            gender: self.gender,
        }
    }
}
