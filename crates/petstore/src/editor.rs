//! Editor state for adding or editing a single pet.
//!
//! The form is an immutable value: each [`FormEvent`] produces a new
//! [`PetForm`]. A [`PetEditor`] pairs the form with the record it edits and
//! turns a save into an insert or an update.

use tracing::{debug, info};

use crate::address::Address;
use crate::contract::pet_entry;
use crate::error::{Error, Result};
use crate::pet::{Gender, Pet};
use crate::provider::PetProvider;
use crate::values::{ColumnValue, ContentValues, CursorRow};

/// Columns loaded into the form when editing an existing pet.
pub const EDITOR_PROJECTION: &[&str] = &[
    pet_entry::COLUMN_PET_NAME,
    pet_entry::COLUMN_PET_BREED,
    pet_entry::COLUMN_PET_WEIGHT,
    pet_entry::COLUMN_PET_GENDER,
];

/// A user interaction with the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The name field changed.
    NameChanged(String),
    /// The breed field changed.
    BreedChanged(String),
    /// The weight field changed.
    WeightChanged(String),
    /// A gender option was picked, by label.
    GenderSelected(String),
    /// The gender picker was cleared.
    NothingSelected,
}

/// Raw field contents of the pet form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PetForm {
    /// Name as typed.
    pub name: String,
    /// Breed as typed.
    pub breed: String,
    /// Weight as typed.
    pub weight: String,
    /// Selected gender.
    pub gender: Gender,
}

impl PetForm {
    /// Fill the form from a stored pet.
    #[must_use]
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            breed: pet.breed.clone().unwrap_or_default(),
            weight: pet.weight.map(|w| w.to_string()).unwrap_or_default(),
            gender: pet.gender,
        }
    }

    /// Return the form after `event`.
    #[must_use]
    pub fn apply(self, event: FormEvent) -> Self {
        match event {
            FormEvent::NameChanged(name) => Self { name, ..self },
            FormEvent::BreedChanged(breed) => Self { breed, ..self },
            FormEvent::WeightChanged(weight) => Self { weight, ..self },
            FormEvent::GenderSelected(label) if label.is_empty() => self,
            FormEvent::GenderSelected(label) => Self {
                gender: Gender::from_selection(&label),
                ..self
            },
            FormEvent::NothingSelected => Self {
                gender: Gender::Unknown,
                ..self
            },
        }
    }

    /// Build the write payload for this form.
    ///
    /// Text is trimmed and an empty weight is written as null.
    ///
    /// # Errors
    ///
    /// Returns a validation error on `weight` if it is not a whole number.
    pub fn to_values(&self) -> Result<ContentValues> {
        let breed = self.breed.trim();
        let weight = self.weight.trim();

        let weight = if weight.is_empty() {
            ColumnValue::Null
        } else {
            let parsed: i64 = weight.parse().map_err(|_| {
                Error::validation(
                    pet_entry::COLUMN_PET_WEIGHT,
                    format!("weight must be a whole number, got {weight:?}"),
                )
            })?;
            ColumnValue::Integer(parsed)
        };

        Ok(ContentValues::new()
            .with(pet_entry::COLUMN_PET_NAME, self.name.trim())
            .with(pet_entry::COLUMN_PET_BREED, breed)
            .with(pet_entry::COLUMN_PET_WEIGHT, weight)
            .with(pet_entry::COLUMN_PET_GENDER, self.gender.code()))
    }

    fn from_row(row: &CursorRow<'_>) -> Self {
        Self {
            name: row
                .get_str(pet_entry::COLUMN_PET_NAME)
                .unwrap_or_default()
                .to_string(),
            breed: row
                .get_str(pet_entry::COLUMN_PET_BREED)
                .unwrap_or_default()
                .to_string(),
            weight: row
                .get_i64(pet_entry::COLUMN_PET_WEIGHT)
                .map(|w| w.to_string())
                .unwrap_or_default(),
            gender: row
                .get_i64(pet_entry::COLUMN_PET_GENDER)
                .and_then(Gender::from_code)
                .unwrap_or_default(),
        }
    }
}

/// Whether the editor creates a new pet or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// Adding a pet.
    New,
    /// Editing the pet at this item address.
    Existing(Address),
}

/// Result of [`PetEditor::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new pet was stored at this address.
    Inserted(Address),
    /// The edited pet was updated.
    Updated(usize),
}

/// Form state bound to the record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetEditor {
    mode: EditorMode,
    form: PetForm,
}

impl PetEditor {
    /// Editor for adding a new pet.
    #[must_use]
    pub fn new_pet() -> Self {
        Self {
            mode: EditorMode::New,
            form: PetForm::default(),
        }
    }

    /// Editor for the pet at `address`. Call [`PetEditor::load`] to fill the form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] unless `address` names a single pet.
    pub fn edit(address: Address) -> Result<Self> {
        if !address.is_item() {
            return Err(Error::unsupported("edit", &address));
        }
        Ok(Self {
            mode: EditorMode::Existing(address),
            form: PetForm::default(),
        })
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Current form.
    #[must_use]
    pub fn form(&self) -> &PetForm {
        &self.form
    }

    /// Screen title for the current mode.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::New => "Add a Pet",
            EditorMode::Existing(_) => "Edit Pet",
        }
    }

    /// Return the editor with `event` applied to its form.
    #[must_use]
    pub fn apply(self, event: FormEvent) -> Self {
        Self {
            form: self.form.apply(event),
            ..self
        }
    }

    /// Fill the form from the stored pet.
    ///
    /// The editor is returned unchanged in `New` mode or when no row exists.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the query fails.
    pub fn load(self, provider: &PetProvider) -> Result<Self> {
        let EditorMode::Existing(address) = self.mode.clone() else {
            return Ok(self);
        };

        let cursor = provider.query(&address, Some(EDITOR_PROJECTION))?;
        match cursor.first() {
            Some(row) => {
                let form = PetForm::from_row(&row);
                Ok(Self { form, ..self })
            }
            None => {
                debug!("No pet at {} to load", address);
                Ok(self)
            }
        }
    }

    /// Store the form: insert in `New` mode, update in `Existing` mode.
    ///
    /// After an insert the editor switches to editing the new record.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the form is invalid, [`Error::NotFound`]
    /// if the edited pet no longer exists, or the provider's error.
    pub fn save(&mut self, provider: &mut PetProvider) -> Result<SaveOutcome> {
        let values = self.form.to_values()?;

        match &self.mode {
            EditorMode::New => {
                let collection = provider.collection_address();
                let address = provider.insert(&collection, &values)?;
                info!("Saved new pet at {}", address);
                self.mode = EditorMode::Existing(address.clone());
                Ok(SaveOutcome::Inserted(address))
            }
            EditorMode::Existing(address) => match provider.update(address, &values)? {
                0 => Err(Error::NotFound {
                    address: address.to_string(),
                }),
                rows => Ok(SaveOutcome::Updated(rows)),
            },
        }
    }

    /// Delete the edited pet. Returns 0 in `New` mode.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the delete fails.
    pub fn delete(&self, provider: &mut PetProvider) -> Result<usize> {
        match &self.mode {
            EditorMode::New => Ok(0),
            EditorMode::Existing(address) => provider.delete(address),
        }
    }
}
