//! `petstore` - A local pet record store addressed by content URIs
//!
//! This library provides the record contract, validation and a CRUD facade
//! over an SQLite-backed store of pets, plus editor state for adding and
//! editing a single pet.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod address;
pub mod cli;
pub mod config;
pub mod contract;
pub mod editor;
pub mod error;
pub mod handle;
pub mod logging;
pub mod pet;
pub mod provider;
pub mod storage;
pub mod values;

pub use address::{Address, Target};
pub use config::Config;
pub use contract::is_valid_gender;
pub use editor::{FormEvent, PetEditor, PetForm, SaveOutcome};
pub use error::{Error, Result};
pub use handle::ProviderHandle;
pub use logging::init_logging;
pub use pet::{Gender, NewPet, Pet};
pub use provider::{ChangeEvent, ChangeKind, PetProvider};
pub use storage::{PetStore, StoreStats};
pub use values::{ColumnValue, ContentValues, Cursor, CursorRow};
