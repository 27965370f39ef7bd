//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::address::Address;
use crate::contract::pet_entry;
use crate::pet::{Gender, NewPet};
use crate::values::ContentValues;

/// Insert command arguments.
#[derive(Debug, Args)]
pub struct InsertCommand {
    /// Pet name
    #[arg(short, long)]
    pub name: String,

    /// Breed
    #[arg(short, long)]
    pub breed: Option<String>,

    /// Weight
    #[arg(short, long)]
    pub weight: Option<i64>,

    /// Gender
    #[arg(short, long, value_enum, default_value = "unknown")]
    pub gender: GenderArg,
}

impl InsertCommand {
    /// The pet described by the arguments.
    #[must_use]
    pub fn to_new_pet(&self) -> NewPet {
        NewPet {
            name: self.name.clone(),
            breed: self.breed.clone(),
            weight: self.weight,
            gender: self.gender.into(),
        }
    }
}

/// Query command arguments.
#[derive(Debug, Args)]
pub struct QueryCommand {
    /// Collection or item address (defaults to the whole collection)
    pub address: Option<Address>,

    /// Columns to return, comma separated
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Update command arguments. Only the given fields are changed.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Collection or item address
    pub address: Address,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New breed
    #[arg(short, long)]
    pub breed: Option<String>,

    /// New weight
    #[arg(short, long)]
    pub weight: Option<i64>,

    /// New gender
    #[arg(short, long, value_enum)]
    pub gender: Option<GenderArg>,
}

impl UpdateCommand {
    /// Payload holding only the fields that were given.
    #[must_use]
    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        if let Some(name) = &self.name {
            values.put(pet_entry::COLUMN_PET_NAME, name.as_str());
        }
        if let Some(breed) = &self.breed {
            values.put(pet_entry::COLUMN_PET_BREED, breed.as_str());
        }
        if let Some(weight) = self.weight {
            values.put(pet_entry::COLUMN_PET_WEIGHT, weight);
        }
        if let Some(gender) = self.gender {
            values.put(pet_entry::COLUMN_PET_GENDER, Gender::from(gender).code());
        }
        values
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Gender argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    /// Unknown gender
    Unknown,
    /// Male
    Male,
    /// Female
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Unknown => Self::Unknown,
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
