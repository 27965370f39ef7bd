//! URI-like addresses for the pet collection and single pets.
//!
//! Addresses take the form `content://<authority>/pets` for the collection
//! and `content://<authority>/pets/<id>` for one record. Parsing accepts the
//! scheme-less form too and tolerates a single trailing slash.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::contract::{self, CONTENT_SCHEME, PATH_PETS};
use crate::error::{Error, Result};

/// Authority segment: dotted identifiers, as used by package names.
pub(crate) const AUTHORITY_PATTERN: &str = r"[A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*";

static ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:{CONTENT_SCHEME}://)?(?P<authority>{AUTHORITY_PATTERN})/{PATH_PETS}(?:/(?P<id>[0-9]+))?/?$"
    ))
    .expect("address pattern is valid")
});

static AUTHORITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{AUTHORITY_PATTERN}$")).expect("authority pattern is valid")
});

/// Returns `true` if `authority` can appear in an address.
#[must_use]
pub fn is_valid_authority(authority: &str) -> bool {
    AUTHORITY_REGEX.is_match(authority)
}

/// What an address points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Every pet.
    Collection,
    /// The pet with the given row id.
    Item(i64),
}

/// A parsed address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    authority: String,
    target: Target,
}

impl Address {
    /// Address of the whole collection under `authority`.
    #[must_use]
    pub fn collection(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            target: Target::Collection,
        }
    }

    /// Address of the pet `id` under `authority`.
    #[must_use]
    pub fn item(authority: impl Into<String>, id: i64) -> Self {
        Self {
            authority: authority.into(),
            target: Target::Item(id),
        }
    }

    /// Append a row id to this address's collection.
    #[must_use]
    pub fn with_id(&self, id: i64) -> Self {
        Self::item(self.authority.clone(), id)
    }

    /// The collection this address belongs to.
    #[must_use]
    pub fn to_collection(&self) -> Self {
        Self::collection(self.authority.clone())
    }

    /// Parse an address string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAddress`] if the string is not a collection or
    /// item address, or if the id does not fit in an `i64`.
    pub fn parse(input: &str) -> Result<Self> {
        let captures = ADDRESS_REGEX
            .captures(input.trim())
            .ok_or_else(|| Error::unknown_address(input))?;

        let authority = captures["authority"].to_string();
        let target = match captures.name("id") {
            Some(id) => Target::Item(
                id.as_str()
                    .parse()
                    .map_err(|_| Error::unknown_address(input))?,
            ),
            None => Target::Collection,
        };

        Ok(Self { authority, target })
    }

    /// The content authority.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// What this address points at.
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    /// The row id, for item addresses.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match self.target {
            Target::Collection => None,
            Target::Item(id) => Some(id),
        }
    }

    /// Check if this address points at a single pet.
    #[must_use]
    pub fn is_item(&self) -> bool {
        matches!(self.target, Target::Item(_))
    }

    /// MIME type describing what a query on this address returns.
    #[must_use]
    pub fn mime_type(&self) -> String {
        match self.target {
            Target::Collection => contract::content_list_type(&self.authority),
            Target::Item(_) => contract::content_item_type(&self.authority),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", contract::content_uri(&self.authority))?;
        if let Target::Item(id) = self.target {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
