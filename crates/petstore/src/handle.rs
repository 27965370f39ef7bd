//! Shared async access to a provider.
//!
//! SQLite calls block, so every operation here runs on the tokio blocking
//! pool while holding the provider's mutex.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::address::Address;
use crate::error::{Error, Result};
use crate::pet::Pet;
use crate::provider::{ChangeEvent, PetProvider};
use crate::storage::StoreStats;
use crate::values::{ContentValues, Cursor};

/// A cloneable handle to a [`PetProvider`].
///
/// Clones share the same provider; calls are serialised by a mutex.
#[derive(Debug, Clone)]
pub struct ProviderHandle {
    inner: Arc<Mutex<PetProvider>>,
}

impl ProviderHandle {
    /// Wrap a provider.
    #[must_use]
    pub fn new(provider: PetProvider) -> Self {
        Self {
            inner: Arc::new(Mutex::new(provider)),
        }
    }

    /// Subscribe to change events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the provider lock is poisoned.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<ChangeEvent>> {
        let provider = self.inner.lock().map_err(|_| poisoned())?;
        Ok(provider.subscribe())
    }

    /// See [`PetProvider::insert`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn insert(&self, address: Address, values: ContentValues) -> Result<Address> {
        self.run(move |provider| provider.insert(&address, &values))
            .await
    }

    /// See [`PetProvider::query`]. `None` projects every column.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn query(&self, address: Address, projection: Option<Vec<String>>) -> Result<Cursor> {
        self.run(move |provider| {
            let columns: Option<Vec<&str>> = projection
                .as_ref()
                .map(|columns| columns.iter().map(String::as_str).collect());
            provider.query(&address, columns.as_deref())
        })
        .await
    }

    /// See [`PetProvider::update`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn update(&self, address: Address, values: ContentValues) -> Result<usize> {
        self.run(move |provider| provider.update(&address, &values))
            .await
    }

    /// See [`PetProvider::delete`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn delete(&self, address: Address) -> Result<usize> {
        self.run(move |provider| provider.delete(&address)).await
    }

    /// See [`PetProvider::get_type`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn get_type(&self, address: Address) -> Result<String> {
        self.run(move |provider| provider.get_type(&address)).await
    }

    /// Load the pet behind an item address. See [`PetProvider::get`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn load_pet(&self, address: Address) -> Result<Option<Pet>> {
        self.run(move |provider| provider.get(&address)).await
    }

    /// See [`PetProvider::stats`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`Error::Internal`] if the task fails.
    pub async fn stats(&self) -> Result<StoreStats> {
        self.run(|provider| provider.stats()).await
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PetProvider) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut provider = inner.lock().map_err(|_| poisoned())?;
            op(&mut provider)
        })
        .await
        .map_err(|e| Error::internal(format!("provider task failed: {e}")))?
    }
}

impl From<PetProvider> for ProviderHandle {
    fn from(provider: PetProvider) -> Self {
        Self::new(provider)
    }
}

fn poisoned() -> Error {
    Error::internal("provider lock poisoned")
}
