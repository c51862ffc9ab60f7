//! Limn character-builder core
//!
//! Platform-agnostic logic for the Limn character builder: option catalogs
//! with change notifications, pure option-resolution queries, the character
//! record with its append-only history, catalog/character synchronization,
//! and the storage-facing document types. No UI and no platform-specific
//! dependencies live here.

use std::cell::Cell;

use anyhow::bail;
use chrono::{DateTime, Utc};

pub mod catalog;
pub mod character;
pub mod options;
pub mod resolve;
pub mod roster;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogChange, CatalogDoc, CatalogError};
pub use character::{Character, Field, FieldChange, FieldPatch, FieldValue, HistoryEntry};
pub use options::{ActionOption, CharacterOption, OptionPatch, RangeOption};
pub use resolve::{resolve_visual_age, resolve_visual_age_value};
pub use roster::Roster;
pub use store::{CONFIG_VERSION, CatalogMeta, OPTIONS_KEY, OPTIONS_META_KEY, ROSTER_KEY};
pub use sync::{RepairedFields, migrate, random_character, reconcile};

/// Trait for abstracting catalog and roster persistence.
/// Platform-specific implementations should provide this.
pub trait ProfileStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the catalog document together with its version sidecar.
    ///
    /// # Errors
    ///
    /// Returns an error if the documents cannot be written.
    fn save_catalog(&self, doc: &CatalogDoc, meta: &CatalogMeta) -> Result<(), Self::Error>;

    /// Load the persisted catalog document, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a present document cannot be read or parsed;
    /// `Ok(None)` means nothing was stored.
    fn load_catalog(&self) -> Result<Option<CatalogDoc>, Self::Error>;

    /// Persist the saved-character roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be written.
    fn save_roster(&self, roster: &Roster) -> Result<(), Self::Error>;

    /// Load the persisted roster, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a present roster cannot be read or parsed;
    /// `Ok(None)` means nothing was stored.
    fn load_roster(&self) -> Result<Option<Roster>, Self::Error>;
}

/// Persistence façade over a [`ProfileStore`]. A coarse in-flight flag makes
/// a second save a failed no-op while one is still running; in the
/// single-threaded environments this crate targets that is all the mutual
/// exclusion a user-initiated save needs.
pub struct BuilderEngine<S>
where
    S: ProfileStore,
{
    store: S,
    save_in_flight: Cell<bool>,
}

impl<S> BuilderEngine<S>
where
    S: ProfileStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            save_in_flight: Cell::new(false),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn guarded<T>(
        &self,
        write: impl FnOnce(&S) -> Result<T, S::Error>,
    ) -> Result<T, anyhow::Error> {
        if self.save_in_flight.replace(true) {
            bail!("a save is already in progress");
        }
        let result = write(&self.store).map_err(anyhow::Error::new);
        self.save_in_flight.set(false);
        result
    }

    /// Export and persist the catalog, stamping the sidecar at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a save is already in flight or the store fails.
    pub fn save_catalog(
        &self,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Result<(), anyhow::Error> {
        let doc = catalog.export_doc();
        let meta = CatalogMeta::current(now);
        self.guarded(|store| store.save_catalog(&doc, &meta))
    }

    /// Persist the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if a save is already in flight or the store fails.
    pub fn save_roster(&self, roster: &Roster) -> Result<(), anyhow::Error> {
        self.guarded(|store| store.save_roster(roster))
    }

    /// Load the stored catalog document into `catalog`, replacing its tables
    /// wholesale. Returns whether anything was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored document is
    /// unreadable.
    pub fn restore_catalog(&self, catalog: &mut Catalog) -> Result<bool, anyhow::Error> {
        match self.store.load_catalog().map_err(anyhow::Error::new)? {
            Some(doc) => {
                catalog.import_doc(doc);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Load the stored roster, or an empty one when nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored roster is
    /// unreadable.
    pub fn load_roster(&self) -> Result<Roster, anyhow::Error> {
        Ok(self
            .store
            .load_roster()
            .map_err(anyhow::Error::new)?
            .unwrap_or_default())
    }
}
