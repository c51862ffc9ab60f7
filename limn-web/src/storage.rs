//! Web-specific persistence for the builder core.
//!
//! This module provides the browser implementations of the `limn-core`
//! storage trait and re-exports the core types the rest of the app uses.

use gloo_storage::{LocalStorage, Storage};

// Re-export all types from limn-core
pub use limn_core::*;

/// The shipped default option catalogs, embedded at build time.
#[must_use]
pub fn builtin_catalog() -> Catalog {
    let json = include_str!("../static/assets/data/options.json");
    match Catalog::from_json(json) {
        Ok(catalog) => catalog,
        Err(err) => {
            log::error!("embedded options data failed to parse: {err}");
            Catalog::empty()
        }
    }
}

/// Web-specific profile store backed by localStorage.
pub struct WebProfileStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStoreError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProfileStore for WebProfileStore {
    type Error = WebStoreError;

    fn save_catalog(&self, doc: &CatalogDoc, meta: &CatalogMeta) -> Result<(), Self::Error> {
        LocalStorage::set(OPTIONS_KEY, doc)
            .map_err(|e| WebStoreError::Storage(format!("{e:?}")))?;
        LocalStorage::set(OPTIONS_META_KEY, meta)
            .map_err(|e| WebStoreError::Storage(format!("{e:?}")))
    }

    fn load_catalog(&self) -> Result<Option<CatalogDoc>, Self::Error> {
        match LocalStorage::get(OPTIONS_KEY) {
            Ok(doc) => Ok(Some(doc)),
            Err(_) => Ok(None), // Nothing stored yet
        }
    }

    fn save_roster(&self, roster: &Roster) -> Result<(), Self::Error> {
        LocalStorage::set(ROSTER_KEY, roster)
            .map_err(|e| WebStoreError::Storage(format!("{e:?}")))
    }

    fn load_roster(&self) -> Result<Option<Roster>, Self::Error> {
        match LocalStorage::get(ROSTER_KEY) {
            Ok(roster) => Ok(Some(roster)),
            Err(_) => Ok(None), // Nothing stored yet
        }
    }
}

/// Create the engine the app persists through.
#[must_use]
pub fn create_web_engine() -> BuilderEngine<WebProfileStore> {
    BuilderEngine::new(WebProfileStore)
}
