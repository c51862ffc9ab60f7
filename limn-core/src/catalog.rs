//! Mutable option catalogs and their change notifications.
//!
//! A single [`Catalog`] instance is shared by every character and every UI
//! consumer for the life of the process. Mutations go through the methods
//! here so that the default-slot rules stay intact and subscribers hear
//! about every change after it lands.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{ActionOption, CharacterOption, OptionEntry, OptionPatch, RangeOption};

/// Failure modes for catalog mutations. All of them leave the catalog
/// untouched and are safe to re-invoke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown property or option: {0}")]
    NotFound(String),
    #[error("entry already exists: {0}")]
    Conflict(String),
    #[error("document is not a property-keyed catalog")]
    Malformed,
}

/// Scope of a catalog mutation, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    /// One property's list changed.
    Property(String),
    /// The whole catalog changed (import, category add/remove).
    All,
}

type Observer = Rc<dyn Fn(&CatalogChange)>;

/// Serialized form of a full catalog, used for export/import and storage.
/// Unknown top-level keys are rejected so that arbitrary objects cannot
/// sneak in as an empty catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDoc {
    #[serde(default)]
    pub options: BTreeMap<String, Vec<CharacterOption>>,
    #[serde(default)]
    pub ranges: BTreeMap<String, Vec<RangeOption>>,
    #[serde(default)]
    pub actions: Vec<ActionOption>,
}

impl CatalogDoc {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a property-keyed catalog document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render the document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The in-memory option tables: discrete options and range presets keyed by
/// property name, plus the unordered action list.
#[derive(Clone, Default)]
pub struct Catalog {
    pub(crate) options: BTreeMap<String, Vec<CharacterOption>>,
    pub(crate) ranges: BTreeMap<String, Vec<RangeOption>>,
    pub(crate) actions: Vec<ActionOption>,
    observers: Vec<Observer>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("options", &self.options)
            .field("ranges", &self.ranges)
            .field("actions", &self.actions)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.options == other.options
            && self.ranges == other.ranges
            && self.actions == other.actions
    }
}

impl Catalog {
    /// Empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from a previously exported document.
    #[must_use]
    pub fn from_doc(doc: CatalogDoc) -> Self {
        Self {
            options: doc.options,
            ranges: doc.ranges,
            actions: doc.actions,
            observers: Vec::new(),
        }
    }

    /// Load a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid catalog document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        CatalogDoc::from_json(json).map(Self::from_doc)
    }

    /// Register a subscriber. Subscribers are called synchronously, in
    /// registration order, after each mutation completes. Callbacks must not
    /// mutate the catalog re-entrantly.
    pub fn subscribe(&mut self, observer: impl Fn(&CatalogChange) + 'static) {
        self.observers.push(Rc::new(observer));
    }

    fn notify(&self, change: &CatalogChange) {
        for observer in &self.observers {
            observer(change);
        }
    }

    fn notify_property(&self, property: &str) {
        self.notify(&CatalogChange::Property(property.to_string()));
    }

    #[must_use]
    pub fn has_property(&self, property: &str) -> bool {
        self.options.contains_key(property)
    }

    #[must_use]
    pub fn has_range_property(&self, property: &str) -> bool {
        self.ranges.contains_key(property)
    }

    /// Discrete property names, in stable order.
    pub fn discrete_properties(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Full option list for a property, deprecated entries included. The
    /// management surface edits this; selection surfaces use
    /// [`Catalog::active_options`] instead.
    #[must_use]
    pub fn options_for(&self, property: &str) -> Vec<CharacterOption> {
        self.options.get(property).cloned().unwrap_or_default()
    }

    /// Range property names, in stable order.
    pub fn range_properties(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    /// Append a new option to a property's list, creating the list when the
    /// property is new. A self-declared default displaces the current one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if the id is already present.
    pub fn add_option(
        &mut self,
        property: &str,
        option: CharacterOption,
    ) -> Result<(), CatalogError> {
        let list = self.options.entry(property.to_string()).or_default();
        push_option(list, property, option)?;
        self.notify_property(property);
        Ok(())
    }

    /// Merge a patch into an existing option, in place and order-preserving.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the property or id is unknown.
    pub fn update_option(
        &mut self,
        property: &str,
        id: &str,
        patch: OptionPatch,
    ) -> Result<(), CatalogError> {
        let list = self
            .options
            .get_mut(property)
            .ok_or_else(|| CatalogError::NotFound(property.to_string()))?;
        patch_option(list, property, id, patch)?;
        self.notify_property(property);
        Ok(())
    }

    /// Hide an option from future selection surfaces while keeping already
    /// assigned values valid.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the property or id is unknown.
    pub fn deprecate_option(&mut self, property: &str, id: &str) -> Result<(), CatalogError> {
        self.update_option(property, id, OptionPatch::deprecate())
    }

    /// Remove an option entirely. When the removed entry was the default and
    /// at least one sibling remains, the entry at index 0 is promoted (index
    /// 1 when the removed entry itself sat at index 0).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the property or id is unknown.
    pub fn remove_option(&mut self, property: &str, id: &str) -> Result<(), CatalogError> {
        let list = self
            .options
            .get_mut(property)
            .ok_or_else(|| CatalogError::NotFound(property.to_string()))?;
        drop_option(list, property, id)?;
        self.notify_property(property);
        Ok(())
    }

    /// Range-table analogue of [`Catalog::add_option`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if the id is already present.
    pub fn add_range_option(
        &mut self,
        property: &str,
        option: RangeOption,
    ) -> Result<(), CatalogError> {
        let list = self.ranges.entry(property.to_string()).or_default();
        push_option(list, property, option)?;
        self.notify_property(property);
        Ok(())
    }

    /// Range-table analogue of [`Catalog::update_option`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the property or id is unknown.
    pub fn update_range_option(
        &mut self,
        property: &str,
        id: &str,
        patch: OptionPatch,
    ) -> Result<(), CatalogError> {
        let list = self
            .ranges
            .get_mut(property)
            .ok_or_else(|| CatalogError::NotFound(property.to_string()))?;
        patch_option(list, property, id, patch)?;
        self.notify_property(property);
        Ok(())
    }

    /// Range-table analogue of [`Catalog::remove_option`], with the same
    /// default-promotion rule.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the property or id is unknown.
    pub fn remove_range_option(&mut self, property: &str, id: &str) -> Result<(), CatalogError> {
        let list = self
            .ranges
            .get_mut(property)
            .ok_or_else(|| CatalogError::NotFound(property.to_string()))?;
        drop_option(list, property, id)?;
        self.notify_property(property);
        Ok(())
    }

    /// Create a new discrete property with an initial (possibly empty) list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if the property already exists.
    pub fn add_property(
        &mut self,
        name: &str,
        options: Vec<CharacterOption>,
    ) -> Result<(), CatalogError> {
        if self.options.contains_key(name) {
            return Err(CatalogError::Conflict(name.to_string()));
        }
        self.options.insert(name.to_string(), options);
        self.notify(&CatalogChange::All);
        Ok(())
    }

    /// Delete a discrete property and its whole list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the property does not exist.
    pub fn remove_property(&mut self, name: &str) -> Result<(), CatalogError> {
        if self.options.remove(name).is_none() {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        self.notify(&CatalogChange::All);
        Ok(())
    }

    /// Snapshot the catalog as an exportable document.
    #[must_use]
    pub fn export_doc(&self) -> CatalogDoc {
        CatalogDoc {
            options: self.options.clone(),
            ranges: self.ranges.clone(),
            actions: self.actions.clone(),
        }
    }

    /// Replace the whole catalog with an imported document. Subscribers stay
    /// registered and hear a single [`CatalogChange::All`].
    pub fn import_doc(&mut self, doc: CatalogDoc) {
        self.options = doc.options;
        self.ranges = doc.ranges;
        self.actions = doc.actions;
        self.notify(&CatalogChange::All);
    }

    /// Parse and import JSON text. A malformed document leaves the catalog
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Malformed`] if the text does not parse.
    pub fn import_json(&mut self, json: &str) -> Result<(), CatalogError> {
        let doc = CatalogDoc::from_json(json).map_err(|_| CatalogError::Malformed)?;
        self.import_doc(doc);
        Ok(())
    }
}

fn push_option<T: OptionEntry>(
    list: &mut Vec<T>,
    property: &str,
    option: T,
) -> Result<(), CatalogError> {
    if list.iter().any(|entry| entry.id() == option.id()) {
        return Err(CatalogError::Conflict(format!(
            "{property}/{}",
            option.id()
        )));
    }
    if option.is_default() {
        for entry in list.iter_mut() {
            entry.set_default(false);
        }
    }
    list.push(option);
    Ok(())
}

fn patch_option<T: OptionEntry>(
    list: &mut [T],
    property: &str,
    id: &str,
    patch: OptionPatch,
) -> Result<(), CatalogError> {
    let index = list
        .iter()
        .position(|entry| entry.id() == id)
        .ok_or_else(|| CatalogError::NotFound(format!("{property}/{id}")))?;
    if patch.is_default == Some(true) {
        for entry in list.iter_mut() {
            entry.set_default(false);
        }
    }
    list[index].merge(patch);
    Ok(())
}

fn drop_option<T: OptionEntry>(
    list: &mut Vec<T>,
    property: &str,
    id: &str,
) -> Result<(), CatalogError> {
    let index = list
        .iter()
        .position(|entry| entry.id() == id)
        .ok_or_else(|| CatalogError::NotFound(format!("{property}/{id}")))?;
    // Promotion is index-based (0, or 1 when the default sat at 0), not
    // "first remaining". Saved data relies on this tie-break.
    if list[index].is_default() && list.len() > 1 {
        let promoted = if index == 0 { 1 } else { 0 };
        list[promoted].set_default(true);
    }
    list.remove(index);
    Ok(())
}
