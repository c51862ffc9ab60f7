//! The saved-character list, persisted as a plain JSON array.

use serde::{Deserialize, Serialize};

use crate::character::Character;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(pub Vec<Character>);

impl Roster {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse a roster from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not an array of character documents.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render the roster as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Character> {
        self.0.iter().find(|character| character.id == id)
    }

    /// Replace the stored record with the same id in place, or append.
    pub fn upsert(&mut self, character: Character) {
        if let Some(slot) = self.0.iter_mut().find(|c| c.id == character.id) {
            *slot = character;
        } else {
            self.0.push(character);
        }
    }

    /// Remove a record by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.0.len();
        self.0.retain(|character| character.id != id);
        self.0.len() != before
    }

    /// The next free id: one past the highest stored id, or 1 when empty.
    #[must_use]
    pub fn next_id(&self) -> u32 {
        self.0
            .iter()
            .map(|character| character.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Character> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Character;
    type IntoIter = std::slice::Iter<'a, Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
