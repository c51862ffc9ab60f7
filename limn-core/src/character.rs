//! The character record: enumerated fields, bulk updates with an append-only
//! change history, description rendering and serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Every tracked field on a [`Character`], in record order. The string forms
/// double as catalog property names and as persisted history keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    #[serde(rename = "ID")]
    Id,
    Name,
    Surname,
    Nationality,
    Race,
    Skin,
    Career,
    Hair,
    HStyle,
    Eyes,
    ActualAge,
    VisualAge,
    Height,
    Weight,
    Waist,
    Muscles,
    Boobs,
    Hips,
    Butt,
    HLength,
    Markings,
    Clothing,
    Action,
}

impl Field {
    pub const ALL: [Self; 23] = [
        Self::Id,
        Self::Name,
        Self::Surname,
        Self::Nationality,
        Self::Race,
        Self::Skin,
        Self::Career,
        Self::Hair,
        Self::HStyle,
        Self::Eyes,
        Self::ActualAge,
        Self::VisualAge,
        Self::Height,
        Self::Weight,
        Self::Waist,
        Self::Muscles,
        Self::Boobs,
        Self::Hips,
        Self::Butt,
        Self::HLength,
        Self::Markings,
        Self::Clothing,
        Self::Action,
    ];

    /// Fields whose values reference a discrete catalog property.
    pub const DISCRETE: [Self; 7] = [
        Self::Nationality,
        Self::Race,
        Self::Skin,
        Self::Career,
        Self::Hair,
        Self::HStyle,
        Self::Eyes,
    ];

    /// Fields whose values come from a range catalog property.
    pub const RANGE: [Self; 10] = [
        Self::ActualAge,
        Self::VisualAge,
        Self::Height,
        Self::Weight,
        Self::Waist,
        Self::Muscles,
        Self::Boobs,
        Self::Hips,
        Self::Butt,
        Self::HLength,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Nationality => "nationality",
            Self::Race => "race",
            Self::Skin => "skin",
            Self::Career => "career",
            Self::Hair => "hair",
            Self::HStyle => "hStyle",
            Self::Eyes => "eyes",
            Self::ActualAge => "actualAge",
            Self::VisualAge => "visualAge",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Waist => "waist",
            Self::Muscles => "muscles",
            Self::Boobs => "boobs",
            Self::Hips => "hips",
            Self::Butt => "butt",
            Self::HLength => "hLength",
            Self::Markings => "markings",
            Self::Clothing => "clothing",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

/// A field value in a patch or a history entry. Serialized untagged so
/// numbers stay numbers and text stays text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A bulk update, applied in field order.
pub type FieldPatch = BTreeMap<Field, FieldValue>;

/// Old and new value of one field inside a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: FieldValue,
    pub to: FieldValue,
}

/// One recorded bulk update. Entries are appended, never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub changes: BTreeMap<Field, FieldChange>,
}

fn default_clothing() -> String {
    "no clothing".to_string()
}

/// The character record. Discrete fields hold option ids from the catalog;
/// range fields hold plain numbers; the rest is free text.
///
/// JSON keys are camelCase (`actualAge`, `hStyle`, ...) and missing fields
/// deserialize to neutral defaults, so partial documents import cleanly and
/// the explicit reconcile pass restores catalog defaults afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(rename = "ID", default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub skin: String,
    #[serde(default)]
    pub career: String,
    #[serde(default)]
    pub hair: String,
    #[serde(default)]
    pub h_style: String,
    #[serde(default)]
    pub eyes: String,
    #[serde(default)]
    pub actual_age: i32,
    #[serde(default)]
    pub visual_age: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub waist: i32,
    #[serde(default)]
    pub muscles: i32,
    #[serde(default)]
    pub boobs: i32,
    #[serde(default)]
    pub hips: i32,
    #[serde(default)]
    pub butt: i32,
    #[serde(default)]
    pub h_length: i32,
    #[serde(default)]
    pub markings: String,
    #[serde(default = "default_clothing")]
    pub clothing: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default = "Utc::now")]
    pub date_created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
}

impl Character {
    /// A fresh record taking its initial values from the catalog defaults.
    #[must_use]
    pub fn new(catalog: &Catalog, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: String::new(),
            surname: String::new(),
            nationality: catalog.default_option("nationality"),
            race: catalog.default_option("race"),
            skin: catalog.default_option("skin"),
            career: catalog.default_option("career"),
            hair: catalog.default_option("hair"),
            h_style: catalog.default_option("hStyle"),
            eyes: catalog.default_option("eyes"),
            actual_age: catalog.default_range_value("actualAge"),
            visual_age: catalog.default_range_value("visualAge"),
            height: catalog.default_range_value("height"),
            weight: catalog.default_range_value("weight"),
            waist: catalog.default_range_value("waist"),
            muscles: catalog.default_range_value("muscles"),
            boobs: catalog.default_range_value("boobs"),
            hips: catalog.default_range_value("hips"),
            butt: catalog.default_range_value("butt"),
            h_length: catalog.default_range_value("hLength"),
            markings: String::new(),
            clothing: default_clothing(),
            action: String::new(),
            history: Vec::new(),
            date_created: now,
            last_modified: now,
        }
    }

    /// Current value of one field, through the typed lookup table.
    #[must_use]
    pub fn value_of(&self, field: Field) -> FieldValue {
        match field {
            Field::Id => FieldValue::from(self.id),
            Field::Name => FieldValue::from(self.name.clone()),
            Field::Surname => FieldValue::from(self.surname.clone()),
            Field::Nationality => FieldValue::from(self.nationality.clone()),
            Field::Race => FieldValue::from(self.race.clone()),
            Field::Skin => FieldValue::from(self.skin.clone()),
            Field::Career => FieldValue::from(self.career.clone()),
            Field::Hair => FieldValue::from(self.hair.clone()),
            Field::HStyle => FieldValue::from(self.h_style.clone()),
            Field::Eyes => FieldValue::from(self.eyes.clone()),
            Field::ActualAge => FieldValue::from(self.actual_age),
            Field::VisualAge => FieldValue::from(self.visual_age),
            Field::Height => FieldValue::from(self.height),
            Field::Weight => FieldValue::from(self.weight),
            Field::Waist => FieldValue::from(self.waist),
            Field::Muscles => FieldValue::from(self.muscles),
            Field::Boobs => FieldValue::from(self.boobs),
            Field::Hips => FieldValue::from(self.hips),
            Field::Butt => FieldValue::from(self.butt),
            Field::HLength => FieldValue::from(self.h_length),
            Field::Markings => FieldValue::from(self.markings.clone()),
            Field::Clothing => FieldValue::from(self.clothing.clone()),
            Field::Action => FieldValue::from(self.action.clone()),
        }
    }

    /// Direct field assignment. No history entry is recorded and no
    /// timestamp is bumped; bulk edits go through [`Character::update_fields`].
    /// A value of the wrong shape for the field is ignored.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::Id, FieldValue::Int(n)) => {
                self.id = u32::try_from(n).unwrap_or(self.id);
            }
            (Field::Name, FieldValue::Text(s)) => self.name = s,
            (Field::Surname, FieldValue::Text(s)) => self.surname = s,
            (Field::Nationality, FieldValue::Text(s)) => self.nationality = s,
            (Field::Race, FieldValue::Text(s)) => self.race = s,
            (Field::Skin, FieldValue::Text(s)) => self.skin = s,
            (Field::Career, FieldValue::Text(s)) => self.career = s,
            (Field::Hair, FieldValue::Text(s)) => self.hair = s,
            (Field::HStyle, FieldValue::Text(s)) => self.h_style = s,
            (Field::Eyes, FieldValue::Text(s)) => self.eyes = s,
            (Field::ActualAge, FieldValue::Int(n)) => {
                self.actual_age = i32::try_from(n).unwrap_or(self.actual_age);
            }
            (Field::VisualAge, FieldValue::Int(n)) => {
                self.visual_age = i32::try_from(n).unwrap_or(self.visual_age);
            }
            (Field::Height, FieldValue::Int(n)) => {
                self.height = i32::try_from(n).unwrap_or(self.height);
            }
            (Field::Weight, FieldValue::Int(n)) => {
                self.weight = i32::try_from(n).unwrap_or(self.weight);
            }
            (Field::Waist, FieldValue::Int(n)) => {
                self.waist = i32::try_from(n).unwrap_or(self.waist);
            }
            (Field::Muscles, FieldValue::Int(n)) => {
                self.muscles = i32::try_from(n).unwrap_or(self.muscles);
            }
            (Field::Boobs, FieldValue::Int(n)) => {
                self.boobs = i32::try_from(n).unwrap_or(self.boobs);
            }
            (Field::Hips, FieldValue::Int(n)) => {
                self.hips = i32::try_from(n).unwrap_or(self.hips);
            }
            (Field::Butt, FieldValue::Int(n)) => {
                self.butt = i32::try_from(n).unwrap_or(self.butt);
            }
            (Field::HLength, FieldValue::Int(n)) => {
                self.h_length = i32::try_from(n).unwrap_or(self.h_length);
            }
            (Field::Markings, FieldValue::Text(s)) => self.markings = s,
            (Field::Clothing, FieldValue::Text(s)) => self.clothing = s,
            (Field::Action, FieldValue::Text(s)) => self.action = s,
            _ => {}
        }
    }

    /// Apply a bulk update: assign every patch entry, then diff against the
    /// pre-update snapshot over the tracked field list and append one history
    /// entry when anything changed. `lastModified` is bumped either way.
    pub fn update_fields(&mut self, patch: &FieldPatch, now: DateTime<Utc>) -> &mut Self {
        let before = self.clone();
        for (field, value) in patch {
            self.set(*field, value.clone());
        }

        let mut changes = BTreeMap::new();
        for field in Field::ALL {
            let from = before.value_of(field);
            let to = self.value_of(field);
            if from != to {
                changes.insert(field, FieldChange { from, to });
            }
        }
        if !changes.is_empty() {
            self.history.push(HistoryEntry {
                timestamp: now,
                changes,
            });
        }
        self.last_modified = now;
        self
    }

    /// Deterministic natural-language rendering of the record. The branch
    /// structure and fallback phrases are fixed; downstream snapshots depend
    /// on them.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = String::new();

        let full_name = format!("{} {}", self.name, self.surname);
        let full_name = full_name.trim();
        if full_name.is_empty() {
            text.push_str("This character is ");
        } else {
            text.push_str(&format!("{full_name} is "));
        }

        text.push_str(&format!(
            "a {}-year-old {} {} who appears to be {}. ",
            self.actual_age,
            self.nationality,
            self.race.to_lowercase(),
            self.visual_age
        ));

        if !self.career.is_empty() && self.career != "unemployed" {
            text.push_str(&format!("They work as a {}. ", self.career));
        } else {
            text.push_str("They are currently unemployed. ");
        }

        text.push_str(&format!(
            "Standing at {}cm tall with {} skin, ",
            self.height, self.skin
        ));
        text.push_str(&format!(
            "they have {} hair styled in a {}. ",
            self.hair, self.h_style
        ));

        if self.eyes.is_empty() {
            text.push_str("Their eyes ");
        } else {
            text.push_str(&format!("Their {} eyes ", self.eyes));
        }

        if self.markings.is_empty() {
            text.push_str("are their most striking feature. ");
        } else {
            text.push_str(&format!(
                "complement the {} on their body. ",
                self.markings
            ));
        }

        if !self.clothing.is_empty() && self.clothing != "no clothing" {
            text.push_str(&format!("They are dressed in {}. ", self.clothing));
        } else {
            text.push_str("They are not currently dressed. ");
        }

        if !self.action.is_empty() {
            text.push_str(&format!("Currently, they are {}.", self.action));
        }

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Body mass index, rounded to one decimal. `None` when either height or
    /// weight is zero - a genuine zero measurement and "never set" are not
    /// distinguishable in this model.
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        if self.height == 0 || self.weight == 0 {
            return None;
        }
        let meters = f64::from(self.height) / 100.0;
        let bmi = f64::from(self.weight) / (meters * meters);
        Some((bmi * 10.0).round() / 10.0)
    }

    /// BMI bucket label, or `None` when BMI is unavailable.
    #[must_use]
    pub fn bmi_category(&self) -> Option<&'static str> {
        self.bmi().map(|bmi| {
            if bmi < 18.5 {
                "Underweight"
            } else if bmi < 25.0 {
                "Normal weight"
            } else if bmi < 30.0 {
                "Overweight"
            } else {
                "Obese"
            }
        })
    }

    /// Serialize the full record, history included.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a record from JSON text. Missing fields take neutral defaults;
    /// malformed text is an error, distinct from "absent" at the storage
    /// layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse as a character document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Suggested stem for an exported file: `name_surname`, or
    /// `character_<id>` when the name is blank.
    #[must_use]
    pub fn export_filename(&self) -> String {
        if self.name.is_empty() {
            format!("character_{}", self.id)
        } else {
            format!("{}_{}", self.name, self.surname)
                .trim()
                .to_string()
        }
    }
}
