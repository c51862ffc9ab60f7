//! Option primitives shared by every catalog table.
use serde::{Deserialize, Serialize};

/// A single selectable entry in a discrete property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_deprecated: bool,
}

impl CharacterOption {
    #[must_use]
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            is_default: false,
            is_deprecated: false,
        }
    }

    /// Same as [`CharacterOption::new`] but marked as the list default.
    #[must_use]
    pub fn new_default(id: &str, label: &str) -> Self {
        Self {
            is_default: true,
            ..Self::new(id, label)
        }
    }
}

/// A selectable entry carrying a numeric value (the "range" presets).
///
/// For the `visualAge` property the value is overloaded: `0` means "match
/// actual age", a positive value is an absolute age, and a negative value is
/// an offset added to the actual age. See [`crate::resolve_visual_age`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOption {
    pub id: String,
    pub label: String,
    pub value: i32,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_deprecated: bool,
}

impl RangeOption {
    #[must_use]
    pub fn new(id: &str, label: &str, value: i32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value,
            is_default: false,
            is_deprecated: false,
        }
    }

    /// Same as [`RangeOption::new`] but marked as the list default.
    #[must_use]
    pub fn new_default(id: &str, label: &str, value: i32) -> Self {
        Self {
            is_default: true,
            ..Self::new(id, label, value)
        }
    }
}

/// An entry in the unordered action list, with an optional longer blurb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_deprecated: bool,
}

/// A partial update merged into an existing option in place.
///
/// `value` only applies to range options; discrete updates leave it `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deprecated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

impl OptionPatch {
    /// Patch that only flips the deprecation flag.
    #[must_use]
    pub fn deprecate() -> Self {
        Self {
            is_deprecated: Some(true),
            ..Self::default()
        }
    }

    /// Patch that only claims the default slot.
    #[must_use]
    pub fn make_default() -> Self {
        Self {
            is_default: Some(true),
            ..Self::default()
        }
    }
}

/// Shared shape of the three option flavors, used by the catalog mutation
/// helpers so the add/update/remove rules exist in one place.
pub(crate) trait OptionEntry {
    fn id(&self) -> &str;
    fn is_default(&self) -> bool;
    fn set_default(&mut self, value: bool);
    fn merge(&mut self, patch: OptionPatch);
}

impl OptionEntry for CharacterOption {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn set_default(&mut self, value: bool) {
        self.is_default = value;
    }

    fn merge(&mut self, patch: OptionPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(default) = patch.is_default {
            self.is_default = default;
        }
        if let Some(deprecated) = patch.is_deprecated {
            self.is_deprecated = deprecated;
        }
    }
}

impl OptionEntry for RangeOption {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn set_default(&mut self, value: bool) {
        self.is_default = value;
    }

    fn merge(&mut self, patch: OptionPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(default) = patch.is_default {
            self.is_default = default;
        }
        if let Some(deprecated) = patch.is_deprecated {
            self.is_deprecated = deprecated;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

impl OptionEntry for ActionOption {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn set_default(&mut self, value: bool) {
        self.is_default = value;
    }

    fn merge(&mut self, patch: OptionPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(default) = patch.is_default {
            self.is_default = default;
        }
        if let Some(deprecated) = patch.is_deprecated {
            self.is_deprecated = deprecated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_serde_uses_camel_case_and_defaults() {
        let json = r#"{"id":"fair","label":"Fair","isDefault":true}"#;
        let opt: CharacterOption = serde_json::from_str(json).unwrap();
        assert!(opt.is_default);
        assert!(!opt.is_deprecated);

        let back = serde_json::to_string(&opt).unwrap();
        assert!(back.contains("\"isDefault\":true"));
        assert!(back.contains("\"isDeprecated\":false"));
    }

    #[test]
    fn range_patch_merges_value() {
        let mut opt = RangeOption::new("tall", "Tall", 180);
        opt.merge(OptionPatch {
            value: Some(182),
            ..OptionPatch::default()
        });
        assert_eq!(opt.value, 182);
        assert_eq!(opt.label, "Tall");
    }
}
