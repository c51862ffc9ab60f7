//! Read-only catalog queries: defaults, active subsets, closest-match and
//! the visual-age rule.

use crate::catalog::Catalog;
use crate::options::{ActionOption, CharacterOption, RangeOption};

impl Catalog {
    /// Id of the default option for a property: the entry flagged as default,
    /// else the first entry, else the empty string.
    #[must_use]
    pub fn default_option(&self, property: &str) -> String {
        let Some(list) = self.options.get(property) else {
            return String::new();
        };
        let Some(first) = list.first() else {
            return String::new();
        };
        list.iter()
            .find(|option| option.is_default)
            .unwrap_or(first)
            .id
            .clone()
    }

    /// Numeric analogue of [`Catalog::default_option`], else `0`.
    ///
    /// A default entry whose value is literally `0` yields the first entry's
    /// value instead. Saved data relies on this fallthrough.
    #[must_use]
    pub fn default_range_value(&self, property: &str) -> i32 {
        let Some(list) = self.ranges.get(property) else {
            return 0;
        };
        let Some(first) = list.first() else {
            return 0;
        };
        let picked = list
            .iter()
            .find(|option| option.is_default)
            .map_or(first.value, |option| option.value);
        if picked == 0 { first.value } else { picked }
    }

    /// Non-deprecated options for a property, original order preserved.
    #[must_use]
    pub fn active_options(&self, property: &str) -> Vec<CharacterOption> {
        self.options.get(property).map_or_else(Vec::new, |list| {
            list.iter()
                .filter(|option| !option.is_deprecated)
                .cloned()
                .collect()
        })
    }

    /// Non-deprecated range options for a property, original order preserved.
    #[must_use]
    pub fn active_range_options(&self, property: &str) -> Vec<RangeOption> {
        self.ranges.get(property).map_or_else(Vec::new, |list| {
            list.iter()
                .filter(|option| !option.is_deprecated)
                .cloned()
                .collect()
        })
    }

    /// Non-deprecated action options.
    #[must_use]
    pub fn active_action_options(&self) -> Vec<ActionOption> {
        self.actions
            .iter()
            .filter(|option| !option.is_deprecated)
            .cloned()
            .collect()
    }

    /// Label for an option id, falling back to the id itself.
    #[must_use]
    pub fn option_label(&self, property: &str, id: &str) -> String {
        self.options
            .get(property)
            .and_then(|list| list.iter().find(|option| option.id == id))
            .map_or_else(|| id.to_string(), |option| option.label.clone())
    }

    /// True iff some entry (deprecated or not) under `property` has that id.
    /// Deprecated-but-assigned values remain valid.
    #[must_use]
    pub fn is_valid_option(&self, property: &str, value: &str) -> bool {
        self.options
            .get(property)
            .is_some_and(|list| list.iter().any(|option| option.id == value))
    }

    /// The range option closest to `value` by absolute distance. Ties go to
    /// the entry encountered first in list order.
    #[must_use]
    pub fn closest_range_option(&self, property: &str, value: i32) -> Option<&RangeOption> {
        self.ranges.get(property)?.iter().min_by_key(|option| {
            (i64::from(option.value) - i64::from(value)).abs()
        })
    }
}

/// Resolve the displayed age from the actual age and a chosen visual-age
/// preset: `0` means "match actual age", a positive value is absolute, and a
/// negative value is an offset added to the actual age.
#[must_use]
pub fn resolve_visual_age(actual_age: i32, option: &RangeOption) -> i32 {
    resolve_visual_age_value(actual_age, option.value)
}

/// Value-level form of [`resolve_visual_age`], shared with the randomizer so
/// the two sites cannot drift.
#[must_use]
pub fn resolve_visual_age_value(actual_age: i32, value: i32) -> i32 {
    if value == 0 {
        actual_age
    } else if value > 0 {
        value
    } else {
        actual_age + value.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionPatch;

    fn fixture() -> Catalog {
        let mut catalog = Catalog::empty();
        catalog
            .add_option("skin", CharacterOption::new_default("fair", "Fair"))
            .unwrap();
        catalog
            .add_option("skin", CharacterOption::new("olive", "Olive"))
            .unwrap();
        for (id, label, value, default) in [
            ("very_short", "Very Short", 155, false),
            ("short", "Short", 165, false),
            ("average", "Average", 170, true),
            ("tall", "Tall", 180, false),
            ("very_tall", "Very Tall", 190, false),
        ] {
            let option = if default {
                RangeOption::new_default(id, label, value)
            } else {
                RangeOption::new(id, label, value)
            };
            catalog.add_range_option("height", option).unwrap();
        }
        for (id, value, default) in [
            ("appears_younger", 18, false),
            ("appears_true", 0, true),
            ("appears_older", -5, false),
        ] {
            let option = if default {
                RangeOption::new_default(id, id, value)
            } else {
                RangeOption::new(id, id, value)
            };
            catalog.add_range_option("visualAge", option).unwrap();
        }
        catalog
    }

    #[test]
    fn default_option_prefers_flag_then_first_then_empty() {
        let mut catalog = fixture();
        assert_eq!(catalog.default_option("skin"), "fair");
        catalog
            .update_option(
                "skin",
                "fair",
                OptionPatch {
                    is_default: Some(false),
                    ..OptionPatch::default()
                },
            )
            .unwrap();
        assert_eq!(catalog.default_option("skin"), "fair");
        assert_eq!(catalog.default_option("mood"), "");
    }

    #[test]
    fn default_range_value_zero_falls_through_to_first_entry() {
        let catalog = fixture();
        assert_eq!(catalog.default_range_value("height"), 170);
        // visualAge's default preset has value 0, so the first entry wins.
        assert_eq!(catalog.default_range_value("visualAge"), 18);
        assert_eq!(catalog.default_range_value("mood"), 0);
    }

    #[test]
    fn active_options_exclude_deprecated_but_keep_order() {
        let mut catalog = fixture();
        catalog.deprecate_option("skin", "fair").unwrap();
        let active: Vec<String> = catalog
            .active_options("skin")
            .into_iter()
            .map(|option| option.id)
            .collect();
        assert_eq!(active, vec!["olive".to_string()]);
        assert!(catalog.is_valid_option("skin", "fair"));
        assert!(!catalog.is_valid_option("skin", "ghost"));
    }

    #[test]
    fn closest_height_to_172_is_170() {
        let catalog = fixture();
        let closest = catalog.closest_range_option("height", 172).unwrap();
        assert_eq!(closest.value, 170);
        assert!(catalog.closest_range_option("mood", 10).is_none());
    }

    #[test]
    fn closest_ties_keep_the_earlier_entry() {
        let mut catalog = Catalog::empty();
        catalog
            .add_range_option("waist", RangeOption::new("narrow", "Narrow", 40))
            .unwrap();
        catalog
            .add_range_option("waist", RangeOption::new("wide", "Wide", 60))
            .unwrap();
        // 50 is equidistant; the scan keeps the first entry.
        assert_eq!(
            catalog.closest_range_option("waist", 50).unwrap().id,
            "narrow"
        );
    }

    #[test]
    fn visual_age_three_way_rule() {
        assert_eq!(
            resolve_visual_age(30, &RangeOption::new("true", "True Age", 0)),
            30
        );
        assert_eq!(
            resolve_visual_age(30, &RangeOption::new("abs", "Absolute", 45)),
            45
        );
        assert_eq!(
            resolve_visual_age(30, &RangeOption::new("older", "Older", -5)),
            35
        );
    }

    #[test]
    fn option_label_falls_back_to_id() {
        let catalog = fixture();
        assert_eq!(catalog.option_label("skin", "olive"), "Olive");
        assert_eq!(catalog.option_label("skin", "ghost"), "ghost");
    }
}
