//! Keeping characters consistent with a moving catalog: repair after catalog
//! edits, version-gated migration of imported records, and full
//! randomization.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::catalog::Catalog;
use crate::character::{Character, Field, FieldValue};
use crate::resolve::resolve_visual_age_value;

/// Fields touched by a repair pass.
pub type RepairedFields = SmallVec<[Field; 4]>;

const FIRST_NAMES: [&str; 10] = [
    "Alex", "Jordan", "Casey", "Morgan", "Taylor", "Riley", "Jamie", "Avery", "Quinn", "Sam",
];

const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];

/// Reset every discrete field whose value the catalog no longer knows back to
/// the catalog default. Fields whose property is missing from the catalog
/// entirely are left alone. Direct assignment; no history entries.
pub fn reconcile(character: &mut Character, catalog: &Catalog) -> RepairedFields {
    let mut repaired = RepairedFields::new();
    for field in Field::DISCRETE {
        let property = field.as_str();
        if !catalog.has_property(property) {
            continue;
        }
        if let FieldValue::Text(current) = character.value_of(field) {
            if !catalog.is_valid_option(property, &current) {
                character.set(field, FieldValue::Text(catalog.default_option(property)));
                repaired.push(field);
            }
        }
    }
    repaired
}

/// Best-effort migration of a record persisted by an older build: apply the
/// known renames for pre-1.0 documents, then run the repair pass. Versions
/// compare lexicographically.
pub fn migrate(
    character: &mut Character,
    catalog: &Catalog,
    from_version: &str,
) -> RepairedFields {
    if from_version < "1.0" && character.race == "asian" {
        character.race = "east_asian".to_string();
    }
    reconcile(character, catalog)
}

/// A fully randomized character: uniform name draw from the fixed pools, one
/// uniform sample per catalog property, and the sign rule applied to the
/// sampled visual age.
pub fn random_character<R: Rng + ?Sized>(
    catalog: &Catalog,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Character {
    let mut character = Character::new(catalog, now);

    if let Some(name) = FIRST_NAMES.choose(rng) {
        character.name = (*name).to_string();
    }
    if let Some(surname) = LAST_NAMES.choose(rng) {
        character.surname = (*surname).to_string();
    }

    let discrete: Vec<(Field, String)> = catalog
        .discrete_properties()
        .filter_map(|property| Field::from_str(property).ok().map(|f| (f, property.to_string())))
        .collect();
    for (field, property) in discrete {
        if let Some(option) = catalog.active_options(&property).choose(rng) {
            character.set(field, FieldValue::from(option.id.clone()));
        }
    }

    let ranges: Vec<(Field, String)> = catalog
        .range_properties()
        .filter_map(|property| Field::from_str(property).ok().map(|f| (f, property.to_string())))
        .collect();
    for (field, property) in ranges {
        if let Some(option) = catalog.active_range_options(&property).choose(rng) {
            character.set(field, FieldValue::from(option.value));
        }
    }

    // The sampled visual age is a raw preset value; push it through the
    // shared sign rule so zero and negative presets land relative to the
    // sampled actual age.
    character.visual_age = resolve_visual_age_value(character.actual_age, character.visual_age);

    character
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CharacterOption, RangeOption};
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn fixture() -> Catalog {
        let mut catalog = Catalog::empty();
        catalog
            .add_option("race", CharacterOption::new_default("caucasian", "Caucasian"))
            .unwrap();
        catalog
            .add_option("race", CharacterOption::new("african", "African"))
            .unwrap();
        catalog
            .add_option("skin", CharacterOption::new_default("fair", "Fair"))
            .unwrap();
        catalog
            .add_range_option(
                "actualAge",
                RangeOption::new_default("young_adult", "Young Adult", 21),
            )
            .unwrap();
        catalog
            .add_range_option("actualAge", RangeOption::new("older", "Older", 60))
            .unwrap();
        catalog
            .add_range_option(
                "visualAge",
                RangeOption::new("appears_younger", "Appears Younger", 18),
            )
            .unwrap();
        catalog
            .add_range_option(
                "visualAge",
                RangeOption::new_default("appears_true", "True Age", 0),
            )
            .unwrap();
        catalog
            .add_range_option(
                "visualAge",
                RangeOption::new("appears_older", "Appears Older", -5),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn reconcile_resets_only_invalid_fields() {
        let catalog = fixture();
        let mut character = Character::new(&catalog, now());
        character.race = "martian".into();
        character.skin = "fair".into();
        // No "career" property in this catalog, so the field is untouched.
        character.career = "astronaut".into();

        let repaired = reconcile(&mut character, &catalog);
        assert_eq!(repaired.as_slice(), &[Field::Race]);
        assert_eq!(character.race, "caucasian");
        assert_eq!(character.skin, "fair");
        assert_eq!(character.career, "astronaut");
    }

    #[test]
    fn reconcile_keeps_deprecated_assignments() {
        let mut catalog = fixture();
        catalog.deprecate_option("race", "african").unwrap();
        let mut character = Character::new(&catalog, now());
        character.race = "african".into();
        let repaired = reconcile(&mut character, &catalog);
        assert!(repaired.is_empty());
        assert_eq!(character.race, "african");
    }

    #[test]
    fn migrate_renames_pre_one_zero_race_ids() {
        let mut catalog = fixture();
        catalog
            .add_option("race", CharacterOption::new("east_asian", "East Asian"))
            .unwrap();
        let mut character = Character::new(&catalog, now());
        character.race = "asian".into();
        migrate(&mut character, &catalog, "0.9");
        assert_eq!(character.race, "east_asian");

        let mut unmigrated = Character::new(&catalog, now());
        unmigrated.race = "asian".into();
        // From 1.0 the rename no longer applies; the repair pass resets the
        // unknown id to the default instead.
        migrate(&mut unmigrated, &catalog, "1.0");
        assert_eq!(unmigrated.race, "caucasian");
    }

    #[test]
    fn random_character_samples_valid_options() {
        let catalog = fixture();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..32 {
            let character = random_character(&catalog, &mut rng, now());
            assert!(FIRST_NAMES.contains(&character.name.as_str()));
            assert!(LAST_NAMES.contains(&character.surname.as_str()));
            assert!(catalog.is_valid_option("race", &character.race));
            assert!(catalog.is_valid_option("skin", &character.skin));
            assert!([21, 60].contains(&character.actual_age));
        }
    }

    #[test]
    fn random_visual_age_never_undershoots_on_zero_or_negative_presets() {
        let catalog = fixture();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..64 {
            let character = random_character(&catalog, &mut rng, now());
            // Presets are 18 (absolute), 0 (match) and -5 (offset); the two
            // non-positive ones must resolve to at least the actual age.
            assert!(
                character.visual_age == 18
                    || character.visual_age >= character.actual_age
            );
            if character.visual_age != 18 {
                let delta = character.visual_age - character.actual_age;
                assert!(delta == 0 || delta == 5);
            }
        }
    }

    #[test]
    fn random_sampling_skips_deprecated_options() {
        let mut catalog = fixture();
        catalog.deprecate_option("race", "african").unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..16 {
            let character = random_character(&catalog, &mut rng, now());
            assert_eq!(character.race, "caucasian");
        }
    }
}
