//! End-to-end flows over the shipped catalog: create, edit, persist, repair
//! and randomize, the way the web layer drives the core.

use std::cell::RefCell;
use std::convert::Infallible;

use chrono::{DateTime, TimeZone, Utc};
use limn_core::{
    BuilderEngine, Catalog, CatalogDoc, CatalogMeta, Character, Field, FieldPatch, FieldValue,
    ProfileStore, Roster, random_character, reconcile,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const OPTIONS_JSON: &str = include_str!("../../limn-web/static/assets/data/options.json");

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

#[derive(Default)]
struct MemoryStore {
    catalog: RefCell<Option<(CatalogDoc, CatalogMeta)>>,
    roster: RefCell<Option<Roster>>,
}

#[derive(Debug, thiserror::Error)]
#[error("memory store never fails")]
struct Never(#[from] Infallible);

impl ProfileStore for MemoryStore {
    type Error = Never;

    fn save_catalog(&self, doc: &CatalogDoc, meta: &CatalogMeta) -> Result<(), Never> {
        *self.catalog.borrow_mut() = Some((doc.clone(), meta.clone()));
        Ok(())
    }

    fn load_catalog(&self) -> Result<Option<CatalogDoc>, Never> {
        Ok(self.catalog.borrow().as_ref().map(|(doc, _)| doc.clone()))
    }

    fn save_roster(&self, roster: &Roster) -> Result<(), Never> {
        *self.roster.borrow_mut() = Some(roster.clone());
        Ok(())
    }

    fn load_roster(&self) -> Result<Option<Roster>, Never> {
        Ok(self.roster.borrow().clone())
    }
}

#[test]
fn new_character_takes_shipped_defaults() {
    let catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    let character = Character::new(&catalog, at(1, 9));
    assert_eq!(character.nationality, "stateless");
    assert_eq!(character.race, "caucasian");
    assert_eq!(character.career, "unemployed");
    assert_eq!(character.actual_age, 21);
    assert_eq!(character.height, 170);
    assert_eq!(character.weight, 70);
    assert_eq!(character.clothing, "no clothing");
    assert!(character.history.is_empty());
    assert_eq!(character.date_created, at(1, 9));
}

#[test]
fn edit_save_reload_keeps_history_and_description() {
    let catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    let engine = BuilderEngine::new(MemoryStore::default());

    let mut roster = engine.load_roster().unwrap();
    let mut character = Character::new(&catalog, at(1, 9));
    character.id = roster.next_id();
    character.update_fields(
        &FieldPatch::from([
            (Field::Name, FieldValue::from("Quinn")),
            (Field::Surname, FieldValue::from("Garcia")),
            (Field::Career, FieldValue::from("doctor")),
            (Field::ActualAge, FieldValue::from(45)),
            (Field::VisualAge, FieldValue::from(45)),
        ]),
        at(1, 10),
    );
    roster.upsert(character.clone());
    engine.save_roster(&roster).unwrap();

    let reloaded = engine.load_roster().unwrap();
    let stored = reloaded.get(1).unwrap();
    assert_eq!(stored, &character);
    assert_eq!(stored.history.len(), 1);
    assert_eq!(stored.history[0].changes.len(), 5);

    let text = stored.describe();
    assert!(text.starts_with("Quinn Garcia is a 45-year-old stateless caucasian"));
    assert!(text.contains("They work as a doctor."));
}

#[test]
fn catalog_edit_then_reconcile_repairs_stale_assignments() {
    let mut catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    let mut character = Character::new(&catalog, at(2, 9));
    character.race = "hispanic".into();

    catalog.remove_option("race", "hispanic").unwrap();
    assert!(!catalog.is_valid_option("race", "hispanic"));

    let repaired = reconcile(&mut character, &catalog);
    assert_eq!(repaired.as_slice(), &[Field::Race]);
    assert_eq!(character.race, "caucasian");

    // A second pass finds nothing left to repair.
    assert!(reconcile(&mut character, &catalog).is_empty());
}

#[test]
fn catalog_persists_through_engine_and_observers_survive_restore() {
    let engine = BuilderEngine::new(MemoryStore::default());
    let mut catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    catalog.deprecate_option("hair", "red").unwrap();
    engine.save_catalog(&catalog, at(3, 9)).unwrap();

    let mut restored = Catalog::empty();
    assert!(engine.restore_catalog(&mut restored).unwrap());
    assert_eq!(restored, catalog);
    assert!(restored.is_valid_option("hair", "red"));
    assert!(
        !restored
            .active_options("hair")
            .iter()
            .any(|option| option.id == "red")
    );
}

#[test]
fn randomized_characters_stay_inside_the_catalog() {
    let catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(0xC0FFEE);
    for _ in 0..64 {
        let character = random_character(&catalog, &mut rng, at(4, 9));
        for field in Field::DISCRETE {
            if let FieldValue::Text(value) = character.value_of(field) {
                assert!(
                    catalog.is_valid_option(field.as_str(), &value),
                    "{field} sampled unknown id {value}"
                );
            }
        }
        // Shipped visual-age presets are 18, 0 and -5; after the sign rule a
        // non-absolute draw can never undershoot the actual age.
        assert!(character.visual_age == 18 || character.visual_age >= character.actual_age);
    }
}
