//! Shape checks over the shipped default option data.

use limn_core::{Catalog, CatalogDoc};

const OPTIONS_JSON: &str = include_str!("../../limn-web/static/assets/data/options.json");

#[test]
fn builtin_options_document_parses() {
    let doc = CatalogDoc::from_json(OPTIONS_JSON).expect("default options must parse");
    assert_eq!(doc.options.len(), 7);
    assert_eq!(doc.ranges.len(), 10);
    assert_eq!(doc.actions.len(), 10);
}

#[test]
fn every_property_ships_exactly_one_default() {
    let doc = CatalogDoc::from_json(OPTIONS_JSON).unwrap();
    for (property, list) in &doc.options {
        let defaults = list.iter().filter(|option| option.is_default).count();
        assert_eq!(defaults, 1, "property {property} has {defaults} defaults");
    }
    for (property, list) in &doc.ranges {
        let defaults = list.iter().filter(|option| option.is_default).count();
        assert_eq!(defaults, 1, "range {property} has {defaults} defaults");
    }
}

#[test]
fn option_ids_are_unique_within_their_lists() {
    let doc = CatalogDoc::from_json(OPTIONS_JSON).unwrap();
    for (property, list) in &doc.options {
        for (index, option) in list.iter().enumerate() {
            assert!(
                !list[..index].iter().any(|other| other.id == option.id),
                "duplicate id {} under {property}",
                option.id
            );
        }
    }
}

#[test]
fn builtin_defaults_resolve_as_shipped() {
    let catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    assert_eq!(catalog.default_option("nationality"), "stateless");
    assert_eq!(catalog.default_option("race"), "caucasian");
    assert_eq!(catalog.default_range_value("height"), 170);
    assert_eq!(catalog.default_range_value("actualAge"), 21);
    // The shipped visual-age default preset is the zero-valued "True Age"
    // entry, so the value fallthrough lands on the first entry.
    assert_eq!(catalog.default_range_value("visualAge"), 18);
}

#[test]
fn closest_height_query_over_shipped_presets() {
    let catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    let closest = catalog.closest_range_option("height", 172).unwrap();
    assert_eq!(closest.id, "average");
    assert_eq!(closest.value, 170);
}

#[test]
fn export_matches_shipped_document() {
    let catalog = Catalog::from_json(OPTIONS_JSON).unwrap();
    let exported = catalog.export_doc().to_json().unwrap();
    let reparsed = CatalogDoc::from_json(&exported).unwrap();
    assert_eq!(reparsed, CatalogDoc::from_json(OPTIONS_JSON).unwrap());
}
