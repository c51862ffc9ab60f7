//! Root component: one shared catalog, the active character, the saved
//! roster, and the toolbar that drives persistence and import/export.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::components::{
    AdminPanel, OptionSelect, PreviewPanel, RangeSelect, RosterPanel, TextField,
};
use crate::dom;
use crate::storage::{
    BuilderEngine, Catalog, CatalogChange, Character, CharacterOption, Field, FieldPatch,
    FieldValue, OptionPatch, Roster, WebProfileStore, builtin_catalog, create_web_engine,
    random_character, reconcile, resolve_visual_age_value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Profile,
    Body,
    Style,
    Actions,
    Options,
}

impl Tab {
    const ALL: [Self; 5] = [
        Self::Profile,
        Self::Body,
        Self::Style,
        Self::Actions,
        Self::Options,
    ];

    const fn title(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Body => "Body",
            Self::Style => "Style",
            Self::Actions => "Actions",
            Self::Options => "Options",
        }
    }
}

fn text_value(character: &Character, field: Field) -> String {
    match character.value_of(field) {
        FieldValue::Text(text) => text,
        FieldValue::Int(n) => n.to_string(),
    }
}

/// Re-run the repair pass on the active character after a catalog edit and
/// publish it when anything actually changed.
fn repair_active(character: &UseStateHandle<Character>, catalog: &Rc<RefCell<Catalog>>) {
    let mut current = (**character).clone();
    let repaired = reconcile(&mut current, &catalog.borrow());
    if !repaired.is_empty() {
        log::info!("catalog change repaired fields: {repaired:?}");
        character.set(current);
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let engine: Rc<BuilderEngine<WebProfileStore>> = use_memo((), |_| create_web_engine());
    let catalog = use_mut_ref(builtin_catalog);
    let catalog_rev = use_state(|| 0u32);
    let character = use_state(|| Character::new(&catalog.borrow(), Utc::now()));
    let roster = use_state(Roster::empty);
    let tab = use_state(|| Tab::Profile);
    let status = use_state(|| Option::<String>::None);
    let admin_property = use_state(|| String::from("nationality"));

    // One-time bootstrap: subscribe to catalog changes, then pull persisted
    // state in over the built-in defaults.
    {
        let engine = Rc::clone(&engine);
        let catalog = Rc::clone(&catalog);
        let catalog_rev = catalog_rev.clone();
        let character = character.clone();
        let roster = roster.clone();
        use_effect_with((), move |()| {
            let bump = Rc::new(Cell::new(0u32));
            {
                let catalog_rev = catalog_rev.clone();
                let bump = Rc::clone(&bump);
                catalog.borrow_mut().subscribe(move |change| {
                    if let CatalogChange::Property(name) = change {
                        log::debug!("catalog changed: {name}");
                    }
                    bump.set(bump.get() + 1);
                    catalog_rev.set(bump.get());
                });
            }

            match engine.restore_catalog(&mut catalog.borrow_mut()) {
                Ok(true) => log::info!("restored stored option catalog"),
                Ok(false) => log::info!("no stored options, using built-in defaults"),
                Err(err) => log::warn!("failed to restore options: {err}"),
            }
            match engine.load_roster() {
                Ok(stored) => {
                    let mut fresh = Character::new(&catalog.borrow(), Utc::now());
                    fresh.id = stored.next_id();
                    roster.set(stored);
                    character.set(fresh);
                }
                Err(err) => log::warn!("failed to load saved characters: {err}"),
            }
            || {}
        });
    }

    let on_field = {
        let character = character.clone();
        Callback::from(move |(field, value): (Field, FieldValue)| {
            let mut next = (*character).clone();
            let mut patch = FieldPatch::new();
            match (field, value) {
                // Visual-age presets carry the raw sign-rule value; resolve
                // against the current actual age before storing.
                (Field::VisualAge, FieldValue::Int(raw)) => {
                    let raw = i32::try_from(raw).unwrap_or(0);
                    patch.insert(
                        Field::VisualAge,
                        FieldValue::from(resolve_visual_age_value(next.actual_age, raw)),
                    );
                }
                // A visual age that tracked the actual age keeps tracking it.
                (Field::ActualAge, FieldValue::Int(new_age)) => {
                    let new_age = i32::try_from(new_age).unwrap_or(next.actual_age);
                    patch.insert(Field::ActualAge, FieldValue::from(new_age));
                    if next.visual_age == next.actual_age {
                        patch.insert(Field::VisualAge, FieldValue::from(new_age));
                    }
                }
                (field, value) => {
                    patch.insert(field, value);
                }
            }
            next.update_fields(&patch, Utc::now());
            character.set(next);
        })
    };

    let on_new = {
        let catalog = Rc::clone(&catalog);
        let character = character.clone();
        let roster = roster.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| {
            let mut fresh = Character::new(&catalog.borrow(), Utc::now());
            fresh.id = roster.next_id();
            character.set(fresh);
            status.set(Some("Started a new character.".to_string()));
        })
    };

    let on_randomize = {
        let catalog = Rc::clone(&catalog);
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| {
            let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
            let mut random = random_character(&catalog.borrow(), &mut rng, Utc::now());
            random.id = character.id;
            character.set(random);
            status.set(Some("Rolled a random character.".to_string()));
        })
    };

    let on_save_character = {
        let engine = Rc::clone(&engine);
        let character = character.clone();
        let roster = roster.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*character).clone();
            if next.id == 0 {
                next.id = roster.next_id();
            }
            let mut updated = (*roster).clone();
            updated.upsert(next.clone());
            match engine.save_roster(&updated) {
                Ok(()) => {
                    roster.set(updated);
                    character.set(next);
                    status.set(Some("Character saved.".to_string()));
                }
                Err(err) => {
                    log::error!("saving roster failed: {err}");
                    status.set(Some(format!("Save failed: {err}")));
                }
            }
        })
    };

    let on_load_character = {
        let catalog = Rc::clone(&catalog);
        let character = character.clone();
        let roster = roster.clone();
        let status = status.clone();
        Callback::from(move |id: u32| {
            let Some(stored) = roster.get(id).cloned() else {
                return;
            };
            let mut loaded = stored;
            let repaired = reconcile(&mut loaded, &catalog.borrow());
            if !repaired.is_empty() {
                log::info!("loaded character needed repair: {repaired:?}");
            }
            character.set(loaded);
            status.set(Some(format!("Loaded character {id}.")));
        })
    };

    let on_delete_character = {
        let engine = Rc::clone(&engine);
        let roster = roster.clone();
        let status = status.clone();
        Callback::from(move |id: u32| {
            let mut updated = (*roster).clone();
            if !updated.remove(id) {
                return;
            }
            match engine.save_roster(&updated) {
                Ok(()) => {
                    roster.set(updated);
                    status.set(Some(format!("Deleted character {id}.")));
                }
                Err(err) => {
                    log::error!("deleting character failed: {err}");
                    status.set(Some(format!("Delete failed: {err}")));
                }
            }
        })
    };

    let on_export = {
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| {
            let current = (*character).clone();
            match current.to_json() {
                Ok(json) => {
                    let filename = format!("{}.json", current.export_filename());
                    match dom::download_text(&filename, &json) {
                        Ok(()) => status.set(Some(format!("Exported {filename}."))),
                        Err(err) => {
                            let message = dom::js_error_message(&err);
                            dom::console_error(&message);
                            status.set(Some(format!("Export failed: {message}")));
                        }
                    }
                }
                Err(err) => status.set(Some(format!("Export failed: {err}"))),
            }
        })
    };

    let on_import_file = {
        let catalog = Rc::clone(&catalog);
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let catalog = Rc::clone(&catalog);
            let character = character.clone();
            let status = status.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match wasm_bindgen_futures::JsFuture::from(file.text()).await {
                    Ok(value) => {
                        let text = value.as_string().unwrap_or_default();
                        match Character::from_json(&text) {
                            Ok(mut imported) => {
                                let repaired = reconcile(&mut imported, &catalog.borrow());
                                if !repaired.is_empty() {
                                    log::info!("imported character needed repair: {repaired:?}");
                                }
                                character.set(imported);
                                status.set(Some("Character imported.".to_string()));
                            }
                            Err(err) => {
                                log::warn!("character import failed: {err}");
                                status.set(Some(
                                    "Import failed: not a character document.".to_string(),
                                ));
                            }
                        }
                    }
                    Err(err) => {
                        status.set(Some(format!(
                            "Import failed: {}",
                            dom::js_error_message(&err)
                        )));
                    }
                }
            });
            // Allow picking the same file again later.
            input.set_value("");
        })
    };

    let on_admin_select = {
        let admin_property = admin_property.clone();
        Callback::from(move |property: String| admin_property.set(property))
    };

    let on_admin_add = {
        let catalog = Rc::clone(&catalog);
        let admin_property = admin_property.clone();
        let status = status.clone();
        Callback::from(move |option: CharacterOption| {
            let label = option.label.clone();
            let result = catalog.borrow_mut().add_option(&admin_property, option);
            match result {
                Ok(()) => status.set(Some(format!("Added option {label}."))),
                Err(err) => status.set(Some(format!("Add failed: {err}"))),
            }
        })
    };

    let on_admin_make_default = {
        let catalog = Rc::clone(&catalog);
        let admin_property = admin_property.clone();
        let status = status.clone();
        Callback::from(move |id: String| {
            let result =
                catalog
                    .borrow_mut()
                    .update_option(&admin_property, &id, OptionPatch::make_default());
            if let Err(err) = result {
                status.set(Some(format!("Update failed: {err}")));
            }
        })
    };

    let on_admin_deprecate = {
        let catalog = Rc::clone(&catalog);
        let admin_property = admin_property.clone();
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |id: String| {
            let result = catalog.borrow_mut().deprecate_option(&admin_property, &id);
            match result {
                Ok(()) => repair_active(&character, &catalog),
                Err(err) => status.set(Some(format!("Deprecate failed: {err}"))),
            }
        })
    };

    let on_admin_remove = {
        let catalog = Rc::clone(&catalog);
        let admin_property = admin_property.clone();
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |id: String| {
            let result = catalog.borrow_mut().remove_option(&admin_property, &id);
            match result {
                Ok(()) => repair_active(&character, &catalog),
                Err(err) => status.set(Some(format!("Remove failed: {err}"))),
            }
        })
    };

    let on_admin_save = {
        let engine = Rc::clone(&engine);
        let catalog = Rc::clone(&catalog);
        let status = status.clone();
        Callback::from(move |()| {
            let result = engine.save_catalog(&catalog.borrow(), Utc::now());
            match result {
                Ok(()) => status.set(Some("Options saved.".to_string())),
                Err(err) => {
                    log::error!("saving options failed: {err}");
                    status.set(Some(format!("Saving options failed: {err}")));
                }
            }
        })
    };

    let on_admin_reset = {
        let catalog = Rc::clone(&catalog);
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |()| {
            let doc = builtin_catalog().export_doc();
            catalog.borrow_mut().import_doc(doc);
            repair_active(&character, &catalog);
            status.set(Some("Options reset to defaults.".to_string()));
        })
    };

    let on_admin_export = {
        let catalog = Rc::clone(&catalog);
        let status = status.clone();
        Callback::from(move |()| {
            let json = catalog.borrow().export_doc().to_json();
            match json {
                Ok(json) => match dom::download_text("limn_options.json", &json) {
                    Ok(()) => status.set(Some("Exported limn_options.json.".to_string())),
                    Err(err) => {
                        let message = dom::js_error_message(&err);
                        dom::console_error(&message);
                        status.set(Some(format!("Export failed: {message}")));
                    }
                },
                Err(err) => status.set(Some(format!("Export failed: {err}"))),
            }
        })
    };

    let on_admin_import = {
        let catalog = Rc::clone(&catalog);
        let character = character.clone();
        let status = status.clone();
        Callback::from(move |text: String| {
            let result = catalog.borrow_mut().import_json(&text);
            match result {
                Ok(()) => {
                    repair_active(&character, &catalog);
                    status.set(Some("Catalog imported.".to_string()));
                }
                Err(err) => status.set(Some(format!("Import failed: {err}"))),
            }
        })
    };

    // Rebuilding the select lists below depends on the observer bump, not
    // just on character state.
    let _rev = *catalog_rev;

    let active = (*character).clone();
    let shared = catalog.borrow();

    let select = |field: Field, label: &str| -> Html {
        html! {
            <OptionSelect
                label={AttrValue::from(label.to_string())}
                field={field}
                options={shared.active_options(field.as_str())}
                value={AttrValue::from(text_value(&active, field))}
                on_change={on_field.clone()}
            />
        }
    };
    let range = |field: Field, label: &str, value: i32| -> Html {
        html! {
            <RangeSelect
                label={AttrValue::from(label.to_string())}
                field={field}
                options={shared.active_range_options(field.as_str())}
                value={value}
                on_change={on_field.clone()}
            />
        }
    };
    let text = |field: Field, label: &str| -> Html {
        html! {
            <TextField
                label={AttrValue::from(label.to_string())}
                field={field}
                value={AttrValue::from(text_value(&active, field))}
                on_change={on_field.clone()}
            />
        }
    };

    let action_options: Vec<CharacterOption> = shared
        .active_action_options()
        .into_iter()
        .map(|action| CharacterOption {
            id: action.id,
            label: action.label,
            is_default: action.is_default,
            is_deprecated: action.is_deprecated,
        })
        .collect();

    let tab_body = match *tab {
        Tab::Profile => html! {
            <>
                { text(Field::Name, "First name") }
                { text(Field::Surname, "Surname") }
                { select(Field::Nationality, "Nationality") }
                { select(Field::Race, "Race") }
                { select(Field::Career, "Career") }
                { range(Field::ActualAge, "Actual age", active.actual_age) }
                { range(Field::VisualAge, "Visual age", active.visual_age) }
            </>
        },
        Tab::Body => html! {
            <>
                { select(Field::Skin, "Skin") }
                { range(Field::Height, "Height", active.height) }
                { range(Field::Weight, "Weight", active.weight) }
                { range(Field::Waist, "Waist", active.waist) }
                { range(Field::Muscles, "Muscles", active.muscles) }
                { range(Field::Boobs, "Chest", active.boobs) }
                { range(Field::Hips, "Hips", active.hips) }
                { range(Field::Butt, "Butt", active.butt) }
            </>
        },
        Tab::Style => html! {
            <>
                { select(Field::Hair, "Hair color") }
                { select(Field::HStyle, "Hair style") }
                { range(Field::HLength, "Hair length", active.h_length) }
                { select(Field::Eyes, "Eyes") }
                { text(Field::Markings, "Markings") }
                { text(Field::Clothing, "Clothing") }
            </>
        },
        Tab::Actions => html! {
            <>
                <OptionSelect
                    label={AttrValue::from("Common actions")}
                    field={Field::Action}
                    options={action_options.clone()}
                    value={AttrValue::from(active.action.clone())}
                    on_change={on_field.clone()}
                />
                { text(Field::Action, "Current action") }
            </>
        },
        Tab::Options => html! {
            <AdminPanel
                properties={shared
                    .discrete_properties()
                    .map(|name| AttrValue::from(name.to_string()))
                    .collect::<Vec<_>>()}
                selected={AttrValue::from((*admin_property).clone())}
                options={shared.options_for(&admin_property)}
                on_select={on_admin_select.clone()}
                on_add={on_admin_add.clone()}
                on_make_default={on_admin_make_default.clone()}
                on_deprecate={on_admin_deprecate.clone()}
                on_remove={on_admin_remove.clone()}
                on_save={on_admin_save.clone()}
                on_reset={on_admin_reset.clone()}
                on_export={on_admin_export.clone()}
                on_import={on_admin_import.clone()}
            />
        },
    };

    let tabs = Tab::ALL.iter().map(|&entry| {
        let tab = tab.clone();
        let class = if *tab == entry { "tab active" } else { "tab" };
        let onclick = Callback::from(move |_| tab.set(entry));
        html! {
            <button class={class} onclick={onclick}>{ entry.title() }</button>
        }
    });

    html! {
        <div class="limn-app">
            <header>
                <h1>{ "Limn" }</h1>
                <div class="toolbar">
                    <button onclick={on_new}>{ "New" }</button>
                    <button onclick={on_randomize}>{ "Randomize" }</button>
                    <button onclick={on_save_character}>{ "Save character" }</button>
                    <button onclick={on_export}>{ "Export" }</button>
                    <label class="import-label">
                        { "Import" }
                        <input type="file" accept="application/json" onchange={on_import_file} />
                    </label>
                </div>
            </header>
            <nav class="tabs">{ for tabs }</nav>
            <main>
                <section class="form-panel">{ tab_body }</section>
                <PreviewPanel character={active.clone()} />
                <RosterPanel
                    roster={(*roster).clone()}
                    active_id={active.id}
                    on_load={on_load_character}
                    on_delete={on_delete_character}
                />
            </main>
            <footer data-testid="status">
                { (*status).clone().unwrap_or_default() }
            </footer>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    use super::App;

    #[test]
    fn app_renders_builder_shell_with_builtin_defaults() {
        let html = block_on(LocalServerRenderer::<App>::new().render());
        assert!(html.contains("Limn"));
        assert!(html.contains("Preview"));
        assert!(html.contains("Stateless"));
        assert!(html.contains("No characters saved yet."));
    }
}
