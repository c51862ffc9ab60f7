//! Catalog management surface: per-property option editing plus whole-catalog
//! save, reset, export and import.

use limn_core::CharacterOption;
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct AdminPanelProps {
    pub properties: Vec<AttrValue>,
    pub selected: AttrValue,
    /// Full option list for the selected property, deprecated entries
    /// included - the admin surface shows everything.
    pub options: Vec<CharacterOption>,
    pub on_select: Callback<String>,
    pub on_add: Callback<CharacterOption>,
    pub on_make_default: Callback<String>,
    pub on_deprecate: Callback<String>,
    pub on_remove: Callback<String>,
    pub on_save: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_export: Callback<()>,
    pub on_import: Callback<String>,
}

fn input_value(e: &Event) -> Option<String> {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
}

#[function_component(AdminPanel)]
pub fn admin_panel(props: &AdminPanelProps) -> Html {
    let new_id = use_state(String::new);
    let new_label = use_state(String::new);
    let new_default = use_state(|| false);
    let import_text = use_state(String::new);

    let on_property_change = {
        let cb = props.on_select.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
            {
                cb.emit(select.value());
            }
        })
    };

    let on_id_change = {
        let new_id = new_id.clone();
        Callback::from(move |e: Event| {
            if let Some(value) = input_value(&e) {
                new_id.set(value);
            }
        })
    };
    let on_label_change = {
        let new_label = new_label.clone();
        Callback::from(move |e: Event| {
            if let Some(value) = input_value(&e) {
                new_label.set(value);
            }
        })
    };
    let on_default_toggle = {
        let new_default = new_default.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            {
                new_default.set(input.checked());
            }
        })
    };

    let on_add_click = {
        let cb = props.on_add.clone();
        let new_id = new_id.clone();
        let new_label = new_label.clone();
        let new_default = new_default.clone();
        Callback::from(move |_: MouseEvent| {
            if new_id.is_empty() {
                return;
            }
            let mut option = CharacterOption::new(&new_id, &new_label);
            option.is_default = *new_default;
            cb.emit(option);
            new_id.set(String::new());
            new_label.set(String::new());
            new_default.set(false);
        })
    };

    let on_import_text = {
        let import_text = import_text.clone();
        Callback::from(move |e: Event| {
            if let Some(area) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
            {
                import_text.set(area.value());
            }
        })
    };
    let on_import_click = {
        let cb = props.on_import.clone();
        let import_text = import_text.clone();
        Callback::from(move |_: MouseEvent| cb.emit((*import_text).clone()))
    };

    let rows = props.options.iter().map(|option| {
        let id = option.id.clone();
        let on_make_default = {
            let cb = props.on_make_default.clone();
            let id = id.clone();
            Callback::from(move |_| cb.emit(id.clone()))
        };
        let on_deprecate = {
            let cb = props.on_deprecate.clone();
            let id = id.clone();
            Callback::from(move |_| cb.emit(id.clone()))
        };
        let on_remove = {
            let cb = props.on_remove.clone();
            let id = id.clone();
            Callback::from(move |_| cb.emit(id.clone()))
        };
        let mut flags = String::new();
        if option.is_default {
            flags.push_str(" [default]");
        }
        if option.is_deprecated {
            flags.push_str(" [deprecated]");
        }
        html! {
            <li key={option.id.clone()}>
                <span>{ format!("{} ({}){flags}", option.label, option.id) }</span>
                <button onclick={on_make_default} disabled={option.is_default}>{ "Default" }</button>
                <button onclick={on_deprecate} disabled={option.is_deprecated}>{ "Deprecate" }</button>
                <button onclick={on_remove}>{ "Remove" }</button>
            </li>
        }
    });

    html! {
        <section class="admin-panel" data-testid="admin">
            <h2>{ "Options" }</h2>
            <div class="field-row">
                <label for="admin-property">{ "Property" }</label>
                <select id="admin-property" onchange={on_property_change}>
                    { for props.properties.iter().map(|name| html! {
                        <option
                            value={name.clone()}
                            selected={name.as_str() == props.selected.as_str()}
                        >
                            { name.clone() }
                        </option>
                    }) }
                </select>
            </div>
            <ul data-testid="admin-options">{ for rows }</ul>
            <div class="admin-add">
                <input placeholder="id" value={(*new_id).clone()} onchange={on_id_change} />
                <input placeholder="label" value={(*new_label).clone()} onchange={on_label_change} />
                <label>
                    <input type="checkbox" checked={*new_default} onchange={on_default_toggle} />
                    { "default" }
                </label>
                <button onclick={on_add_click}>{ "Add option" }</button>
            </div>
            <div class="admin-io">
                <button onclick={props.on_save.reform(|_| ())}>{ "Save options" }</button>
                <button onclick={props.on_reset.reform(|_| ())}>{ "Reset to defaults" }</button>
                <button onclick={props.on_export.reform(|_| ())}>{ "Export catalog" }</button>
            </div>
            <div class="admin-import">
                <textarea
                    placeholder="paste a catalog document"
                    value={(*import_text).clone()}
                    onchange={on_import_text}
                />
                <button onclick={on_import_click}>{ "Import catalog" }</button>
            </div>
        </section>
    }
}
