//! Dropdown for one range property. The preset closest to the current value
//! is preselected, so stored values that sit between presets still land on a
//! sensible entry.

use limn_core::{Field, FieldValue, RangeOption};
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct RangeSelectProps {
    pub label: AttrValue,
    pub field: Field,
    pub options: Vec<RangeOption>,
    pub value: i32,
    pub on_change: Callback<(Field, FieldValue)>,
}

#[function_component(RangeSelect)]
pub fn range_select(props: &RangeSelectProps) -> Html {
    let selected_id = props
        .options
        .iter()
        .min_by_key(|option| (i64::from(option.value) - i64::from(props.value)).abs())
        .map(|option| option.id.clone())
        .unwrap_or_default();

    let on_change = {
        let cb = props.on_change.clone();
        let field = props.field;
        let options = props.options.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
            else {
                return;
            };
            if let Some(option) = options.iter().find(|option| option.id == select.value()) {
                cb.emit((field, FieldValue::from(option.value)));
            }
        })
    };

    let id = format!("field-{}", props.field);
    html! {
        <div class="field-row">
            <label for={id.clone()}>{ props.label.clone() }</label>
            <select id={id} onchange={on_change} data-testid={format!("select-{}", props.field)}>
                { for props.options.iter().map(|option| html! {
                    <option
                        value={option.id.clone()}
                        selected={option.id == selected_id}
                    >
                        { option.label.clone() }
                    </option>
                }) }
            </select>
        </div>
    }
}
