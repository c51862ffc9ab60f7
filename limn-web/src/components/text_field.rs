//! Labeled free-text input committing on change.

use limn_core::{Field, FieldValue};
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct TextFieldProps {
    pub label: AttrValue,
    pub field: Field,
    pub value: AttrValue,
    pub on_change: Callback<(Field, FieldValue)>,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let on_change = {
        let cb = props.on_change.clone();
        let field = props.field;
        Callback::from(move |e: Event| {
            if let Some(input) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            {
                cb.emit((field, FieldValue::from(input.value())));
            }
        })
    };

    let id = format!("field-{}", props.field);
    html! {
        <div class="field-row">
            <label for={id.clone()}>{ props.label.clone() }</label>
            <input
                id={id}
                type="text"
                value={props.value.clone()}
                onchange={on_change}
                data-testid={format!("input-{}", props.field)}
            />
        </div>
    }
}
