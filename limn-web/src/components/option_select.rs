//! Dropdown for one discrete property, built from the active option list.

use limn_core::{CharacterOption, Field, FieldValue};
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct OptionSelectProps {
    pub label: AttrValue,
    pub field: Field,
    pub options: Vec<CharacterOption>,
    pub value: AttrValue,
    pub on_change: Callback<(Field, FieldValue)>,
}

#[function_component(OptionSelect)]
pub fn option_select(props: &OptionSelectProps) -> Html {
    let on_change = {
        let cb = props.on_change.clone();
        let field = props.field;
        Callback::from(move |e: Event| {
            if let Some(select) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
            {
                cb.emit((field, FieldValue::from(select.value())));
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
                        selected={option.id.as_str() == props.value.as_str()}
                    >
                        { option.label.clone() }
                    </option>
                }) }
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn renders_active_options_and_marks_the_selection() {
        let props = OptionSelectProps {
            label: AttrValue::from("Skin"),
            field: Field::Skin,
            options: vec![
                CharacterOption::new_default("fair", "Fair"),
                CharacterOption::new("olive", "Olive"),
            ],
            value: AttrValue::from("olive"),
            on_change: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<OptionSelect>::with_props(props).render());
        assert!(html.contains("Fair"));
        assert!(html.contains("Olive"));
        assert!(html.contains("select-skin"));
    }
}
