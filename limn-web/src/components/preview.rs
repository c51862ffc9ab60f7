//! Live description and body-mass readout for the active character.

use limn_core::Character;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct PreviewPanelProps {
    pub character: Character,
}

#[function_component(PreviewPanel)]
pub fn preview_panel(props: &PreviewPanelProps) -> Html {
    let character = &props.character;
    let bmi_line = match (character.bmi(), character.bmi_category()) {
        (Some(bmi), Some(category)) => format!("BMI {bmi:.1} ({category})"),
        _ => "BMI unavailable".to_string(),
    };

    html! {
        <aside class="preview-panel">
            <h2>{ "Preview" }</h2>
            <p data-testid="description">{ character.describe() }</p>
            <p data-testid="bmi">{ bmi_line }</p>
        </aside>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use limn_core::Catalog;
    use yew::LocalServerRenderer;

    #[test]
    fn shows_description_and_bmi() {
        let now = chrono::Utc::now();
        let mut character = Character::new(&Catalog::empty(), now);
        character.name = "Avery".into();
        character.height = 170;
        character.weight = 70;
        let html = block_on(
            LocalServerRenderer::<PreviewPanel>::with_props(PreviewPanelProps { character })
                .render(),
        );
        assert!(html.contains("Avery is"));
        assert!(html.contains("BMI 24.2 (Normal weight)"));
    }
}
