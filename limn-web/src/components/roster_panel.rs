//! Saved-character list with load and delete controls.

use limn_core::Roster;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct RosterPanelProps {
    pub roster: Roster,
    pub active_id: u32,
    pub on_load: Callback<u32>,
    pub on_delete: Callback<u32>,
}

#[function_component(RosterPanel)]
pub fn roster_panel(props: &RosterPanelProps) -> Html {
    if props.roster.is_empty() {
        return html! {
            <section class="roster-panel">
                <h2>{ "Saved characters" }</h2>
                <p>{ "No characters saved yet." }</p>
            </section>
        };
    }

    html! {
        <section class="roster-panel">
            <h2>{ "Saved characters" }</h2>
            <ul data-testid="roster">
                { for props.roster.iter().map(|character| {
                    let id = character.id;
                    let title = {
                        let full = format!("{} {}", character.name, character.surname);
                        let full = full.trim().to_string();
                        if full.is_empty() {
                            format!("Character {id}")
                        } else {
                            full
                        }
                    };
                    let on_load = {
                        let cb = props.on_load.clone();
                        Callback::from(move |_| cb.emit(id))
                    };
                    let on_delete = {
                        let cb = props.on_delete.clone();
                        Callback::from(move |_| cb.emit(id))
                    };
                    let marker = if id == props.active_id { " (editing)" } else { "" };
                    html! {
                        <li key={id}>
                            <span>{ format!("{title}{marker}") }</span>
                            <button onclick={on_load}>{ "Load" }</button>
                            <button onclick={on_delete}>{ "Delete" }</button>
                        </li>
                    }
                }) }
            </ul>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use limn_core::{Catalog, Character};
    use yew::LocalServerRenderer;

    fn roster() -> Roster {
        let now = chrono::Utc::now();
        let mut roster = Roster::empty();
        let mut a = Character::new(&Catalog::empty(), now);
        a.id = 1;
        a.name = "Riley".into();
        a.surname = "Jones".into();
        roster.upsert(a);
        let mut b = Character::new(&Catalog::empty(), now);
        b.id = 2;
        roster.upsert(b);
        roster
    }

    #[test]
    fn lists_names_with_id_fallback() {
        let props = RosterPanelProps {
            roster: roster(),
            active_id: 1,
            on_load: Callback::noop(),
            on_delete: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<RosterPanel>::with_props(props).render());
        assert!(html.contains("Riley Jones (editing)"));
        assert!(html.contains("Character 2"));
    }

    #[test]
    fn empty_roster_shows_placeholder() {
        let props = RosterPanelProps {
            roster: Roster::empty(),
            active_id: 0,
            on_load: Callback::noop(),
            on_delete: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<RosterPanel>::with_props(props).render());
        assert!(html.contains("No characters saved yet."));
    }
}
