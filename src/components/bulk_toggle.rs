//! Bulk Toggle Component
//!
//! "Select all" checkbox for a row, a round column, or a whole pane.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::CheckinContext;
use crate::models::{BulkToggle, ToggleScope};
use crate::selection;
use crate::store::AppStateStoreFields;
use crate::sync::Trigger;

fn scope_name(scope: ToggleScope) -> &'static str {
    match scope {
        ToggleScope::Row(_) => "row",
        ToggleScope::Column(_) => "column",
        ToggleScope::Pane => "pane",
    }
}

/// Bulk toggle checkbox; its checked state always comes from the store
#[component]
pub fn BulkToggleBox(toggle: BulkToggle) -> impl IntoView {
    let ctx = expect_context::<CheckinContext>();
    let store = ctx.store;
    let state = move || store.checkins().read().toggle(toggle);
    let round_attr = match toggle.scope {
        ToggleScope::Column(round) => Some(round.to_string()),
        _ => None,
    };

    let on_change = move |ev: web_sys::Event| {
        let desired = event_target_checked(&ev);
        let targets = selection::toggle_targets(&store.checkins().read_untracked(), toggle);
        if !ctx.submit(targets, desired, Some(Trigger::Toggle(toggle))) {
            // Nothing went out; put the box back to what the store says
            if let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            {
                input.set_checked(store.checkins().read_untracked().toggle(toggle).checked);
            }
        }
    };

    view! {
        <input
            type="checkbox"
            class="bulk-toggle"
            data-toggle-scope=scope_name(toggle.scope)
            data-entity-type=toggle.entity_type.as_str()
            data-round-number=round_attr
            prop:checked=move || state().checked
            prop:disabled=move || state().disabled
            on:change=on_change
        />
    }
}
