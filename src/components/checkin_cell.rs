//! Check-in Cell Component
//!
//! One (entity, round) checkbox with its label, wired for drag selection.

use leptos::prelude::*;
use leptos_dragselect::*;
use wasm_bindgen::JsCast;

use crate::context::CheckinContext;
use crate::models::{checkin_label, ItemKey};
use crate::selection;
use crate::store::AppStateStoreFields;
use crate::sync::Trigger;

#[component]
pub fn CheckinCell(
    slot: ItemKey,
    cell: CellCoord,
    drag: DragSignals,
    on_release: Callback<DragRelease>,
) -> impl IntoView {
    let ctx = expect_context::<CheckinContext>();
    let store = ctx.store;

    let checked = move || store.checkins().read().is_checked(slot);
    let busy = move || store.checkins().read().is_item_busy(slot);
    let checked_now = move || store.checkins().read_untracked().is_checked(slot);

    // Drag handlers
    let on_mousedown = make_on_cell_mousedown(drag, cell, checked_now);
    let on_mousemove = make_on_cell_mousemove(drag, cell);
    let on_mouseup = make_on_cell_mouseup(drag, cell, move |release| on_release.run(release));

    let cell_class = move || {
        if drag.covers(cell) {
            "checkin-cell drag-selecting"
        } else {
            "checkin-cell"
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let desired = event_target_checked(&ev);
        let targets = selection::item_targets(&store.checkins().read_untracked(), slot);
        if !ctx.submit(targets, desired, Some(Trigger::Item(slot))) {
            if let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            {
                input.set_checked(store.checkins().read_untracked().is_checked(slot));
            }
        }
    };

    let dom_id = slot.dom_id();

    view! {
        <td
            class=cell_class
            on:mousedown=on_mousedown
            on:mousemove=on_mousemove
            on:mouseup=on_mouseup
        >
            <input
                type="checkbox"
                id=dom_id.clone()
                class=format!("{}-checkin-toggle", slot.entity_type)
                data-entity-type=slot.entity_type.as_str()
                data-entity-id=slot.entity_id.to_string()
                data-round-number=slot.round.map(|r| r.to_string())
                prop:checked=checked
                prop:disabled=busy
                on:change=on_change
            />
            <label for=dom_id>{move || checkin_label(checked())}</label>
        </td>
    }
}
