//! Quick Search Component
//!
//! Filters rows on every keystroke; toggles are reconciled once typing pauses.

use leptos::prelude::*;

use crate::context::CheckinContext;
use crate::store::AppStateStoreFields;
use crate::sync::CheckinState;
use crate::timer::{BrowserScheduler, CancellableTimer};

#[component]
pub fn QuickSearch() -> impl IntoView {
    let ctx = expect_context::<CheckinContext>();
    let store = ctx.store;
    let debounce = StoredValue::new_local(CancellableTimer::new(
        BrowserScheduler,
        ctx.config.search_debounce_ms,
    ));

    on_cleanup(move || {
        debounce.try_update_value(|timer| timer.cancel());
    });

    let on_input = move |ev: web_sys::Event| {
        let query = event_target_value(&ev);
        let visible = store.with_store(|s| s.apply_search(&query));
        log::debug!("[SEARCH] '{}' -> {:?} visible rows", query, visible);
        store.query().set(query);

        let ctx = ctx.clone();
        debounce.update_value(|timer| timer.start(move || ctx.refresh(None)));
    };

    view! {
        <input
            id="quick-search"
            class="quick-search"
            type="search"
            placeholder="Search"
            autocomplete="off"
            prop:value=move || store.query().get()
            on:input=on_input
        />
    }
}
