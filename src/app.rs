//! Batch Check-in App
//!
//! Bootstraps the store from the embedded page data and lays out the panes.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::checkins::CheckinStore;
use crate::commands::{self, HttpBackend};
use crate::components::{CheckinTable, PaneTabBar, QuickSearch};
use crate::config::DATA_ELEMENT_ID;
use crate::context::CheckinContext;
use crate::reconcile;
use crate::store::{AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let data = match commands::load_page_data(DATA_ELEMENT_ID) {
        Ok(data) => data,
        Err(err) => {
            log::error!("[APP] {}", err);
            return view! {
                <div class="checkin-error">{format!("Could not load check-in data: {}", err)}</div>
            }
            .into_any();
        }
    };
    log::info!(
        "[APP] Loaded {} teams, {} judges, {} rooms, {} rounds",
        data.teams.len(),
        data.judges.len(),
        data.rooms.len(),
        data.round_numbers.len()
    );

    let config = data.config.clone();
    let mut checkins = CheckinStore::from_page(&data);
    reconcile::refresh(&mut checkins, None);

    let active_pane = commands::load_active_pane(&config.pane_storage_key).unwrap_or_default();
    let store = Store::new(AppState::new(checkins, active_pane));
    provide_context(store);

    let backend = HttpBackend::new(&config, commands::csrf_token(&config.csrf_field));
    let ctx = CheckinContext::new(store, backend, config.clone());
    provide_context(ctx.clone());

    // Remember the pane and reconcile its toggles whenever it changes
    let storage_key = config.pane_storage_key.clone();
    Effect::new(move |_| {
        let pane = store.active_pane().get();
        log::debug!("[APP] Active pane: {}", pane);
        commands::save_active_pane(&storage_key, pane);
        ctx.refresh(Some(pane));
    });

    view! {
        <div class="checkin-layout">
            <div class="checkin-toolbar">
                <PaneTabBar />
                <QuickSearch />
            </div>

            {move || {
                let pane = store.active_pane().get();
                view! { <CheckinTable entity_type=pane /> }
            }}
        </div>
    }
    .into_any()
}
