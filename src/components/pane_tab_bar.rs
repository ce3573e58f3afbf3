//! Pane Tab Bar Component
//!
//! Tab bar for switching between the team, judge and room panes.

use leptos::prelude::*;

use crate::models::EntityType;
use crate::store::{use_app_store, AppStateStoreFields};

/// Pane Tab Bar component
#[component]
pub fn PaneTabBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="pane-tab-bar">
            {EntityType::ALL
                .into_iter()
                .map(|pane| {
                    let is_active = move || store.active_pane().get() == pane;
                    let tab_class = move || {
                        if is_active() { "pane-tab active" } else { "pane-tab" }
                    };
                    // Teams show how many are in; other panes just their size
                    let badge = move || {
                        let checkins = store.checkins().read();
                        match pane {
                            EntityType::Team => {
                                let (checked, total) = checkins.column_count(pane, None);
                                format!("{}/{}", checked, total)
                            }
                            _ => checkins
                                .pane(pane)
                                .map(|p| p.rows.len())
                                .unwrap_or(0)
                                .to_string(),
                        }
                    };

                    view! {
                        <button
                            class=tab_class
                            data-pane=pane.as_str()
                            on:click=move |_| store.active_pane().set(pane)
                        >
                            {pane.title()}
                            " "
                            <span class="pane-count">{badge}</span>
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
