//! Global Application State Store
//!
//! Uses Leptos reactive_stores for field-level reactivity. The check-in
//! store is one field; components read it and the sync controller writes it.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::checkins::CheckinStore;
use crate::models::EntityType;
use crate::sync::CheckinState;

/// Page state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Every check-in slot, row and toggle
    pub checkins: CheckinStore,
    /// Pane currently shown
    pub active_pane: EntityType,
    /// Quick-search text
    pub query: String,
}

impl AppState {
    pub fn new(checkins: CheckinStore, active_pane: EntityType) -> Self {
        Self {
            checkins,
            active_pane,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

impl CheckinState for AppStore {
    fn with_store<R>(&self, f: impl FnOnce(&mut CheckinStore) -> R) -> Option<R> {
        let checkins = self.checkins();
        let mut guard = checkins.try_write()?;
        Some(f(&mut *guard))
    }
}
