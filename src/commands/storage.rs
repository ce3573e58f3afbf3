//! Local Storage
//!
//! Remembers which pane was open across page loads.

use crate::models::EntityType;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn load_active_pane(key: &str) -> Option<EntityType> {
    let value = local_storage()?.get_item(key).ok().flatten()?;
    EntityType::parse(&value)
}

pub fn save_active_pane(key: &str, pane: EntityType) {
    let Some(storage) = local_storage() else {
        return;
    };
    if storage.set_item(key, pane.as_str()).is_err() {
        log::warn!("[CHECKIN] could not persist active pane");
    }
}
