//! Bulk Toggle Reconciler
//!
//! Recomputes every bulk toggle's checked state from the slots it drives.
//! An empty scope reads as unchecked; there is no indeterminate state.

use crate::checkins::CheckinStore;
use crate::models::{BulkToggle, EntityType};
use crate::selection::toggle_targets;

/// Checked iff the scope's visible members are non-empty and all checked
pub fn toggle_checked(store: &CheckinStore, toggle: BulkToggle) -> bool {
    let targets = toggle_targets(store, toggle);
    !targets.is_empty() && targets.iter().all(|key| store.is_checked(*key))
}

/// Refresh toggles of one pane, or of every pane when `scope` is None.
/// Returns how many toggles changed.
pub fn refresh(store: &mut CheckinStore, scope: Option<EntityType>) -> usize {
    let toggles: Vec<BulkToggle> = store
        .toggles()
        .filter(|t| scope.map_or(true, |et| t.entity_type == et))
        .collect();

    let mut changed = 0;
    for toggle in toggles {
        let checked = toggle_checked(store, toggle);
        if store.toggle(toggle).checked != checked {
            store.set_toggle_checked(toggle, checked);
            changed += 1;
        }
    }
    log::debug!("[RECONCILE] scope={:?} changed={}", scope, changed);
    changed
}
