//! Selection Model
//!
//! Turns a gesture (item click, bulk toggle click, drag rectangle) into the
//! concrete check-in slots it targets. Hidden rows never make it in.

use leptos_dragselect::{CellCoord, DragRelease, SelectionRect};

use crate::checkins::{CheckinStore, Column};
use crate::models::{BulkToggle, EntityType, ItemKey, ToggleScope};
use crate::sync::Trigger;

/// What a finished drag asks the sync controller to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseTargets {
    pub targets: Vec<ItemKey>,
    pub desired: bool,
    pub trigger: Option<Trigger>,
}

/// A click on one checkbox targets exactly that slot
pub fn item_targets(store: &CheckinStore, key: ItemKey) -> Vec<ItemKey> {
    if store.contains(key) {
        vec![key]
    } else {
        Vec::new()
    }
}

/// Visible members of a bulk toggle's scope, in table order
pub fn toggle_targets(store: &CheckinStore, toggle: BulkToggle) -> Vec<ItemKey> {
    let Some(pane) = store.pane(toggle.entity_type) else {
        return Vec::new();
    };
    let rounds = pane.rounds();
    let rounds: Vec<Option<u32>> = match toggle.scope {
        ToggleScope::Column(round) => rounds.into_iter().filter(|r| *r == Some(round)).collect(),
        ToggleScope::Row(_) | ToggleScope::Pane => rounds,
    };

    pane.visible_rows()
        .filter(|row| match toggle.scope {
            ToggleScope::Row(entity_id) => row.entity_id == entity_id,
            _ => true,
        })
        .flat_map(|row| {
            rounds
                .iter()
                .map(move |round| ItemKey::new(toggle.entity_type, row.entity_id, *round))
        })
        .filter(|key| store.contains(*key))
        .collect()
}

/// Check-in slot under a cell, if the cell is checkable and its row visible
pub fn cell_target(store: &CheckinStore, entity_type: EntityType, cell: CellCoord) -> Option<ItemKey> {
    let pane = store.pane(entity_type)?;
    let row = pane.rows.get(cell.row)?;
    if !row.visible {
        return None;
    }
    pane.cell_key(cell)
}

/// Every checkable cell inside the rectangle whose row is visible
pub fn rect_targets(store: &CheckinStore, entity_type: EntityType, rect: SelectionRect) -> Vec<ItemKey> {
    let Some(pane) = store.pane(entity_type) else {
        return Vec::new();
    };
    let last_row = pane.rows.len().saturating_sub(1).min(rect.max_row);
    let last_col = pane.columns.len().saturating_sub(1).min(rect.max_col);
    if pane.rows.is_empty() || rect.min_row > last_row || rect.min_col > last_col {
        return Vec::new();
    }

    let mut targets = Vec::new();
    for row_idx in rect.min_row..=last_row {
        if !pane.rows[row_idx].visible {
            continue;
        }
        for col_idx in rect.min_col..=last_col {
            if !matches!(pane.columns[col_idx], Column::Checkin(_)) {
                continue;
            }
            if let Some(key) = pane.cell_key(CellCoord::new(row_idx, col_idx)) {
                targets.push(key);
            }
        }
    }
    targets
}

/// Resolve a drag release. A single-cell toggle triggers its own checkbox;
/// a rectangle has no triggering control.
pub fn release_targets(
    store: &CheckinStore,
    entity_type: EntityType,
    release: DragRelease,
) -> Option<ReleaseTargets> {
    match release {
        DragRelease::Passthrough => None,
        DragRelease::Toggle { cell, checked } => {
            let slot = cell_target(store, entity_type, cell)?;
            Some(ReleaseTargets {
                targets: vec![slot],
                desired: checked,
                trigger: Some(Trigger::Item(slot)),
            })
        }
        DragRelease::Apply { rect, checked } => Some(ReleaseTargets {
            targets: rect_targets(store, entity_type, rect),
            desired: checked,
            trigger: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkins::tests::sample_page;
    use leptos_dragselect::DragSelection;

    fn judge(id: u32, round: u32) -> ItemKey {
        ItemKey::new(EntityType::Judge, id, Some(round))
    }

    #[test]
    fn column_toggle_targets_one_round() {
        let store = CheckinStore::from_page(&sample_page());
        let targets = toggle_targets(&store, BulkToggle::new(EntityType::Judge, ToggleScope::Column(2)));
        assert_eq!(targets, vec![judge(10, 2), judge(11, 2), judge(12, 2), judge(13, 2)]);
    }

    #[test]
    fn row_toggle_targets_every_round_of_its_row() {
        let store = CheckinStore::from_page(&sample_page());
        let targets = toggle_targets(&store, BulkToggle::new(EntityType::Judge, ToggleScope::Row(11)));
        assert_eq!(targets, vec![judge(11, 0), judge(11, 1), judge(11, 2)]);
    }

    #[test]
    fn toggles_skip_hidden_rows() {
        let mut store = CheckinStore::from_page(&sample_page());
        store.apply_search("yale");
        let pane = toggle_targets(&store, BulkToggle::pane(EntityType::Team));
        assert_eq!(pane, vec![ItemKey::new(EntityType::Team, 2, None)]);
        let hidden_row = toggle_targets(&store, BulkToggle::new(EntityType::Judge, ToggleScope::Row(10)));
        assert!(hidden_row.is_empty());
    }

    #[test]
    fn rect_selects_exactly_checkable_cells_in_bounds() {
        let store = CheckinStore::from_page(&sample_page());
        // judge columns: School, Judge, RowToggle, R0, R1, R2
        let rect = SelectionRect::spanning(CellCoord::new(2, 4), CellCoord::new(1, 1));
        assert_eq!(
            rect_targets(&store, EntityType::Judge, rect),
            vec![judge(11, 0), judge(11, 1), judge(12, 0), judge(12, 1)]
        );
    }

    #[test]
    fn rect_never_includes_toggle_column() {
        let store = CheckinStore::from_page(&sample_page());
        let rect = SelectionRect::spanning(CellCoord::new(0, 2), CellCoord::new(3, 2));
        assert!(rect_targets(&store, EntityType::Judge, rect).is_empty());
    }

    #[test]
    fn drag_over_filtered_row_skips_it() {
        let mut store = CheckinStore::from_page(&sample_page());
        // rows 1..=3 are Kim, Lee, Max; hide Lee
        store.apply_search("m");
        assert!(!store.is_row_visible(EntityType::Judge, 12));
        let rect = SelectionRect::spanning(CellCoord::new(1, 5), CellCoord::new(3, 5));
        assert_eq!(rect_targets(&store, EntityType::Judge, rect), vec![judge(11, 2), judge(13, 2)]);
    }

    #[test]
    fn rect_outside_table_is_empty() {
        let store = CheckinStore::from_page(&sample_page());
        let rect = SelectionRect::spanning(CellCoord::new(7, 0), CellCoord::new(9, 9));
        assert!(rect_targets(&store, EntityType::Room, rect).is_empty());
        let clipped = SelectionRect::spanning(CellCoord::new(0, 0), CellCoord::new(9, 9));
        assert_eq!(rect_targets(&store, EntityType::Room, clipped).len(), 3);
    }

    #[test]
    fn cell_target_respects_visibility() {
        let mut store = CheckinStore::from_page(&sample_page());
        assert_eq!(
            cell_target(&store, EntityType::Team, CellCoord::new(0, 3)),
            Some(ItemKey::new(EntityType::Team, 1, None))
        );
        store.apply_search("beta");
        assert_eq!(cell_target(&store, EntityType::Team, CellCoord::new(0, 3)), None);
        assert!(item_targets(&store, ItemKey::new(EntityType::Team, 99, None)).is_empty());
    }

    #[test]
    fn click_on_checked_cell_unchecks_that_slot() {
        let store = CheckinStore::from_page(&sample_page());
        // Lee, round 1
        let cell = CellCoord::new(2, 4);
        assert!(store.is_checked(judge(12, 1)));
        let drag = DragSelection::begin(cell, store.is_checked(judge(12, 1)), false);
        let resolved = release_targets(&store, EntityType::Judge, drag.release(cell, false));
        assert_eq!(
            resolved,
            Some(ReleaseTargets {
                targets: vec![judge(12, 1)],
                desired: false,
                trigger: Some(Trigger::Item(judge(12, 1))),
            })
        );
    }

    #[test]
    fn click_on_hidden_row_resolves_to_nothing() {
        let mut store = CheckinStore::from_page(&sample_page());
        store.apply_search("m");
        let release = DragRelease::Toggle { cell: CellCoord::new(2, 4), checked: false };
        assert_eq!(release_targets(&store, EntityType::Judge, release), None);
    }

    #[test]
    fn passthrough_resolves_to_nothing() {
        let store = CheckinStore::from_page(&sample_page());
        assert_eq!(release_targets(&store, EntityType::Judge, DragRelease::Passthrough), None);
    }

    #[test]
    fn drag_release_over_hidden_row_and_toggle_column() {
        let mut store = CheckinStore::from_page(&sample_page());
        store.apply_search("m");
        // anchor on Max, round 2 (checked); release on Kim's row toggle
        let anchor = CellCoord::new(3, 5);
        let mut drag = DragSelection::begin(anchor, store.is_checked(judge(13, 2)), false);
        drag.move_to(CellCoord::new(2, 3));
        let resolved = release_targets(&store, EntityType::Judge, drag.release(CellCoord::new(1, 2), false));
        assert_eq!(
            resolved,
            Some(ReleaseTargets {
                targets: vec![judge(11, 0), judge(11, 1), judge(11, 2), judge(13, 0), judge(13, 1), judge(13, 2)],
                desired: false,
                trigger: None,
            })
        );
    }
}
