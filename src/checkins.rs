//! Check-in State Store
//!
//! The single source of truth for every check-in slot, row visibility and
//! bulk-toggle state. Components render from it; nothing reads state back
//! out of the DOM.

use std::collections::HashMap;

use leptos_dragselect::CellCoord;

use crate::models::{
    BulkToggle, CheckableItem, EntityType, ItemKey, PageData, ToggleScope, OUTROUND,
};

/// Column layout of a pane table
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Column {
    /// Plain text column with its header
    Text(&'static str),
    /// Holds the row's bulk toggle
    RowToggle,
    /// A check-in checkbox column (`None` for the round-less team column)
    Checkin(Option<u32>),
}

impl Column {
    pub fn header(&self) -> String {
        match self {
            Column::Text(header) => header.to_string(),
            Column::RowToggle => "All Rounds".to_string(),
            Column::Checkin(None) => "Checked In".to_string(),
            Column::Checkin(Some(OUTROUND)) => "Outrounds".to_string(),
            Column::Checkin(Some(round)) => format!("Round {}", round),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaneRow {
    pub entity_id: u32,
    /// Text for each `Column::Text`, in column order
    pub cells: Vec<String>,
    /// Lowercased text matched by quick search
    pub search_text: String,
    pub visible: bool,
}

/// One pane's table: columns plus rows in display order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaneGrid {
    pub entity_type: EntityType,
    pub columns: Vec<Column>,
    pub rows: Vec<PaneRow>,
}

impl PaneGrid {
    fn new(entity_type: EntityType, columns: Vec<Column>) -> Self {
        Self { entity_type, columns, rows: Vec::new() }
    }

    fn push_row(&mut self, entity_id: u32, cells: Vec<String>) {
        let search_text = cells.join(" ").to_lowercase();
        self.rows.push(PaneRow { entity_id, cells, search_text, visible: true });
    }

    /// Round of every check-in column, left to right
    pub fn rounds(&self) -> Vec<Option<u32>> {
        self.columns
            .iter()
            .filter_map(|c| match c {
                Column::Checkin(round) => Some(*round),
                _ => None,
            })
            .collect()
    }

    /// Check-in slot at a table cell, if that cell holds one
    pub fn cell_key(&self, cell: CellCoord) -> Option<ItemKey> {
        let row = self.rows.get(cell.row)?;
        match self.columns.get(cell.col)? {
            Column::Checkin(round) => Some(ItemKey::new(self.entity_type, row.entity_id, *round)),
            _ => None,
        }
    }

    pub fn row_index(&self, entity_id: u32) -> Option<usize> {
        self.rows.iter().position(|r| r.entity_id == entity_id)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &PaneRow> {
        self.rows.iter().filter(|r| r.visible)
    }

    /// Every bulk toggle this pane renders
    pub fn toggles(&self) -> Vec<BulkToggle> {
        let et = self.entity_type;
        let mut toggles = vec![BulkToggle::pane(et)];
        if et.has_rounds() {
            toggles.extend(
                self.rounds()
                    .into_iter()
                    .flatten()
                    .map(|round| BulkToggle::new(et, ToggleScope::Column(round))),
            );
            toggles.extend(self.rows.iter().map(|r| BulkToggle::new(et, ToggleScope::Row(r.entity_id))));
        }
        toggles
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub checked: bool,
    /// Set while a request triggered by this toggle is outstanding
    pub disabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckinStore {
    panes: Vec<PaneGrid>,
    items: HashMap<ItemKey, bool>,
    toggles: HashMap<BulkToggle, ToggleState>,
    /// Item checkboxes with a request in flight
    busy_items: HashMap<ItemKey, u32>,
}

impl CheckinStore {
    pub fn from_page(data: &PageData) -> Self {
        let mut store = Self::default();
        let rounds = data.checkin_rounds();

        let mut teams = PaneGrid::new(
            EntityType::Team,
            vec![
                Column::Text("School"),
                Column::Text("Team"),
                Column::Text("Debater Names"),
                Column::Checkin(None),
            ],
        );
        for team in &data.teams {
            teams.push_row(team.id, vec![team.school.clone(), team.name.clone(), team.debaters.clone()]);
            store.items.insert(ItemKey::new(EntityType::Team, team.id, None), team.checked_in);
        }

        let mut judge_columns = vec![Column::Text("School"), Column::Text("Judge"), Column::RowToggle];
        judge_columns.extend(rounds.iter().map(|r| Column::Checkin(Some(*r))));
        let mut judges = PaneGrid::new(EntityType::Judge, judge_columns);
        for judge in &data.judges {
            judges.push_row(judge.id, vec![judge.schools.join(", "), judge.name.clone()]);
            for round in &rounds {
                let checked = judge.checked_in_rounds.contains(round);
                store.items.insert(ItemKey::new(EntityType::Judge, judge.id, Some(*round)), checked);
            }
        }

        let mut room_columns = vec![Column::Text("Room"), Column::RowToggle];
        room_columns.extend(rounds.iter().map(|r| Column::Checkin(Some(*r))));
        let mut rooms = PaneGrid::new(EntityType::Room, room_columns);
        for room in &data.rooms {
            rooms.push_row(room.id, vec![room.name.clone()]);
            for round in &rounds {
                let checked = room.checked_in_rounds.contains(round);
                store.items.insert(ItemKey::new(EntityType::Room, room.id, Some(*round)), checked);
            }
        }

        store.panes = vec![teams, judges, rooms];
        for pane in &store.panes {
            for toggle in pane.toggles() {
                store.toggles.insert(toggle, ToggleState::default());
            }
        }
        store
    }

    pub fn panes(&self) -> &[PaneGrid] {
        &self.panes
    }

    pub fn pane(&self, entity_type: EntityType) -> Option<&PaneGrid> {
        self.panes.iter().find(|p| p.entity_type == entity_type)
    }

    // ========================
    // Items
    // ========================

    pub fn item(&self, key: ItemKey) -> Option<CheckableItem> {
        let checked = *self.items.get(&key)?;
        Some(CheckableItem {
            key,
            checked,
            visible: self.is_row_visible(key.entity_type, key.entity_id),
        })
    }

    pub fn contains(&self, key: ItemKey) -> bool {
        self.items.contains_key(&key)
    }

    pub fn is_checked(&self, key: ItemKey) -> bool {
        self.items.get(&key).copied().unwrap_or(false)
    }

    /// Returns false for unknown slots
    pub fn set_checked(&mut self, key: ItemKey, checked: bool) -> bool {
        match self.items.get_mut(&key) {
            Some(slot) => {
                *slot = checked;
                true
            }
            None => false,
        }
    }

    pub fn is_item_busy(&self, key: ItemKey) -> bool {
        self.busy_items.contains_key(&key)
    }

    pub(crate) fn mark_item_busy(&mut self, key: ItemKey, busy: bool) {
        if busy {
            *self.busy_items.entry(key).or_insert(0) += 1;
        } else if let Some(count) = self.busy_items.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.busy_items.remove(&key);
            }
        }
    }

    // ========================
    // Rows
    // ========================

    pub fn is_row_visible(&self, entity_type: EntityType, entity_id: u32) -> bool {
        self.pane(entity_type)
            .and_then(|p| p.rows.iter().find(|r| r.entity_id == entity_id))
            .map(|r| r.visible)
            .unwrap_or(false)
    }

    /// Quick search: a row stays visible iff its text contains the query,
    /// ignoring case. Returns the number of visible rows across all panes.
    pub fn apply_search(&mut self, query: &str) -> usize {
        let needle = query.trim().to_lowercase();
        let mut visible = 0;
        for pane in &mut self.panes {
            for row in &mut pane.rows {
                row.visible = needle.is_empty() || row.search_text.contains(&needle);
                if row.visible {
                    visible += 1;
                }
            }
        }
        visible
    }

    // ========================
    // Toggles
    // ========================

    pub fn toggle(&self, toggle: BulkToggle) -> ToggleState {
        self.toggles.get(&toggle).copied().unwrap_or_default()
    }

    pub fn toggles(&self) -> impl Iterator<Item = BulkToggle> + '_ {
        self.toggles.keys().copied()
    }

    pub fn set_toggle_checked(&mut self, toggle: BulkToggle, checked: bool) {
        self.toggles.entry(toggle).or_default().checked = checked;
    }

    pub fn set_toggle_disabled(&mut self, toggle: BulkToggle, disabled: bool) {
        self.toggles.entry(toggle).or_default().disabled = disabled;
    }

    // ========================
    // Counts
    // ========================

    /// (checked, total) for one check-in column, over all rows
    pub fn column_count(&self, entity_type: EntityType, round: Option<u32>) -> (usize, usize) {
        let Some(pane) = self.pane(entity_type) else {
            return (0, 0);
        };
        pane.rows.iter().fold((0, 0), |(checked, total), row| {
            let key = ItemKey::new(entity_type, row.entity_id, round);
            (checked + usize::from(self.is_checked(key)), total + 1)
        })
    }
}
