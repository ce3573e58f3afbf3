//! Frontend Models
//!
//! Check-in entities, bulk toggles, and the page payload embedded by the server.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CheckinConfig;

/// Kind of entity being checked in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Team,
    Judge,
    Room,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Team, EntityType::Judge, EntityType::Room];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Team => "team",
            EntityType::Judge => "judge",
            EntityType::Room => "room",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Pane title shown on the tab bar
    pub fn title(self) -> &'static str {
        match self {
            EntityType::Team => "Teams",
            EntityType::Judge => "Judges",
            EntityType::Room => "Rooms",
        }
    }

    /// Teams are checked in once for the whole tournament
    pub fn has_rounds(self) -> bool {
        !matches!(self, EntityType::Team)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a bulk request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinAction {
    CheckIn,
    CheckOut,
}

impl CheckinAction {
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            CheckinAction::CheckIn
        } else {
            CheckinAction::CheckOut
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckinAction::CheckIn => "check_in",
            CheckinAction::CheckOut => "check_out",
        }
    }
}

/// One (entity, round) check-in slot. `round` is None for teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub entity_type: EntityType,
    pub entity_id: u32,
    pub round: Option<u32>,
}

impl ItemKey {
    pub fn new(entity_type: EntityType, entity_id: u32, round: Option<u32>) -> Self {
        Self { entity_type, entity_id, round }
    }

    /// DOM id of the checkbox, used by its `<label for=..>`
    pub fn dom_id(&self) -> String {
        match self.round {
            Some(round) => format!("{}-{}-checkin-r{}", self.entity_type, self.entity_id, round),
            None => format!("{}-{}-checkin", self.entity_type, self.entity_id),
        }
    }
}

pub const CHECKED_IN_LABEL: &str = "Checked In";
pub const CHECKED_OUT_LABEL: &str = "Checked Out";

pub fn checkin_label(checked: bool) -> &'static str {
    if checked {
        CHECKED_IN_LABEL
    } else {
        CHECKED_OUT_LABEL
    }
}

/// Snapshot of a check-in slot as the widget sees it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckableItem {
    pub key: ItemKey,
    pub checked: bool,
    /// Derived from the row's quick-search visibility
    pub visible: bool,
}

impl CheckableItem {
    pub fn label(&self) -> &'static str {
        checkin_label(self.checked)
    }
}

/// Which members a bulk toggle drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToggleScope {
    /// Every round slot of one entity
    Row(u32),
    /// One round across the pane
    Column(u32),
    /// Everything in the pane
    Pane,
}

/// Synthetic "select all" control; its checked state is always derived
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulkToggle {
    pub entity_type: EntityType,
    pub scope: ToggleScope,
}

impl BulkToggle {
    pub fn new(entity_type: EntityType, scope: ToggleScope) -> Self {
        Self { entity_type, scope }
    }

    pub fn pane(entity_type: EntityType) -> Self {
        Self::new(entity_type, ToggleScope::Pane)
    }
}

/// Payload of one bulk check-in call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkCheckinRequest {
    pub entity_type: EntityType,
    pub action: CheckinAction,
    pub entity_ids: BTreeSet<u32>,
    /// Empty for teams
    pub round_numbers: BTreeSet<u32>,
}

// ========================
// Page Payload
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub debaters: String,
    #[serde(default)]
    pub checked_in: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub schools: Vec<String>,
    #[serde(default)]
    pub checked_in_rounds: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub checked_in_rounds: Vec<u32>,
}

/// JSON embedded in the page by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Inround numbers; the outround column (round 0) is added client-side
    #[serde(default)]
    pub round_numbers: Vec<u32>,
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub judges: Vec<JudgeRecord>,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
    #[serde(default)]
    pub config: CheckinConfig,
}

/// Round number of the outround column
pub const OUTROUND: u32 = 0;

impl PageData {
    /// Check-in columns for judges and rooms: outrounds first, then inrounds
    pub fn checkin_rounds(&self) -> Vec<u32> {
        let mut rounds = vec![OUTROUND];
        rounds.extend(self.round_numbers.iter().copied().filter(|r| *r != OUTROUND));
        rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_data_parses_with_missing_sections() {
        let data: PageData = serde_json::from_str(
            r#"{"round_numbers":[1,2],"teams":[{"id":3,"name":"Alpha","checked_in":true}]}"#,
        )
        .unwrap();
        assert_eq!(data.teams[0].school, "");
        assert!(data.teams[0].checked_in);
        assert!(data.judges.is_empty());
        assert_eq!(data.config, CheckinConfig::default());
        assert_eq!(data.checkin_rounds(), vec![0, 1, 2]);
    }

    #[test]
    fn entity_type_round_trips_through_str() {
        for t in EntityType::ALL {
            assert_eq!(EntityType::parse(t.as_str()), Some(t));
        }
        assert_eq!(EntityType::parse("debater"), None);
        assert!(!EntityType::Team.has_rounds());
        assert!(EntityType::Room.has_rounds());
    }

    #[test]
    fn dom_ids_are_distinct_per_round() {
        let a = ItemKey::new(EntityType::Judge, 7, Some(0));
        let b = ItemKey::new(EntityType::Judge, 7, Some(1));
        assert_ne!(a.dom_id(), b.dom_id());
        assert_eq!(ItemKey::new(EntityType::Team, 7, None).dom_id(), "team-7-checkin");
    }
}
