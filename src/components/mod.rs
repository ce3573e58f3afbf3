//! UI Components
//!
//! Reusable Leptos components.

mod bulk_toggle;
mod checkin_cell;
mod checkin_table;
mod pane_tab_bar;
mod quick_search;

pub use bulk_toggle::BulkToggleBox;
pub use checkin_cell::{CheckinCell, CheckinCellProps};
pub use checkin_table::CheckinTable;
pub use pane_tab_bar::PaneTabBar;
pub use quick_search::QuickSearch;
