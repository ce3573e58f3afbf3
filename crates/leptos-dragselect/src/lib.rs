//! Leptos DragSelect Utilities
//!
//! Rectangular mouse-drag selection over table cells.
//! The gesture state lives in a per-table signal, so several tables on one
//! page never share a drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Cell position inside the enclosing table (row index, column index)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Inclusive bounding box between two cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRect {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl SelectionRect {
    pub fn spanning(a: CellCoord, b: CellCoord) -> Self {
        Self {
            min_row: a.row.min(b.row),
            max_row: a.row.max(b.row),
            min_col: a.col.min(b.col),
            max_col: a.col.max(b.col),
        }
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.min_row..=self.max_row).contains(&cell.row)
            && (self.min_col..=self.max_col).contains(&cell.col)
    }
}

/// In-progress drag: exists only between mousedown and mouseup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSelection {
    pub anchor: CellCoord,
    pub current: CellCoord,
    /// Value applied on release: the negation of the anchor's state at mousedown
    pub target_checked: bool,
    /// Mousedown landed on the anchor's checkbox or label
    pub pressed_on_control: bool,
}

/// What a mouseup resolved to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragRelease {
    /// Released on the anchor cell, outside its checkbox/label
    Toggle { cell: CellCoord, checked: bool },
    /// Pressed and released on the anchor's own checkbox/label; the native
    /// click handles it
    Passthrough,
    /// Released elsewhere: apply `checked` to every selectable cell in `rect`
    Apply { rect: SelectionRect, checked: bool },
}

impl DragSelection {
    pub fn begin(anchor: CellCoord, anchor_checked: bool, pressed_on_control: bool) -> Self {
        Self {
            anchor,
            current: anchor,
            target_checked: !anchor_checked,
            pressed_on_control,
        }
    }

    /// Returns true when the pointer entered a different cell
    pub fn move_to(&mut self, cell: CellCoord) -> bool {
        if self.current == cell {
            return false;
        }
        self.current = cell;
        true
    }

    pub fn rect(&self) -> SelectionRect {
        SelectionRect::spanning(self.anchor, self.current)
    }

    /// The browser only clicks the control when press and release both hit
    /// it; anything else on the anchor cell is toggled here.
    pub fn release(self, cell: CellCoord, on_control: bool) -> DragRelease {
        if cell == self.anchor {
            if self.pressed_on_control && on_control {
                DragRelease::Passthrough
            } else {
                DragRelease::Toggle {
                    cell,
                    checked: self.target_checked,
                }
            }
        } else {
            DragRelease::Apply {
                rect: SelectionRect::spanning(self.anchor, cell),
                checked: self.target_checked,
            }
        }
    }
}

/// Drag state signals, one pair per table
#[derive(Clone, Copy)]
pub struct DragSignals {
    pub selection_read: ReadSignal<Option<DragSelection>>,
    pub selection_write: WriteSignal<Option<DragSelection>>,
}

pub fn create_drag_signals() -> DragSignals {
    let (selection_read, selection_write) = signal(None::<DragSelection>);
    DragSignals {
        selection_read,
        selection_write,
    }
}

impl DragSignals {
    /// True if `cell` lies in the rectangle of the drag in progress
    pub fn covers(&self, cell: CellCoord) -> bool {
        self.selection_read
            .get()
            .map(|drag| drag.rect().contains(cell))
            .unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.selection_read.get_untracked().is_some()
    }
}

/// Drop the drag without applying anything
pub fn abort_drag(drag: &DragSignals) {
    if drag.is_active() {
        drag.selection_write.set(None);
    }
}

fn is_on_control(ev: &web_sys::MouseEvent) -> bool {
    ev.target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest("input, label").ok().flatten())
        .is_some()
}

/// Create mousedown handler for a selectable cell.
/// `is_checked` reads the anchor's current state when the press happens.
pub fn make_on_cell_mousedown<F>(
    drag: DragSignals,
    cell: CellCoord,
    is_checked: F,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    F: Fn() -> bool + Copy + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Keep the browser from starting a text selection, but leave
        // checkbox/label presses alone so their click still fires.
        let on_control = is_on_control(&ev);
        if !on_control {
            ev.prevent_default();
        }
        drag.selection_write
            .set(Some(DragSelection::begin(cell, is_checked(), on_control)));
    }
}

/// Create mousemove handler for a table cell (selectable or not)
pub fn make_on_cell_mousemove(
    drag: DragSignals,
    cell: CellCoord,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if let Some(mut selection) = drag.selection_read.get_untracked() {
            if selection.move_to(cell) {
                drag.selection_write.set(Some(selection));
            }
        }
    }
}

/// Create mouseleave handler for the table: leaving aborts the drag
pub fn make_on_table_mouseleave(drag: DragSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| abort_drag(&drag)
}

/// Create mouseup handler for a table cell
pub fn make_on_cell_mouseup<F>(
    drag: DragSignals,
    cell: CellCoord,
    on_release: F,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    F: Fn(DragRelease) + Clone + 'static,
{
    move |ev: web_sys::MouseEvent| {
        let Some(selection) = drag.selection_read.get_untracked() else {
            return;
        };
        drag.selection_write.set(None);
        on_release(selection.release(cell, is_on_control(&ev)));
    }
}
