//! Check-in Table Component
//!
//! One pane's table. Owns its drag state, so panes never share a gesture.

use leptos::prelude::*;
use leptos_dragselect::*;

use crate::checkins::Column;
use crate::components::{BulkToggleBox, CheckinCell, CheckinCellProps};
use crate::context::CheckinContext;
use crate::models::{BulkToggle, EntityType, ItemKey, ToggleScope};
use crate::selection;
use crate::store::AppStateStoreFields;

/// Turn a finished drag into a submit
fn apply_release(ctx: &CheckinContext, entity_type: EntityType, release: DragRelease) {
    let resolved = selection::release_targets(&ctx.store.checkins().read_untracked(), entity_type, release);
    if let Some(resolved) = resolved {
        log::debug!(
            "[DRAG] {:?} -> {} slots, checked={}",
            release,
            resolved.targets.len(),
            resolved.desired
        );
        ctx.submit(resolved.targets, resolved.desired, resolved.trigger);
    }
}

#[component]
pub fn CheckinTable(entity_type: EntityType) -> impl IntoView {
    let ctx = expect_context::<CheckinContext>();
    let store = ctx.store;

    let grid = store.checkins().read_untracked().pane(entity_type).cloned();
    let Some(grid) = grid else {
        return view! { <p class="checkin-empty">"Nothing to check in."</p> }.into_any();
    };

    // Create drag signals for this table
    let drag = create_drag_signals();
    let on_release = Callback::new({
        let ctx = ctx.clone();
        move |release: DragRelease| apply_release(&ctx, entity_type, release)
    });

    let columns = grid.columns.clone();

    let header = columns
        .iter()
        .map(|col| match col {
            Column::Text(_) => view! { <th>{col.header()}</th> }.into_any(),
            Column::RowToggle => view! {
                <th class="toggle-col">
                    <BulkToggleBox toggle=BulkToggle::pane(entity_type) />
                    " "{col.header()}
                </th>
            }
            .into_any(),
            Column::Checkin(round) => {
                let round = *round;
                let toggle = match round {
                    Some(r) if entity_type.has_rounds() => BulkToggle::new(entity_type, ToggleScope::Column(r)),
                    _ => BulkToggle::pane(entity_type),
                };
                let count = move || {
                    let (checked, total) = store.checkins().read().column_count(entity_type, round);
                    format!("{}/{}", checked, total)
                };
                view! {
                    <th class="checkin-col">
                        <BulkToggleBox toggle=toggle />
                        " "{col.header()}
                        <span class="checkin-count">{count}</span>
                    </th>
                }
                .into_any()
            }
        })
        .collect_view();

    let body = grid
        .rows
        .into_iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let entity_id = row.entity_id;
            let visible = move || store.checkins().read().is_row_visible(entity_type, entity_id);
            let mut texts = row.cells.into_iter();

            let cells = columns
                .iter()
                .enumerate()
                .map(|(col_idx, col)| {
                    let cell = CellCoord::new(row_idx, col_idx);
                    let on_mousemove = make_on_cell_mousemove(drag, cell);
                    let on_mouseup = make_on_cell_mouseup(drag, cell, move |release| on_release.run(release));
                    match col {
                        Column::Text(_) => {
                            let text = texts.next().unwrap_or_default();
                            view! {
                                <td on:mousemove=on_mousemove on:mouseup=on_mouseup>{text}</td>
                            }
                            .into_any()
                        }
                        Column::RowToggle => view! {
                            <td class="toggle-col" on:mousemove=on_mousemove on:mouseup=on_mouseup>
                                <BulkToggleBox toggle=BulkToggle::new(entity_type, ToggleScope::Row(entity_id)) />
                            </td>
                        }
                        .into_any(),
                        Column::Checkin(round) => CheckinCell(
                            CheckinCellProps::builder()
                                .slot(ItemKey::new(entity_type, entity_id, *round))
                                .cell(cell)
                                .drag(drag)
                                .on_release(on_release)
                                .build(),
                        )
                        .into_any(),
                    }
                })
                .collect_view();

            view! {
                <tr
                    class="searchable"
                    data-entity-id=entity_id.to_string()
                    style:display=move || if visible() { "" } else { "none" }
                >
                    {cells}
                </tr>
            }
        })
        .collect_view();

    view! {
        <table
            class=format!("checkin-table {}-checkin-table", entity_type)
            on:mouseleave=make_on_table_mouseleave(drag)
            on:mouseup=move |_| abort_drag(&drag)
        >
            <thead>
                <tr>{header}</tr>
            </thead>
            <tbody>{body}</tbody>
        </table>
    }
    .into_any()
}
