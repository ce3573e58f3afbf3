//! Optimistic Sync Controller
//!
//! Applies a requested check-in state to the store right away, sends one
//! batched request, then either reconciles the toggles or rolls the slots
//! back to their snapshot. Each submit owns its own snapshot, so concurrent
//! submits from different controls never undo each other's slots.

use std::cell::RefCell;
use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::checkins::CheckinStore;
use crate::error::SyncError;
use crate::models::{BulkCheckinRequest, BulkToggle, CheckinAction, EntityType, ItemKey};
use crate::reconcile;

/// Control that started a submit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Item(ItemKey),
    Toggle(BulkToggle),
}

/// Transport for the bulk endpoint
#[async_trait(?Send)]
pub trait CheckinBackend {
    async fn bulk_checkin(&self, request: &BulkCheckinRequest) -> Result<(), SyncError>;
}

/// Mutable access to the store from wherever it lives
pub trait CheckinState {
    /// None once the store is gone (e.g. the page was torn down)
    fn with_store<R>(&self, f: impl FnOnce(&mut CheckinStore) -> R) -> Option<R>;
}

impl CheckinState for RefCell<CheckinStore> {
    fn with_store<R>(&self, f: impl FnOnce(&mut CheckinStore) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// One in-flight bulk operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub entity_type: EntityType,
    pub action: CheckinAction,
    pub entity_ids: BTreeSet<u32>,
    /// Empty for teams
    pub round_numbers: BTreeSet<u32>,
    /// Pre-submit value of every target, for rollback
    pub previous_states: Vec<(ItemKey, bool)>,
    pub trigger: Option<Trigger>,
}

impl PendingRequest {
    pub fn desired(&self) -> bool {
        self.action == CheckinAction::CheckIn
    }

    pub fn request(&self) -> BulkCheckinRequest {
        BulkCheckinRequest {
            entity_type: self.entity_type,
            action: self.action,
            entity_ids: self.entity_ids.clone(),
            round_numbers: self.round_numbers.clone(),
        }
    }
}

fn trigger_disabled(store: &CheckinStore, trigger: Trigger) -> bool {
    match trigger {
        Trigger::Item(key) => store.is_item_busy(key),
        Trigger::Toggle(toggle) => store.toggle(toggle).disabled,
    }
}

fn set_trigger_disabled(store: &mut CheckinStore, trigger: Trigger, disabled: bool) {
    match trigger {
        Trigger::Item(key) => store.mark_item_busy(key, disabled),
        Trigger::Toggle(toggle) => store.set_toggle_disabled(toggle, disabled),
    }
}

/// Synchronous half of a submit: snapshot, optimistic update, disable trigger.
pub fn begin(
    store: &mut CheckinStore,
    targets: &[ItemKey],
    desired: bool,
    trigger: Option<Trigger>,
) -> Result<PendingRequest, SyncError> {
    if let Some(trigger) = trigger {
        if trigger_disabled(store, trigger) {
            return Err(SyncError::Busy);
        }
    }

    let entity_type = targets.first().map(|k| k.entity_type);
    let targets: Vec<ItemKey> = targets
        .iter()
        .copied()
        .filter(|k| Some(k.entity_type) == entity_type && store.contains(*k))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let Some(entity_type) = entity_type.filter(|_| !targets.is_empty()) else {
        if let Some(Trigger::Toggle(toggle)) = trigger {
            store.set_toggle_checked(toggle, false);
        }
        return Err(SyncError::EmptyTargets);
    };

    let entity_ids: BTreeSet<u32> = targets.iter().map(|k| k.entity_id).collect();
    let round_numbers: BTreeSet<u32> = if entity_type.has_rounds() {
        targets.iter().filter_map(|k| k.round).collect()
    } else {
        BTreeSet::new()
    };
    let previous_states: Vec<(ItemKey, bool)> =
        targets.iter().map(|k| (*k, store.is_checked(*k))).collect();

    for key in &targets {
        store.set_checked(*key, desired);
    }
    if let Some(trigger) = trigger {
        if let Trigger::Toggle(toggle) = trigger {
            store.set_toggle_checked(toggle, desired);
        }
        set_trigger_disabled(store, trigger, true);
    }

    log::debug!(
        "[SYNC] {} {} ids={:?} rounds={:?}",
        CheckinAction::from_checked(desired).as_str(),
        entity_type,
        entity_ids,
        round_numbers
    );

    Ok(PendingRequest {
        entity_type,
        action: CheckinAction::from_checked(desired),
        entity_ids,
        round_numbers,
        previous_states,
        trigger,
    })
}

/// Completion half: reconcile on success, roll back on failure.
/// The trigger is re-enabled either way; the outcome is passed through.
pub fn settle(
    store: &mut CheckinStore,
    pending: PendingRequest,
    outcome: Result<(), SyncError>,
) -> Result<(), SyncError> {
    if let Err(err) = &outcome {
        log::warn!(
            "[SYNC] {} {} failed, rolling back {} slots: {}",
            pending.action.as_str(),
            pending.entity_type,
            pending.previous_states.len(),
            err
        );
        for (key, checked) in &pending.previous_states {
            store.set_checked(*key, *checked);
        }
        if let Some(Trigger::Toggle(toggle)) = pending.trigger {
            store.set_toggle_checked(toggle, !pending.desired());
        }
    }
    reconcile::refresh(store, Some(pending.entity_type));
    if let Some(trigger) = pending.trigger {
        set_trigger_disabled(store, trigger, false);
    }
    outcome
}

/// Network half for a request that already went through `begin`
pub async fn dispatch<S, B>(state: &S, backend: &B, pending: PendingRequest) -> Result<(), SyncError>
where
    S: CheckinState,
    B: CheckinBackend + ?Sized,
{
    let outcome = backend.bulk_checkin(&pending.request()).await;
    state
        .with_store(|store| settle(store, pending, outcome))
        .unwrap_or(Err(SyncError::StoreGone))
}

/// Full submit: optimistic update, one request, reconcile or roll back
pub async fn submit<S, B>(
    state: &S,
    backend: &B,
    targets: &[ItemKey],
    desired: bool,
    trigger: Option<Trigger>,
) -> Result<(), SyncError>
where
    S: CheckinState,
    B: CheckinBackend + ?Sized,
{
    let pending = state
        .with_store(|store| begin(store, targets, desired, trigger))
        .unwrap_or(Err(SyncError::StoreGone))?;
    dispatch(state, backend, pending).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::checkins::tests::sample_page;
    use crate::models::{checkin_label, ToggleScope};
    use crate::selection::{item_targets, toggle_targets};

    /// Records every request; fails any touching `fail_ids`
    #[derive(Default)]
    struct FakeBackend {
        sent: RefCell<Vec<BulkCheckinRequest>>,
        fail_ids: BTreeSet<u32>,
    }

    impl FakeBackend {
        fn failing(ids: &[u32]) -> Self {
            Self { fail_ids: ids.iter().copied().collect(), ..Default::default() }
        }
    }

    #[async_trait(?Send)]
    impl CheckinBackend for FakeBackend {
        async fn bulk_checkin(&self, request: &BulkCheckinRequest) -> Result<(), SyncError> {
            self.sent.borrow_mut().push(request.clone());
            tokio::task::yield_now().await;
            if request.entity_ids.iter().any(|id| self.fail_ids.contains(id)) {
                Err(SyncError::Server { status: 500 })
            } else {
                Ok(())
            }
        }
    }

    /// Checks the store mid-flight: the optimistic state must already be there
    struct PeekingBackend<'a> {
        state: &'a RefCell<CheckinStore>,
        key: ItemKey,
        seen: Cell<Option<(bool, bool)>>,
    }

    #[async_trait(?Send)]
    impl<'a> CheckinBackend for PeekingBackend<'a> {
        async fn bulk_checkin(&self, _request: &BulkCheckinRequest) -> Result<(), SyncError> {
            let store = self.state.borrow();
            self.seen.set(Some((store.is_checked(self.key), store.is_item_busy(self.key))));
            Err(SyncError::Network("offline".into()))
        }
    }

    fn team(id: u32) -> ItemKey {
        ItemKey::new(EntityType::Team, id, None)
    }

    fn state() -> RefCell<CheckinStore> {
        let mut store = CheckinStore::from_page(&sample_page());
        reconcile::refresh(&mut store, None);
        RefCell::new(store)
    }

    #[tokio::test]
    async fn pane_toggle_checks_all_three_teams_in_one_request() {
        let state = state();
        let backend = FakeBackend::default();
        let toggle = BulkToggle::pane(EntityType::Team);
        let targets = toggle_targets(&state.borrow(), toggle);

        submit(&state, &backend, &targets, true, Some(Trigger::Toggle(toggle))).await.unwrap();

        let sent = backend.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].action, CheckinAction::CheckIn);
        assert_eq!(sent[0].entity_ids, BTreeSet::from([1, 2, 3]));
        assert!(sent[0].round_numbers.is_empty());

        let store = state.borrow();
        for id in 1..=3 {
            let item = store.item(team(id)).unwrap();
            assert!(item.checked);
            assert_eq!(item.label(), "Checked In");
        }
        assert_eq!(store.toggle(toggle), crate::checkins::ToggleState { checked: true, disabled: false });
    }

    #[tokio::test]
    async fn failed_pane_toggle_rolls_everything_back() {
        let state = state();
        let backend = FakeBackend::failing(&[2]);
        let toggle = BulkToggle::pane(EntityType::Team);
        let targets = toggle_targets(&state.borrow(), toggle);

        let result = submit(&state, &backend, &targets, true, Some(Trigger::Toggle(toggle))).await;
        assert_eq!(result, Err(SyncError::Server { status: 500 }));
        assert!(result.unwrap_err().is_user_facing());

        let store = state.borrow();
        for id in 1..=3 {
            assert!(!store.is_checked(team(id)));
            assert_eq!(store.item(team(id)).unwrap().label(), checkin_label(false));
        }
        assert!(!store.toggle(toggle).checked);
        assert!(!store.toggle(toggle).disabled);
    }

    #[tokio::test]
    async fn rollback_restores_mixed_prior_states_exactly() {
        let state = state();
        let toggle = BulkToggle::new(EntityType::Judge, ToggleScope::Column(1));
        let targets = toggle_targets(&state.borrow(), toggle);
        let before: Vec<bool> = targets.iter().map(|k| state.borrow().is_checked(*k)).collect();
        assert!(before.contains(&true) && before.contains(&false));

        let backend = FakeBackend::failing(&[10]);
        let _ = submit(&state, &backend, &targets, true, Some(Trigger::Toggle(toggle))).await;

        let after: Vec<bool> = targets.iter().map(|k| state.borrow().is_checked(*k)).collect();
        assert_eq!(before, after);
        assert_eq!(backend.sent.borrow()[0].round_numbers, BTreeSet::from([1]));
    }

    #[tokio::test]
    async fn single_item_click_unchecks_and_sends_one_id() {
        let state = state();
        let key = ItemKey::new(EntityType::Judge, 12, Some(2));
        assert!(state.borrow().is_checked(key));
        let backend = FakeBackend::default();

        let targets = item_targets(&state.borrow(), key);
        submit(&state, &backend, &targets, false, Some(Trigger::Item(key))).await.unwrap();

        let sent = backend.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].action, CheckinAction::CheckOut);
        assert_eq!(sent[0].entity_ids, BTreeSet::from([12]));
        assert_eq!(sent[0].round_numbers, BTreeSet::from([2]));
        let store = state.borrow();
        assert!(!store.is_checked(key));
        assert!(!store.is_item_busy(key));
        // Lee's row is no longer complete
        assert!(!store.toggle(BulkToggle::new(EntityType::Judge, ToggleScope::Row(12))).checked);
    }

    #[tokio::test]
    async fn optimistic_state_is_visible_before_the_request_settles() {
        let state = state();
        let key = team(1);
        let backend = PeekingBackend { state: &state, key, seen: Cell::new(None) };

        let result = submit(&state, &backend, &[key], true, Some(Trigger::Item(key))).await;

        assert_eq!(backend.seen.get(), Some((true, true)));
        assert_eq!(result, Err(SyncError::Network("offline".into())));
        assert!(!state.borrow().is_checked(key));
        assert!(!state.borrow().is_item_busy(key));
    }

    #[tokio::test]
    async fn empty_targets_reset_toggle_without_a_request() {
        let state = state();
        state.borrow_mut().apply_search("no such team");
        let toggle = BulkToggle::pane(EntityType::Team);
        let targets = toggle_targets(&state.borrow(), toggle);
        let backend = FakeBackend::default();

        let result = submit(&state, &backend, &targets, true, Some(Trigger::Toggle(toggle))).await;

        assert_eq!(result, Err(SyncError::EmptyTargets));
        assert!(!result.unwrap_err().is_user_facing());
        assert!(backend.sent.borrow().is_empty());
        assert!(!state.borrow().toggle(toggle).checked);
    }

    #[test]
    fn disabled_trigger_rejects_reentry() {
        let state = state();
        let toggle = BulkToggle::pane(EntityType::Room);
        let targets = toggle_targets(&state.borrow(), toggle);
        let mut store = state.borrow_mut();

        let first = begin(&mut store, &targets, true, Some(Trigger::Toggle(toggle))).unwrap();
        assert!(store.toggle(toggle).disabled);
        assert_eq!(
            begin(&mut store, &targets, false, Some(Trigger::Toggle(toggle))),
            Err(SyncError::Busy)
        );

        settle(&mut store, first, Ok(())).unwrap();
        assert!(!store.toggle(toggle).disabled);
        assert!(store.toggle(toggle).checked);
    }

    #[test]
    fn duplicate_targets_are_collapsed() {
        let state = state();
        let mut store = state.borrow_mut();
        let keys = [
            ItemKey::new(EntityType::Room, 20, Some(1)),
            ItemKey::new(EntityType::Room, 20, Some(2)),
            ItemKey::new(EntityType::Room, 20, Some(1)),
        ];
        let pending = begin(&mut store, &keys, true, None).unwrap();
        assert_eq!(pending.entity_ids, BTreeSet::from([20]));
        assert_eq!(pending.round_numbers, BTreeSet::from([1, 2]));
        assert_eq!(pending.previous_states.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_submits_roll_back_independently() {
        let state = state();
        let backend = FakeBackend::failing(&[11]);
        let row_toggle = BulkToggle::new(EntityType::Judge, ToggleScope::Row(10));
        let fail_toggle = BulkToggle::new(EntityType::Judge, ToggleScope::Row(11));
        let ok_targets = toggle_targets(&state.borrow(), row_toggle);
        let bad_targets = toggle_targets(&state.borrow(), fail_toggle);

        let (ok, bad) = tokio::join!(
            submit(&state, &backend, &ok_targets, true, Some(Trigger::Toggle(row_toggle))),
            submit(&state, &backend, &bad_targets, true, Some(Trigger::Toggle(fail_toggle))),
        );

        assert!(ok.is_ok());
        assert!(bad.is_err());
        assert_eq!(backend.sent.borrow().len(), 2);
        let store = state.borrow();
        assert!(ok_targets.iter().all(|k| store.is_checked(*k)));
        assert!(bad_targets.iter().all(|k| !store.is_checked(*k)));
        assert!(store.toggle(row_toggle).checked);
        assert!(!store.toggle(fail_toggle).checked);
    }
}
