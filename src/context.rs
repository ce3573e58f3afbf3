//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{self, HttpBackend};
use crate::config::CheckinConfig;
use crate::error::SyncError;
use crate::models::{EntityType, ItemKey};
use crate::reconcile;
use crate::store::AppStore;
use crate::sync::{self, CheckinState, Trigger};

/// Log lines attached to a failed sync
const REPORT_TAIL: usize = 20;

/// Error text followed by the log lines that led up to it
fn failure_report(err: &SyncError, trail: &[String]) -> String {
    let mut report = format!("bulk check-in failed: {}", err);
    if !trail.is_empty() {
        report.push_str("\nrecent log:");
        for line in trail {
            report.push_str("\n  ");
            report.push_str(line);
        }
    }
    report
}

/// Store, transport and settings shared by every check-in component
#[derive(Clone)]
pub struct CheckinContext {
    pub store: AppStore,
    backend: HttpBackend,
    pub config: CheckinConfig,
}

impl CheckinContext {
    pub fn new(store: AppStore, backend: HttpBackend, config: CheckinConfig) -> Self {
        Self { store, backend, config }
    }

    /// Apply `desired` to `targets` now and send the request in the background.
    /// Returns false when nothing was sent (no targets, or trigger busy).
    pub fn submit(&self, targets: Vec<ItemKey>, desired: bool, trigger: Option<Trigger>) -> bool {
        let pending = match self.store.with_store(|s| sync::begin(s, &targets, desired, trigger)) {
            Some(Ok(pending)) => pending,
            Some(Err(err)) => {
                log::debug!("[SYNC] nothing sent: {}", err);
                return false;
            }
            None => return false,
        };

        let store = self.store;
        let backend = self.backend.clone();
        spawn_local(async move {
            match sync::dispatch(&store, &backend, pending).await {
                Ok(()) => {}
                Err(err) if err.is_user_facing() => {
                    let trail = rolling_logger::recent_lines(REPORT_TAIL);
                    log::error!("[SYNC] {}", failure_report(&err, &trail));
                    commands::alert(commands::SYNC_FAILED_MESSAGE);
                }
                Err(err) => log::warn!("[SYNC] {}", err),
            }
        });
        true
    }

    /// Recompute bulk toggles for one pane, or all of them
    pub fn refresh(&self, scope: Option<EntityType>) {
        self.store.with_store(|s| reconcile::refresh(s, scope));
    }
}
