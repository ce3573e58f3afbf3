//! Cancellable Timer
//!
//! Trailing-edge debounce with explicit start/cancel. Restarting drops the
//! previous handle, which cancels it.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Something that can run a task later. Dropping the handle cancels the task.
pub trait Scheduler {
    type Handle;
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Browser `setTimeout` via gloo
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

pub struct CancellableTimer<S: Scheduler> {
    scheduler: S,
    delay_ms: u32,
    pending: Option<(S::Handle, Rc<Cell<bool>>)>,
}

impl<S: Scheduler> CancellableTimer<S> {
    pub fn new(scheduler: S, delay_ms: u32) -> Self {
        Self { scheduler, delay_ms, pending: None }
    }

    /// (Re)start the countdown; a task from an earlier `start` never runs
    pub fn start(&mut self, task: impl FnOnce() + 'static) {
        self.cancel();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = self.scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                flag.set(true);
                task();
            }),
        );
        self.pending = Some((handle, fired));
    }

    /// Returns true if a not-yet-fired task was cancelled
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some((handle, fired)) => {
                drop(handle);
                !fired.get()
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().map_or(false, |(_, fired)| !fired.get())
    }
}
