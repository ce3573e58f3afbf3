//! Rolling Logger
//!
//! A `log` backend for the browser: every record goes to the devtools
//! console, and the most recent lines are kept in a circular buffer so they
//! can be dumped into a bug report after the fact.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Default number of lines retained in the ring buffer
pub const DEFAULT_CAPACITY: usize = 500;

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Fixed-capacity buffer that drops its oldest line when full
#[derive(Debug)]
pub struct LineRing {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LineRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    /// Last `n` lines, oldest first
    pub fn tail(&self, n: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Console logger with an in-memory tail
pub struct RollingLogger {
    level: LevelFilter,
    ring: Mutex<LineRing>,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self {
            level,
            ring: Mutex::new(LineRing::new(capacity)),
        }
    }

    /// Copy of the buffered lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        match self.ring.lock() {
            Ok(ring) => ring.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }

    pub fn recent_tail(&self, n: usize) -> Vec<String> {
        match self.ring.lock() {
            Ok(ring) => ring.tail(n),
            Err(poisoned) => poisoned.into_inner().tail(n),
        }
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "{} {:<5} {}: {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        emit(record.level(), &line);
        match self.ring.lock() {
            Ok(mut ring) => ring.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }

    fn flush(&self) {}
}

/// Install the global logger. Calling it twice returns the `log` error.
pub fn init(level: LevelFilter, capacity: usize) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(level, capacity));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Last `limit` buffered lines of the installed logger (empty if `init` never ran)
pub fn recent_lines(limit: usize) -> Vec<String> {
    LOGGER
        .get()
        .map(|logger| logger.recent_tail(limit))
        .unwrap_or_default()
}
