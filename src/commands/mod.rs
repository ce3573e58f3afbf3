//! Browser Command Wrappers
//!
//! Frontend bindings to the backend endpoint and browser APIs, organized by domain.

mod checkin;
mod dialog;
mod page;
mod storage;

// Re-export all public items
pub use checkin::*;
pub use dialog::*;
pub use page::*;
pub use storage::*;
