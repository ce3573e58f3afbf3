//! Blocking user notifications

/// Shown whenever a bulk update is rolled back
pub const SYNC_FAILED_MESSAGE: &str = "An error occurred. Refresh and try again";

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
