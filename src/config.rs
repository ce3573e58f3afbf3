//! Widget Configuration
//!
//! Settings read from the optional `config` object of the embedded page data.

use serde::{Deserialize, Serialize};

/// Id of the `<script type="application/json">` element holding the page data
pub const DATA_ELEMENT_ID: &str = "checkin-data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinConfig {
    /// Bulk check-in endpoint
    pub endpoint: String,
    /// Name of the hidden input carrying the CSRF token
    pub csrf_field: String,
    /// Header the CSRF token is sent in
    pub csrf_header: String,
    /// Trailing-edge delay before toggles are reconciled after a search
    pub search_debounce_ms: u32,
    /// localStorage key remembering the active pane
    pub pane_storage_key: String,
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            endpoint: "/bulk_check_in/".to_string(),
            csrf_field: "csrfmiddlewaretoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            search_debounce_ms: 120,
            pane_storage_key: "selectedCategory".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: CheckinConfig =
            serde_json::from_str(r#"{"endpoint":"/api/checkins/","search_debounce_ms":200}"#).unwrap();
        assert_eq!(config.endpoint, "/api/checkins/");
        assert_eq!(config.search_debounce_ms, 200);
        assert_eq!(config.csrf_header, "X-CSRFToken");
        assert_eq!(config.pane_storage_key, "selectedCategory");
    }
}
