//! Page Bootstrap
//!
//! Reads the JSON the server embeds in the page, and the CSRF token from
//! its hidden form field.

use wasm_bindgen::JsCast;

use crate::error::LoadError;
use crate::models::PageData;

pub fn parse_page_data(json: &str) -> Result<PageData, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse the `<script type="application/json" id=..>` element
pub fn load_page_data(element_id: &str) -> Result<PageData, LoadError> {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(element_id))
        .and_then(|el| el.text_content())
        .ok_or_else(|| LoadError::MissingElement(element_id.to_string()))?;
    parse_page_data(&text)
}

/// Value of the hidden `<input name=..>` holding the CSRF token
pub fn csrf_token(field: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("[name={}]", field))
        .ok()
        .flatten()?;
    let input = element.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    let value = input.value();
    (!value.is_empty()).then_some(value)
}
