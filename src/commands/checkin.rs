//! Bulk Check-in Command
//!
//! POSTs a form-encoded bulk request to the check-in endpoint via `fetch`.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

use crate::config::CheckinConfig;
use crate::error::SyncError;
use crate::models::BulkCheckinRequest;
use crate::sync::CheckinBackend;

/// Characters left unescaped in form values (RFC 3986 unreserved)
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Deserialize)]
struct BulkReply {
    success: bool,
}

fn push_field(body: &mut String, name: &str, value: &str) {
    if !body.is_empty() {
        body.push('&');
    }
    body.extend(utf8_percent_encode(name, FORM_VALUE));
    body.push('=');
    body.extend(utf8_percent_encode(value, FORM_VALUE));
}

/// `entity_type`, `action`, repeated `<type>_ids`, and for judges/rooms
/// repeated `round_numbers`. The CSRF token rides along as a form field too.
pub fn encode_bulk_form(request: &BulkCheckinRequest, csrf: Option<(&str, &str)>) -> String {
    let mut body = String::new();
    if let Some((field, token)) = csrf {
        push_field(&mut body, field, token);
    }
    push_field(&mut body, "entity_type", request.entity_type.as_str());
    push_field(&mut body, "action", request.action.as_str());
    let ids_field = format!("{}_ids", request.entity_type);
    for id in &request.entity_ids {
        push_field(&mut body, &ids_field, &id.to_string());
    }
    if request.entity_type.has_rounds() {
        for round in &request.round_numbers {
            push_field(&mut body, "round_numbers", &round.to_string());
        }
    }
    body
}

/// Success iff the body is JSON `{"success": true}`
pub fn parse_bulk_reply(text: &str) -> Result<(), SyncError> {
    let reply: BulkReply =
        serde_json::from_str(text).map_err(|e| SyncError::MalformedResponse(e.to_string()))?;
    if reply.success {
        Ok(())
    } else {
        Err(SyncError::Rejected)
    }
}

fn js_error(value: JsValue) -> SyncError {
    SyncError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// `CheckinBackend` over the browser's fetch
#[derive(Clone, Debug)]
pub struct HttpBackend {
    endpoint: String,
    csrf_field: String,
    csrf_header: String,
    csrf_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &CheckinConfig, csrf_token: Option<String>) -> Self {
        if csrf_token.is_none() {
            log::warn!("[CHECKIN] no CSRF token found in field '{}'", config.csrf_field);
        }
        Self {
            endpoint: config.endpoint.clone(),
            csrf_field: config.csrf_field.clone(),
            csrf_header: config.csrf_header.clone(),
            csrf_token,
        }
    }

    fn build_request(&self, body: &str) -> Result<Request, SyncError> {
        let headers = Headers::new().map_err(js_error)?;
        headers
            .set("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
            .map_err(js_error)?;
        headers.set("X-Requested-With", "XMLHttpRequest").map_err(js_error)?;
        if let Some(token) = &self.csrf_token {
            headers.set(&self.csrf_header, token).map_err(js_error)?;
        }

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_credentials(RequestCredentials::SameOrigin);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
        Request::new_with_str_and_init(&self.endpoint, &init).map_err(js_error)
    }
}

#[async_trait(?Send)]
impl CheckinBackend for HttpBackend {
    async fn bulk_checkin(&self, request: &BulkCheckinRequest) -> Result<(), SyncError> {
        let csrf = self
            .csrf_token
            .as_deref()
            .map(|token| (self.csrf_field.as_str(), token));
        let body = encode_bulk_form(request, csrf);
        let fetch_request = self.build_request(&body)?;

        let window = web_sys::window().ok_or_else(|| SyncError::Network("no window".to_string()))?;
        let response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(js_error)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| SyncError::MalformedResponse("fetch did not yield a Response".to_string()))?;

        if !response.ok() {
            return Err(SyncError::Server { status: response.status() });
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .ok_or_else(|| SyncError::MalformedResponse("response body is not text".to_string()))?;
        parse_bulk_reply(&text)
    }
}
