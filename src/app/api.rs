//! JSON calls from the browser to the dashboard server.
//!
//! Requests go through `fetch` on wasm32. Other targets only compile the
//! signatures so the UI can be type-checked and unit tested natively.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    /// Message from the server's `{"error": ...}` body
    #[error("{0}")]
    Server(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("requests are only available in the web build")]
    Unsupported,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let (status, text) = send("GET", url, None).await?;
    decode(status, &text)
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    body: &B,
) -> Result<T, FetchError> {
    let body = serde_json::to_string(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let (status, text) = send("POST", url, Some(body)).await?;
    decode(status, &text)
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    body: &B,
) -> Result<T, FetchError> {
    let body = serde_json::to_string(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let (status, text) = send("PUT", url, Some(body)).await?;
    decode(status, &text)
}

pub fn activities_url(date: NaiveDate) -> String {
    format!("/api/activities?date={}", date.format("%Y-%m-%d"))
}

pub fn search_users_url(name: &str) -> String {
    format!("/api/users/search?name={}", urlencoding::encode(name))
}

/// `Authorization` header value for the signed-in session.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn authorization(token: Option<&str>) -> Option<String> {
    token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| format!("Bearer {}", token))
}

fn decode<T: DeserializeOwned>(status: u16, text: &str) -> Result<T, FetchError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(text)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("request failed ({})", status));
        tracing::warn!(status, %message, "API request failed");
        return Err(FetchError::Server(message));
    }
    serde_json::from_str(text).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
async fn send(method: &str, url: &str, body: Option<String>) -> Result<(u16, String), FetchError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    fn js_error(value: JsValue) -> FetchError {
        FetchError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }

    let init = web_sys::RequestInit::new();
    init.set_method(method);
    if let Some(body) = &body {
        init.set_body(&JsValue::from_str(body));
    }

    let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(js_error)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(js_error)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
    }
    if let Some(value) = authorization(crate::app::session::auth_token().as_deref()) {
        request
            .headers()
            .set("Authorization", &value)
            .map_err(js_error)?;
    }

    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".to_string()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    Ok((response.status(), text.as_string().unwrap_or_default()))
}

#[cfg(not(target_arch = "wasm32"))]
async fn send(
    _method: &str,
    _url: &str,
    _body: Option<String>,
) -> Result<(u16, String), FetchError> {
    Err(FetchError::Unsupported)
}
