//! Host RPC over the Fetch API with timeout support.
//!
//! Every endpoint takes a JSON body by POST and answers with a
//! `{code, msg, data}` envelope. Envelope handling lives in the core;
//! this module only moves bytes.

use js_sys::{Array, Promise};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::RPC_TIMEOUT_MS;
use crate::error::{FetchError, describe};

// =============================================================================
// Promise Racing
// =============================================================================

/// Result of a promise race with timeout.
#[derive(Debug)]
pub enum RaceResult {
    /// The promise settled first.
    Completed(JsValue),
    TimedOut,
    /// The promise rejected.
    Error(String),
}

/// Race a promise against a timer with `Promise.race`.
///
/// The timer resolves to `undefined`, so a promise that itself resolves to
/// `undefined` is indistinguishable from a timeout. `fetch` never does.
pub async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error("Window not available".to_string());
    };

    let timer = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let contenders = Array::of2(&promise, &timer);
    match JsFuture::from(Promise::race(&contenders)).await {
        Ok(result) if result.is_undefined() => RaceResult::TimedOut,
        Ok(result) => RaceResult::Completed(result),
        Err(e) => RaceResult::Error(describe(&e)),
    }
}

// =============================================================================
// Requests
// =============================================================================

/// POST `body` as JSON to a host-relative `path` and parse the JSON reply.
pub async fn post_json<B: Serialize>(path: &str, body: &B) -> Result<Value, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;
    let payload =
        serde_json::to_string(body).map_err(|e| FetchError::JsonParseError(e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_body(&JsValue::from_str(&payload));

    let request = Request::new_with_str_and_init(path, &opts)
        .map_err(|_| FetchError::RequestCreationFailed)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|_| FetchError::RequestCreationFailed)?;

    log::debug!("POST {path} {payload}");
    match race_with_timeout(window.fetch_with_request(&request), RPC_TIMEOUT_MS).await {
        RaceResult::TimedOut => Err(FetchError::Timeout),
        RaceResult::Error(msg) => Err(FetchError::NetworkError(msg)),
        RaceResult::Completed(result) => {
            let resp: Response = result
                .dyn_into()
                .map_err(|_| FetchError::ResponseReadFailed)?;

            if !resp.ok() {
                return Err(FetchError::HttpError(resp.status()));
            }

            let text = JsFuture::from(resp.text().map_err(|_| FetchError::ResponseReadFailed)?)
                .await
                .map_err(|_| FetchError::ResponseReadFailed)?
                .as_string()
                .ok_or(FetchError::ResponseReadFailed)?;

            serde_json::from_str(&text).map_err(|e| FetchError::JsonParseError(e.to_string()))
        }
    }
}
