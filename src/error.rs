//! Plugin-side error types.
//!
//! - [`FetchError`] - network errors talking to the host RPC
//! - [`DomError`] - browser API failures while wiring the plugin
//!
//! Core errors (`OracleError`, `HostError`) live in `subfolder_core::error`.

use std::fmt;

use subfolder_core::OracleError;

/// Network/fetch-related errors for RPC requests.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// Browser window not available
    NoWindow,
    /// Failed to create HTTP request
    RequestCreationFailed,
    /// Network request failed (CORS, connection reset, ...)
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    HttpError(u16),
    /// Failed to read response body
    ResponseReadFailed,
    /// JSON parsing error
    JsonParseError(String),
    /// Request timed out
    Timeout,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "Browser window not available"),
            Self::RequestCreationFailed => write!(f, "Failed to create request"),
            Self::NetworkError(msg) => write!(f, "Network error: {}", msg),
            Self::HttpError(status) => write!(f, "HTTP error: {}", status),
            Self::ResponseReadFailed => write!(f, "Failed to read response"),
            Self::JsonParseError(msg) => write!(f, "JSON parse error: {}", msg),
            Self::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<FetchError> for OracleError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::JsonParseError(msg) => OracleError::Malformed(msg),
            other => OracleError::Transport(other.to_string()),
        }
    }
}

/// Browser API failures outside the tree adapter.
#[derive(Debug, Clone)]
pub enum DomError {
    /// Browser window or document not available
    NoDocument,
    /// Listener could not be attached
    ListenerFailed(String),
    /// Element could not be created or inserted
    ElementFailed(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => write!(f, "Document not available"),
            Self::ListenerFailed(msg) => write!(f, "Failed to attach listener: {}", msg),
            Self::ElementFailed(msg) => write!(f, "Failed to create element: {}", msg),
        }
    }
}

impl std::error::Error for DomError {}

/// Render a JS exception for logging.
pub fn describe(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &"message".into())
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
