//! Serverless invocation adapter.
//!
//! Hosting platforms that run functions instead of long-lived servers hand
//! the function a JSON event describing the HTTP request and expect a JSON
//! event describing the response. This module converts between those events
//! and the axum app; it knows nothing about individual routes.
//!
//! The event shape follows the API Gateway v2 payload (`rawPath`,
//! `requestContext.http.method`, ...), which is also what most
//! function runtimes forward.

use std::collections::HashMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::ServiceExt;
use tracing::{debug, warn};

use crate::message::ErrorBody;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] axum::http::Error),

    #[error("body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read response body: {0}")]
    ResponseBody(#[from] axum::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default = "root_path")]
    pub raw_path: String,
    #[serde(default)]
    pub raw_query_string: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    pub request_context: RequestContext,
}

#[derive(Debug, Deserialize)]
pub struct RequestContext {
    pub http: HttpContext,
}

#[derive(Debug, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl InvocationResponse {
    /// Response event for an event that could not be turned into a request.
    fn bad_request(err: &AdapterError) -> Self {
        let body = serde_json::to_string(&ErrorBody { detail: err.to_string() })
            .unwrap_or_else(|_| r#"{"detail":"bad request"}"#.to_string());
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            headers: HashMap::from([(
                header::CONTENT_TYPE.as_str().to_string(),
                "application/json".to_string(),
            )]),
            cookies: Vec::new(),
            body,
            is_base64_encoded: false,
        }
    }
}

fn root_path() -> String {
    "/".to_string()
}

impl InvocationEvent {
    fn into_request(self) -> Result<Request<Body>, AdapterError> {
        let method = Method::from_bytes(self.request_context.http.method.as_bytes())
            .map_err(|_| AdapterError::InvalidMethod(self.request_context.http.method.clone()))?;

        let uri = if self.raw_query_string.is_empty() {
            self.raw_path
        } else {
            format!("{}?{}", self.raw_path, self.raw_query_string)
        };

        let body = match self.body {
            Some(b) if self.is_base64_encoded => Body::from(STANDARD.decode(b)?),
            Some(b) => Body::from(b),
            None => Body::empty(),
        };

        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        Ok(builder.body(body)?)
    }
}

/// Runs one invocation event through `app` and returns the response event.
///
/// An event that does not describe a valid HTTP request is answered with a
/// 400 event; only a failure to read the app's own response is an `Err`.
pub async fn handle_event(app: Router, event: InvocationEvent) -> Result<InvocationResponse, AdapterError> {
    let request = match event.into_request() {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejecting malformed invocation event");
            return Ok(InvocationResponse::bad_request(&err));
        }
    };
    debug!(method = %request.method(), uri = %request.uri(), "invocation");

    let response = match app.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let status_code = response.status().as_u16();
    let mut headers: HashMap<String, String> = HashMap::new();
    let mut cookies = Vec::new();
    for (name, value) in response.headers() {
        let Ok(value) = value.to_str() else { continue };
        // Set-Cookie values cannot be comma-joined; v2 events carry them separately.
        if name == header::SET_COOKIE {
            cookies.push(value.to_string());
            continue;
        }
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let (body, is_base64_encoded) = match String::from_utf8(bytes.to_vec()) {
        Ok(text) => (text, false),
        Err(_) => (STANDARD.encode(&bytes), true),
    };

    Ok(InvocationResponse {
        status_code,
        headers,
        cookies,
        body,
        is_base64_encoded,
    })
}
