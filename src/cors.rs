// src/cors.rs
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::AppConfig;

pub const LOCAL_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];
const ALLOWED_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::AUTHORIZATION];

/// Cross-origin policy, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, no credentialed requests.
    Public,
    /// Only the listed origins, credentials allowed.
    Restricted { origins: Vec<String> },
}

impl CorsPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        if !config.restrict_cors {
            return CorsPolicy::Public;
        }

        let mut origins: Vec<String> = LOCAL_ORIGINS.iter().map(|o| o.to_string()).collect();
        if let Some(url) = &config.frontend_url {
            if !origins.contains(url) {
                origins.push(url.clone());
            }
        }
        CorsPolicy::Restricted { origins }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            CorsPolicy::Public => true,
            CorsPolicy::Restricted { origins } => origins.iter().any(|o| o == origin),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            CorsPolicy::Public => "public",
            CorsPolicy::Restricted { .. } => "restricted",
        }
    }

    pub fn layer(&self) -> CorsLayer {
        let base = CorsLayer::new()
            .allow_methods(ALLOWED_METHODS.to_vec())
            .allow_headers(ALLOWED_HEADERS.to_vec());

        match self {
            CorsPolicy::Public => base.allow_origin(Any),
            CorsPolicy::Restricted { origins } => {
                // FRONTEND_URL was reduced to a bare origin when the config was read.
                let values: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o).ok())
                    .collect();
                base.allow_origin(AllowOrigin::list(values))
                    .allow_credentials(true)
            }
        }
    }
}

/// Logs cross-origin requests the policy will not answer for.
pub async fn log_refused_origin(
    State(policy): State<Arc<CorsPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(header::ORIGIN).and_then(|o| o.to_str().ok()) {
        if !policy.allows(origin) {
            warn!(origin, method = %req.method(), path = %req.uri().path(), "origin not allowed by CORS policy");
        }
    }
    next.run(req).await
}
