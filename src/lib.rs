//! HTTP relay between a chat frontend and an OpenAI-compatible completion API.
//!
//! The provider credential stays on the server; browsers only ever see
//! `{"reply": ...}` or `{"detail": ...}`.

pub mod adapter;
pub mod config;
pub mod cors;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{Router, middleware};

use crate::cors::CorsPolicy;
use crate::state::SharedState;

/// Full application: routes, tracing and the CORS policy derived from the config.
pub fn build_app(state: SharedState) -> Router {
    let policy = Arc::new(CorsPolicy::from_config(&state.config));
    let cors = policy.layer();

    routes::create_router()
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn_with_state(policy, cors::log_refused_origin))
}
