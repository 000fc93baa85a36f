#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Response;
use coach_relay::build_app;
use coach_relay::config::AppConfig;
use coach_relay::services::provider::{ChatProvider, ProviderError};
use coach_relay::state::AppState;

/// Provider double that records calls and answers with a canned result.
pub struct MockProvider {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_system: std::sync::Mutex<Option<String>>,
}

impl MockProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_system: std::sync::Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_system: std::sync::Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn complete(&self, _api_key: &str, system: &str, _user: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system.lock().unwrap() = Some(system.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ProviderError::Api {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}

pub fn config_with_key() -> AppConfig {
    AppConfig {
        openai_api_key: Some("sk-test".to_string()),
        ..Default::default()
    }
}

pub fn app(config: AppConfig, provider: Arc<MockProvider>) -> Router {
    build_app(Arc::new(AppState::new(config, provider)))
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
