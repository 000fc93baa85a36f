// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::openai::OpenAiProvider;
use crate::services::provider::ChatProvider;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// State backed by the OpenAI client described by `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let provider = OpenAiProvider::new(config.base_url.clone(), config.model.clone());
        Self::new(config, Arc::new(provider))
    }
}
