// src/services/provider.rs
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("provider returned no reply")]
    EmptyReply,
}

/// An LLM completion backend the relay forwards messages to.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends one system instruction and one user message, returns the reply text.
    async fn complete(&self, api_key: &str, system: &str, user: &str) -> Result<String, ProviderError>;
}
