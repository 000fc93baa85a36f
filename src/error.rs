// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::message::ErrorBody;
use crate::services::provider::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("OPENAI_API_KEY not configured")]
    MissingApiKey,

    #[error("Error calling OpenAI API: {0}")]
    Upstream(#[from] ProviderError),

    #[error("{0}")]
    InvalidBody(#[from] JsonRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey | AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::MissingApiKey => error!("chat request refused: no provider credential"),
            AppError::Upstream(e) => error!(error = %e, "provider call failed"),
            AppError::InvalidBody(r) => warn!(status = %status, "rejected chat body: {}", r.body_text()),
        }
        let detail = match &self {
            AppError::InvalidBody(r) => r.body_text(),
            other => other.to_string(),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
