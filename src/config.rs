// src/config.rs
use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const SYSTEM_PROMPT: &str = "You are a supportive mental coach.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FRONTEND_URL is not a valid origin: {0}")]
    InvalidFrontendUrl(String),
}

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub restrict_cors: bool,
    pub frontend_url: Option<String>,
    pub model: String,
    pub base_url: String,
    pub bind_addr: String,
}

// Keeps the credential out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("restrict_cors", &self.restrict_cors)
            .field("frontend_url", &self.frontend_url)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            restrict_cors: false,
            frontend_url: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Reduces `raw` to a browser origin (`scheme://host[:port]`), the only form
/// a CORS allow-list entry may take.
fn parse_origin(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidFrontendUrl(raw.to_string());

    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https")
        || url.host_str().is_none()
        || url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
        || !url.username().is_empty()
    {
        return Err(invalid());
    }

    let origin = url.origin().ascii_serialization();
    HeaderValue::from_str(&origin).map_err(|_| invalid())?;
    Ok(origin)
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// | Variable          | Default                     |
    /// |-------------------|-----------------------------|
    /// | `OPENAI_API_KEY`  | unset                       |
    /// | `RESTRICT_CORS`   | `false`                     |
    /// | `FRONTEND_URL`    | unset                       |
    /// | `OPENAI_MODEL`    | `gpt-4o-mini`               |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    /// | `BIND_ADDR`       | `0.0.0.0:8000`              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let restrict_cors = non_empty("RESTRICT_CORS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut frontend_url = non_empty("FRONTEND_URL");
        if restrict_cors {
            frontend_url = frontend_url.map(|url| parse_origin(&url)).transpose()?;
        }

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            restrict_cors,
            frontend_url,
            model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}
