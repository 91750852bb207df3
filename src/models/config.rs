//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the operator binary.
pub struct AppConfig {
    pub api: ApiConfig,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
/// Location of the remote back-office API.
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: default_timeout(),
        }
    }
}
