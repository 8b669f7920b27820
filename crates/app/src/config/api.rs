//! API Config

use std::time::Duration;

use clap::Args;
use zeroize::Zeroizing;

use crate::api::CommerceApiConfig;

/// Commerce API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Commerce API base URL
    #[arg(long, env = "CARTAGE_API_URL")]
    pub api_url: String,

    /// Customer session token; omit to act as a signed-out customer
    #[arg(long, env = "CARTAGE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "CARTAGE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Client settings, moving the token into zeroizing storage.
    #[must_use]
    pub fn into_client_config(self) -> CommerceApiConfig {
        CommerceApiConfig {
            base_url: self.api_url,
            token: self.api_token.filter(|token| !token.is_empty()).map(Zeroizing::new),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
