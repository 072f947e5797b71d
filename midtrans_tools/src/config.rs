use std::time::Duration;

use log::*;
use wpg_common::Secret;

const DEFAULT_BASE_URL: &str = "https://api.sandbox.midtrans.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    /// The Core API base URL. The sandbox by default; point at `https://api.midtrans.com` in production.
    pub base_url: String,
    pub server_key: Secret<String>,
    /// Upper bound on each outbound status query. Webhook handlers block on this call, so keep it short.
    pub timeout: Duration,
}

impl Default for MidtransConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            server_key: Secret::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MidtransConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("WPG_MIDTRANS_BASE_URL").unwrap_or_else(|_| {
            warn!("WPG_MIDTRANS_BASE_URL not set, using the sandbox environment, {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        });
        let server_key = Secret::new(std::env::var("WPG_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            error!("WPG_MIDTRANS_SERVER_KEY not set. Status queries against the provider will be rejected.");
            String::default()
        }));
        let timeout = std::env::var("WPG_MIDTRANS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { base_url, server_key, timeout }
    }
}
