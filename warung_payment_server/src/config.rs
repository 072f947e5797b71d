use std::env;

use log::*;
use midtrans_tools::MidtransConfig;
use wpg_common::{parse_boolean_flag, Secret};

const DEFAULT_WPG_HOST: &str = "127.0.0.1";
const DEFAULT_WPG_PORT: u16 = 8480;
const DEFAULT_DOKU_NOTIFICATION_PATH: &str = "/webhook/doku/notification";
const DEFAULT_MIDTRANS_NOTIFICATION_PATH: &str = "/webhook/midtrans/notification";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub doku: DokuConfig,
    pub midtrans: MidtransConfig,
    /// The path the callback-verified provider POSTs notifications to.
    pub midtrans_notification_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WPG_HOST.to_string(),
            port: DEFAULT_WPG_PORT,
            database_url: String::default(),
            doku: DokuConfig::default(),
            midtrans: MidtransConfig::default(),
            midtrans_notification_path: DEFAULT_MIDTRANS_NOTIFICATION_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WPG_HOST").ok().unwrap_or_else(|| DEFAULT_WPG_HOST.into());
        let port = env::var("WPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WPG_PORT. {e} Using the default, {DEFAULT_WPG_PORT}, instead."
                    );
                    DEFAULT_WPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WPG_PORT);
        let database_url = env::var("WPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ WPG_DATABASE_URL is not set. Please set it to the URL for the order database.");
            String::default()
        });
        let doku = DokuConfig::from_env_or_default();
        let midtrans = MidtransConfig::new_from_env_or_default();
        let midtrans_notification_path = env::var("WPG_MIDTRANS_NOTIFICATION_PATH").ok().unwrap_or_else(|| {
            info!(
                "🪛️ WPG_MIDTRANS_NOTIFICATION_PATH is not set. Using the default, \
                 {DEFAULT_MIDTRANS_NOTIFICATION_PATH}."
            );
            DEFAULT_MIDTRANS_NOTIFICATION_PATH.to_string()
        });
        Self { host, port, database_url, doku, midtrans, midtrans_notification_path }
    }
}

//-------------------------------------------------  DokuConfig  ------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct DokuConfig {
    /// The client id issued by the provider. Part of the signed canonical string.
    pub client_id: String,
    /// The shared secret known only to us and the provider. Never log this.
    pub secret_key: Secret<String>,
    /// The request target the provider signs over. This must match the path the webhook is mounted on; both come
    /// from this config value, so they cannot drift apart.
    pub notification_path: String,
    /// If false, the signature middleware waves everything through. Strictly for local testing.
    pub signature_checks: bool,
}

impl DokuConfig {
    pub fn from_env_or_default() -> Self {
        let client_id = env::var("WPG_DOKU_CLIENT_ID").unwrap_or_else(|_| {
            error!("🪛️ WPG_DOKU_CLIENT_ID is not set. Signature verification will reject every notification.");
            String::default()
        });
        let secret_key = Secret::new(env::var("WPG_DOKU_SECRET_KEY").unwrap_or_else(|_| {
            error!("🪛️ WPG_DOKU_SECRET_KEY is not set. Signature verification will reject every notification.");
            String::default()
        }));
        let notification_path = env::var("WPG_DOKU_NOTIFICATION_PATH").unwrap_or_else(|_| {
            info!("🪛️ WPG_DOKU_NOTIFICATION_PATH is not set. Using the default, {DEFAULT_DOKU_NOTIFICATION_PATH}.");
            DEFAULT_DOKU_NOTIFICATION_PATH.to_string()
        });
        let signature_checks = parse_boolean_flag(env::var("WPG_DOKU_SIGNATURE_CHECKS").ok(), true);
        if !signature_checks {
            warn!("🚨️ DOKU signature checks are DISABLED. Anyone can forge payment notifications. Do not run \
                   like this in production.");
        }
        Self { client_id, secret_key, notification_path, signature_checks }
    }
}
