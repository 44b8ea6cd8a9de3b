use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://management.azure.com/subscriptions";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL that subscription ids are appended to.
    pub api_url: String,
    pub access_token: Option<String>,
    /// Used by single-resource queries that name no subscription.
    pub default_subscription: String,
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `AZMON_*` variables. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let listen_addr = non_empty("AZMON_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("invalid AZMON_LISTEN_ADDR value")?;

        let request_timeout = match non_empty("AZMON_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("AZMON_REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: non_empty("AZMON_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            access_token: non_empty("AZMON_ACCESS_TOKEN"),
            default_subscription: non_empty("AZMON_DEFAULT_SUBSCRIPTION").unwrap_or_default(),
            listen_addr,
            request_timeout: Duration::from_secs(request_timeout.max(1)),
            log_dir: non_empty("AZMON_LOG_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.access_token, None);
        assert_eq!(cfg.default_subscription, "");
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.log_dir, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("AZMON_API_URL", "http://localhost:9000/subscriptions"),
            ("AZMON_ACCESS_TOKEN", "token"),
            ("AZMON_DEFAULT_SUBSCRIPTION", "sub1"),
            ("AZMON_LISTEN_ADDR", "127.0.0.1:3000"),
            ("AZMON_REQUEST_TIMEOUT_SECS", "0"),
            ("AZMON_LOG_DIR", "/var/log/azmon"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url, "http://localhost:9000/subscriptions");
        assert_eq!(cfg.access_token.as_deref(), Some("token"));
        assert_eq!(cfg.default_subscription, "sub1");
        assert_eq!(cfg.listen_addr.port(), 3000);
        assert_eq!(cfg.request_timeout, Duration::from_secs(1));
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/var/log/azmon")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("AZMON_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config(&[("AZMON_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
