//! # Client Configuration
//!
//! Where the backend lives and the defaults a sales session starts from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PEAKERS_BASE_URL=http://10.0.0.5:5000                              │
//! │     PEAKERS_DEFAULT_VAT_PERCENT=16                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pos/client.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.peakers.pos/client.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://192.168.1.66:5000, 16% VAT, Mpesa                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [server]
//! base_url = "http://192.168.1.66:5000"
//! request_timeout_secs = 30   # omit for no timeout
//!
//! [sales]
//! default_vat_percent = 16.0
//! default_payment_type = "Mpesa"
//! currency_label = "Ksh"
//!
//! [dashboard]
//! monthly_target = 125000
//! recent_orders = 5
//! trend_days = 7
//!
//! [session]
//! default_db_name = "peakers_pos_test"
//! ```

use peakers_core::{
    Money, PaymentType, SaleDefaults, VatRate, CURRENCY_LABEL, DEFAULT_DB_NAME,
    DEFAULT_MONTHLY_TARGET,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Root of the REST API, e.g. `http://192.168.1.66:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://192.168.1.66:5000".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

// =============================================================================
// Sales Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSettings {
    /// VAT applied to a fresh sale, in percent.
    #[serde(default = "default_vat_percent")]
    pub default_vat_percent: f64,

    #[serde(default)]
    pub default_payment_type: PaymentType,

    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

fn default_vat_percent() -> f64 {
    16.0
}

fn default_currency_label() -> String {
    CURRENCY_LABEL.to_string()
}

impl Default for SalesSettings {
    fn default() -> Self {
        SalesSettings {
            default_vat_percent: default_vat_percent(),
            default_payment_type: PaymentType::default(),
            currency_label: default_currency_label(),
        }
    }
}

// =============================================================================
// Dashboard Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Monthly target in whole shillings, used when the backend reports none.
    #[serde(default = "default_monthly_target")]
    pub monthly_target: i64,

    #[serde(default = "default_recent_orders")]
    pub recent_orders: usize,

    #[serde(default = "default_trend_days")]
    pub trend_days: usize,
}

fn default_monthly_target() -> i64 {
    DEFAULT_MONTHLY_TARGET
}

fn default_recent_orders() -> usize {
    peakers_core::dashboard::RECENT_ORDERS
}

fn default_trend_days() -> usize {
    peakers_core::dashboard::TREND_POINTS
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            monthly_target: default_monthly_target(),
            recent_orders: default_recent_orders(),
            trend_days: default_trend_days(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Database sent with login when none has been connected yet.
    #[serde(default = "default_db_name")]
    pub default_db_name: String,
}

fn default_db_name() -> String {
    DEFAULT_DB_NAME.to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            default_db_name: default_db_name(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub sales: SalesSettings,

    #[serde(default)]
    pub dashboard: DashboardSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if !self.sales.default_vat_percent.is_finite() {
            return Err(ClientError::InvalidConfig(
                "default_vat_percent must be a number".into(),
            ));
        }

        if self.server.request_timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "request_timeout_secs must be greater than 0 (omit it to disable)".into(),
            ));
        }

        if self.dashboard.recent_orders == 0 || self.dashboard.trend_days == 0 {
            return Err(ClientError::InvalidConfig(
                "recent_orders and trend_days must be greater than 0".into(),
            ));
        }

        if self.session.default_db_name.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "default_db_name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `PEAKERS_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides read through `lookup` instead of the process
    /// environment.
    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PEAKERS_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.server.base_url = url;
        }

        if let Some(secs) = lookup("PEAKERS_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.server.request_timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring invalid PEAKERS_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(pct) = lookup("PEAKERS_DEFAULT_VAT_PERCENT") {
            match pct.parse::<f64>() {
                Ok(p) => self.sales.default_vat_percent = p,
                Err(_) => warn!(value = %pct, "Ignoring invalid PEAKERS_DEFAULT_VAT_PERCENT"),
            }
        }

        if let Some(payment) = lookup("PEAKERS_PAYMENT_TYPE") {
            self.sales.default_payment_type = PaymentType::from(payment.as_str());
        }

        if let Some(target) = lookup("PEAKERS_MONTHLY_TARGET") {
            if let Ok(t) = target.parse::<i64>() {
                self.dashboard.monthly_target = t;
            }
        }

        if let Some(db) = lookup("PEAKERS_DB_NAME") {
            debug!(db_name = %db, "Overriding default database from environment");
            self.session.default_db_name = db;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "peakers", "pos")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL; only http and https are accepted.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(self.server.base_url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "Base URL must use http:// or https://, got: {}",
                other
            ))),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.server.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn sale_defaults(&self) -> SaleDefaults {
        SaleDefaults {
            vat_rate: VatRate::from_percent(self.sales.default_vat_percent),
            payment_type: self.sales.default_payment_type.clone(),
        }
    }

    pub fn monthly_target(&self) -> Money {
        Money::from_major(self.dashboard.monthly_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server.base_url, "http://192.168.1.66:5000");
        assert_eq!(config.server.request_timeout_secs, None);
        assert_eq!(config.sales.default_payment_type, PaymentType::Mpesa);
        assert_eq!(config.dashboard.monthly_target, 125_000);
        assert_eq!(config.session.default_db_name, "peakers_pos_test");
        assert!(config.validate().is_ok());
        assert_eq!(config.sale_defaults().vat_rate.bps(), 1600);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.server.base_url = "ftp://files.local".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.server.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.server.base_url = "https://pos.example.com".to_string();
        assert!(config.validate().is_ok());

        config.dashboard.recent_orders = 0;
        assert!(config.validate().is_err());
        config.dashboard.recent_orders = 5;

        config.server.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [server]
            base_url = "http://10.0.0.5:5000"

            [sales]
            default_payment_type = "Cash"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.sales.default_payment_type, PaymentType::Cash);
        assert_eq!(config.sales.default_vat_percent, 16.0);
        assert_eq!(config.dashboard.trend_days, 7);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PEAKERS_BASE_URL", "http://pos.local:8000"),
            ("PEAKERS_REQUEST_TIMEOUT_SECS", "20"),
            ("PEAKERS_DEFAULT_VAT_PERCENT", "8"),
            ("PEAKERS_PAYMENT_TYPE", "Bank"),
            ("PEAKERS_MONTHLY_TARGET", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_env_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.base_url, "http://pos.local:8000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.sale_defaults().vat_rate.bps(), 800);
        assert_eq!(config.sales.default_payment_type, PaymentType::Bank);
        assert_eq!(config.dashboard.monthly_target, 125_000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.toml");

        let mut config = ClientConfig::default();
        config.server.base_url = "http://127.0.0.1:5000".to_string();
        config.server.request_timeout_secs = Some(15);
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: ClientConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "[server\nbase_url = ").unwrap();

        let err = ClientConfig::load(Some(path.clone())).unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(
            ClientConfig::load_or_default(Some(path)).dashboard.monthly_target,
            125_000
        );
    }
}
