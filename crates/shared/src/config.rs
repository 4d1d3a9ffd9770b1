//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Bank configuration.
    #[serde(default)]
    pub bank: BankConfig,
    /// Exchange rate feed configuration.
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Bank configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BankConfig {
    /// Base currency all conversions route through.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
        }
    }
}

fn default_base_currency() -> String {
    "CZK".to_string()
}

/// Exchange rate feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// URL of the daily exchange rate feed.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// HTTP timeout for feed requests in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_feed_url() -> String {
    "https://www.cnb.cz/cs/financni-trhy/devizovy-trh/kurzy-devizoveho-trhu/kurzy-devizoveho-trhu/denni_kurz.txt".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KORUNA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
