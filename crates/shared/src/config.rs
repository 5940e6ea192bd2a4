//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Password policy configuration.
    #[serde(default)]
    pub password: PasswordPolicyConfig,
    /// Email policy configuration.
    #[serde(default)]
    pub email: EmailPolicyConfig,
    /// Guest-to-client upgrade policy configuration.
    #[serde(default)]
    pub upgrade: UpgradePolicyConfig,
}

/// Password policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Minimum password length.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Whether a special character is required.
    #[serde(default = "default_require_special")]
    pub require_special: bool,
    /// Extra denylisted passwords beyond the builtin set.
    #[serde(default)]
    pub extra_denylist: Vec<String>,
}

fn default_min_length() -> usize {
    8
}

fn default_max_length() -> usize {
    128
}

fn default_require_special() -> bool {
    true
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            require_special: default_require_special(),
            extra_denylist: Vec::new(),
        }
    }
}

/// Email policy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailPolicyConfig {
    /// Whether known disposable-email domains are rejected.
    #[serde(default)]
    pub reject_disposable: bool,
    /// Extra disposable domains beyond the builtin set.
    #[serde(default)]
    pub extra_disposable_domains: Vec<String>,
}

/// Upgrade workflow policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradePolicyConfig {
    /// Minimum expected investment amount for a guest-to-client application.
    #[serde(default = "default_minimum_investment")]
    pub minimum_investment: Decimal,
}

fn default_minimum_investment() -> Decimal {
    Decimal::new(10_000, 0)
}

impl Default for UpgradePolicyConfig {
    fn default() -> Self {
        Self {
            minimum_investment: default_minimum_investment(),
        }
    }
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
            .add_source(config::Environment::with_prefix("ATRIUM").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
