//! Application settings loading from config.toml
//!
//! Non-secret settings (bind address, plugin profile, admin accounts) come from a
//! TOML file. The nonce signing key is read from the environment so it never
//! lands in a file that gets committed.

use crate::errors::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_NONCE_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Which of the two plugin variants the service presents to the admin client.
///
/// Both variants share the same generation and update logic; they differ in the
/// AJAX action names, the nonce action and the capability required to call them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginProfile {
    /// "Coupon Manager for GravityForms"
    #[default]
    CouponManager,
    /// "GravityForms Coupon Generator"
    GfCouponGenerator,
}

impl PluginProfile {
    /// AJAX action name of the generate handler
    #[must_use]
    pub const fn generate_action(self) -> &'static str {
        match self {
            Self::CouponManager => "generate_coupmafo_coupons",
            Self::GfCouponGenerator => "generate_gf_coupons",
        }
    }

    /// AJAX action name of the bulk update handler
    #[must_use]
    pub const fn update_action(self) -> &'static str {
        match self {
            Self::CouponManager => "update_coupmafo_coupons",
            Self::GfCouponGenerator => "update_gf_coupons",
        }
    }

    /// Action the nonce is bound to; both handlers share it
    #[must_use]
    pub const fn nonce_action(self) -> &'static str {
        match self {
            Self::CouponManager => "coupmafo_coupon_generator_nonce",
            Self::GfCouponGenerator => "gf_coupon_generator_nonce",
        }
    }

    /// Capability an admin needs to call either handler
    #[must_use]
    pub const fn required_capability(self) -> &'static str {
        match self {
            Self::CouponManager => "manage_options",
            Self::GfCouponGenerator => "gravityforms_edit_forms",
        }
    }
}

/// An administrator allowed to call the API.
#[derive(Debug, Deserialize)]
pub struct AdminAccount {
    /// Login name, also bound into every nonce issued to this admin
    pub login: String,
    /// Bearer token presented in the `Authorization` header
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: SecretString,
    /// Capabilities granted to this admin (e.g. `manage_options`)
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Plugin variant to present
    #[serde(default)]
    pub profile: PluginProfile,
    /// How long an issued nonce stays valid
    #[serde(default = "default_nonce_lifetime")]
    pub nonce_lifetime_secs: u64,
    /// Create the feed and form tables on startup
    #[serde(default = "default_create_tables")]
    pub create_tables: bool,
    /// Administrators allowed to use the API
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

const fn default_nonce_lifetime() -> u64 {
    DEFAULT_NONCE_LIFETIME_SECS
}

const fn default_create_tables() -> bool {
    true
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl AppConfig {
    /// Checks invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns `Error::Config` when the nonce lifetime is too short to be split
    /// into two ticks or when two admins share a login.
    pub fn validate(&self) -> Result<()> {
        if self.nonce_lifetime_secs < 2 {
            return Err(Error::Config {
                message: "nonce_lifetime_secs must be at least 2".to_string(),
            });
        }

        let mut logins: Vec<&str> = self.admins.iter().map(|a| a.login.as_str()).collect();
        logins.sort_unstable();
        if let Some(pair) = logins.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::Config {
                message: format!("duplicate admin login '{}'", pair[0]),
            });
        }

        if self.admins.is_empty() {
            tracing::warn!("No admins configured; every API request will be rejected");
        }

        Ok(())
    }
}

/// Parses and validates configuration from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid or fails [`AppConfig::validate`].
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The settings are inconsistent
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `COUPON_CONFIG`, or `./config.toml` when unset.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("COUPON_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}

/// Reads the nonce signing key from `NONCE_SECRET`.
///
/// # Errors
/// Returns `Error::Config` when the variable is missing or empty.
pub fn load_nonce_secret() -> Result<SecretString> {
    let secret = std::env::var("NONCE_SECRET").map_err(|e| Error::Config {
        message: format!("NONCE_SECRET is required: {e}"),
    })?;
    if secret.trim().is_empty() {
        return Err(Error::Config {
            message: "NONCE_SECRET must not be empty".to_string(),
        });
    }
    Ok(SecretString::from(secret))
}
