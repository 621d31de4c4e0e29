//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ERISED_SHOP_NAME` - Name shown in order messages (default: Cafe Erised)
//! - `ERISED_MESSAGING_HOST` - Deep-link host (default: wa.me)
//! - `ERISED_ORDER_RECIPIENT` - Phone number orders are sent to; `+`, spaces
//!   and dashes are stripped (default: 923167059804)
//! - `ERISED_CURRENCY_LABEL` - Label printed before amounts (default: Rs)
//! - `ERISED_STORAGE_DIR` - Directory the cart file is kept in (default: .erised)
//! - `ERISED_CART_KEY` - Storage key of the cart (default: `erised_cart`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::storage::DEFAULT_CART_KEY;

const DEFAULT_SHOP_NAME: &str = "Cafe Erised";
const DEFAULT_MESSAGING_HOST: &str = "wa.me";
const DEFAULT_RECIPIENT: &str = "923167059804";
const DEFAULT_CURRENCY_LABEL: &str = "Rs";
const DEFAULT_STORAGE_DIR: &str = ".erised";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct ErisedConfig {
    /// Where the cart is stored
    pub cart: CartConfig,
    /// How checkout links are built
    pub checkout: CheckoutConfig,
}

/// Cart storage configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory holding the cart file
    pub storage_dir: PathBuf,
    /// Storage key, also the file stem
    pub key: String,
}

/// Checkout hand-off configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Shop name in the message header
    pub shop_name: String,
    /// Host of the messaging deep link (e.g., wa.me)
    pub messaging_host: String,
    /// Recipient id appended to the link path, digits only
    pub recipient: String,
    /// Label printed before every amount (e.g., Rs)
    pub currency_label: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            shop_name: DEFAULT_SHOP_NAME.to_string(),
            messaging_host: DEFAULT_MESSAGING_HOST.to_string(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
        }
    }
}

impl ErisedConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            cart: CartConfig::from_lookup(&lookup)?,
            checkout: CheckoutConfig::from_lookup(&lookup)?,
        })
    }
}

impl CartConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = PathBuf::from(get_or_default(
            lookup,
            "ERISED_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));
        let key = get_or_default(lookup, "ERISED_CART_KEY", DEFAULT_CART_KEY);
        validate_key(&key, "ERISED_CART_KEY")?;

        Ok(Self { storage_dir, key })
    }
}

impl CheckoutConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            shop_name: get_or_default(lookup, "ERISED_SHOP_NAME", DEFAULT_SHOP_NAME),
            messaging_host: get_or_default(
                lookup,
                "ERISED_MESSAGING_HOST",
                DEFAULT_MESSAGING_HOST,
            ),
            recipient: normalize_recipient(&get_or_default(
                lookup,
                "ERISED_ORDER_RECIPIENT",
                DEFAULT_RECIPIENT,
            )),
            currency_label: get_or_default(
                lookup,
                "ERISED_CURRENCY_LABEL",
                DEFAULT_CURRENCY_LABEL,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the host and recipient form a plain `https://host/recipient` URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recipient.is_empty() || !self.recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "ERISED_ORDER_RECIPIENT".to_string(),
                format!("must be a phone number, got {:?}", self.recipient),
            ));
        }

        let invalid_host = |reason: String| {
            ConfigError::InvalidEnvVar("ERISED_MESSAGING_HOST".to_string(), reason)
        };
        let url = Url::parse(&format!("https://{}/{}", self.messaging_host, self.recipient))
            .map_err(|e| invalid_host(e.to_string()))?;
        if url.path() != format!("/{}", self.recipient) || url.query().is_some() {
            return Err(invalid_host(format!(
                "must be a bare host name, got {:?}",
                self.messaging_host
            )));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid_host("must not contain credentials".to_string()));
        }

        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value. Blank values count as unset.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Strip the `+`, spaces and dashes people write phone numbers with.
fn normalize_recipient(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-'))
        .collect()
}

fn validate_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "may only contain letters, digits, '_' and '-'".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ErisedConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.checkout, CheckoutConfig::default());
        assert_eq!(config.cart.key, "erised_cart");
        assert_eq!(config.cart.storage_dir, PathBuf::from(".erised"));
    }

    #[test]
    fn test_overrides() {
        let config = ErisedConfig::from_lookup(lookup(&[
            ("ERISED_SHOP_NAME", "Leaky Cauldron"),
            ("ERISED_CURRENCY_LABEL", "£"),
            ("ERISED_STORAGE_DIR", "/tmp/carts"),
            ("ERISED_CART_KEY", "table-7"),
        ]))
        .unwrap();
        assert_eq!(config.checkout.shop_name, "Leaky Cauldron");
        assert_eq!(config.checkout.currency_label, "£");
        assert_eq!(config.cart.storage_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.cart.key, "table-7");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = ErisedConfig::from_lookup(lookup(&[("ERISED_SHOP_NAME", "  ")])).unwrap();
        assert_eq!(config.checkout.shop_name, "Cafe Erised");
    }

    #[test]
    fn test_recipient_is_normalized() {
        let config =
            ErisedConfig::from_lookup(lookup(&[("ERISED_ORDER_RECIPIENT", "+92 316-7059804")]))
                .unwrap();
        assert_eq!(config.checkout.recipient, "923167059804");
    }

    #[test]
    fn test_recipient_must_be_digits() {
        let err = ErisedConfig::from_lookup(lookup(&[("ERISED_ORDER_RECIPIENT", "abc")]))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "ERISED_ORDER_RECIPIENT")
        );
    }

    #[test]
    fn test_host_must_be_bare() {
        for host in ["wa.me/extra", "wa.me?x=1", "user:pw@wa.me", "bad host"] {
            let result = ErisedConfig::from_lookup(lookup(&[("ERISED_MESSAGING_HOST", host)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvVar(ref var, _)) if var == "ERISED_MESSAGING_HOST"),
                "{host}"
            );
        }
    }

    #[test]
    fn test_cart_key_must_be_filename_safe() {
        let result = ErisedConfig::from_lookup(lookup(&[("ERISED_CART_KEY", "../cart")]));
        assert!(result.is_err());
    }
}
