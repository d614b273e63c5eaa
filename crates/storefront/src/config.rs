//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `UPHAAR_WHATSAPP` - WhatsApp number receiving Uphaar (default) orders
//! - `KYDDOZ_WHATSAPP` - WhatsApp number receiving orders containing Kyddoz products
//!
//! ## Optional
//! - `SUPABASE_URL` - Supabase project URL; when unset the storefront runs
//!   on the bundled catalog only and order history is unavailable
//! - `SUPABASE_ANON_KEY` - Supabase API key (required when `SUPABASE_URL` is set)
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart and wishlist
//!   (default: `.storefront`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use uphaar_core::WhatsAppNumber;

use crate::services::messaging::ContactNumbers;

const DEFAULT_DATA_DIR: &str = ".storefront";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote store configuration; `None` means static-catalog-only mode
    pub supabase: Option<SupabaseConfig>,
    /// Order destination numbers per brand
    pub contacts: ContactNumbers,
    /// Directory for the local cart/wishlist storage
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Supabase project configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://abcd.supabase.co`)
    pub url: Url,
    /// API key sent as `apikey` and bearer token
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let supabase = SupabaseConfig::from_env(&env)?;
        let contacts = ContactNumbers {
            uphaar: env.whatsapp_number("UPHAAR_WHATSAPP")?,
            kyddoz: env.whatsapp_number("KYDDOZ_WHATSAPP")?,
        };
        let data_dir = PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            supabase,
            contacts,
            data_dir,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Whether a remote store is configured.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.supabase.is_some()
    }
}

impl SupabaseConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw_url) = env.optional("SUPABASE_URL") else {
            return Ok(None);
        };

        let url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string())
        })?;
        let anon_key = env.validated_secret("SUPABASE_ANON_KEY")?;

        Ok(Some(Self { url, anon_key }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required WhatsApp number.
    fn whatsapp_number(&self, key: &str) -> Result<WhatsAppNumber, ConfigError> {
        let value = self.required(key)?;
        WhatsAppNumber::parse(&value)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key from the Supabase dashboard."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD_KEY: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.aB3xY9mK2nL5pQ7rT0uW4zC6";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-anon-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(GOOD_KEY, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_offline_config() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("UPHAAR_WHATSAPP", "+91 90000 00001"),
            ("KYDDOZ_WHATSAPP", "+918767174252"),
        ]))
        .unwrap();

        assert!(!config.is_online());
        assert_eq!(config.contacts.uphaar.digits(), "919000000001");
        assert_eq!(config.contacts.kyddoz.digits(), "918767174252");
        assert_eq!(config.data_dir, PathBuf::from(".storefront"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_online_config_requires_key() {
        let result = StorefrontConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("UPHAAR_WHATSAPP", "1"),
            ("KYDDOZ_WHATSAPP", "2"),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_online_config() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", GOOD_KEY),
            ("UPHAAR_WHATSAPP", "1"),
            ("KYDDOZ_WHATSAPP", "2"),
            ("STOREFRONT_DATA_DIR", "/tmp/shop"),
        ]))
        .unwrap();

        assert!(config.is_online());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
    }

    #[test]
    fn test_missing_contact_number() {
        let result = StorefrontConfig::from_lookup(lookup(&[("UPHAAR_WHATSAPP", "1")]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "KYDDOZ_WHATSAPP"));
    }

    #[test]
    fn test_invalid_contact_number() {
        let result = StorefrontConfig::from_lookup(lookup(&[
            ("UPHAAR_WHATSAPP", "not-a-number"),
            ("KYDDOZ_WHATSAPP", "2"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_supabase_config_debug_redacts_key() {
        let config = SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").unwrap(),
            anon_key: SecretString::from("super_secret_anon_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abcd.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_anon_key"));
    }
}
