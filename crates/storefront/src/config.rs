//! Storefront configuration loaded from environment variables.
//!
//! Everything is read once in [`StorefrontConfig::from_env`]; nothing is
//! reloadable at runtime. Secrets land in [`SecretString`] and must pass a
//! placeholder blocklist plus a minimum-entropy bar, so a copy-pasted
//! `.env.example` refuses to boot instead of running with a known secret.
//!
//! # Required
//!
//! - `SAVORY_DATABASE_URL` - `PostgreSQL` connection string (`DATABASE_URL` also accepted)
//! - `SAVORY_BASE_URL` - Public URL of the storefront, used for checkout redirect URLs
//! - `SAVORY_SESSION_SECRET` - Session secret, at least 32 characters of real randomness
//! - `STRIPE_SECRET_KEY` - Stripe API secret key (`sk_test_...` or `sk_live_...`)
//!
//! # Optional
//!
//! - `SAVORY_HOST` - Bind address (default: 127.0.0.1)
//! - `SAVORY_PORT` - Listen port (default: 4242)
//! - `CHECKOUT_CURRENCY` - ISO 4217 currency code for checkout (default: usd)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Secrets shorter than this are rejected outright.
const MIN_SECRET_LEN: usize = 32;

/// Minimum Shannon entropy, in bits per character, for a secret to pass.
/// Random base64 sits near 6, English prose near 4, `aaaa...` at 0.
const MIN_SECRET_ENTROPY: f64 = 3.3;

/// Fragments that mark a secret as a template value rather than a real one.
/// Matched case-insensitively against the whole value.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "changeme",
    "change-me",
    "placeholder",
    "example",
    "sample",
    "dummy",
    "your-",
    "secret",
    "password",
    "fixme",
    "todo",
    "xxx",
];

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("{var} failed the secret check: {reason}")]
    WeakSecret { var: &'static str, reason: String },
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` connection string, password included.
    pub database_url: SecretString,
    /// Address the HTTP server binds to.
    pub host: IpAddr,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Public base URL, without a trailing slash.
    pub base_url: String,
    /// Secret backing the session cookie. Validated at startup.
    pub session_secret: SecretString,
    /// Stripe credentials.
    pub stripe: StripeConfig,
    /// Lowercase ISO 4217 code passed to Stripe Checkout.
    pub checkout_currency: String,
    /// Sentry DSN; absent when error tracking is disabled.
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag.
    pub sentry_environment: Option<String>,
}

/// Stripe API credentials.
///
/// `Debug` is written by hand so the key never reaches a log line.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe API secret key (server-side only).
    pub secret_key: SecretString,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file first when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent, fails to
    /// parse, or carries a secret that looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host: IpAddr = parse_var("SAVORY_HOST", "127.0.0.1")?;
        let port: u16 = parse_var("SAVORY_PORT", "4242")?;

        Ok(Self {
            database_url: database_url_from_env()?,
            host,
            port,
            base_url: base_url_from_env("SAVORY_BASE_URL")?,
            session_secret: secret_from_env("SAVORY_SESSION_SECRET", MIN_SECRET_LEN)?,
            stripe: StripeConfig {
                secret_key: secret_from_env("STRIPE_SECRET_KEY", 0)?,
            },
            checkout_currency: currency_from_env("CHECKOUT_CURRENCY")?,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// The socket address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public base URL is served over HTTPS.
    ///
    /// Controls the `Secure` flag on the session cookie.
    #[must_use]
    pub fn serves_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_var<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_owned());
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

/// `SAVORY_DATABASE_URL` wins; plain `DATABASE_URL` (what managed Postgres
/// attach commands export) is accepted as a fallback. The deprecated
/// `postgres://` scheme is rewritten to `postgresql://` on the way in.
fn database_url_from_env() -> Result<SecretString, ConfigError> {
    ["SAVORY_DATABASE_URL", "DATABASE_URL"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .map(|raw| SecretString::from(normalize_pg_scheme(&raw)))
        .ok_or(ConfigError::Missing("SAVORY_DATABASE_URL"))
}

/// Rewrite a leading `postgres://` scheme to `postgresql://`. Applied
/// exactly once, at load time.
fn normalize_pg_scheme(url: &str) -> String {
    url.strip_prefix("postgres://")
        .map_or_else(|| url.to_owned(), |rest| format!("postgresql://{rest}"))
}

/// The base URL must be absolute with a host. A trailing slash is trimmed
/// so redirect URLs can be built by plain concatenation.
fn base_url_from_env(var: &'static str) -> Result<String, ConfigError> {
    let value = std::env::var(var).map_err(|_| ConfigError::Missing(var))?;
    let parsed = url::Url::parse(&value).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    if parsed.host_str().is_none() {
        return Err(ConfigError::Invalid {
            var,
            reason: "must include a host".to_owned(),
        });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

/// Read a currency code, defaulting to `usd`.
fn currency_from_env(var: &'static str) -> Result<String, ConfigError> {
    let code = std::env::var(var)
        .unwrap_or_else(|_| "usd".to_owned())
        .to_lowercase();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_lowercase()) {
        Ok(code)
    } else {
        Err(ConfigError::Invalid {
            var,
            reason: format!("'{code}' is not a three-letter currency code"),
        })
    }
}

/// Read a secret from the environment and vet it.
fn secret_from_env(var: &'static str, min_len: usize) -> Result<SecretString, ConfigError> {
    let value = std::env::var(var).map_err(|_| ConfigError::Missing(var))?;
    check_secret(var, &value, min_len)?;
    Ok(SecretString::from(value))
}

/// Length, placeholder, and entropy checks, in that order.
fn check_secret(var: &'static str, value: &str, min_len: usize) -> Result<(), ConfigError> {
    if value.len() < min_len {
        return Err(ConfigError::WeakSecret {
            var,
            reason: format!("shorter than {min_len} characters"),
        });
    }

    let lowered = value.to_lowercase();
    if let Some(hit) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lowered.contains(**f)) {
        return Err(ConfigError::WeakSecret {
            var,
            reason: format!("contains the placeholder fragment '{hit}'"),
        });
    }

    let bits = entropy_per_char(value);
    if bits < MIN_SECRET_ENTROPY {
        return Err(ConfigError::WeakSecret {
            var,
            reason: format!(
                "entropy is {bits:.2} bits/char, below the {MIN_SECRET_ENTROPY} floor; generate it randomly"
            ),
        });
    }

    Ok(())
}

/// Shannon entropy of the character distribution, in bits per character.
fn entropy_per_char(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, f64> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0.0) += 1.0;
    }
    let total: f64 = counts.values().sum();

    counts
        .values()
        .map(|&n| {
            let p = n / total;
            -(p * p.log2())
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pg_scheme_is_rewritten() {
        assert_eq!(
            normalize_pg_scheme("postgres://user:pw@host/db"),
            "postgresql://user:pw@host/db"
        );
    }

    #[test]
    fn full_pg_scheme_is_untouched() {
        assert_eq!(
            normalize_pg_scheme("postgresql://user:pw@host/db"),
            "postgresql://user:pw@host/db"
        );
    }

    #[test]
    fn pg_scheme_rewrite_only_looks_at_the_prefix() {
        // A postgres:// substring later in the URL must survive
        assert_eq!(
            normalize_pg_scheme("postgresql://host/db?note=postgres://x"),
            "postgresql://host/db?note=postgres://x"
        );
    }

    #[test]
    fn currency_defaults_to_usd() {
        let code = currency_from_env("SAVORY_TEST_UNSET_CURRENCY").unwrap();
        assert_eq!(code, "usd");
    }

    #[test]
    fn entropy_of_empty_and_uniform_input_is_zero() {
        assert!(entropy_per_char("").abs() < f64::EPSILON);
        assert!(entropy_per_char("zzzzzzzz").abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_of_an_alternating_pair_is_one_bit() {
        assert!((entropy_per_char("abababab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn random_secrets_clear_the_entropy_floor() {
        assert!(entropy_per_char("kX9#vQ2$mW5!jR8@tY3%nP6^") > MIN_SECRET_ENTROPY);
    }

    #[test]
    fn short_secrets_are_rejected() {
        let result = check_secret("TEST_VAR", "kX9#vQ2$", MIN_SECRET_LEN);
        assert!(matches!(result, Err(ConfigError::WeakSecret { .. })));
    }

    #[test]
    fn placeholder_fragments_are_rejected() {
        assert!(check_secret("TEST_VAR", "your-session-key-goes-here-1293847", 0).is_err());
        assert!(check_secret("TEST_VAR", "ChangeMe-0192837465-qwertyuiopas", 0).is_err());
    }

    #[test]
    fn repetitive_secrets_are_rejected() {
        let result = check_secret("TEST_VAR", &"abc".repeat(12), MIN_SECRET_LEN);
        assert!(matches!(result, Err(ConfigError::WeakSecret { .. })));
    }

    #[test]
    fn strong_secrets_pass() {
        assert!(check_secret("TEST_VAR", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", MIN_SECRET_LEN).is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = test_config();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:4242");
    }

    #[test]
    fn serves_https_reflects_the_scheme() {
        let mut config = test_config();
        assert!(!config.serves_https());

        config.base_url = "https://savory.kitchen".to_string();
        assert!(config.serves_https());
    }

    #[test]
    fn stripe_debug_hides_the_key() {
        let stripe = StripeConfig {
            secret_key: SecretString::from("sk_test_4eC39HqLyjWDarjtT1zdp7dc"),
        };

        let rendered = format!("{stripe:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("4eC39HqLyjWDarjtT1zdp7dc"));
    }

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgresql://localhost/savory_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 4242,
            base_url: "http://localhost:4242".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            stripe: StripeConfig {
                secret_key: SecretString::from("sk_test_4eC39HqLyjWDarjtT1zdp7dc"),
            },
            checkout_currency: "usd".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}
