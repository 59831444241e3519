//! Environment-driven application settings.
//!
//! Every variable is read through [`mockable::Env`] so parsing can be tested
//! with `MockEnv`. Release builds reject invalid values; debug builds warn
//! and fall back to defaults.

use std::time::Duration;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{AdminSeed, SignupDetails};

const PORT_ENV: &str = "PORT";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const POOL_MAX_SIZE_ENV: &str = "DATABASE_POOL_MAX_SIZE";
const JWT_SECRET_ENV: &str = "JWT_SECRET";
const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
const COOKIE_MAX_AGE_ENV: &str = "COOKIE_MAX_AGE";
const NODE_ENV: &str = "NODE_ENV";
const APP_ENV: &str = "APP_ENV";
const ADMIN_NAME_ENV: &str = "ADMIN_NAME";
const ADMIN_EMAIL_ENV: &str = "ADMIN_EMAIL";
const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);
const DEFAULT_COOKIE_MAX_AGE: Duration = Duration::from_millis(3_600_000);
const DEV_JWT_SECRET: &str = "dev-secret";
const JWT_SECRET_MIN_LEN: usize = 32;
const DURATION_EXPECTED: &str = "<n>s|<n>m|<n>h|<n>d or bare seconds";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The signing secret is too short for release builds.
    #[error("JWT_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    /// The configured admin credentials fail validation.
    #[error("invalid admin seed: {message}")]
    InvalidAdminSeed { message: String },
}

/// Validated process settings.
pub struct AppSettings {
    /// TCP port bound on all interfaces.
    pub port: u16,
    /// PostgreSQL URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: u32,
    /// HS256 signing secret.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// Access token lifetime.
    pub token_lifetime: Duration,
    /// Lifetime of the `accessToken` cookie.
    pub cookie_max_age: Duration,
    /// Mark cookies `Secure`.
    pub cookie_secure: bool,
    /// Admin to seed at startup, when fully configured.
    pub admin_seed: Option<AdminSeed>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("port", &self.port)
            .field("database_configured", &self.database_url.is_some())
            .field("pool_max_size", &self.pool_max_size)
            .field("token_lifetime", &self.token_lifetime)
            .field("cookie_max_age", &self.cookie_max_age)
            .field("cookie_secure", &self.cookie_secure)
            .field("admin_seed", &self.admin_seed.is_some())
            .finish_non_exhaustive()
    }
}

impl AppSettings {
    /// Read and validate settings from `env`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use banking_backend::server::{AppSettings, BuildMode};
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "PORT" => Some("8080".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = AppSettings::from_env(&env, BuildMode::Debug).unwrap();
    /// assert_eq!(settings.port, 8080);
    /// assert!(settings.database_url.is_none());
    /// ```
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        Ok(Self {
            port: parsed_or_default(env, mode, PORT_ENV, DEFAULT_PORT, "a TCP port")?,
            database_url: env.string(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()),
            pool_max_size: parsed_or_default(
                env,
                mode,
                POOL_MAX_SIZE_ENV,
                DEFAULT_POOL_MAX_SIZE,
                "a positive integer",
            )?,
            jwt_secret: jwt_secret_from_env(env, mode)?,
            token_lifetime: token_lifetime_from_env(env, mode)?,
            cookie_max_age: cookie_max_age_from_env(env, mode)?,
            cookie_secure: is_production(env),
            admin_seed: admin_seed_from_env(env)?,
        })
    }
}

fn invalid_or_default<T>(
    mode: BuildMode,
    name: &'static str,
    value: String,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    if mode.is_debug() {
        warn!(variable = name, value = %value, "invalid setting; using default");
        Ok(default)
    } else {
        Err(ConfigError::InvalidEnv {
            name,
            value,
            expected,
        })
    }
}

fn parsed_or_default<E: Env, T: std::str::FromStr>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match env.string(name) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => invalid_or_default(mode, name, value, expected, default),
        },
        None => Ok(default),
    }
}

fn jwt_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
    match env.string(JWT_SECRET_ENV).filter(|secret| !secret.is_empty()) {
        Some(secret) => {
            let secret = Zeroizing::new(secret.into_bytes());
            if !mode.is_debug() && secret.len() < JWT_SECRET_MIN_LEN {
                return Err(ConfigError::SecretTooShort {
                    length: secret.len(),
                    min_len: JWT_SECRET_MIN_LEN,
                });
            }
            Ok(secret)
        }
        None if mode.is_debug() => {
            warn!("JWT_SECRET not set; using the development secret");
            Ok(Zeroizing::new(DEV_JWT_SECRET.as_bytes().to_vec()))
        }
        None => Err(ConfigError::MissingEnv {
            name: JWT_SECRET_ENV,
        }),
    }
}

/// Parse `<n>s`, `<n>m`, `<n>h`, `<n>d` or bare seconds.
pub(crate) fn parse_lifetime(raw: &str) -> Option<Duration> {
    let trimmed = raw.trim();
    let (digits, unit_secs) = match trimmed.char_indices().last()? {
        (idx, 's') => (trimmed.get(..idx)?, 1),
        (idx, 'm') => (trimmed.get(..idx)?, 60),
        (idx, 'h') => (trimmed.get(..idx)?, 3600),
        (idx, 'd') => (trimmed.get(..idx)?, 86_400),
        _ => (trimmed, 1),
    };
    let count: u64 = digits.parse().ok()?;
    count
        .checked_mul(unit_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

fn token_lifetime_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, ConfigError> {
    match env.string(JWT_EXPIRES_IN_ENV) {
        Some(value) => match parse_lifetime(&value) {
            Some(lifetime) => Ok(lifetime),
            None => invalid_or_default(
                mode,
                JWT_EXPIRES_IN_ENV,
                value,
                DURATION_EXPECTED,
                DEFAULT_TOKEN_LIFETIME,
            ),
        },
        None => Ok(DEFAULT_TOKEN_LIFETIME),
    }
}

fn cookie_max_age_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, ConfigError> {
    match env.string(COOKIE_MAX_AGE_ENV) {
        Some(value) => match value.trim().parse::<u64>() {
            Ok(millis) if millis > 0 => Ok(Duration::from_millis(millis)),
            _ => invalid_or_default(
                mode,
                COOKIE_MAX_AGE_ENV,
                value,
                "milliseconds greater than zero",
                DEFAULT_COOKIE_MAX_AGE,
            ),
        },
        None => Ok(DEFAULT_COOKIE_MAX_AGE),
    }
}

fn is_production<E: Env>(env: &E) -> bool {
    env.string(NODE_ENV)
        .or_else(|| env.string(APP_ENV))
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("production"))
}

fn admin_seed_from_env<E: Env>(env: &E) -> Result<Option<AdminSeed>, ConfigError> {
    let (Some(name), Some(email), Some(password)) = (
        env.string(ADMIN_NAME_ENV),
        env.string(ADMIN_EMAIL_ENV),
        env.string(ADMIN_PASSWORD_ENV).map(Zeroizing::new),
    ) else {
        return Ok(None);
    };
    SignupDetails::try_from_parts(&name, &email, &password)
        .map(Some)
        .map_err(|err| ConfigError::InvalidAdminSeed {
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[rstest]
    fn debug_defaults_apply_when_unset() {
        let settings =
            AppSettings::from_env(&mock_env(&[]), BuildMode::Debug).expect("defaults apply");

        assert_eq!(settings.port, 3000);
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size, 10);
        assert_eq!(settings.jwt_secret.as_slice(), b"dev-secret");
        assert_eq!(settings.token_lifetime, Duration::from_secs(3600));
        assert_eq!(settings.cookie_max_age, Duration::from_secs(3600));
        assert!(!settings.cookie_secure);
        assert!(settings.admin_seed.is_none());
    }

    #[rstest]
    fn release_requires_a_jwt_secret() {
        let err = AppSettings::from_env(&mock_env(&[]), BuildMode::Release)
            .expect_err("missing secret");
        assert_eq!(
            err,
            ConfigError::MissingEnv {
                name: JWT_SECRET_ENV
            }
        );
    }

    #[rstest]
    fn release_rejects_short_secrets() {
        let err = AppSettings::from_env(&mock_env(&[("JWT_SECRET", "short")]), BuildMode::Release)
            .expect_err("short secret");
        assert_eq!(
            err,
            ConfigError::SecretTooShort {
                length: 5,
                min_len: 32
            }
        );
    }

    #[rstest]
    #[case("30s", Some(30))]
    #[case("15m", Some(900))]
    #[case("1h", Some(3600))]
    #[case("7d", Some(604_800))]
    #[case("120", Some(120))]
    #[case("0s", None)]
    #[case("h", None)]
    #[case("ten minutes", None)]
    #[case("", None)]
    fn lifetimes_parse_with_units(#[case] raw: &str, #[case] secs: Option<u64>) {
        assert_eq!(parse_lifetime(raw), secs.map(Duration::from_secs));
    }

    #[rstest]
    fn release_rejects_invalid_lifetimes() {
        let env = mock_env(&[
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("JWT_EXPIRES_IN", "forever"),
        ]);
        let err = AppSettings::from_env(&env, BuildMode::Release).expect_err("invalid lifetime");
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: JWT_EXPIRES_IN_ENV,
                ..
            }
        ));
    }

    #[rstest]
    fn debug_falls_back_on_invalid_port() {
        let settings = AppSettings::from_env(&mock_env(&[("PORT", "http")]), BuildMode::Debug)
            .expect("debug fallback");
        assert_eq!(settings.port, 3000);
    }

    #[rstest]
    #[case("NODE_ENV", "production", true)]
    #[case("APP_ENV", "PRODUCTION", true)]
    #[case("NODE_ENV", "development", false)]
    fn production_marks_cookies_secure(
        #[case] key: &str,
        #[case] value: &str,
        #[case] secure: bool,
    ) {
        let settings = AppSettings::from_env(&mock_env(&[(key, value)]), BuildMode::Debug)
            .expect("settings");
        assert_eq!(settings.cookie_secure, secure);
    }

    #[rstest]
    fn admin_seed_requires_all_three_variables() {
        let partial = mock_env(&[("ADMIN_NAME", "Root"), ("ADMIN_EMAIL", "root@bank.test")]);
        let settings = AppSettings::from_env(&partial, BuildMode::Debug).expect("settings");
        assert!(settings.admin_seed.is_none());

        let full = mock_env(&[
            ("ADMIN_NAME", "Root"),
            ("ADMIN_EMAIL", "root@bank.test"),
            ("ADMIN_PASSWORD", "root-pass"),
        ]);
        let settings = AppSettings::from_env(&full, BuildMode::Debug).expect("settings");
        let seed = settings.admin_seed.expect("seed configured");
        assert_eq!(seed.email.as_ref(), "root@bank.test");
    }

    #[rstest]
    fn invalid_admin_seed_fails_startup() {
        let env = mock_env(&[
            ("ADMIN_NAME", "Root"),
            ("ADMIN_EMAIL", "not-an-email"),
            ("ADMIN_PASSWORD", "root-pass"),
        ]);
        let err = AppSettings::from_env(&env, BuildMode::Debug).expect_err("invalid seed");
        assert!(matches!(err, ConfigError::InvalidAdminSeed { .. }));
    }

    #[rstest]
    fn cookie_max_age_is_milliseconds() {
        let env = mock_env(&[("COOKIE_MAX_AGE", "90000")]);
        let settings = AppSettings::from_env(&env, BuildMode::Debug).expect("settings");
        assert_eq!(settings.cookie_max_age, Duration::from_secs(90));
    }
}
