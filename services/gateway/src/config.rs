//! Environment-sourced configuration, loaded once at startup.
//!
//! There are no ambient globals: the loaded [`Config`] is passed by
//! reference into the token service and strategy constructors.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Invalid port number
    #[error("Invalid port: must be between 1 and 65535")]
    InvalidPort,

    /// Invalid TTL value
    #[error("Invalid token TTL: must be greater than 0")]
    InvalidTtl,

    /// Invalid URL format
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl {
        /// Which configuration field held the URL.
        field: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Environment variable parse error
    #[error("Failed to parse environment variable {name}: {reason}")]
    ParseError {
        /// Variable name.
        name: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The credential store file could not be loaded
    #[error("Failed to load credential store {path}: {reason}")]
    CredentialStore {
        /// Store path.
        path: String,
        /// IO or parse diagnostic.
        reason: String,
    },

    /// Unknown directory provider name
    #[error("Unsupported directory provider: {0}")]
    UnsupportedProvider(String),

    /// A filter template without the username placeholder can never match
    #[error("Directory search filter must contain the {{{{username}}}} placeholder")]
    FilterMissingPlaceholder,
}

/// Which [`crate::directory::DirectoryClient`] implementation to wire in.
///
/// `mock` is the only in-tree provider; a deployment integrating a real
/// directory supplies its own client at the trait seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryProvider {
    /// In-memory directory for tests and smoke runs.
    Mock,
}

impl FromStr for DirectoryProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Settings for the directory-backed strategy.
///
/// Present only when `DIRECTORY_URL`, `DIRECTORY_BIND_DN`, and
/// `DIRECTORY_BIND_PASSWORD` are all set; the strategy is otherwise not
/// registered at all.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Client implementation to construct.
    pub provider: DirectoryProvider,
    /// Directory server URL.
    pub url: Url,
    /// Service account used for the initial bind.
    pub bind_dn: String,
    /// Service account password.
    pub bind_password: SecretString,
    /// Subtree searched for user entries.
    pub search_base: String,
    /// Filter template; `{{username}}` is substituted per login.
    pub search_filter: String,
}

impl DirectoryConfig {
    /// Render the search filter for one login attempt.
    #[must_use]
    pub fn search_filter_for(&self, username: &str) -> String {
        self.search_filter.replace("{{username}}", username)
    }
}

/// Credentials for the fixed smoke-test strategy.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    /// The single accepted username.
    pub username: String,
    /// The single accepted password.
    pub password: SecretString,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Process-wide token signing secret. Held for the process lifetime,
    /// never logged.
    pub signing_secret: SecretString,
    /// Session token expiry window.
    pub token_ttl: Duration,
    /// Whether issued cookies carry the `Secure` attribute. On by default;
    /// switch off only for plain-HTTP local development.
    pub cookie_secure: bool,
    /// Fixed strategy credentials; the strategy stays unregistered unless
    /// `AUTH_FIXED_ENABLED=true` opts in explicitly.
    pub fixed: Option<FixedCredentials>,
    /// Path of the file-backed credential store.
    pub users_path: Option<PathBuf>,
    /// Directory strategy settings.
    pub directory: Option<DirectoryConfig>,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a
    /// value fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let signing_secret = env::var("SECRET")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingRequired("SECRET".to_string()))?;

        let fixed = if parse_env("AUTH_FIXED_ENABLED", false)? {
            Some(FixedCredentials {
                username: env::var("FIXED_USERNAME")
                    .map_err(|_| ConfigError::MissingRequired("FIXED_USERNAME".to_string()))?,
                password: env::var("FIXED_PASSWORD")
                    .map(SecretString::from)
                    .map_err(|_| ConfigError::MissingRequired("FIXED_PASSWORD".to_string()))?,
            })
        } else {
            None
        };

        // The directory strategy is registered only when the full bind
        // triple is configured; a partial triple is treated as absent.
        let directory = match (
            env::var("DIRECTORY_URL").ok(),
            env::var("DIRECTORY_BIND_DN").ok(),
            env::var("DIRECTORY_BIND_PASSWORD").ok(),
        ) {
            (Some(url), Some(bind_dn), Some(bind_password)) => Some(DirectoryConfig {
                provider: env::var("DIRECTORY_PROVIDER")
                    .unwrap_or_else(|_| "mock".to_string())
                    .parse()?,
                url: parse_url("DIRECTORY_URL", &url)?,
                bind_dn,
                bind_password: SecretString::from(bind_password),
                search_base: env::var("DIRECTORY_SEARCH_BASE")
                    .unwrap_or_else(|_| "CN=Users,DC=maxlab,DC=lu,DC=se".to_string()),
                search_filter: env::var("DIRECTORY_SEARCH_FILTER")
                    .unwrap_or_else(|_| "(sAMAccountName={{username}})".to_string()),
            }),
            _ => None,
        };

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8080)?,
            signing_secret,
            token_ttl: Duration::from_secs(parse_env("TOKEN_TTL", 3600)?),
            cookie_secure: parse_env("COOKIE_SECURE", true)?,
            fixed,
            users_path: env::var("USERS_PATH").ok().map(PathBuf::from),
            directory,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::InvalidTtl);
        }
        if let Some(fixed) = &self.fixed {
            if fixed.username.is_empty() {
                return Err(ConfigError::MissingRequired("FIXED_USERNAME".to_string()));
            }
        }
        if let Some(directory) = &self.directory {
            if directory.search_base.is_empty() {
                return Err(ConfigError::MissingRequired(
                    "DIRECTORY_SEARCH_BASE".to_string(),
                ));
            }
            if !directory.search_filter.contains("{{username}}") {
                return Err(ConfigError::FilterMissingPlaceholder);
            }
        }
        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| ConfigError::ParseError {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            signing_secret: SecretString::from("secret"),
            token_ttl: Duration::from_secs(3600),
            cookie_secure: true,
            fixed: None,
            users_path: None,
            directory: None,
        }
    }

    fn directory_config() -> DirectoryConfig {
        DirectoryConfig {
            provider: DirectoryProvider::Mock,
            url: Url::parse("ldap://directory.example.org").unwrap(),
            bind_dn: "CN=svc,CN=Users,DC=example,DC=org".to_string(),
            bind_password: SecretString::from("svc-pw"),
            search_base: "CN=Users,DC=example,DC=org".to_string(),
            search_filter: "(sAMAccountName={{username}})".to_string(),
        }
    }

    #[test]
    fn search_filter_substitutes_username() {
        assert_eq!(
            directory_config().search_filter_for("alice"),
            "(sAMAccountName=alice)"
        );
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let mut config = base_config();
        config.token_ttl = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTtl)));
    }

    #[test]
    fn validate_rejects_filter_without_placeholder() {
        let mut config = base_config();
        let mut directory = directory_config();
        directory.search_filter = "(sAMAccountName=alice)".to_string();
        config.directory = Some(directory);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FilterMissingPlaceholder)
        ));
    }

    #[test]
    fn provider_parsing_accepts_mock_only() {
        assert_eq!(
            "mock".parse::<DirectoryProvider>().unwrap(),
            DirectoryProvider::Mock
        );
        assert!(matches!(
            "openldap".parse::<DirectoryProvider>(),
            Err(ConfigError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn config_debug_redacts_the_secret() {
        let rendered = format!("{:?}", base_config());
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("REDACTED"));
    }
}
