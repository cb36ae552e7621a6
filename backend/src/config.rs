//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MOODSHIFT_*` environment variables and the
//! optional config file, in increasing precedence order as OrthoConfig
//! defines it. Switches carry their default in the derive; other raw values
//! stay optional, accessors apply defaults and
//! [`ServiceSettings::validate`] rejects malformed input at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_MAX_GENERATIONS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// How request handlers identify the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    /// Read the user id from the encrypted session cookie.
    Session,
    /// Treat every request as the fixed demo user.
    Demo,
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid identity mode `{value}`; expected `session` or `demo`")]
    IdentityMode { value: String },
    #[error("generation timeout must be at least one second")]
    ZeroGenerationTimeout,
    #[error("invalid text generation base url `{value}`: {source}")]
    OpenAiBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

/// Configuration for the MoodShift HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MOODSHIFT")]
pub struct ServiceSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it the server runs on in-process fixtures.
    pub database_url: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// API key for the chat completion service.
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_model: Option<String>,
    pub generation_timeout_secs: Option<u64>,
    pub max_generations_per_day: Option<u32>,
    /// `session` or `demo`.
    pub identity_mode: Option<String>,
    pub session_key_file: Option<PathBuf>,
    #[ortho_config(default = true)]
    pub session_cookie_secure: bool,
    /// Allow a generated session key when the key file is missing.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            run_migrations: true,
            openai_api_key: None,
            openai_base_url: None,
            openai_model: None,
            generation_timeout_secs: None,
            max_generations_per_day: None,
            identity_mode: None,
            session_key_file: None,
            session_cookie_secure: true,
            session_allow_ephemeral: false,
        }
    }
}

impl ServiceSettings {
    /// Check every derived value once so startup fails before binding.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        self.identity_mode()?;
        self.generation_timeout()?;
        url::Url::parse(self.openai_base_url()).map_err(|source| ConfigError::OpenAiBaseUrl {
            value: self.openai_base_url().to_owned(),
            source,
        })?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::BindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| ConfigError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::IdentityMode`] for anything other than
    /// `session` or `demo` (case-insensitive).
    pub fn identity_mode(&self) -> Result<IdentityMode, ConfigError> {
        match self.identity_mode.as_deref().map(str::trim) {
            None => Ok(IdentityMode::Session),
            Some(value) if value.eq_ignore_ascii_case("session") => Ok(IdentityMode::Session),
            Some(value) if value.eq_ignore_ascii_case("demo") => Ok(IdentityMode::Demo),
            Some(value) => Err(ConfigError::IdentityMode {
                value: value.to_owned(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroGenerationTimeout`] when set to zero.
    pub fn generation_timeout(&self) -> Result<Duration, ConfigError> {
        match self
            .generation_timeout_secs
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS)
        {
            0 => Err(ConfigError::ZeroGenerationTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations
    }

    /// API key, ignoring blank values.
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn openai_base_url(&self) -> &str {
        self.openai_base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }

    pub fn openai_model(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    pub fn max_generations_per_day(&self) -> u32 {
        self.max_generations_per_day
            .unwrap_or(DEFAULT_MAX_GENERATIONS)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }

    /// Ephemeral keys are always allowed in debug builds.
    pub fn allows_ephemeral_session_key(&self) -> bool {
        cfg!(debug_assertions) || self.session_allow_ephemeral
    }
}
