//! Cookie session settings derived from [`ServiceSettings`].
//!
//! Release builds refuse to start without a readable key file of at least
//! [`SESSION_KEY_MIN_LEN`] bytes; debug builds (or an explicit opt-in) fall
//! back to a generated key. Key bytes are zeroised once the cookie key is
//! derived.

use std::path::{Path, PathBuf};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use tracing::warn;
use zeroize::Zeroizing;

use crate::config::ServiceSettings;

/// Minimum key file length; shorter keys cannot derive a cookie key.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Name of the encrypted session cookie shared with the auth service.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file.
    Debug,
    /// Release builds require a key file unless explicitly overridden.
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
}

/// Validated cookie session parameters.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while preparing session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Derive session settings from service configuration.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when the key file is unusable and no
/// ephemeral key is allowed.
pub fn session_settings(
    settings: &ServiceSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let allow_ephemeral = mode == BuildMode::Debug || settings.session_allow_ephemeral;
    let key = load_session_key(&settings.session_key_file(), allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure: settings.session_cookie_secure(),
        same_site: SameSite::Lax,
    })
}

/// Encrypted cookie session middleware for the `/api/v1` scope.
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(14)))
        .build()
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(error) if allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
