//! Caller identity resolution.
//!
//! Handlers never read the session directly; they ask the configured
//! [`IdentityResolver`] who the caller is. Authenticated deployments resolve
//! from the cookie session, demo deployments pin every request to one user.

use uuid::Uuid;

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;

/// Identifier of the shared demo user.
pub const DEMO_USER_ID: UserId = UserId::from_uuid(Uuid::nil());
/// Email stored on the demo user's profile row.
pub const DEMO_USER_EMAIL: &str = "demo@moodshift.app";

/// Capability for resolving the caller of a request.
pub trait IdentityResolver: Send + Sync {
    /// Return the caller's id or an `unauthorized` error.
    fn resolve(&self, session: &SessionContext) -> Result<UserId, Error>;
}

/// Resolve the caller from the `user_id` stored in the cookie session.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionIdentity;

impl IdentityResolver for SessionIdentity {
    fn resolve(&self, session: &SessionContext) -> Result<UserId, Error> {
        session.require_user_id()
    }
}

/// Resolve every caller to the same user.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity {
    user_id: UserId,
}

impl FixedIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// The shared demo user.
    pub fn demo() -> Self {
        Self::new(DEMO_USER_ID)
    }
}

impl IdentityResolver for FixedIdentity {
    fn resolve(&self, _session: &SessionContext) -> Result<UserId, Error> {
        Ok(self.user_id)
    }
}
