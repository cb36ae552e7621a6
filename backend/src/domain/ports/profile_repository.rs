//! Port for account profile rows.

use async_trait::async_trait;

use crate::domain::Profile;

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

/// Port for profile persistence.
///
/// Profiles are normally written by the external auth service. The server
/// only ensures the fixed demo profile exists when running without sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert the profile unless a row with the same id already exists.
    async fn ensure_profile(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;
}

/// Fixture implementation that accepts every profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn ensure_profile(&self, _profile: &Profile) -> Result<(), ProfileRepositoryError> {
        Ok(())
    }
}
