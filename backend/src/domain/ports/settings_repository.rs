//! Port for per-user settings persistence.

use async_trait::async_trait;

use crate::domain::{Settings, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by settings repository adapters.
    pub enum SettingsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "settings repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "settings repository query failed: {message}",
        /// The owning profile row does not exist.
        ProfileMissing { user_id: String } =>
            "no profile exists for user {user_id}",
    }
}

/// Port for settings storage and retrieval.
///
/// At most one row exists per user. First-time creation must converge on a
/// single row when concurrent requests race to insert defaults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch settings for a user, or `None` before first access.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Settings>, SettingsRepositoryError>;

    /// Insert `defaults` unless a row already exists, then return the stored
    /// row. Losing an insert race returns the winner's row.
    async fn insert_default_if_absent(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, SettingsRepositoryError>;

    /// Replace every mutable field of the user's row and return it.
    async fn replace(&self, settings: &Settings) -> Result<Settings, SettingsRepositoryError>;
}

/// Fixture implementation that stores nothing.
///
/// Lookups return `None` and writes echo their input.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSettingsRepository;

#[async_trait]
impl SettingsRepository for FixtureSettingsRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Settings>, SettingsRepositoryError> {
        Ok(None)
    }

    async fn insert_default_if_absent(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, SettingsRepositoryError> {
        Ok(defaults.clone())
    }

    async fn replace(&self, settings: &Settings) -> Result<Settings, SettingsRepositoryError> {
        Ok(settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn fixture_echoes_defaults() {
        let repo = FixtureSettingsRepository;
        let defaults = Settings::defaults(UserId::random(), Utc::now());

        let stored = repo
            .insert_default_if_absent(&defaults)
            .await
            .expect("fixture insert succeeds");

        assert_eq!(stored, defaults);
        assert!(
            repo.find_by_user_id(&defaults.user_id)
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
    }

    #[test]
    fn profile_missing_names_the_user() {
        let err = SettingsRepositoryError::profile_missing("abc");
        assert_eq!(err.to_string(), "no profile exists for user abc");
    }
}
