//! Port for completion streaks.

use async_trait::async_trait;

use crate::domain::{Streak, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by streak repository adapters.
    pub enum StreakRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "streak repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "streak repository query failed: {message}",
    }
}

/// Port for one streak row per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreakRepository: Send + Sync {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Streak>, StreakRepositoryError>;

    /// Insert or overwrite the user's streak row.
    async fn save(&self, streak: &Streak) -> Result<(), StreakRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStreakRepository;

#[async_trait]
impl StreakRepository for FixtureStreakRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Streak>, StreakRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _streak: &Streak) -> Result<(), StreakRepositoryError> {
        Ok(())
    }
}
