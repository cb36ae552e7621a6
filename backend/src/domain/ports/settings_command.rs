//! Driving port for settings updates.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, Settings, SettingsUpdate, UserId};

/// Driving port for replacing a user's settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsCommand: Send + Sync {
    /// Replace every mutable field and return the stored settings.
    async fn update(&self, user_id: UserId, update: SettingsUpdate) -> Result<Settings, Error>;
}

/// Fixture implementation echoing the update without persisting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSettingsCommand;

#[async_trait]
impl SettingsCommand for FixtureSettingsCommand {
    async fn update(&self, user_id: UserId, update: SettingsUpdate) -> Result<Settings, Error> {
        let now = Utc::now();
        Ok(Settings::defaults(user_id, now).apply(update, now))
    }
}
