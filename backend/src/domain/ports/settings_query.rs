//! Driving port for reading settings.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, Settings, UserId};

/// Driving port for fetching settings, creating defaults on first access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsQuery: Send + Sync {
    async fn fetch(&self, user_id: UserId) -> Result<Settings, Error>;
}

/// Fixture implementation returning default settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSettingsQuery;

#[async_trait]
impl SettingsQuery for FixtureSettingsQuery {
    async fn fetch(&self, user_id: UserId) -> Result<Settings, Error> {
        Ok(Settings::defaults(user_id, Utc::now()))
    }
}
