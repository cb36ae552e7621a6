//! Settings service implementing the settings driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    SettingsCommand, SettingsQuery, SettingsRepository, SettingsRepositoryError,
    TelemetryRepository,
};
use crate::domain::telemetry::record_event;
use crate::domain::{
    Error, Settings, SettingsUpdate, TelemetryEvent, TelemetryEventType, UserId,
};

pub(crate) fn map_settings_error(error: SettingsRepositoryError) -> Error {
    match error {
        SettingsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("settings repository unavailable: {message}"))
        }
        SettingsRepositoryError::Query { message } => {
            Error::internal(format!("settings repository error: {message}"))
        }
        SettingsRepositoryError::ProfileMissing { user_id } => {
            Error::not_found(format!("profile not found for user {user_id}"))
        }
    }
}

/// Return the user's settings, writing defaults on first access.
///
/// Concurrent first accesses converge on whichever insert won.
pub(crate) async fn load_or_create_settings<S>(
    repo: &S,
    user_id: &UserId,
    now: DateTime<Utc>,
) -> Result<Settings, Error>
where
    S: SettingsRepository + ?Sized,
{
    if let Some(settings) = repo
        .find_by_user_id(user_id)
        .await
        .map_err(map_settings_error)?
    {
        return Ok(settings);
    }

    let defaults = Settings::defaults(*user_id, now);
    let settings = repo
        .insert_default_if_absent(&defaults)
        .await
        .map_err(map_settings_error)?;
    info!(%user_id, "created default settings");
    Ok(settings)
}

/// Settings service backed by a settings repository.
#[derive(Clone)]
pub struct SettingsService<S, T> {
    settings_repo: Arc<S>,
    telemetry_repo: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<S, T> SettingsService<S, T> {
    pub fn new(settings_repo: Arc<S>, telemetry_repo: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings_repo,
            telemetry_repo,
            clock,
        }
    }
}

#[async_trait]
impl<S, T> SettingsQuery for SettingsService<S, T>
where
    S: SettingsRepository,
    T: TelemetryRepository,
{
    async fn fetch(&self, user_id: UserId) -> Result<Settings, Error> {
        load_or_create_settings(self.settings_repo.as_ref(), &user_id, self.clock.utc()).await
    }
}

#[async_trait]
impl<S, T> SettingsCommand for SettingsService<S, T>
where
    S: SettingsRepository,
    T: TelemetryRepository,
{
    async fn update(&self, user_id: UserId, update: SettingsUpdate) -> Result<Settings, Error> {
        let now = self.clock.utc();
        let current = load_or_create_settings(self.settings_repo.as_ref(), &user_id, now).await?;
        let stored = self
            .settings_repo
            .replace(&current.apply(update, now))
            .await
            .map_err(map_settings_error)?;

        record_event(
            self.telemetry_repo.as_ref(),
            TelemetryEvent {
                user_id,
                event_type: TelemetryEventType::SettingsUpdated,
                event_data: json!({
                    "mode": stored.mode,
                    "tone": stored.tone,
                    "audience": stored.audience,
                    "themes": stored.themes,
                    "language": stored.language,
                }),
                created_at: now,
            },
        )
        .await;

        Ok(stored)
    }
}
