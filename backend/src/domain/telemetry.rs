//! Append-only analytics events.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use super::UserId;
use super::ports::TelemetryRepository;

/// Significant user actions worth recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryEventType {
    CardGenerated,
    CardRegenerated,
    ActionCompleted,
    SettingsUpdated,
}

impl TelemetryEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardGenerated => "card_generated",
            Self::CardRegenerated => "card_regenerated",
            Self::ActionCompleted => "action_completed",
            Self::SettingsUpdated => "settings_updated",
        }
    }
}

impl std::fmt::Display for TelemetryEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One telemetry record. `event_data` is opaque to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    pub user_id: UserId,
    pub event_type: TelemetryEventType,
    pub event_data: Value,
    pub created_at: DateTime<Utc>,
}

/// Append `event`, logging and discarding any failure.
///
/// Telemetry is analytics only, so a failed append never fails the request
/// that produced it.
pub(crate) async fn record_event<T>(repo: &T, event: TelemetryEvent)
where
    T: TelemetryRepository + ?Sized,
{
    if let Err(error) = repo.append(&event).await {
        warn!(
            user_id = %event.user_id,
            event_type = %event.event_type,
            %error,
            "failed to record telemetry event"
        );
    }
}
