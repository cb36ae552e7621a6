//! Port for append-only telemetry events.

use async_trait::async_trait;

use crate::domain::TelemetryEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by telemetry repository adapters.
    pub enum TelemetryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "telemetry repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "telemetry repository query failed: {message}",
    }
}

/// Port for recording telemetry. Nothing in the service reads events back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    async fn append(&self, event: &TelemetryEvent) -> Result<(), TelemetryRepositoryError>;
}

/// Fixture implementation that discards events.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTelemetryRepository;

#[async_trait]
impl TelemetryRepository for FixtureTelemetryRepository {
    async fn append(&self, _event: &TelemetryEvent) -> Result<(), TelemetryRepositoryError> {
        Ok(())
    }
}
