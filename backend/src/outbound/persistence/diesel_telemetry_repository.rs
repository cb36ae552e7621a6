//! PostgreSQL-backed `TelemetryRepository`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::TelemetryEvent;
use crate::domain::ports::{TelemetryRepository, TelemetryRepositoryError};

use super::diesel_error_mapping::{map_basic_diesel_error, pool_error_message};
use super::models::NewTelemetryRow;
use super::pool::DbPool;
use super::schema::telemetry;

/// Appends events to the `telemetry` table.
#[derive(Clone)]
pub struct DieselTelemetryRepository {
    pool: DbPool,
}

impl DieselTelemetryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryRepository for DieselTelemetryRepository {
    async fn append(&self, event: &TelemetryEvent) -> Result<(), TelemetryRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TelemetryRepositoryError::connection(pool_error_message(err)))?;

        diesel::insert_into(telemetry::table)
            .values(NewTelemetryRow {
                user_id: *event.user_id.as_uuid(),
                event_type: event.event_type.as_str(),
                event_data: &event.event_data,
                created_at: event.created_at,
            })
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(
                    &err,
                    TelemetryRepositoryError::query,
                    TelemetryRepositoryError::connection,
                )
            })?;

        Ok(())
    }
}
