//! PostgreSQL-backed `SettingsRepository`.
//!
//! The `UNIQUE (user_id)` constraint makes first-access creation converge:
//! racing inserts collapse into `ON CONFLICT DO NOTHING` and every caller
//! re-reads the surviving row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SettingsRepository, SettingsRepositoryError};
use crate::domain::{Settings, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{SettingsRow, SettingsWrite};
use super::pool::{DbPool, PoolError};
use super::schema::settings;

/// Diesel implementation of [`SettingsRepository`].
#[derive(Clone)]
pub struct DieselSettingsRepository {
    pool: DbPool,
}

impl DieselSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SettingsRepositoryError {
    SettingsRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error, user_id: &UserId) -> SettingsRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => SettingsRepositoryError::connection(message),
        DieselFailure::Query(message) => SettingsRepositoryError::query(message),
        DieselFailure::MissingProfile => SettingsRepositoryError::profile_missing(user_id.to_string()),
    }
}

#[async_trait]
impl SettingsRepository for DieselSettingsRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Settings>, SettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = settings::table
            .filter(settings::user_id.eq(user_id.as_uuid()))
            .select(SettingsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, user_id))?;

        Ok(row.map(Settings::from))
    }

    async fn insert_default_if_absent(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, SettingsRepositoryError> {
        let user_id = &defaults.user_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(settings::table)
            .values(SettingsWrite::from(defaults))
            .on_conflict(settings::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, user_id))?;

        let row = settings::table
            .filter(settings::user_id.eq(user_id.as_uuid()))
            .select(SettingsRow::as_select())
            .first(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, user_id))?;

        Ok(Settings::from(row))
    }

    async fn replace(&self, desired: &Settings) -> Result<Settings, SettingsRepositoryError> {
        let user_id = &desired.user_id;
        let write = SettingsWrite::from(desired);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(settings::table)
            .values(&write)
            .on_conflict(settings::user_id)
            .do_update()
            .set(&write)
            .returning(SettingsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, user_id))?;

        Ok(Settings::from(row))
    }
}
