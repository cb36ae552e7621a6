//! PostgreSQL-backed `ProfileRepository`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::Profile;
use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};

use super::diesel_error_mapping::{map_basic_diesel_error, pool_error_message};
use super::models::NewProfileRow;
use super::pool::DbPool;
use super::schema::profiles;

/// Inserts profile rows, leaving existing ones untouched.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn ensure_profile(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_error_message(err)))?;

        diesel::insert_into(profiles::table)
            .values(NewProfileRow {
                id: *profile.id().as_uuid(),
                email: profile.email(),
            })
            .on_conflict(profiles::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(
                    &err,
                    ProfileRepositoryError::query,
                    ProfileRepositoryError::connection,
                )
            })?;

        Ok(())
    }
}
