//! PostgreSQL persistence adapters built on Diesel.
//!
//! Repositories implement the domain's driven ports over a shared
//! [`DbPool`] of `diesel-async` connections. Row structs and the schema stay
//! private; only repository types and pool plumbing are exported.
//!
//! ```no_run
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! use moodshift::outbound::persistence::{DbPool, DieselCardRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/moodshift")).await?;
//! let cards = DieselCardRepository::new(pool);
//! # let _ = cards;
//! # Ok(())
//! # }
//! ```

mod diesel_card_repository;
mod diesel_error_mapping;
mod diesel_profile_repository;
mod diesel_quota_repository;
mod diesel_settings_repository;
mod diesel_streak_repository;
mod diesel_telemetry_repository;
mod migrations;
mod models;
mod pg_enums;
mod pool;
mod schema;

pub use diesel_card_repository::DieselCardRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_quota_repository::DieselQuotaRepository;
pub use diesel_settings_repository::DieselSettingsRepository;
pub use diesel_streak_repository::DieselStreakRepository;
pub use diesel_telemetry_repository::DieselTelemetryRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
