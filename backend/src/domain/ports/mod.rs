//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are consumed by inbound adapters.
//! Driven ports (`*Repository`, `*Source`) are implemented by outbound
//! adapters. Every port ships a fixture implementation and, under test, a
//! `mockall` mock.

mod macros;
pub(crate) use macros::define_port_error;

mod card_command;
mod card_query;
mod card_repository;
mod profile_repository;
mod quota_repository;
mod settings_command;
mod settings_query;
mod settings_repository;
mod streak_repository;
mod telemetry_repository;
mod text_generation_source;

#[cfg(test)]
pub use card_command::MockCardCommand;
pub use card_command::{
    CardCommand, CompleteCardRequest, CompleteCardResponse, FixtureCardCommand,
    GenerateCardOutcome, GenerateCardRequest,
};
#[cfg(test)]
pub use card_query::MockCardQuery;
pub use card_query::{CardQuery, FixtureCardQuery, TodayRequest, TodaySnapshot};
#[cfg(test)]
pub use card_repository::MockCardRepository;
pub use card_repository::{CardRepository, CardRepositoryError, FixtureCardRepository};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use quota_repository::MockQuotaRepository;
pub use quota_repository::{FixtureQuotaRepository, QuotaRepository, QuotaRepositoryError};
#[cfg(test)]
pub use settings_command::MockSettingsCommand;
pub use settings_command::{FixtureSettingsCommand, SettingsCommand};
#[cfg(test)]
pub use settings_query::MockSettingsQuery;
pub use settings_query::{FixtureSettingsQuery, SettingsQuery};
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
pub use settings_repository::{
    FixtureSettingsRepository, SettingsRepository, SettingsRepositoryError,
};
#[cfg(test)]
pub use streak_repository::MockStreakRepository;
pub use streak_repository::{FixtureStreakRepository, StreakRepository, StreakRepositoryError};
#[cfg(test)]
pub use telemetry_repository::MockTelemetryRepository;
pub use telemetry_repository::{
    FixtureTelemetryRepository, TelemetryRepository, TelemetryRepositoryError,
};
#[cfg(test)]
pub use text_generation_source::MockTextGenerationSource;
pub use text_generation_source::{
    DisabledTextGenerationSource, TextGenerationError, TextGenerationRequest,
    TextGenerationSource,
};
