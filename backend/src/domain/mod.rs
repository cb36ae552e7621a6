//! Domain primitives, aggregates and services.
//!
//! Purpose: hold everything MoodShift decides on its own. Adapters reach the
//! domain only through the ports in [`ports`]; nothing here depends on HTTP
//! or SQL.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `Settings`, `Card`, `GenerationQuota`, `StreakState`: aggregates.
//! - `CardService` / `SettingsService`: driving port implementations.
//! - `CardGenerator`: infallible content generation with fallback.

pub mod card;
mod card_service;
pub mod error;
pub mod generation;
pub mod mood;
pub mod ports;
pub mod quota;
pub mod settings;
mod settings_service;
pub mod streak;
pub mod telemetry;
pub mod trace_id;
pub mod user;

pub use self::card::{Card, CardContent, CardContentError, CardDraft, GeneratedCard, Quote};
pub use self::card_service::{CardService, CardWorkflowPorts};
pub use self::error::{Error, ErrorCode};
pub use self::generation::{CardGenerator, GenerationParams};
pub use self::mood::{Audience, MoodMode, ParseVocabularyError, Tone};
pub use self::quota::{DEFAULT_MAX_GENERATIONS, GenerationQuota};
pub use self::settings::{
    Settings, SettingsUpdate, SettingsValidationError, Themes, parse_delivery_time,
    parse_language, parse_timezone,
};
pub use self::settings_service::SettingsService;
pub use self::streak::{Streak, StreakState};
pub use self::telemetry::{TelemetryEvent, TelemetryEventType};
pub use self::trace_id::TraceId;
pub use self::user::{Profile, UserId, UserValidationError};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
