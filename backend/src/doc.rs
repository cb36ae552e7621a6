//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every inbound HTTP path and the session cookie
//! security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Audience, Error, ErrorCode, MoodMode, Tone};
use crate::inbound::http::cards::{
    CardConflictResponse, CardResponse, CompleteCardResponse, GenerateCardBody,
    GenerateCardResponse, QuotaResponse, QuoteResponse, StreakResponse, TodayResponse,
};
use crate::inbound::http::settings::{SettingsBody, SettingsRequest, SettingsResponse};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by the auth service.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "MoodShift API",
        description = "Daily inspiration cards, completion streaks and user settings."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::cards::generate_card,
        crate::inbound::http::cards::complete_card,
        crate::inbound::http::cards::today_card,
        crate::inbound::http::settings::get_settings,
        crate::inbound::http::settings::update_settings,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MoodMode,
        Tone,
        Audience,
        GenerateCardBody,
        GenerateCardResponse,
        CardConflictResponse,
        CardResponse,
        QuoteResponse,
        QuotaResponse,
        StreakResponse,
        CompleteCardResponse,
        TodayResponse,
        SettingsRequest,
        SettingsBody,
        SettingsResponse,
    )),
    tags(
        (name = "cards", description = "Generate, complete and view daily cards"),
        (name = "settings", description = "Per-user generation settings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
