//! Settings HTTP handlers.
//!
//! ```text
//! GET /api/v1/settings
//! PUT /api/v1/settings
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Audience, Error, MoodMode, Settings, SettingsUpdate, SettingsValidationError, Themes, Tone,
    parse_delivery_time, parse_language, parse_timezone,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, settings_validation_error};

/// Request payload replacing every mutable settings field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    #[schema(example = "zen")]
    pub mode: Option<String>,
    #[schema(example = "balanced")]
    pub tone: Option<String>,
    /// Defaults to `prefer_not_to_say` when omitted.
    #[schema(example = "prefer_not_to_say")]
    pub audience: Option<String>,
    #[schema(example = "09:00")]
    pub delivery_time: Option<String>,
    #[schema(example = "Europe/London")]
    pub timezone: Option<String>,
    pub themes: Option<Vec<String>>,
    #[schema(example = "en")]
    pub language: Option<String>,
}

/// A user's stored settings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBody {
    pub user_id: String,
    pub mode: MoodMode,
    pub tone: Tone,
    pub audience: Audience,
    /// Wall-clock time, `HH:MM:SS`.
    pub delivery_time: String,
    pub timezone: String,
    pub themes: Vec<String>,
    pub language: String,
    pub updated_at: String,
}

impl From<Settings> for SettingsBody {
    fn from(settings: Settings) -> Self {
        Self {
            user_id: settings.user_id.to_string(),
            mode: settings.mode,
            tone: settings.tone,
            audience: settings.audience,
            delivery_time: settings.delivery_time.format("%H:%M:%S").to_string(),
            timezone: settings.timezone,
            themes: settings.themes.into(),
            language: settings.language,
            updated_at: settings.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub settings: SettingsBody,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(FieldName::new(field)))
}

fn with_value<T>(raw: &str, parsed: Result<T, SettingsValidationError>) -> Result<T, Error> {
    parsed.map_err(|error| settings_validation_error(&error, Some(raw)))
}

fn parse_vocabulary<T>(raw: &str) -> Result<T, Error>
where
    T: std::str::FromStr<Err = crate::domain::ParseVocabularyError>,
{
    with_value(raw, raw.parse::<T>().map_err(SettingsValidationError::from))
}

fn parse_settings_request(payload: SettingsRequest) -> Result<SettingsUpdate, Error> {
    let mode = require(payload.mode, "mode")?;
    let tone = require(payload.tone, "tone")?;
    let delivery_time = require(payload.delivery_time, "deliveryTime")?;
    let timezone = require(payload.timezone, "timezone")?;
    let themes = require(payload.themes, "themes")?;
    let language = require(payload.language, "language")?;

    Ok(SettingsUpdate {
        mode: parse_vocabulary(&mode)?,
        tone: parse_vocabulary(&tone)?,
        audience: payload
            .audience
            .as_deref()
            .map(parse_vocabulary)
            .transpose()?
            .unwrap_or_default(),
        delivery_time: with_value(&delivery_time, parse_delivery_time(&delivery_time))?,
        timezone: with_value(&timezone, parse_timezone(&timezone))?,
        themes: Themes::new(themes).map_err(|error| settings_validation_error(&error, None))?,
        language: with_value(&language, parse_language(&language))?,
    })
}

/// Fetch the caller's settings, creating defaults on first access.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Profile not found", body = Error),
        (status = 503, description = "Persistence unavailable", body = Error)
    ),
    tags = ["settings"],
    operation_id = "getSettings"
)]
#[get("/settings")]
pub async fn get_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = state.identity.resolve(&session)?;
    let settings = state.settings_query.fetch(user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, must-revalidate, no-cache"))
        .json(SettingsResponse {
            settings: settings.into(),
        }))
}

/// Replace the caller's settings.
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 400, description = "Missing or invalid field", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Persistence unavailable", body = Error)
    ),
    tags = ["settings"],
    operation_id = "updateSettings"
)]
#[put("/settings")]
pub async fn update_settings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SettingsRequest>,
) -> ApiResult<web::Json<SettingsResponse>> {
    let user_id = state.identity.resolve(&session)?;
    let update = parse_settings_request(payload.into_inner())?;
    let settings = state.settings.update(user_id, update).await?;
    Ok(web::Json(SettingsResponse {
        settings: settings.into(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockSettingsCommand, MockSettingsQuery};
    use crate::inbound::http::identity::{DEMO_USER_ID, FixedIdentity};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::test_support::test_session_middleware;

    #[fixture]
    fn request() -> SettingsRequest {
        SettingsRequest {
            mode: Some("warrior".to_owned()),
            tone: Some("strong".to_owned()),
            audience: None,
            delivery_time: Some("07:30".to_owned()),
            timezone: Some("Europe/London".to_owned()),
            themes: Some(vec![" courage ".to_owned(), "focus".to_owned()]),
            language: Some("pt-BR".to_owned()),
        }
    }

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error
            .details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
    }

    #[rstest]
    fn parses_a_complete_request(request: SettingsRequest) {
        let update = parse_settings_request(request).expect("valid request");

        assert_eq!(update.mode, MoodMode::Warrior);
        assert_eq!(update.tone, Tone::Strong);
        assert_eq!(update.audience, Audience::PreferNotToSay);
        assert_eq!(update.delivery_time.to_string(), "07:30:00");
        assert_eq!(update.themes.as_slice(), ["courage", "focus"]);
        assert_eq!(update.language, "pt-BR");
    }

    #[rstest]
    #[case::mode("mode")]
    #[case::tone("tone")]
    #[case::delivery_time("deliveryTime")]
    #[case::timezone("timezone")]
    #[case::themes("themes")]
    #[case::language("language")]
    fn missing_required_fields_are_named(mut request: SettingsRequest, #[case] field: &str) {
        match field {
            "mode" => request.mode = None,
            "tone" => request.tone = None,
            "deliveryTime" => request.delivery_time = None,
            "timezone" => request.timezone = None,
            "themes" => request.themes = None,
            _ => request.language = None,
        }

        let error = parse_settings_request(request).expect_err("missing field");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some(field));
        assert_eq!(detail(&error, "code"), Some("missing_field"));
    }

    #[rstest]
    #[case::mode("mode", "sleepy", "invalid_mode")]
    #[case::tone("tone", "loud", "invalid_tone")]
    #[case::audience("audience", "robots", "invalid_audience")]
    #[case::delivery_time("deliveryTime", "9am", "invalid_delivery_time")]
    #[case::timezone("timezone", "Mars/Olympus", "invalid_timezone")]
    #[case::language("language", "  ", "invalid_language")]
    fn invalid_values_are_rejected(
        mut request: SettingsRequest,
        #[case] field: &str,
        #[case] value: &str,
        #[case] code: &str,
    ) {
        let raw = Some(value.to_owned());
        match field {
            "mode" => request.mode = raw,
            "tone" => request.tone = raw,
            "audience" => request.audience = raw,
            "deliveryTime" => request.delivery_time = raw,
            "timezone" => request.timezone = raw,
            _ => request.language = raw,
        }

        let error = parse_settings_request(request).expect_err("invalid value");

        assert_eq!(detail(&error, "field"), Some(field));
        assert_eq!(detail(&error, "value"), Some(value));
        assert_eq!(detail(&error, "code"), Some(code));
    }

    #[rstest]
    fn empty_theme_list_is_rejected(mut request: SettingsRequest) {
        request.themes = Some(Vec::new());

        let error = parse_settings_request(request).expect_err("no themes");

        assert_eq!(detail(&error, "field"), Some("themes"));
        assert_eq!(detail(&error, "code"), Some("invalid_theme_count"));
    }

    fn state_with(command: MockSettingsCommand, query: MockSettingsQuery) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                settings: Arc::new(command),
                settings_query: Arc::new(query),
                ..HttpStatePorts::default()
            },
            Arc::new(FixedIdentity::demo()),
        )
    }

    async fn call(state: HttpState, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(
                    web::scope("/api/v1")
                        .service(get_settings)
                        .service(update_settings),
                ),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    #[rstest]
    #[actix_web::test]
    async fn get_renders_defaults() {
        let mut query = MockSettingsQuery::new();
        query
            .expect_fetch()
            .withf(|user_id| *user_id == DEMO_USER_ID)
            .returning(|user_id| Ok(Settings::defaults(user_id, chrono::Utc::now())));

        let (status, body) = call(
            state_with(MockSettingsCommand::new(), query),
            actix_test::TestRequest::get().uri("/api/v1/settings"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let settings = &body["settings"];
        assert_eq!(settings["mode"], "zen");
        assert_eq!(settings["tone"], "balanced");
        assert_eq!(settings["audience"], "prefer_not_to_say");
        assert_eq!(settings["themes"], json!(["focus", "creativity"]));
        assert_eq!(settings["language"], "en");
        assert_eq!(settings["deliveryTime"], "09:00:00");
    }

    #[rstest]
    #[actix_web::test]
    async fn put_rejects_invalid_tone_without_calling_the_service() {
        let mut command = MockSettingsCommand::new();
        command.expect_update().never();

        let (status, body) = call(
            state_with(command, MockSettingsQuery::new()),
            actix_test::TestRequest::put().uri("/api/v1/settings").set_json(json!({
                "mode": "zen",
                "tone": "loud",
                "deliveryTime": "09:00",
                "timezone": "UTC",
                "themes": ["focus"],
                "language": "en"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid tone");
        assert_eq!(body["details"]["field"], "tone");
    }

    #[rstest]
    #[actix_web::test]
    async fn put_returns_stored_settings() {
        let mut command = MockSettingsCommand::new();
        command
            .expect_update()
            .withf(|_, update| update.mode == MoodMode::Warrior)
            .times(1)
            .returning(|user_id, update| {
                let now = chrono::Utc::now();
                Ok(Settings::defaults(user_id, now).apply(update, now))
            });

        let (status, body) = call(
            state_with(command, MockSettingsQuery::new()),
            actix_test::TestRequest::put().uri("/api/v1/settings").set_json(json!({
                "mode": "warrior",
                "tone": "strong",
                "audience": "non_binary",
                "deliveryTime": "06:45",
                "timezone": "Asia/Tokyo",
                "themes": ["discipline"],
                "language": "ja"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["settings"]["audience"], "non_binary");
        assert_eq!(body["settings"]["deliveryTime"], "06:45:00");
        assert_eq!(body["settings"]["timezone"], "Asia/Tokyo");
    }
}
