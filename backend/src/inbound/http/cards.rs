//! Card HTTP handlers.
//!
//! ```text
//! POST /api/v1/cards/generate
//! POST /api/v1/cards/{card_id}/complete
//! GET  /api/v1/cards/today[?mode=]
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::ports::{
    CompleteCardRequest, GenerateCardOutcome, GenerateCardRequest, TodayRequest,
};
use crate::domain::{Error, MoodMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_mode, parse_uuid};

pub use super::cards_dto::{
    CardConflictResponse, CardResponse, CompleteCardResponse, GenerateCardBody,
    GenerateCardResponse, QuotaResponse, QuoteResponse, StreakResponse, TodayParams,
    TodayResponse,
};

const CARD_EXISTS_MESSAGE: &str = "Card already generated for today";

struct ParsedGenerateBody {
    mode: Option<MoodMode>,
    regenerate: bool,
}

/// An empty body means "use the defaults"; anything else must be a valid
/// `GenerateCardBody`.
fn parse_generate_body(raw: &[u8]) -> Result<ParsedGenerateBody, Error> {
    let body = if raw.trim_ascii().is_empty() {
        GenerateCardBody::default()
    } else {
        serde_json::from_slice::<GenerateCardBody>(raw)
            .map_err(|error| Error::invalid_request(format!("invalid request body: {error}")))?
    };
    Ok(ParsedGenerateBody {
        mode: parse_optional_mode(body.mode.as_deref())?,
        regenerate: body.regenerate.unwrap_or(false),
    })
}

fn outcome_response(outcome: GenerateCardOutcome) -> HttpResponse {
    match outcome {
        GenerateCardOutcome::Generated { card, quota } => {
            HttpResponse::Ok().json(GenerateCardResponse {
                card: card.into(),
                quota: quota.into(),
            })
        }
        GenerateCardOutcome::Existing { card } => {
            HttpResponse::Conflict().json(CardConflictResponse {
                error: CARD_EXISTS_MESSAGE.to_owned(),
                card: card.into(),
            })
        }
    }
}

/// Generate, or explicitly regenerate, today's card.
#[utoipa::path(
    post,
    path = "/api/v1/cards/generate",
    request_body = GenerateCardBody,
    responses(
        (status = 200, description = "Card generated", body = GenerateCardResponse),
        (status = 400, description = "Invalid mode", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Profile not found", body = Error),
        (status = 409, description = "Card already generated for today", body = CardConflictResponse),
        (status = 429, description = "Daily generation limit reached", body = Error),
        (status = 503, description = "Persistence unavailable", body = Error)
    ),
    tags = ["cards"],
    operation_id = "generateCard"
)]
#[post("/cards/generate")]
pub async fn generate_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Bytes,
) -> ApiResult<HttpResponse> {
    let user_id = state.identity.resolve(&session)?;
    let parsed = parse_generate_body(&payload)?;
    let outcome = state
        .cards
        .generate(GenerateCardRequest {
            user_id,
            mode: parsed.mode,
            regenerate: parsed.regenerate,
        })
        .await?;
    Ok(outcome_response(outcome))
}

/// Mark a card's action as done and return the updated streak.
#[utoipa::path(
    post,
    path = "/api/v1/cards/{card_id}/complete",
    params(("card_id" = String, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Card completed", body = CompleteCardResponse),
        (status = 400, description = "Malformed card id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Card not found", body = Error)
    ),
    tags = ["cards"],
    operation_id = "completeCard"
)]
#[post("/cards/{card_id}/complete")]
pub async fn complete_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CompleteCardResponse>> {
    let user_id = state.identity.resolve(&session)?;
    let card_id = parse_uuid(&path, FieldName::new("cardId"))?;
    let response = state
        .cards
        .complete(CompleteCardRequest { user_id, card_id })
        .await?;
    Ok(web::Json(CompleteCardResponse {
        card: response.card.into(),
        streak: response.streak.into(),
    }))
}

/// Today's card, quota and streak; each is `null` until it exists.
#[utoipa::path(
    get,
    path = "/api/v1/cards/today",
    params(("mode" = Option<String>, Query, description = "zen or warrior; defaults to the settings mode")),
    responses(
        (status = 200, description = "Today's state", body = TodayResponse),
        (status = 400, description = "Invalid mode", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["cards"],
    operation_id = "getTodayCard"
)]
#[get("/cards/today")]
pub async fn today_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TodayParams>,
) -> ApiResult<HttpResponse> {
    let user_id = state.identity.resolve(&session)?;
    let mode = parse_optional_mode(query.mode.as_deref())?;
    let snapshot = state
        .cards_query
        .today(TodayRequest { user_id, mode })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache"))
        .json(TodayResponse {
            card: snapshot.card.map(CardResponse::from),
            quota: snapshot.quota.map(QuotaResponse::from),
            streak: snapshot.streak.map(StreakResponse::from),
        }))
}

#[cfg(test)]
#[path = "cards_tests.rs"]
mod tests;
