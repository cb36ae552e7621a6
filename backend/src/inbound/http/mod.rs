//! HTTP inbound adapter exposing the REST endpoints.

pub mod cards;
mod cards_dto;
pub mod error;
pub mod health;
pub mod identity;
pub mod session;
pub mod session_config;
pub mod settings;
pub mod state;
pub(crate) mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(cards::generate_card)
        .service(cards::complete_card)
        .service(cards::today_card)
        .service(settings::get_settings)
        .service(settings::update_settings);
}
