//! Cookie-session helpers for handler tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{HttpResponse, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;

/// Path of the sign-in route mounted by [`sign_in_route`].
pub const SIGN_IN_PATH: &str = "/test/sign-in/{user_id}";

/// Session middleware with a fresh key per call and the `Secure` flag off so
/// plain-HTTP test requests keep their cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Stands in for the external auth service by writing `user_id` into the
/// session.
pub fn sign_in_route() -> actix_web::Route {
    web::post().to(
        |session: SessionContext, path: web::Path<String>| async move {
            let user_id = UserId::new(path.into_inner())
                .map_err(|error| Error::invalid_request(error.to_string()))?;
            session.persist_user(&user_id)?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        },
    )
}

/// Extract the session cookie from a response.
pub fn session_cookie<B>(response: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.into_owned())
}
