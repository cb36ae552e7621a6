//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CardCommand, CardQuery, FixtureCardCommand, FixtureCardQuery, FixtureSettingsCommand,
    FixtureSettingsQuery, SettingsCommand, SettingsQuery,
};
use crate::inbound::http::identity::{IdentityResolver, SessionIdentity};

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub cards: Arc<dyn CardCommand>,
    pub cards_query: Arc<dyn CardQuery>,
    pub settings: Arc<dyn SettingsCommand>,
    pub settings_query: Arc<dyn SettingsQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            cards: Arc::new(FixtureCardCommand),
            cards_query: Arc::new(FixtureCardQuery),
            settings: Arc::new(FixtureSettingsCommand),
            settings_query: Arc::new(FixtureSettingsQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub cards: Arc<dyn CardCommand>,
    pub cards_query: Arc<dyn CardQuery>,
    pub settings: Arc<dyn SettingsCommand>,
    pub settings_query: Arc<dyn SettingsQuery>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl HttpState {
    /// Construct state from a ports bundle and an identity strategy.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use moodshift::inbound::http::identity::FixedIdentity;
    /// use moodshift::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default(), Arc::new(FixedIdentity::demo()));
    /// let _cards = state.cards.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, identity: Arc<dyn IdentityResolver>) -> Self {
        let HttpStatePorts {
            cards,
            cards_query,
            settings,
            settings_query,
        } = ports;
        Self {
            cards,
            cards_query,
            settings,
            settings_query,
            identity,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, Arc::new(SessionIdentity))
    }
}
