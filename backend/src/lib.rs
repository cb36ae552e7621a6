//! MoodShift backend library.
//!
//! Generates one motivational card per user, day and mode, tracks daily
//! generation quotas and completion streaks, and exposes the workflow over
//! a JSON HTTP API.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
