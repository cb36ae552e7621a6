//! Shared test doubles for unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled under `cfg(test)` or with the `test-support` feature.

mod clock;
mod memory;
mod session;
mod text_generation;

pub use clock::MutableClock;
pub use memory::InMemoryStore;
pub use session::{SIGN_IN_PATH, session_cookie, sign_in_route, test_session_middleware};
pub use text_generation::ScriptedTextSource;
