//! Correlation id carried by every request.
//!
//! The `Trace` middleware installs one per request in a tokio task-local;
//! `Error::new` and log lines read it back through [`TraceId::current`].
//! Spawned tasks do not inherit it and must re-enter [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request across logs, errors and the `trace-id`
/// response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied id, ignoring anything that is not a
    /// non-nil UUID.
    ///
    /// ```
    /// use moodshift::domain::TraceId;
    ///
    /// assert!(TraceId::from_header("not-a-uuid").is_none());
    /// assert!(TraceId::from_header("00000000-0000-0000-0000-000000000000").is_none());
    /// assert!(TraceId::from_header(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ").is_some());
    /// ```
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim())
            .ok()
            .filter(|uuid| !uuid.is_nil())
            .map(Self)
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the current id.
    ///
    /// ```
    /// use moodshift::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl From<Uuid> for TraceId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
