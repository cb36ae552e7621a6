//! Scripted text generation source.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{TextGenerationError, TextGenerationRequest, TextGenerationSource};

/// Replays queued replies in order and records every request.
///
/// Once the script is exhausted each call fails with
/// [`TextGenerationError::Empty`].
#[derive(Default)]
pub struct ScriptedTextSource {
    replies: Mutex<VecDeque<Result<String, TextGenerationError>>>,
    requests: Mutex<Vec<TextGenerationRequest>>,
}

impl ScriptedTextSource {
    pub fn new(replies: impl IntoIterator<Item = Result<String, TextGenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TextGenerationRequest> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl TextGenerationSource for ScriptedTextSource {
    async fn complete(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<String, TextGenerationError> {
        lock(&self.requests).push(request.clone());
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(TextGenerationError::empty()))
    }
}
