//! Text generation outbound adapters.
//!
//! Provides an HTTP implementation of the `TextGenerationSource` port for
//! OpenAI-compatible chat completion endpoints.

mod dto;
mod openai_source;

pub use openai_source::{OpenAiChatSource, OpenAiSourceBuildError};
