//! Wire types for the chat completion endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::ports::TextGenerationRequest;

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: [ChatMessageDto<'a>; 2],
    pub(super) temperature: f32,
    pub(super) max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) response_format: Option<ResponseFormatDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub(super) role: &'static str,
    pub(super) content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponseFormatDto {
    #[serde(rename = "type")]
    pub(super) kind: &'static str,
}

impl<'a> ChatCompletionRequestDto<'a> {
    pub(super) fn new(model: &'a str, request: &'a TextGenerationRequest) -> Self {
        Self {
            model,
            messages: [
                ChatMessageDto {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessageDto {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormatDto {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatCompletionResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceDto {
    pub(super) message: Option<AssistantMessageDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AssistantMessageDto {
    pub(super) content: Option<String>,
}

impl ChatCompletionResponseDto {
    /// Text of the first choice, if it is present and not blank.
    pub(super) fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
    }
}
