//! Prompt construction for card generation.

use crate::domain::MoodMode;
use crate::domain::ports::TextGenerationRequest;

use super::GenerationParams;

/// Sampling temperature requested from the service.
pub const TEMPERATURE: f32 = 0.8;
/// Completion token cap requested from the service.
pub const MAX_TOKENS: u32 = 800;

const RESPONSE_SHAPE: &str = r#"Respond with a single JSON object and nothing else:
{"quote":{"text":"...","author":"..."},"reflection":"...","action":"...","mantra":"..."}"#;

fn mode_guidance(mode: MoodMode) -> &'static str {
    match mode {
        MoodMode::Zen => "Use calm, peaceful, mindful, introspective phrasing.",
        MoodMode::Warrior => "Use bold, energetic, confident, action-oriented phrasing.",
    }
}

fn system_prompt(params: &GenerationParams<'_>) -> String {
    format!(
        "You are MoodShift, an AI that generates daily inspiration cards. Your role is to create \
personalized, actionable content that helps users shift their mindset and energy.

RULES:
- Quote: <=160 characters, real or AI-inspired
- Reflection: <=500 characters, 3-5 lines
- Action: <=140 characters, doable in <=60 seconds, no equipment needed
- Mantra: <=60 characters, matches the mode
- If quote author is unknown, return \"Unknown\"

MODES:
- ZEN: Calm, peaceful, mindful, introspective
- WARRIOR: Bold, energetic, confident, action-oriented

THEMES: {themes}

TONE: {tone}
AUDIENCE: {audience}
LANGUAGE: {language}
STREAK: {streak} days

{guidance}

{shape}",
        themes = params.themes.join(", "),
        tone = params.tone,
        audience = params.audience,
        language = params.language,
        streak = params.streak_length,
        guidance = mode_guidance(params.mode),
        shape = RESPONSE_SHAPE,
    )
}

fn user_prompt(params: &GenerationParams<'_>) -> String {
    format!(
        "Generate a {} mode card for someone on a {}-day streak.",
        params.mode, params.streak_length
    )
}

/// Build the completion request for `params`.
pub fn build_request(params: &GenerationParams<'_>) -> TextGenerationRequest {
    TextGenerationRequest {
        system_prompt: system_prompt(params),
        user_prompt: user_prompt(params),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        json_response: true,
    }
}
