//! Evergreen content served whenever generation fails.

use crate::domain::{CardContent, MoodMode};

/// The fixed payload for `mode`.
///
/// # Examples
/// ```
/// use moodshift::domain::{MoodMode, generation::fallback_content};
///
/// let zen = fallback_content(MoodMode::Zen);
/// assert_eq!(zen.quote().text, "Peace begins with a smile.");
/// assert_eq!(zen.mantra(), "I am peaceful.");
/// ```
pub fn fallback_content(mode: MoodMode) -> CardContent {
    match mode {
        MoodMode::Zen => CardContent::from_static(
            "Peace begins with a smile.",
            "Mother Teresa",
            "Take a moment to breathe deeply and center yourself. Find peace in the present moment.",
            "Take 5 deep breaths right now.",
            "I am peaceful.",
        ),
        MoodMode::Warrior => CardContent::from_static(
            "Success is not final, failure is not fatal.",
            "Winston Churchill",
            "You have the strength to overcome any challenge. Believe in your power.",
            "Stand tall and say \"I am capable\" out loud.",
            "I am strong.",
        ),
    }
}
