//! Closed vocabularies shared by settings, cards and the content generator.
//!
//! Each enum serialises to the lowercase snake_case token stored in the
//! database and exchanged over HTTP.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when parsing an unknown vocabulary token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVocabularyError {
    /// Name of the vocabulary, e.g. `mode`.
    pub field: &'static str,
    /// The unrecognised input value.
    pub input: String,
}

impl std::fmt::Display for ParseVocabularyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: {}", self.field, self.input)
    }
}

impl std::error::Error for ParseVocabularyError {}

/// Content persona selecting the phrasing family and fallback payload.
///
/// # Examples
/// ```
/// use moodshift::domain::MoodMode;
///
/// assert_eq!("warrior".parse::<MoodMode>(), Ok(MoodMode::Warrior));
/// assert_eq!(MoodMode::default().as_str(), "zen");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MoodMode {
    /// Calm, peaceful, mindful, introspective.
    #[default]
    Zen,
    /// Bold, energetic, confident, action-oriented.
    Warrior,
}

impl MoodMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zen => "zen",
            Self::Warrior => "warrior",
        }
    }
}

impl std::str::FromStr for MoodMode {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zen" => Ok(Self::Zen),
            "warrior" => Ok(Self::Warrior),
            _ => Err(ParseVocabularyError {
                field: "mode",
                input: s.to_owned(),
            }),
        }
    }
}

/// Intensity of the generated phrasing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Soft,
    #[default]
    Balanced,
    Strong,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Balanced => "balanced",
            Self::Strong => "strong",
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(Self::Soft),
            "balanced" => Ok(Self::Balanced),
            "strong" => Ok(Self::Strong),
            _ => Err(ParseVocabularyError {
                field: "tone",
                input: s.to_owned(),
            }),
        }
    }
}

/// Audience the content is phrased for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Woman,
    Man,
    NonBinary,
    #[default]
    PreferNotToSay,
    Custom,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Woman => "woman",
            Self::Man => "man",
            Self::NonBinary => "non_binary",
            Self::PreferNotToSay => "prefer_not_to_say",
            Self::Custom => "custom",
        }
    }
}

impl std::str::FromStr for Audience {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "woman" => Ok(Self::Woman),
            "man" => Ok(Self::Man),
            "non_binary" => Ok(Self::NonBinary),
            "prefer_not_to_say" => Ok(Self::PreferNotToSay),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseVocabularyError {
                field: "audience",
                input: s.to_owned(),
            }),
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_display_via_as_str!(MoodMode, Tone, Audience);
