//! Per-user generation settings.
//!
//! `Settings` is the aggregate read by the card workflow and replaced
//! wholesale by settings updates. Field-level validation lives in the value
//! constructors below so every adapter enforces the same rules.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{Audience, MoodMode, ParseVocabularyError, Tone, UserId};

/// Maximum number of themes a user may select.
pub const MAX_THEMES: usize = 10;
/// Maximum length of a single theme, in characters.
pub const MAX_THEME_CHARS: usize = 40;
/// Maximum length of a language tag, in characters.
pub const MAX_LANGUAGE_CHARS: usize = 35;

const DEFAULT_THEMES: [&str; 2] = ["focus", "creativity"];
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_TIMEZONE: &str = "UTC";

/// Validation failures raised while building a settings update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsValidationError {
    #[error("Invalid {}", .0.field)]
    Vocabulary(ParseVocabularyError),
    #[error("Invalid delivery time: expected HH:MM or HH:MM:SS")]
    DeliveryTime { input: String },
    #[error("Invalid timezone: {input}")]
    Timezone { input: String },
    #[error("themes must contain between 1 and {max} entries")]
    ThemeCount { max: usize },
    #[error("themes must not contain blank entries")]
    BlankTheme,
    #[error("themes must be at most {max} characters")]
    ThemeTooLong { max: usize },
    #[error("language must be a non-blank tag of at most {max} characters")]
    Language { max: usize },
}

impl SettingsValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Vocabulary(err) => err.field,
            Self::DeliveryTime { .. } => "deliveryTime",
            Self::Timezone { .. } => "timezone",
            Self::ThemeCount { .. } | Self::BlankTheme | Self::ThemeTooLong { .. } => "themes",
            Self::Language { .. } => "language",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> String {
        match self {
            Self::Vocabulary(err) => format!("invalid_{}", err.field),
            Self::DeliveryTime { .. } => "invalid_delivery_time".to_owned(),
            Self::Timezone { .. } => "invalid_timezone".to_owned(),
            Self::ThemeCount { .. } => "invalid_theme_count".to_owned(),
            Self::BlankTheme => "blank_theme".to_owned(),
            Self::ThemeTooLong { .. } => "theme_too_long".to_owned(),
            Self::Language { .. } => "invalid_language".to_owned(),
        }
    }
}

impl From<ParseVocabularyError> for SettingsValidationError {
    fn from(value: ParseVocabularyError) -> Self {
        Self::Vocabulary(value)
    }
}

/// Ordered, non-empty list of free-text themes.
///
/// # Examples
/// ```
/// use moodshift::domain::Themes;
///
/// let themes = Themes::new(vec![" focus ".into(), "calm".into()]).expect("valid themes");
/// assert_eq!(themes.as_slice(), ["focus", "calm"]);
/// assert!(Themes::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Themes(Vec<String>);

impl Themes {
    /// Trim and validate each theme, preserving order.
    pub fn new(raw: Vec<String>) -> Result<Self, SettingsValidationError> {
        if raw.is_empty() || raw.len() > MAX_THEMES {
            return Err(SettingsValidationError::ThemeCount { max: MAX_THEMES });
        }
        let mut themes = Vec::with_capacity(raw.len());
        for theme in raw {
            let trimmed = theme.trim();
            if trimmed.is_empty() {
                return Err(SettingsValidationError::BlankTheme);
            }
            if trimmed.chars().count() > MAX_THEME_CHARS {
                return Err(SettingsValidationError::ThemeTooLong {
                    max: MAX_THEME_CHARS,
                });
            }
            themes.push(trimmed.to_owned());
        }
        Ok(Self(themes))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for Themes {
    fn default() -> Self {
        Self(DEFAULT_THEMES.iter().map(|theme| (*theme).to_owned()).collect())
    }
}

impl TryFrom<Vec<String>> for Themes {
    type Error = SettingsValidationError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Themes> for Vec<String> {
    fn from(value: Themes) -> Self {
        value.0
    }
}

/// Validate a language tag such as `en` or `pt-BR`.
pub fn parse_language(raw: &str) -> Result<String, SettingsValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_LANGUAGE_CHARS {
        return Err(SettingsValidationError::Language {
            max: MAX_LANGUAGE_CHARS,
        });
    }
    Ok(trimmed.to_owned())
}

/// Parse a wall-clock delivery time in `HH:MM` or `HH:MM:SS` form.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use moodshift::domain::parse_delivery_time;
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
/// assert_eq!(parse_delivery_time("09:00"), Ok(nine));
/// assert_eq!(parse_delivery_time("09:00:00"), Ok(nine));
/// assert!(parse_delivery_time("9am").is_err());
/// ```
pub fn parse_delivery_time(raw: &str) -> Result<NaiveTime, SettingsValidationError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| SettingsValidationError::DeliveryTime {
            input: raw.to_owned(),
        })
}

/// Validate an IANA timezone name and return its canonical spelling.
pub fn parse_timezone(raw: &str) -> Result<String, SettingsValidationError> {
    raw.parse::<Tz>()
        .map(|tz| tz.name().to_owned())
        .map_err(|_| SettingsValidationError::Timezone {
            input: raw.to_owned(),
        })
}

/// Validated replacement for every mutable settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub mode: MoodMode,
    pub tone: Tone,
    pub audience: Audience,
    pub delivery_time: NaiveTime,
    pub timezone: String,
    pub themes: Themes,
    pub language: String,
}

/// A user's stored settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub user_id: UserId,
    pub mode: MoodMode,
    pub tone: Tone,
    pub audience: Audience,
    pub delivery_time: NaiveTime,
    pub timezone: String,
    pub themes: Themes,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Defaults written on a user's first access.
    pub fn defaults(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            mode: MoodMode::default(),
            tone: Tone::default(),
            audience: Audience::default(),
            delivery_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            timezone: DEFAULT_TIMEZONE.to_owned(),
            themes: Themes::default(),
            language: DEFAULT_LANGUAGE.to_owned(),
            updated_at: now,
        }
    }

    /// Replace every mutable field with the values from `update`.
    pub fn apply(self, update: SettingsUpdate, now: DateTime<Utc>) -> Self {
        Self {
            user_id: self.user_id,
            mode: update.mode,
            tone: update.tone,
            audience: update.audience,
            delivery_time: update.delivery_time,
            timezone: update.timezone,
            themes: update.themes,
            language: update.language,
            updated_at: now,
        }
    }

    /// The configured timezone, or UTC when the stored name is unknown.
    pub fn zone(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// The user's calendar date at instant `now`.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.zone()).date_naive()
    }
}
