//! Form field names and the `{name, value}` events the editor form emits.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// Top-level text fields of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileTextField {
    DisplayName,
    Username,
    Bio,
    Avatar,
}

/// Theme color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorSlot {
    Background,
    Text,
    Button,
    ButtonText,
}

/// Theme font slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontSlot {
    Heading,
    Text,
}

/// Fields of the "add link" draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Title,
    Url,
    IconUrl,
}

/// Any profile field addressable by a form input name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Text(ProfileTextField),
    Color(ColorSlot),
    Font(FontSlot),
    ButtonRounding,
}

/// A form input name that does not address any field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown profile field: {0}")]
    UnknownProfileField(String),

    #[error("Unknown draft field: {0}")]
    UnknownDraftField(String),
}

impl FromStr for ProfileField {
    type Err = FieldError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let field = match name {
            "displayName" => Self::Text(ProfileTextField::DisplayName),
            "username" => Self::Text(ProfileTextField::Username),
            "bio" => Self::Text(ProfileTextField::Bio),
            "avatar" => Self::Text(ProfileTextField::Avatar),
            "theme.backgroundColor" => Self::Color(ColorSlot::Background),
            "theme.textColor" => Self::Color(ColorSlot::Text),
            "theme.buttonColor" => Self::Color(ColorSlot::Button),
            "theme.buttonTextColor" => Self::Color(ColorSlot::ButtonText),
            "theme.headingFont" => Self::Font(FontSlot::Heading),
            "theme.textFont" => Self::Font(FontSlot::Text),
            "theme.buttonRounding" => Self::ButtonRounding,
            _ => return Err(FieldError::UnknownProfileField(name.to_string())),
        };
        Ok(field)
    }
}

impl ProfileField {
    /// The form input name for this field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(ProfileTextField::DisplayName) => "displayName",
            Self::Text(ProfileTextField::Username) => "username",
            Self::Text(ProfileTextField::Bio) => "bio",
            Self::Text(ProfileTextField::Avatar) => "avatar",
            Self::Color(ColorSlot::Background) => "theme.backgroundColor",
            Self::Color(ColorSlot::Text) => "theme.textColor",
            Self::Color(ColorSlot::Button) => "theme.buttonColor",
            Self::Color(ColorSlot::ButtonText) => "theme.buttonTextColor",
            Self::Font(FontSlot::Heading) => "theme.headingFont",
            Self::Font(FontSlot::Text) => "theme.textFont",
            Self::ButtonRounding => "theme.buttonRounding",
        }
    }
}

impl FromStr for DraftField {
    type Err = FieldError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "title" => Ok(Self::Title),
            "url" => Ok(Self::Url),
            "iconUrl" => Ok(Self::IconUrl),
            _ => Err(FieldError::UnknownDraftField(name.to_string())),
        }
    }
}

/// Parse a rounding input the way a form number field is read: leading
/// whitespace, an optional sign, then at least one digit. Trailing text
/// (`"12px"`) is ignored. Returns `None` when no integer can be read.
pub fn parse_rounding(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    format!("{}{}", sign, &rest[..digits_len]).parse().ok()
}

/// A change event from an editor form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEvent {
    /// Input name: `displayName`, `theme.buttonColor`, `iconUrl`, ...
    pub name: String,

    /// Raw input value
    pub value: String,
}

impl FieldEvent {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Interpret this event against the profile form.
    ///
    /// Returns `None` for unknown names and for rounding values that do
    /// not contain an integer; both leave the profile as it was.
    pub fn into_profile_command(self) -> Option<Command> {
        let field = match self.name.parse::<ProfileField>() {
            Ok(field) => field,
            Err(e) => {
                tracing::debug!("Ignoring field event: {}", e);
                return None;
            }
        };

        let command = match field {
            ProfileField::Text(field) => Command::SetProfileText {
                field,
                value: self.value,
            },
            ProfileField::Color(slot) => Command::SetThemeColor {
                slot,
                value: self.value,
            },
            ProfileField::Font(slot) => Command::SetFont {
                slot,
                key: self.value,
            },
            ProfileField::ButtonRounding => match parse_rounding(&self.value) {
                Some(px) => Command::SetButtonRounding { px },
                None => {
                    tracing::debug!("Ignoring non-numeric button rounding: {:?}", self.value);
                    return None;
                }
            },
        };

        Some(command)
    }

    /// Interpret this event against the "add link" draft form.
    pub fn into_draft_command(self) -> Option<Command> {
        match self.name.parse::<DraftField>() {
            Ok(field) => Some(Command::SetDraftField {
                field,
                value: self.value,
            }),
            Err(e) => {
                tracing::debug!("Ignoring field event: {}", e);
                None
            }
        }
    }
}
