//! Profile data model.

use serde::{Deserialize, Serialize};

use crate::field::{ColorSlot, FontSlot, ProfileTextField};

/// One outbound link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    /// Opaque identifier, unique within one profile
    #[serde(default)]
    pub id: String,

    /// Button label
    pub title: String,

    /// Destination URL
    pub url: String,

    /// Small icon shown before the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl LinkItem {
    /// Icon URL, treating an empty string as absent.
    pub fn icon(&self) -> Option<&str> {
        self.icon_url.as_deref().filter(|s| !s.is_empty())
    }
}

/// Visual configuration of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,

    /// Symbolic font key for headings (e.g. `space-grotesk`)
    pub heading_font: String,

    /// Symbolic font key for body text and buttons
    pub text_font: String,

    /// Button corner radius in pixels. The editor offers 0..=30 but
    /// any value is stored and rendered as-is.
    pub button_rounding: i32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
            button_color: "#111827".to_string(),
            button_text_color: "#ffffff".to_string(),
            heading_font: "space-grotesk".to_string(),
            text_font: "inter".to_string(),
            button_rounding: 8,
        }
    }
}

impl Theme {
    /// Read a color slot.
    pub fn color(&self, slot: ColorSlot) -> &str {
        match slot {
            ColorSlot::Background => &self.background_color,
            ColorSlot::Text => &self.text_color,
            ColorSlot::Button => &self.button_color,
            ColorSlot::ButtonText => &self.button_text_color,
        }
    }

    /// Read a font slot.
    pub fn font(&self, slot: FontSlot) -> &str {
        match slot {
            FontSlot::Heading => &self.heading_font,
            FontSlot::Text => &self.text_font,
        }
    }

    /// Copy of this theme with one color replaced.
    pub fn with_color(&self, slot: ColorSlot, value: &str) -> Self {
        let mut theme = self.clone();
        let target = match slot {
            ColorSlot::Background => &mut theme.background_color,
            ColorSlot::Text => &mut theme.text_color,
            ColorSlot::Button => &mut theme.button_color,
            ColorSlot::ButtonText => &mut theme.button_text_color,
        };
        *target = value.to_string();
        theme
    }

    /// Copy of this theme with one font key replaced.
    pub fn with_font(&self, slot: FontSlot, key: &str) -> Self {
        let mut theme = self.clone();
        match slot {
            FontSlot::Heading => theme.heading_font = key.to_string(),
            FontSlot::Text => theme.text_font = key.to_string(),
        }
        theme
    }

    /// Copy of this theme with a new button radius.
    pub fn with_button_rounding(&self, px: i32) -> Self {
        Self {
            button_rounding: px,
            ..self.clone()
        }
    }
}

/// The aggregate a page is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    /// Handle, lower-cased when rendered
    pub username: String,

    /// Human name shown as page title and heading
    pub display_name: String,

    /// Free text description
    pub bio: String,

    /// Profile image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Link buttons in rendering order
    pub links: Vec<LinkItem>,

    pub theme: Theme,
}

impl UserProfile {
    /// Avatar URL, treating an empty string as absent.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_deref().filter(|s| !s.is_empty())
    }

    /// Read a top-level text field.
    pub fn text(&self, field: ProfileTextField) -> &str {
        match field {
            ProfileTextField::DisplayName => &self.display_name,
            ProfileTextField::Username => &self.username,
            ProfileTextField::Bio => &self.bio,
            ProfileTextField::Avatar => self.avatar.as_deref().unwrap_or(""),
        }
    }

    /// Copy of this profile with one top-level text field replaced.
    pub fn with_text(&self, field: ProfileTextField, value: &str) -> Self {
        let mut profile = self.clone();
        match field {
            ProfileTextField::DisplayName => profile.display_name = value.to_string(),
            ProfileTextField::Username => profile.username = value.to_string(),
            ProfileTextField::Bio => profile.bio = value.to_string(),
            ProfileTextField::Avatar => {
                profile.avatar = (!value.is_empty()).then(|| value.to_string());
            }
        }
        profile
    }

    /// Copy of this profile with a replaced theme.
    pub fn with_theme(&self, theme: Theme) -> Self {
        Self {
            theme,
            ..self.clone()
        }
    }

    /// Copy of this profile with `link` appended.
    pub fn with_link(&self, link: LinkItem) -> Self {
        let mut profile = self.clone();
        profile.links.push(link);
        profile
    }

    /// Copy of this profile without the link whose id is `id`.
    pub fn without_link(&self, id: &str) -> Self {
        let mut profile = self.clone();
        profile.links.retain(|link| link.id != id);
        profile
    }

    /// Whether a link with this id exists.
    pub fn has_link(&self, id: &str) -> bool {
        self.links.iter().any(|link| link.id == id)
    }
}

/// Scratch state of the "add link" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewLinkDraft {
    pub title: String,
    pub url: String,
    pub icon_url: String,
}

impl NewLinkDraft {
    /// A draft can be committed once it has a title and a URL.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty()
    }

    /// Turn the draft into a link carrying `id`.
    pub fn to_link(&self, id: String) -> LinkItem {
        LinkItem {
            id,
            title: self.title.clone(),
            url: self.url.clone(),
            icon_url: (!self.icon_url.is_empty()).then(|| self.icon_url.clone()),
        }
    }
}
