//! Editing commands.

use serde::{Deserialize, Serialize};

use crate::field::{ColorSlot, DraftField, FontSlot, ProfileTextField};

/// One transition of an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Replace a top-level text field
    SetProfileText {
        field: ProfileTextField,
        value: String,
    },

    /// Replace a theme color
    SetThemeColor { slot: ColorSlot, value: String },

    /// Replace a theme font key
    SetFont { slot: FontSlot, key: String },

    /// Replace the button radius (not clamped)
    SetButtonRounding { px: i32 },

    /// Edit the "add link" draft
    SetDraftField { field: DraftField, value: String },

    /// Append the draft as a new link if it is complete
    CommitDraft,

    /// Append a link directly, bypassing the draft
    AddLink {
        title: String,
        url: String,
        #[serde(default)]
        icon_url: Option<String>,
    },

    /// Remove the link with this id
    RemoveLink { id: String },

    /// Switch between the editor and export panels
    ToggleExportView,
}
