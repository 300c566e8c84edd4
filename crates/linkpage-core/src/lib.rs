//! Profile model and editing state for linkpage.
//!
//! This crate holds the data a link-in-bio page is built from and the
//! pure transitions an editing session applies to it. Rendering lives in
//! `linkpage-render`; nothing here performs I/O.

pub mod command;
pub mod editor;
pub mod field;
pub mod ids;
pub mod model;

pub use command::Command;
pub use editor::{update_draft_field, update_profile_field, EditorSnapshot, EditorState, ViewMode};
pub use field::{
    parse_rounding, ColorSlot, DraftField, FieldError, FieldEvent, FontSlot, ProfileField,
    ProfileTextField,
};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use model::{LinkItem, NewLinkDraft, Theme, UserProfile};
