//! Editing session state.
//!
//! Every transition builds a new [`UserProfile`] and swaps it in whole, so
//! anything that renders the profile sees either the old value or the new
//! one, never a half-applied edit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::field::{DraftField, FieldEvent, ProfileField};
use crate::ids::{IdGenerator, UuidIds};
use crate::model::{LinkItem, NewLinkDraft, UserProfile};

/// Which panel consumes the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Editor,
    Export,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Editor => Self::Export,
            Self::Export => Self::Editor,
        }
    }
}

/// Apply a `{name, value}` profile form event to `profile`.
///
/// Unknown names and non-numeric rounding values return an unchanged copy.
pub fn update_profile_field(profile: &UserProfile, name: &str, value: &str) -> UserProfile {
    let field = match name.parse::<ProfileField>() {
        Ok(field) => field,
        Err(e) => {
            tracing::debug!("Ignoring field event: {}", e);
            return profile.clone();
        }
    };

    match field {
        ProfileField::Text(field) => profile.with_text(field, value),
        ProfileField::Color(slot) => profile.with_theme(profile.theme.with_color(slot, value)),
        ProfileField::Font(slot) => profile.with_theme(profile.theme.with_font(slot, value)),
        ProfileField::ButtonRounding => match crate::field::parse_rounding(value) {
            Some(px) => profile.with_theme(profile.theme.with_button_rounding(px)),
            None => profile.clone(),
        },
    }
}

/// Apply a `{name, value}` draft form event to `draft`.
pub fn update_draft_field(draft: &NewLinkDraft, name: &str, value: &str) -> NewLinkDraft {
    match name.parse::<DraftField>() {
        Ok(field) => with_draft_field(draft, field, value),
        Err(e) => {
            tracing::debug!("Ignoring field event: {}", e);
            draft.clone()
        }
    }
}

fn with_draft_field(draft: &NewLinkDraft, field: DraftField, value: &str) -> NewLinkDraft {
    let mut draft = draft.clone();
    match field {
        DraftField::Title => draft.title = value.to_string(),
        DraftField::Url => draft.url = value.to_string(),
        DraftField::IconUrl => draft.icon_url = value.to_string(),
    }
    draft
}

/// Serializable view of an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub profile: UserProfile,
    pub draft: NewLinkDraft,
    pub view: ViewMode,
}

/// One editing session: the profile being built, the link draft, and the
/// active view.
#[derive(Debug)]
pub struct EditorState {
    profile: UserProfile,
    draft: NewLinkDraft,
    view: ViewMode,
    ids: Box<dyn IdGenerator>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(UserProfile::default())
    }
}

impl EditorState {
    /// Start a session over `profile`, issuing UUID link ids.
    pub fn new(profile: UserProfile) -> Self {
        Self::with_ids(profile, Box::new(UuidIds))
    }

    /// Start a session with a custom id source.
    ///
    /// Links loaded without an id are given one immediately.
    pub fn with_ids(profile: UserProfile, ids: Box<dyn IdGenerator>) -> Self {
        let mut state = Self {
            profile: UserProfile::default(),
            draft: NewLinkDraft::default(),
            view: ViewMode::default(),
            ids,
        };
        state.profile = state.assign_ids(profile, &[]);
        state
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn draft(&self) -> &NewLinkDraft {
        &self.draft
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            profile: self.profile.clone(),
            draft: self.draft.clone(),
            view: self.view,
        }
    }

    /// Replace the whole profile, e.g. after the backing file changed.
    /// The draft and view mode are kept.
    ///
    /// A link arriving without an id keeps the id of the current link at
    /// the same position when title and URL still match.
    pub fn replace_profile(&mut self, profile: UserProfile) {
        let previous = std::mem::take(&mut self.profile.links);
        self.profile = self.assign_ids(profile, &previous);
    }

    /// Apply a profile form event.
    pub fn update_profile_field(&mut self, name: &str, value: &str) -> bool {
        let next = update_profile_field(&self.profile, name, value);
        self.swap_profile(next)
    }

    /// Apply a draft form event.
    pub fn update_draft_field(&mut self, name: &str, value: &str) -> bool {
        let next = update_draft_field(&self.draft, name, value);
        self.swap_draft(next)
    }

    /// Append the draft as a new link and clear it.
    ///
    /// Does nothing, and keeps the draft, unless both title and URL are set.
    pub fn commit_draft(&mut self) -> bool {
        if !self.draft.is_complete() {
            return false;
        }

        let id = self.fresh_id();
        let next = self.profile.with_link(self.draft.to_link(id));
        self.profile = next;
        self.draft = NewLinkDraft::default();
        true
    }

    /// Drop the link with this id. Unknown ids are ignored.
    pub fn remove_link(&mut self, id: &str) -> bool {
        if !self.profile.has_link(id) {
            return false;
        }
        let next = self.profile.without_link(id);
        self.swap_profile(next)
    }

    pub fn toggle_export_view(&mut self) -> ViewMode {
        self.view = self.view.toggled();
        self.view
    }

    /// Apply a form event routed to the profile or the draft.
    pub fn apply_event(&mut self, event: FieldEvent, to_draft: bool) -> bool {
        let command = if to_draft {
            event.into_draft_command()
        } else {
            event.into_profile_command()
        };

        match command {
            Some(command) => self.apply(command),
            None => false,
        }
    }

    /// Apply one command. Returns whether observable state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::SetProfileText { field, value } => {
                let next = self.profile.with_text(field, &value);
                self.swap_profile(next)
            }
            Command::SetThemeColor { slot, value } => {
                let next = self
                    .profile
                    .with_theme(self.profile.theme.with_color(slot, &value));
                self.swap_profile(next)
            }
            Command::SetFont { slot, key } => {
                let next = self
                    .profile
                    .with_theme(self.profile.theme.with_font(slot, &key));
                self.swap_profile(next)
            }
            Command::SetButtonRounding { px } => {
                let next = self
                    .profile
                    .with_theme(self.profile.theme.with_button_rounding(px));
                self.swap_profile(next)
            }
            Command::SetDraftField { field, value } => {
                let next = with_draft_field(&self.draft, field, &value);
                self.swap_draft(next)
            }
            Command::CommitDraft => self.commit_draft(),
            Command::AddLink {
                title,
                url,
                icon_url,
            } => self.add_link(title, url, icon_url),
            Command::RemoveLink { id } => self.remove_link(&id),
            Command::ToggleExportView => {
                self.toggle_export_view();
                true
            }
        }
    }

    /// Append a link without going through the draft.
    fn add_link(&mut self, title: String, url: String, icon_url: Option<String>) -> bool {
        if title.is_empty() || url.is_empty() {
            return false;
        }

        let link = LinkItem {
            id: self.fresh_id(),
            title,
            url,
            icon_url: icon_url.filter(|s| !s.is_empty()),
        };
        self.profile = self.profile.with_link(link);
        true
    }

    fn swap_profile(&mut self, next: UserProfile) -> bool {
        if next == self.profile {
            return false;
        }
        self.profile = next;
        true
    }

    fn swap_draft(&mut self, next: NewLinkDraft) -> bool {
        if next == self.draft {
            return false;
        }
        self.draft = next;
        true
    }

    /// Next generator id that is not already taken by a link.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.profile.has_link(&id) {
                return id;
            }
        }
    }

    /// Give every link a unique id: missing ids are filled in and repeats
    /// of an earlier id are replaced.
    fn assign_ids(&mut self, mut profile: UserProfile, previous: &[LinkItem]) -> UserProfile {
        let mut taken: HashSet<String> = profile
            .links
            .iter()
            .filter(|l| !l.id.is_empty())
            .map(|l| l.id.clone())
            .collect();
        let mut seen: HashSet<String> = HashSet::new();

        for index in 0..profile.links.len() {
            let link = &profile.links[index];
            if !link.id.is_empty() && seen.insert(link.id.clone()) {
                continue;
            }

            let reused = previous
                .get(index)
                .filter(|old| old.title == link.title && old.url == link.url)
                .map(|old| old.id.clone())
                .filter(|id| !id.is_empty() && !taken.contains(id));

            let id = match reused {
                Some(id) => id,
                None => loop {
                    let id = self.ids.next_id();
                    if !taken.contains(&id) {
                        break id;
                    }
                },
            };

            if !profile.links[index].id.is_empty() {
                tracing::debug!("Replacing duplicate link id {}", profile.links[index].id);
            }
            taken.insert(id.clone());
            seen.insert(id.clone());
            profile.links[index].id = id;
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ColorSlot, ProfileTextField};
    use crate::ids::SequentialIds;
    use crate::model::Theme;
    use pretty_assertions::assert_eq;

    fn session() -> EditorState {
        EditorState::with_ids(UserProfile::default(), Box::new(SequentialIds::new()))
    }

    fn add(state: &mut EditorState, title: &str) {
        state.update_draft_field("title", title);
        state.update_draft_field("url", &format!("https://{}.example", title.to_lowercase()));
        assert!(state.commit_draft());
    }

    fn titles(state: &EditorState) -> Vec<String> {
        state
            .profile()
            .links
            .iter()
            .map(|l| l.title.clone())
            .collect()
    }

    #[test]
    fn updates_top_level_field_without_touching_previous_value() {
        let before = UserProfile::default();
        let after = update_profile_field(&before, "displayName", "Grace");

        assert_eq!(before.display_name, "");
        assert_eq!(after.display_name, "Grace");
    }

    #[test]
    fn updates_theme_sub_field() {
        let after = update_profile_field(&UserProfile::default(), "theme.buttonColor", "#123456");

        assert_eq!(after.theme.button_color, "#123456");
        assert_eq!(after.theme.text_color, Theme::default().text_color);
    }

    #[test]
    fn parses_button_rounding_and_passes_out_of_range_through() {
        let profile = UserProfile::default();

        assert_eq!(
            update_profile_field(&profile, "theme.buttonRounding", "12px")
                .theme
                .button_rounding,
            12
        );
        assert_eq!(
            update_profile_field(&profile, "theme.buttonRounding", "45")
                .theme
                .button_rounding,
            45
        );
        assert_eq!(
            update_profile_field(&profile, "theme.buttonRounding", "abc")
                .theme
                .button_rounding,
            8
        );
    }

    #[test]
    fn unknown_field_is_ignored() {
        let profile = UserProfile::default();
        assert_eq!(update_profile_field(&profile, "theme.glitter", "yes"), profile);
        assert_eq!(update_profile_field(&profile, "links", "[]"), profile);
    }

    #[test]
    fn incomplete_draft_does_not_commit_or_clear() {
        let mut state = session();
        state.update_draft_field("url", "https://x.com");

        assert!(!state.commit_draft());
        assert!(state.profile().links.is_empty());
        assert_eq!(state.draft().url, "https://x.com");
    }

    #[test]
    fn complete_draft_commits_and_resets() {
        let mut state = session();
        state.update_draft_field("title", "X");
        state.update_draft_field("url", "https://x.com");

        assert!(state.commit_draft());

        let links = &state.profile().links;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "link-1");
        assert_eq!(links[0].title, "X");
        assert_eq!(links[0].icon_url, None);
        assert_eq!(state.draft(), &NewLinkDraft::default());
    }

    #[test]
    fn remove_link_keeps_order_and_ignores_unknown_ids() {
        let mut state = session();
        add(&mut state, "A");
        add(&mut state, "B");
        add(&mut state, "C");

        let b = state.profile().links[1].id.clone();
        assert!(state.remove_link(&b));
        assert_eq!(titles(&state), vec!["A", "C"]);

        assert!(!state.remove_link("nope"));
        assert!(!state.remove_link(&b));
        assert_eq!(titles(&state), vec!["A", "C"]);
    }

    #[test]
    fn removed_ids_are_not_reissued() {
        let mut state = session();
        add(&mut state, "A");
        let first = state.profile().links[0].id.clone();
        state.remove_link(&first);
        add(&mut state, "B");

        assert_ne!(state.profile().links[0].id, first);
    }

    #[test]
    fn toggles_view_mode() {
        let mut state = session();
        assert_eq!(state.view(), ViewMode::Editor);
        assert_eq!(state.toggle_export_view(), ViewMode::Export);
        assert_eq!(state.toggle_export_view(), ViewMode::Editor);
    }

    #[test]
    fn assigns_ids_to_loaded_links_without_clashing() {
        let profile = UserProfile {
            links: vec![
                LinkItem {
                    id: "link-1".to_string(),
                    title: "Kept".to_string(),
                    url: "https://k".to_string(),
                    icon_url: None,
                },
                LinkItem {
                    id: String::new(),
                    title: "Fresh".to_string(),
                    url: "https://f".to_string(),
                    icon_url: None,
                },
            ],
            ..Default::default()
        };

        let state = EditorState::with_ids(profile, Box::new(SequentialIds::new()));

        assert_eq!(state.profile().links[0].id, "link-1");
        assert_eq!(state.profile().links[1].id, "link-2");
    }

    #[test]
    fn applies_commands_and_reports_changes() {
        let mut state = session();

        assert!(state.apply(Command::SetProfileText {
            field: ProfileTextField::Username,
            value: "Ada".to_string(),
        }));
        assert!(!state.apply(Command::SetProfileText {
            field: ProfileTextField::Username,
            value: "Ada".to_string(),
        }));
        assert!(state.apply(Command::SetThemeColor {
            slot: ColorSlot::Background,
            value: "#000".to_string(),
        }));
        assert!(!state.apply(Command::AddLink {
            title: String::new(),
            url: "https://x".to_string(),
            icon_url: None,
        }));
        assert!(state.apply(Command::AddLink {
            title: "Docs".to_string(),
            url: "https://docs".to_string(),
            icon_url: Some(String::new()),
        }));

        let profile = state.profile();
        assert_eq!(profile.username, "Ada");
        assert_eq!(profile.theme.background_color, "#000");
        assert_eq!(profile.links.len(), 1);
        assert_eq!(profile.links[0].icon_url, None);
    }

    #[test]
    fn routes_field_events_to_profile_or_draft() {
        let mut state = session();

        assert!(state.apply_event(FieldEvent::new("title", "Blog"), true));
        assert!(state.apply_event(FieldEvent::new("bio", "hi"), false));
        assert!(!state.apply_event(FieldEvent::new("title", "Blog"), false));

        assert_eq!(state.draft().title, "Blog");
        assert_eq!(state.profile().bio, "hi");
    }

    fn loaded(links: &[(&str, &str)]) -> UserProfile {
        UserProfile {
            links: links
                .iter()
                .map(|(id, title)| LinkItem {
                    id: id.to_string(),
                    title: title.to_string(),
                    url: format!("https://{}.example", title.to_lowercase()),
                    icon_url: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn repeated_loaded_ids_are_made_unique() {
        let profile = loaded(&[("x", "A"), ("x", "B"), ("link-1", "C")]);

        let mut state = EditorState::with_ids(profile, Box::new(SequentialIds::new()));

        let ids: Vec<&str> = state.profile().links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "link-2", "link-1"]);

        assert!(state.remove_link("x"));
        assert_eq!(titles(&state), vec!["B", "C"]);
    }

    #[test]
    fn reloading_same_links_keeps_their_ids() {
        let file = loaded(&[("", "A"), ("", "B")]);
        let mut state = EditorState::new(file.clone());
        let before: Vec<String> = state.profile().links.iter().map(|l| l.id.clone()).collect();

        state.replace_profile(file);

        let after: Vec<String> = state.profile().links.iter().map(|l| l.id.clone()).collect();
        assert_eq!(before, after);
        assert!(state.remove_link(&before[0]));
        assert_eq!(titles(&state), vec!["B"]);
    }

    #[test]
    fn reloading_changed_link_gets_fresh_id() {
        let mut state = EditorState::with_ids(
            loaded(&[("", "A"), ("", "B")]),
            Box::new(SequentialIds::new()),
        );

        state.replace_profile(loaded(&[("", "A"), ("", "Z")]));

        let ids: Vec<&str> = state.profile().links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["link-1", "link-3"]);
    }
}
