//! Fallback text, canonical URL and structured data.

use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use linkpage_core::UserProfile;

pub const FALLBACK_DISPLAY_NAME: &str = "Links User";
pub const FALLBACK_USERNAME: &str = "linksuser";
pub const FALLBACK_BIO: &str = " through my links";

/// Characters kept as-is in the username path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Profile text with fallbacks applied, as every SEO position sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub display_name: String,
    pub username: String,
    pub bio: String,
    pub canonical_url: String,
}

impl PageFields {
    /// Apply fallbacks and derive the canonical URL under `base_url`.
    ///
    /// With `encode_path`, the username segment of the URL is
    /// percent-encoded so it reads the same in HTML and JSON.
    pub fn new(profile: &UserProfile, base_url: &str, encode_path: bool) -> Self {
        let display_name = non_empty_or(&profile.display_name, FALLBACK_DISPLAY_NAME);
        let username = non_empty_or(&profile.username.to_lowercase(), FALLBACK_USERNAME);
        let bio = non_empty_or(&profile.bio, FALLBACK_BIO);

        let canonical_url = if encode_path {
            canonical_url(base_url, &username)
        } else {
            format!("{}/{}", base_url.trim_end_matches('/'), username)
        };

        Self {
            display_name,
            username,
            bio,
            canonical_url,
        }
    }

    /// Upper-cased first character of the display name, for the avatar
    /// placeholder.
    pub fn initial(&self) -> String {
        self.display_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// `<base>/<username>` with the username percent-encoded.
pub fn canonical_url(base_url: &str, username: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(username, PATH_SEGMENT)
    )
}

#[derive(Serialize)]
struct ProfilePage<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    url: &'a str,
    #[serde(rename = "dateModified")]
    date_modified: String,
    #[serde(rename = "mainEntity")]
    main_entity: Person<'a>,
}

#[derive(Serialize)]
struct Person<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    #[serde(rename = "alternateName")]
    alternate_name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    url: &'a str,
}

/// Schema.org `ProfilePage` payload for the JSON-LD script.
pub fn json_ld(fields: &PageFields, avatar: Option<&str>, date: NaiveDate) -> String {
    let page = ProfilePage {
        context: "https://schema.org",
        kind: "ProfilePage",
        url: &fields.canonical_url,
        date_modified: date.format("%Y-%m-%d").to_string(),
        main_entity: Person {
            kind: "Person",
            name: &fields.display_name,
            alternate_name: &fields.username,
            description: &fields.bio,
            image: avatar,
            url: &fields.canonical_url,
        },
    };

    // Serializing plain strings into JSON cannot fail.
    serde_json::to_string_pretty(&page).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://linkpage.me";

    #[test]
    fn applies_fallbacks_to_empty_profile() {
        let fields = PageFields::new(&UserProfile::default(), BASE, true);

        assert_eq!(fields.display_name, "Links User");
        assert_eq!(fields.username, "linksuser");
        assert_eq!(fields.bio, " through my links");
        assert_eq!(fields.canonical_url, "https://linkpage.me/linksuser");
        assert_eq!(fields.initial(), "L");
    }

    #[test]
    fn lowercases_username() {
        let profile = UserProfile {
            username: "AdaL".to_string(),
            display_name: "ada".to_string(),
            ..Default::default()
        };
        let fields = PageFields::new(&profile, "https://linkpage.me/", true);

        assert_eq!(fields.username, "adal");
        assert_eq!(fields.canonical_url, "https://linkpage.me/adal");
        assert_eq!(fields.initial(), "A");
    }

    #[test]
    fn encodes_unsafe_username_characters() {
        assert_eq!(canonical_url(BASE, "a b\"c"), "https://linkpage.me/a%20b%22c");
        assert_eq!(canonical_url(BASE, "jo.doe-1_x"), "https://linkpage.me/jo.doe-1_x");
    }

    #[test]
    fn json_ld_includes_image_only_when_present() {
        let fields = PageFields::new(&UserProfile::default(), BASE, true);
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let without = json_ld(&fields, None, date);
        assert!(!without.contains("\"image\""));
        assert!(without.contains("\"dateModified\": \"2024-03-09\""));

        let with = json_ld(&fields, Some("https://a/me.png"), date);
        let value: serde_json::Value = serde_json::from_str(&with).unwrap();
        assert_eq!(value["mainEntity"]["image"], "https://a/me.png");
        assert_eq!(value["url"], "https://linkpage.me/linksuser");
    }
}
