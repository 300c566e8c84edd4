//! Escaping of user text embedded in the generated document.

use std::borrow::Cow;

/// How user-supplied strings are embedded into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// Entity-escape text and attributes, neutralize `<` in JSON-LD
    #[default]
    Html,

    /// Interpolate strings exactly as given
    Raw,
}

impl Escaping {
    /// Escape `s` for a text or double-quoted attribute position.
    pub fn html<'a>(&self, s: &'a str) -> Cow<'a, str> {
        match self {
            Self::Html => escape(s),
            Self::Raw => Cow::Borrowed(s),
        }
    }

    /// Make a serialized JSON payload safe inside a `<script>` element.
    pub fn script_json<'a>(&self, json: &'a str) -> Cow<'a, str> {
        match self {
            Self::Html => escape_script_json(json),
            Self::Raw => Cow::Borrowed(json),
        }
    }
}

const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters.
///
/// Borrows when there is nothing to escape.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Replace `<`, `>` and `&` in JSON text with `\u` escapes. The JSON value
/// is unchanged, but the text can no longer close the surrounding script.
pub fn escape_script_json(json: &str) -> Cow<'_, str> {
    if !json.contains(['<', '>', '&']) {
        return Cow::Borrowed(json);
    }

    let mut result = String::with_capacity(json.len() + 16);
    for c in json.chars() {
        match c {
            '<' => result.push_str("\\u003c"),
            '>' => result.push_str("\\u003e"),
            '&' => result.push_str("\\u0026"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
