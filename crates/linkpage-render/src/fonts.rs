//! Font key lookup.
//!
//! Profiles name fonts by symbolic key (`space-grotesk`, `inter`, ...). The
//! generator resolves keys through a [`FontTable`] handed to it at
//! construction, so deployments can add or override fonts from config.

use std::collections::BTreeMap;

/// Stack used for keys the table does not know.
pub const FALLBACK_STACK: &str = "system-ui, sans-serif";

const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com/css2";

/// How one font key is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// CSS `font-family` value
    pub stack: String,

    /// Google Fonts `family` query value, if the font is loaded from there
    pub google_family: Option<String>,
}

impl FontFace {
    /// A face that is expected to be installed locally.
    pub fn local(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            google_family: None,
        }
    }

    /// A face loaded from Google Fonts.
    pub fn google(stack: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            google_family: Some(family.into()),
        }
    }
}

/// Mapping from font key to face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    faces: BTreeMap<String, FontFace>,
}

impl Default for FontTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontTable {
    /// A table with no entries; every key resolves to [`FALLBACK_STACK`].
    pub fn empty() -> Self {
        Self {
            faces: BTreeMap::new(),
        }
    }

    /// The six fonts the editor offers.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.insert(
            "space-grotesk",
            FontFace::google("'Space Grotesk', sans-serif", "Space+Grotesk:wght@400;500;700"),
        );
        table.insert("arial", FontFace::local("Arial, Helvetica, sans-serif"));
        table.insert(
            "inter",
            FontFace::google("'Inter', sans-serif", "Inter:wght@400;500;700"),
        );
        table.insert(
            "montserrat",
            FontFace::google("'Montserrat', sans-serif", "Montserrat:wght@400;500;700"),
        );
        table.insert(
            "jetbrains-mono",
            FontFace::google("'JetBrains Mono', monospace", "JetBrains+Mono:wght@400;500;700"),
        );
        table.insert(
            "lato",
            FontFace::google("'Lato', sans-serif", "Lato:wght@400;700"),
        );
        table
    }

    /// Add or replace a key.
    pub fn insert(&mut self, key: impl Into<String>, face: FontFace) {
        self.faces.insert(key.into(), face);
    }

    /// Builtin table with stacks overridden or added from `(key, stack)`
    /// pairs. Overridden keys are treated as locally installed.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::builtin();
        for (key, stack) in overrides {
            table.insert(key, FontFace::local(stack));
        }
        table
    }

    pub fn get(&self, key: &str) -> Option<&FontFace> {
        self.faces.get(key)
    }

    /// CSS stack for `key`, falling back to [`FALLBACK_STACK`].
    pub fn stack(&self, key: &str) -> &str {
        self.faces
            .get(key)
            .map(|face| face.stack.as_str())
            .filter(|stack| !stack.trim().is_empty())
            .unwrap_or(FALLBACK_STACK)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    /// Stylesheet URL loading every Google font among `keys`, in the order
    /// given and without duplicates. `None` if none of them is remote.
    pub fn stylesheet_href(&self, keys: &[&str]) -> Option<String> {
        let mut families: Vec<&str> = Vec::new();
        for key in keys {
            if let Some(family) = self.get(key).and_then(|f| f.google_family.as_deref()) {
                if !families.contains(&family) {
                    families.push(family);
                }
            }
        }

        if families.is_empty() {
            return None;
        }

        let query = families
            .iter()
            .map(|family| format!("family={}", family))
            .collect::<Vec<_>>()
            .join("&");

        Some(format!("{}?{}&display=swap", GOOGLE_FONTS_CSS, query))
    }
}
