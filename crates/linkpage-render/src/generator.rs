//! Profile to HTML document generation.

use chrono::{Local, NaiveDate};
use minijinja::{context, Value};

use linkpage_core::UserProfile;

use crate::escape::Escaping;
use crate::fonts::FontTable;
use crate::seo::{json_ld, PageFields};
use crate::styles::{font_classes, minify_css};
use crate::templates::TemplateEngine;

/// Origin canonical URLs are built under unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://linkpage.me";

/// Configuration for the document generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Origin of canonical profile URLs
    pub base_url: String,

    /// Font key lookup
    pub fonts: FontTable,

    /// How user text is embedded
    pub escaping: Escaping,

    /// Minify the inline stylesheet
    pub minify_styles: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fonts: FontTable::builtin(),
            escaping: Escaping::Html,
            minify_styles: false,
        }
    }
}

/// Errors that can occur while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render template: {0}")]
    TemplateError(#[from] minijinja::Error),
}

/// Renders profiles into complete HTML documents.
///
/// Rendering is pure: for the same profile and date the output is
/// byte-identical.
pub struct Generator {
    config: GeneratorConfig,
    templates: TemplateEngine,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator {
    /// Create a new generator.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render `profile` stamped with today's local date.
    pub fn generate(&self, profile: &UserProfile) -> String {
        self.render(profile, Local::now().date_naive())
    }

    /// Render `profile` stamped with `date`.
    ///
    /// Never fails: a template error is logged and a minimal document with
    /// the same title is returned instead.
    pub fn render(&self, profile: &UserProfile, date: NaiveDate) -> String {
        match self.try_render(profile, date) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("{}", e);
                self.fallback_document(profile)
            }
        }
    }

    /// Render `profile` stamped with `date`, reporting template errors.
    pub fn try_render(&self, profile: &UserProfile, date: NaiveDate) -> Result<String, RenderError> {
        let esc = self.config.escaping;
        let fields = PageFields::new(profile, &self.config.base_url, esc == Escaping::Html);
        let avatar = profile.avatar_url();
        let theme = &profile.theme;

        let structured = json_ld(&fields, avatar, date);

        let styles = font_classes(theme, &self.config.fonts);
        let styles = if self.config.minify_styles {
            minify_css(&styles).unwrap_or_else(|e| {
                tracing::warn!("Keeping unminified styles: {}", e);
                styles
            })
        } else {
            styles
        };

        let fonts_href = self
            .config
            .fonts
            .stylesheet_href(&[theme.heading_font.as_str(), theme.text_font.as_str()]);

        let links: Vec<Value> = profile
            .links
            .iter()
            .map(|link| {
                context! {
                    title => self.text(&link.title),
                    url => self.text(&link.url),
                    icon_url => link.icon().map(|icon| self.text(icon)),
                }
            })
            .collect();

        let ctx = context! {
            display_name => self.text(&fields.display_name),
            username => self.text(&fields.username),
            description => self.text(&fields.bio),
            bio => (!profile.bio.is_empty()).then(|| self.text(&profile.bio)),
            canonical_url => self.text(&fields.canonical_url),
            avatar => avatar.map(|url| self.text(url)),
            initial => self.text(&fields.initial()),
            fonts_href => fonts_href.as_deref().map(|href| self.text(href)),
            json_ld => Value::from_safe_string(esc.script_json(&structured).into_owned()),
            styles => Value::from_safe_string(styles),
            background_color => self.text(&theme.background_color),
            text_color => self.text(&theme.text_color),
            button_color => self.text(&theme.button_color),
            button_text_color => self.text(&theme.button_text_color),
            button_rounding => theme.button_rounding,
            home_url => self.text(&self.config.base_url),
            links => links,
        };

        Ok(self.templates.render_page(ctx)?)
    }

    /// User text prepared for the template according to the escaping mode.
    fn text(&self, s: &str) -> Value {
        Value::from_safe_string(self.config.escaping.html(s).into_owned())
    }

    fn fallback_document(&self, profile: &UserProfile) -> String {
        let fields = PageFields::new(profile, &self.config.base_url, true);
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <title>{} | Links</title>\n  <link rel=\"canonical\" href=\"{}\">\n</head>\n<body>\n  <h1>{}</h1>\n</body>\n</html>\n",
            crate::escape::escape(&fields.display_name),
            crate::escape::escape(&fields.canonical_url),
            crate::escape::escape(&fields.display_name),
        )
    }
}

/// Render `profile` with the default configuration and today's date.
pub fn generate(profile: &UserProfile) -> String {
    Generator::default().generate(profile)
}
