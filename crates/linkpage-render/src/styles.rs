//! Inline stylesheet for the generated page.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use linkpage_core::Theme;

use crate::fonts::FontTable;

/// Font classes resolved from the theme.
pub fn font_classes(theme: &Theme, fonts: &FontTable) -> String {
    let heading = fonts.stack(&theme.heading_font);
    let text = fonts.stack(&theme.text_font);

    format!(
        r#".heading-font {{ font-family: {heading}; }}
.text-font {{ font-family: {text}; }}
.button-font {{ font-family: {text}; }}
.link-button {{ transition: transform 0.15s ease, opacity 0.15s ease; }}
.link-button:hover {{ transform: translateY(-2px); opacity: 0.92; }}"#
    )
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("CSS minify error: {}", e))?;

    Ok(minified.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_font_class() {
        let theme = Theme {
            heading_font: "montserrat".to_string(),
            text_font: "lato".to_string(),
            ..Default::default()
        };

        let css = font_classes(&theme, &FontTable::builtin());

        assert!(css.contains(".heading-font { font-family: 'Montserrat', sans-serif; }"));
        assert!(css.contains(".text-font { font-family: 'Lato', sans-serif; }"));
        assert!(css.contains(".button-font { font-family: 'Lato', sans-serif; }"));
    }

    #[test]
    fn unknown_heading_font_uses_system_stack() {
        let theme = Theme {
            heading_font: "unknown-key".to_string(),
            ..Default::default()
        };

        let css = font_classes(&theme, &FontTable::builtin());

        assert!(css.contains(".heading-font { font-family: system-ui, sans-serif; }"));
    }

    #[test]
    fn minifies_font_classes() {
        let css = font_classes(&Theme::default(), &FontTable::builtin());
        let minified = minify_css(&css).unwrap();

        assert!(minified.len() < css.len());
        assert!(minified.contains(".heading-font{"));
    }
}
