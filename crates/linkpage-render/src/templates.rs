//! Page template.
//!
//! Every value reaching the template is already escaped (or deliberately
//! raw) and marked safe by the generator, so the engine's own auto-escaping
//! never applies.

use minijinja::{Environment, Value};

pub const PAGE_TEMPLATE_NAME: &str = "page.html";

/// Template engine holding the one page layout.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the page template loaded.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .expect("Failed to add page template");

        Self { env }
    }

    /// Render the page template.
    pub fn render_page(&self, context: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(PAGE_TEMPLATE_NAME)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ display_name }} | Links</title>
  <meta name="description" content="{{ description }}">
  <link rel="canonical" href="{{ canonical_url }}">
  <meta property="og:type" content="profile">
  <meta property="og:url" content="{{ canonical_url }}">
  <meta property="og:title" content="{{ display_name }}">
  <meta property="og:description" content="{{ description }}">
  {% if avatar %}
  <meta property="og:image" content="{{ avatar }}">
  {% endif %}
  <meta property="profile:username" content="{{ username }}">
  <meta name="twitter:card" content="{% if avatar %}summary_large_image{% else %}summary{% endif %}">
  <meta name="twitter:url" content="{{ canonical_url }}">
  <meta name="twitter:title" content="{{ display_name }}">
  <meta name="twitter:description" content="{{ description }}">
  {% if avatar %}
  <meta name="twitter:image" content="{{ avatar }}">
  {% endif %}
  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
  {% if fonts_href %}
  <link rel="stylesheet" href="{{ fonts_href }}">
  {% endif %}
  <script src="https://cdn.tailwindcss.com"></script>
  <script type="application/ld+json">
{{ json_ld }}
  </script>
  <style>
{{ styles }}
  </style>
</head>
<body class="min-h-screen bg-[{{ background_color }}] text-[{{ text_color }}] text-font">
  <main class="mx-auto flex min-h-screen max-w-md flex-col items-center px-4 py-12 text-center">
    {% if avatar %}
    <img src="{{ avatar }}" alt="{{ display_name }}" width="96" height="96" class="mb-4 h-24 w-24 rounded-full object-cover" loading="eager" fetchpriority="high">
    {% else %}
    <div class="mb-4 flex h-24 w-24 items-center justify-center rounded-full bg-[{{ button_color }}] text-[{{ button_text_color }}] text-3xl font-bold heading-font" aria-hidden="true">{{ initial }}</div>
    {% endif %}
    <h1 class="heading-font text-2xl font-bold">{{ display_name }}</h1>
    <p class="mt-1 text-sm opacity-75">@{{ username }}</p>
    {% if bio %}
    <p class="mt-4 max-w-sm">{{ bio }}</p>
    {% endif %}
    <nav class="mt-8 flex w-full flex-col gap-3" aria-label="Links">
      {% for link in links %}
      <a href="{{ link.url }}" target="_blank" rel="noopener noreferrer" aria-label="Visit {{ link.title }}" class="link-button button-font flex w-full items-center justify-center gap-2 px-4 py-3 font-medium bg-[{{ button_color }}] text-[{{ button_text_color }}]" style="border-radius: {{ button_rounding }}px;">{% if link.icon_url %}<img src="{{ link.icon_url }}" alt="" width="20" height="20" class="h-5 w-5" loading="lazy" aria-hidden="true">{% endif %}<span>{{ link.title }}</span></a>
      {% endfor %}
    </nav>
    <footer class="mt-auto pt-12 text-xs opacity-60">
      <p>Made with <a href="{{ home_url }}" class="underline">linkpage</a></p>
    </footer>
  </main>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn renders_with_minimal_context() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_page(context! {
                display_name => "Ada",
                username => "ada",
                links => Vec::<Value>::new(),
            })
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ada | Links</title>"));
        assert!(html.contains("<nav class=\"mt-8 flex w-full flex-col gap-3\" aria-label=\"Links\">\n    </nav>"));
    }

    #[test]
    fn block_tags_leave_no_blank_lines() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_page(context! {
                display_name => "Ada",
                json_ld => "{}",
                styles => ".text-font {}",
                links => Vec::<Value>::new(),
            })
            .unwrap();

        assert!(!html.contains("\n\n"));
    }
}
