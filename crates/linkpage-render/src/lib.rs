//! Static HTML document generator for linkpage profiles.
//!
//! Turns a [`UserProfile`](linkpage_core::UserProfile) into one complete,
//! self-contained HTML page: metadata, JSON-LD, inline theme styles and
//! the link buttons.

pub mod escape;
pub mod fonts;
pub mod generator;
pub mod seo;
pub mod styles;
pub mod templates;

pub use escape::Escaping;
pub use fonts::{FontFace, FontTable, FALLBACK_STACK};
pub use generator::{generate, Generator, GeneratorConfig, RenderError, DEFAULT_BASE_URL};
pub use seo::{canonical_url, PageFields};
