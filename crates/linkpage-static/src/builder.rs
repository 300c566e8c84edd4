//! Static export builder.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use rayon::prelude::*;

use linkpage_core::UserProfile;
use linkpage_render::escape::escape;
use linkpage_render::{Escaping, Generator, GeneratorConfig, PageFields};

use crate::loader::{discover_profiles, load_profile, LoadError};

/// Configuration for an export build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Profile file, or directory searched for profile files
    pub profiles: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Document generator settings
    pub generator: GeneratorConfig,

    /// Date stamped into every page (defaults to today)
    pub date: Option<NaiveDate>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            profiles: PathBuf::from("profiles"),
            output_dir: PathBuf::from("dist"),
            generator: GeneratorConfig::default(),
            date: None,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Canonical URL of every page, in build order
    pub urls: Vec<String>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No profiles found in {0}")]
    NoProfiles(String),

    #[error("Duplicate username '{username}' in {first} and {second}")]
    DuplicateUsername {
        username: String,
        first: String,
        second: String,
    },

    #[error("Username '{0}' cannot be used as an output directory")]
    InvalidUsername(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A profile to be exported.
#[derive(Debug)]
struct PageInfo {
    /// Source file path
    source_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    /// Canonical URL of the page
    canonical_url: String,

    profile: UserProfile,
}

/// Static export builder.
pub struct StaticBuilder {
    config: BuildConfig,
    generator: Generator,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let generator = Generator::new(config.generator.clone());
        Self { config, generator }
    }

    /// Build the export tree.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let date = self.config.date.unwrap_or_else(|| Local::now().date_naive());

        let pages = self.discover_pages()?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Render pages in parallel
        let results: Vec<Result<(), BuildError>> = pages
            .par_iter()
            .map(|page| self.build_page(page, date))
            .collect();

        for result in results {
            result?;
        }

        // A lone profile is also the site root
        if let [page] = pages.as_slice() {
            let html = self.generator.render(&page.profile, date);
            fs::write(self.config.output_dir.join("index.html"), html)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        self.generate_sitemap(&pages, date)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            urls: pages.into_iter().map(|p| p.canonical_url).collect(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Load every profile and work out where its page goes.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let files = discover_profiles(&self.config.profiles)?;
        if files.is_empty() {
            return Err(BuildError::NoProfiles(
                self.config.profiles.display().to_string(),
            ));
        }

        let encode = self.config.generator.escaping == Escaping::Html;
        let base_url = self.config.generator.base_url.trim_end_matches('/');
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut pages = Vec::with_capacity(files.len());

        for path in files {
            let profile = load_profile(&path)?;
            let fields = PageFields::new(&profile, base_url, encode);

            if let Some(first) = seen.get(&fields.username) {
                return Err(BuildError::DuplicateUsername {
                    username: fields.username,
                    first: first.display().to_string(),
                    second: path.display().to_string(),
                });
            }

            let segment = fields
                .canonical_url
                .strip_prefix(base_url)
                .unwrap_or(&fields.canonical_url)
                .trim_start_matches('/')
                .to_string();
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\'])
            {
                return Err(BuildError::InvalidUsername(fields.username));
            }

            tracing::debug!("{} -> {}", path.display(), fields.canonical_url);

            seen.insert(fields.username.clone(), path.clone());
            pages.push(PageInfo {
                source_path: path,
                output_path: self.config.output_dir.join(&segment).join("index.html"),
                canonical_url: fields.canonical_url,
                profile,
            });
        }

        Ok(pages)
    }

    /// Render and write a single page.
    fn build_page(&self, page: &PageInfo, date: NaiveDate) -> Result<(), BuildError> {
        let html = self.generator.render(&page.profile, date);

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&page.output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::info!(
            "Built {} -> {}",
            page.source_path.display(),
            page.output_path.display()
        );

        Ok(())
    }

    /// Generate sitemap.xml and robots.txt.
    fn generate_sitemap(&self, pages: &[PageInfo], date: NaiveDate) -> Result<(), BuildError> {
        let lastmod = date.format("%Y-%m-%d");
        let urls: Vec<String> = pages
            .iter()
            .map(|page| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>",
                    escape(&page.canonical_url),
                    lastmod
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml",
            self.config.generator.base_url.trim_end_matches('/')
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn config(profiles: PathBuf, output_dir: PathBuf) -> BuildConfig {
        BuildConfig {
            profiles,
            output_dir,
            date: Some(date()),
            ..Default::default()
        }
    }

    #[test]
    fn builds_single_profile_and_site_root() {
        let temp = tempdir().unwrap();
        let profile = temp.path().join("me.toml");
        let out = temp.path().join("dist");
        fs::write(
            &profile,
            "username = \"Ada\"\ndisplayName = \"Ada\"\n\n[[links]]\ntitle = \"Blog\"\nurl = \"https://ada.example\"\n",
        )
        .unwrap();

        let result = StaticBuilder::new(config(profile, out.clone())).build().unwrap();

        assert_eq!(result.pages, 1);
        assert_eq!(result.urls, vec!["https://linkpage.me/ada"]);

        let page = fs::read_to_string(out.join("ada").join("index.html")).unwrap();
        assert!(page.contains("aria-label=\"Visit Blog\""));
        assert!(page.contains("\"dateModified\": \"2024-01-02\""));

        let root = fs::read_to_string(out.join("index.html")).unwrap();
        assert_eq!(root, page);
    }

    #[test]
    fn builds_directory_with_sitemap_and_robots() {
        let temp = tempdir().unwrap();
        let profiles = temp.path().join("profiles");
        let out = temp.path().join("dist");
        fs::create_dir_all(&profiles).unwrap();
        fs::write(profiles.join("ada.json"), r#"{"username":"ada"}"#).unwrap();
        fs::write(profiles.join("grace.yaml"), "username: grace\n").unwrap();

        let result = StaticBuilder::new(config(profiles, out.clone())).build().unwrap();

        assert_eq!(result.pages, 2);
        assert!(out.join("ada").join("index.html").exists());
        assert!(out.join("grace").join("index.html").exists());
        assert!(!out.join("index.html").exists());

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://linkpage.me/ada</loc>"));
        assert!(sitemap.contains("<loc>https://linkpage.me/grace</loc>"));
        assert!(sitemap.contains("<lastmod>2024-01-02</lastmod>"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://linkpage.me/sitemap.xml"));
    }

    #[test]
    fn empty_username_builds_under_fallback() {
        let temp = tempdir().unwrap();
        let profile = temp.path().join("anon.json");
        fs::write(&profile, "{}").unwrap();
        let out = temp.path().join("dist");

        StaticBuilder::new(config(profile, out.clone())).build().unwrap();

        assert!(out.join("linksuser").join("index.html").exists());
    }

    #[test]
    fn rejects_duplicate_usernames() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.json"), r#"{"username":"Ada"}"#).unwrap();
        fs::write(temp.path().join("b.json"), r#"{"username":"ada"}"#).unwrap();

        let err = StaticBuilder::new(config(temp.path().to_path_buf(), temp.path().join("dist")))
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::DuplicateUsername { .. }));
    }

    #[test]
    fn rejects_traversal_usernames() {
        let temp = tempdir().unwrap();
        let profile = temp.path().join("evil.json");
        fs::write(&profile, r#"{"username":".."}"#).unwrap();

        let err = StaticBuilder::new(config(profile, temp.path().join("dist")))
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::InvalidUsername(_)));
    }

    #[test]
    fn empty_profile_directory_is_an_error() {
        let temp = tempdir().unwrap();

        let err = StaticBuilder::new(config(temp.path().to_path_buf(), temp.path().join("dist")))
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::NoProfiles(_)));
    }
}
