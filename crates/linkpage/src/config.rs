//! Configuration file structure (linkpage.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use linkpage_render::{Escaping, FontTable, GeneratorConfig, DEFAULT_BASE_URL};

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub server: ServerSettings,
    /// Font key to CSS stack overrides
    #[serde(default)]
    pub fonts: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_profiles")]
    pub profiles: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub minify_styles: bool,
    #[serde(default = "default_escape")]
    pub escape: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    pub profile: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            output: default_output(),
            minify_styles: false,
            escape: default_escape(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            profile: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_profiles() -> PathBuf {
    PathBuf::from("profiles")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_escape() -> bool {
    true
}
fn default_port() -> u16 {
    7878
}

impl ConfigFile {
    /// Generator settings described by this file.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            base_url: self.site.base_url.clone(),
            fonts: FontTable::with_overrides(self.fonts.clone()),
            escaping: if self.build.escape {
                Escaping::Html
            } else {
                Escaping::Raw
            },
            minify_styles: self.build.minify_styles,
        }
    }

    /// Make relative paths relative to `base` instead of the working directory.
    fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        self.build.profiles = resolve(self.build.profiles);
        self.build.output = resolve(self.build.output);
        self.server.profile = self.server.profile.map(resolve);
        self
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
///
/// Paths inside the file are taken relative to the file's directory.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let base = path.parent().unwrap_or(Path::new(""));

    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default().resolve_paths(base));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config.resolve_paths(base))
}
