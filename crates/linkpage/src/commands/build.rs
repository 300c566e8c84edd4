//! Static export command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use linkpage_render::Escaping;
use linkpage_static::{BuildConfig, StaticBuilder};

use crate::config::{load_config, ConfigFile};

/// Command-line values that take precedence over linkpage.toml.
#[derive(Debug, Default)]
pub struct BuildOverrides {
    pub output: Option<PathBuf>,
    pub minify_styles: Option<bool>,
    pub escape: Option<bool>,
}

fn build_config(file_config: &ConfigFile, overrides: BuildOverrides) -> BuildConfig {
    let mut generator = file_config.generator_config();
    if let Some(minify) = overrides.minify_styles {
        generator.minify_styles = minify;
    }
    if let Some(escape) = overrides.escape {
        generator.escaping = if escape { Escaping::Html } else { Escaping::Raw };
    }

    BuildConfig {
        profiles: file_config.build.profiles.clone(),
        output_dir: overrides
            .output
            .unwrap_or_else(|| file_config.build.output.clone()),
        generator,
        date: None,
    }
}

/// Run the build command.
pub async fn run(config_path: &Path, overrides: BuildOverrides) -> Result<()> {
    tracing::info!("Building pages...");

    let file_config = load_config(config_path)?;
    let config = build_config(&file_config, overrides);

    if config.generator.escaping == Escaping::Raw {
        tracing::warn!("Escaping disabled: profile text is embedded as-is");
    }

    let result = tokio::task::spawn_blocking(move || StaticBuilder::new(config).build()).await??;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    for url in &result.urls {
        tracing::debug!("  {}", url);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let file_config: ConfigFile =
            toml::from_str("[build]\noutput = \"public\"\nescape = true\n").unwrap();

        let config = build_config(
            &file_config,
            BuildOverrides {
                output: Some(PathBuf::from("out")),
                minify_styles: Some(true),
                escape: Some(false),
            },
        );

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.generator.minify_styles);
        assert_eq!(config.generator.escaping, Escaping::Raw);
    }

    #[test]
    fn file_values_apply_without_flags() {
        let file_config: ConfigFile =
            toml::from_str("[build]\nprofiles = \"people\"\noutput = \"public\"\n").unwrap();

        let config = build_config(&file_config, BuildOverrides::default());

        assert_eq!(config.profiles, PathBuf::from("people"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.generator.escaping, Escaping::Html);
    }
}
