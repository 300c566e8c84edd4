//! Initialize a linkpage project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing linkpage...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    scaffold(root, config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'linkpage dev' to start editing.");

    Ok(())
}

/// Write the config file and a sample profile, skipping files that exist
/// unless `overwrite` is set.
fn scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<()> {
    let profiles_dir = root.join("profiles");
    if !profiles_dir.exists() {
        fs::create_dir_all(&profiles_dir).context("Failed to create profiles directory")?;
    }

    write_file(config_path, DEFAULT_CONFIG, overwrite)?;
    write_file(&profiles_dir.join("me.toml"), DEFAULT_PROFILE, overwrite)?;

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# linkpage configuration

[site]
# Origin of canonical profile URLs
base_url = "https://linkpage.me"

[build]
# Profile file, or directory of .toml/.yaml/.json profiles
profiles = "profiles"

# Output directory for exported pages
output = "dist"

# Minify the inline stylesheet
minify_styles = false

# Escape profile text (disable only for trusted input)
escape = true

[server]
port = 7878
profile = "profiles/me.toml"

# Font key overrides, e.g.
# [fonts]
# inter = "'Inter', system-ui, sans-serif"
"#;

const DEFAULT_PROFILE: &str = r##"username = "me"
displayName = "Your Name"
bio = "A short line about you"

[theme]
backgroundColor = "#ffffff"
textColor = "#111827"
buttonColor = "#111827"
buttonTextColor = "#ffffff"
headingFont = "space-grotesk"
textFont = "inter"
buttonRounding = 8

[[links]]
title = "My website"
url = "https://example.com"
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_config_and_profile() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("linkpage.toml");

        scaffold(temp.path(), &config, false).unwrap();

        let parsed: crate::config::ConfigFile =
            toml::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
        assert_eq!(parsed.server.port, 7878);

        let profile =
            linkpage_static::load_profile(&temp.path().join("profiles").join("me.toml")).unwrap();
        assert_eq!(profile.username, "me");
        assert_eq!(profile.links.len(), 1);
        assert_eq!(profile.theme.button_rounding, 8);
    }

    #[test]
    fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("linkpage.toml");
        fs::write(&config, "# mine").unwrap();

        scaffold(temp.path(), &config, false).unwrap();
        assert_eq!(fs::read_to_string(&config).unwrap(), "# mine");

        scaffold(temp.path(), &config, true).unwrap();
        assert!(fs::read_to_string(&config).unwrap().contains("[site]"));
    }

    #[test]
    fn scaffold_in_subdirectory_finds_its_own_profile() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("site");
        fs::create_dir_all(&root).unwrap();
        let config_path = root.join("linkpage.toml");

        scaffold(&root, &config_path, false).unwrap();

        let config = crate::config::load_config(&config_path).unwrap();
        assert_eq!(config.build.profiles, root.join("profiles"));

        let profile_path = config.server.profile.unwrap();
        assert_eq!(profile_path, root.join("profiles").join("me.toml"));
        assert!(linkpage_static::load_profile(&profile_path).is_ok());
    }
}
