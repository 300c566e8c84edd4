//! Profile file loading.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use linkpage_core::UserProfile;

/// Supported profile file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Toml,
    Yaml,
    Json,
}

impl ProfileFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Errors that can occur when loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Unsupported profile format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid profile in {path}: {message}")]
    InvalidProfile { path: String, message: String },
}

/// Parse profile source text in the given format.
pub fn parse_profile(source: &str, format: ProfileFormat) -> Result<UserProfile, String> {
    match format {
        ProfileFormat::Toml => toml::from_str(source).map_err(|e| e.to_string()),
        ProfileFormat::Yaml => serde_yaml::from_str(source).map_err(|e| e.to_string()),
        ProfileFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
    }
}

/// Load a profile from a `.toml`, `.yaml`/`.yml` or `.json` file.
pub fn load_profile(path: &Path) -> Result<UserProfile, LoadError> {
    let format = ProfileFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;

    let source = fs::read_to_string(path).map_err(|e| LoadError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_profile(&source, format).map_err(|message| LoadError::InvalidProfile {
        path: path.display().to_string(),
        message,
    })
}

/// List profile files at `path`: the file itself, or every supported file
/// below a directory, sorted by path.
pub fn discover_profiles(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    if path.is_file() {
        if ProfileFormat::from_path(path).is_none() {
            return Err(LoadError::UnsupportedFormat(path.display().to_string()));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && ProfileFormat::from_path(p).is_some())
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TOML_PROFILE: &str = r##"
username = "ada"
displayName = "Ada Lovelace"
bio = "Analytical engines."

[[links]]
title = "Notes"
url = "https://ada.example/notes"
iconUrl = "https://ada.example/icon.png"

[theme]
backgroundColor = "#000000"
buttonRounding = 16
"##;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(ProfileFormat::from_path(Path::new("a.toml")), Some(ProfileFormat::Toml));
        assert_eq!(ProfileFormat::from_path(Path::new("a.YML")), Some(ProfileFormat::Yaml));
        assert_eq!(ProfileFormat::from_path(Path::new("a.json")), Some(ProfileFormat::Json));
        assert_eq!(ProfileFormat::from_path(Path::new("a.txt")), None);
    }

    #[test]
    fn parses_toml_profile() {
        let profile = parse_profile(TOML_PROFILE, ProfileFormat::Toml).unwrap();

        assert_eq!(profile.display_name, "Ada Lovelace");
        assert_eq!(profile.links.len(), 1);
        assert_eq!(profile.links[0].icon(), Some("https://ada.example/icon.png"));
        assert_eq!(profile.theme.background_color, "#000000");
        assert_eq!(profile.theme.button_rounding, 16);
        assert_eq!(profile.theme.heading_font, "space-grotesk");
    }

    #[test]
    fn parses_yaml_and_json_profiles() {
        let yaml = "username: grace\nlinks:\n  - title: Site\n    url: https://grace.example\n";
        let profile = parse_profile(yaml, ProfileFormat::Yaml).unwrap();
        assert_eq!(profile.username, "grace");
        assert_eq!(profile.links[0].title, "Site");

        let json = r#"{"displayName":"Grace","theme":{"textFont":"lato"}}"#;
        let profile = parse_profile(json, ProfileFormat::Json).unwrap();
        assert_eq!(profile.display_name, "Grace");
        assert_eq!(profile.theme.text_font, "lato");
    }

    #[test]
    fn reports_invalid_profile_with_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_profile(&path).unwrap_err();

        assert!(matches!(err, LoadError::InvalidProfile { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn discovers_supported_files_sorted() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("team")).unwrap();
        fs::write(temp.path().join("b.toml"), "").unwrap();
        fs::write(temp.path().join("a.json"), "{}").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::write(temp.path().join("team").join("c.yaml"), "{}").unwrap();

        let files = discover_profiles(temp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.json", "b.toml", "c.yaml"]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = discover_profiles(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
