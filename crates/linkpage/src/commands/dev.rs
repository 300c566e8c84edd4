//! Editor server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use linkpage_server::{EditorServer, EditorServerConfig};

use crate::config::load_config;

/// Run the editor server.
pub async fn run(
    config_path: &Path,
    port: Option<u16>,
    profile: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let file_config = load_config(config_path)?;
    let port = port.unwrap_or(file_config.server.port);

    tracing::info!("Starting editor on port {}", port);

    let config = EditorServerConfig {
        port,
        open,
        profile_path: profile.or_else(|| file_config.server.profile.clone()),
        generator: file_config.generator_config(),
        ..Default::default()
    };

    EditorServer::new(config).start().await?;

    Ok(())
}
