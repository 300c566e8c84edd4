//! Serve an exported site locally.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::load_config;

/// Directory to serve: `--dir`, or the build output from linkpage.toml.
fn site_dir(config_path: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir,
        None => load_config(config_path)?.build.output,
    };

    if !dir.is_dir() {
        anyhow::bail!(
            "No exported site at {}. Run 'linkpage build' first.",
            dir.display()
        );
    }
    Ok(dir)
}

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let dir = site_dir(config_path, dir)?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    // Profile pages live at /<username>/index.html
    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);
    if open {
        let _ = open::that(format!("http://{}", addr));
    }

    axum::serve(listener, app).await?;

    Ok(())
}
