//! Editor server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use linkpage_core::{
    Command, DraftField, EditorSnapshot, EditorState, FieldEvent, ProfileField, UserProfile,
};
use linkpage_render::{Generator, GeneratorConfig, PageFields};
use linkpage_static::load_profile;

use crate::editor_page::editor_page;
use crate::live::{live_client_script, LiveHub, LiveMessage};
use crate::watcher::{ProfileWatcher, WatchEvent};

/// Configuration for the editor server.
#[derive(Debug, Clone)]
pub struct EditorServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Profile file backing the session; watched for changes
    pub profile_path: Option<PathBuf>,

    /// Document generator settings
    pub generator: GeneratorConfig,
}

impl Default for EditorServerConfig {
    fn default() -> Self {
        Self {
            port: 7878,
            host: "127.0.0.1".to_string(),
            open: true,
            profile_path: None,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Failed to load profile: {0}")]
    ProfileError(String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
pub(crate) struct ServerState {
    editor: EditorState,
    generator: Generator,
    live: LiveHub,
}

type SharedState = Arc<RwLock<ServerState>>;

impl ServerState {
    pub(crate) fn new(profile: UserProfile, generator: Generator) -> Self {
        Self {
            editor: EditorState::new(profile),
            generator,
            live: LiveHub::new(),
        }
    }

    fn preview(&self) -> String {
        self.generator.generate(self.editor.profile())
    }

    /// Apply a command and tell connected clients what changed.
    pub(crate) fn apply(&mut self, command: Command) -> bool {
        let toggles_view = matches!(command, Command::ToggleExportView);
        if !self.editor.apply(command) {
            return false;
        }

        if toggles_view {
            self.live.send(LiveMessage::ViewChanged {
                view: self.editor.view(),
            });
        } else {
            self.live.send(LiveMessage::Preview {
                html: self.preview(),
            });
        }
        true
    }

    /// Swap in a profile reloaded from disk.
    pub(crate) fn reload(&mut self, profile: UserProfile) {
        self.editor.replace_profile(profile);
        self.live.send(LiveMessage::Preview {
            html: self.preview(),
        });
        self.live.send(LiveMessage::StateChanged);
    }
}

/// Editor server.
pub struct EditorServer {
    config: EditorServerConfig,
}

impl EditorServer {
    /// Create a new editor server.
    pub fn new(config: EditorServerConfig) -> Self {
        Self { config }
    }

    /// Start the editor server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let profile = match &self.config.profile_path {
            Some(path) if path.exists() => {
                load_profile(path).map_err(|e| ServerError::ProfileError(e.to_string()))?
            }
            Some(path) => {
                tracing::warn!(
                    "Profile {} does not exist yet, starting empty",
                    path.display()
                );
                UserProfile::default()
            }
            None => UserProfile::default(),
        };

        let state = Arc::new(RwLock::new(ServerState::new(
            profile,
            Generator::new(self.config.generator.clone()),
        )));

        // Set up profile watcher
        if let Some(path) = self.config.profile_path.clone() {
            let (watcher, mut rx) =
                ProfileWatcher::new(&path).map_err(|e| ServerError::WatchError(e.to_string()))?;

            let state_clone = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle_watch_event(&state_clone, event).await;
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let app = router(state);

        tracing::info!("Starting editor at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/preview", get(preview_handler))
        .route("/export", get(export_handler))
        .route("/api/state", get(state_handler))
        .route("/api/command", post(command_handler))
        .route("/api/field", post(field_handler))
        .route("/__live", get(ws_handler))
        .route("/__live.js", get(live_script_handler))
        .with_state(state)
}

/// Handle profile file events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::Modified(path) => match load_profile(&path) {
            Ok(profile) => {
                tracing::info!("Profile reloaded: {}", path.display());
                state.write().await.reload(profile);
            }
            Err(e) => {
                tracing::warn!("Keeping current profile: {}", e);
            }
        },
        WatchEvent::Removed(path) => {
            tracing::warn!("Profile removed: {}", path.display());
        }
    }
}

/// Which form a field event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FieldTarget {
    Profile,
    Draft,
}

#[derive(Debug, Deserialize)]
struct FieldRequest {
    target: FieldTarget,
    name: String,
    value: String,
}

/// Handler for the editor page.
async fn index_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    Html(editor_page(&state.generator.config().fonts))
}

/// Handler for the current document.
async fn preview_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Html(state.read().await.preview())
}

/// Handler for downloading the current document.
async fn export_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    let config = state.generator.config();
    let fields = PageFields::new(state.editor.profile(), &config.base_url, true);
    let disposition = format!(
        "attachment; filename=\"{}.html\"",
        fields.username.replace(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_', "_")
    );

    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        state.preview(),
    )
        .into_response()
}

/// Handler for the session snapshot.
async fn state_handler(State(state): State<SharedState>) -> Json<EditorSnapshot> {
    Json(state.read().await.editor.snapshot())
}

/// Handler for typed commands.
async fn command_handler(
    State(state): State<SharedState>,
    Json(command): Json<Command>,
) -> Json<EditorSnapshot> {
    let mut state = state.write().await;
    state.apply(command);
    Json(state.editor.snapshot())
}

/// Handler for raw `{target, name, value}` form events.
async fn field_handler(
    State(state): State<SharedState>,
    Json(request): Json<FieldRequest>,
) -> Response {
    let known = match request.target {
        FieldTarget::Profile => request.name.parse::<ProfileField>().is_ok(),
        FieldTarget::Draft => request.name.parse::<DraftField>().is_ok(),
    };
    if !known {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown field: {}", request.name),
        )
            .into_response();
    }

    let event = FieldEvent::new(request.name, request.value);
    let command = match request.target {
        FieldTarget::Profile => event.into_profile_command(),
        FieldTarget::Draft => event.into_draft_command(),
    };

    // A known field with an unreadable value keeps the previous one
    let mut state = state.write().await;
    if let Some(command) = command {
        state.apply(command);
    }
    Json(state.editor.snapshot()).into_response()
}

/// Handler for the live WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.live.subscribe()
    };

    if !send_message(&mut socket, &LiveMessage::Connected).await {
        return;
    }

    // Forward live messages to the client
    while let Ok(msg) = rx.recv().await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &LiveMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the live client script.
async fn live_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        live_client_script(),
    )
}
