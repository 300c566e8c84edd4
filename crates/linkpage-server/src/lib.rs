//! Live preview editor server for linkpage.
//!
//! Serves a browser editor bound to one editing session. Every applied
//! command regenerates the page and pushes it to connected preview frames
//! over a WebSocket.

pub mod editor_page;
pub mod live;
pub mod server;
pub mod watcher;

pub use live::{LiveHub, LiveMessage};
pub use server::{EditorServer, EditorServerConfig, ServerError};
pub use watcher::{ProfileWatcher, WatchEvent};
