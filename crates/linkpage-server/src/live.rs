//! WebSocket push of regenerated previews.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use linkpage_core::ViewMode;

/// Messages sent to connected editor pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Connection established
    Connected,

    /// Freshly generated document
    Preview {
        /// Complete HTML document
        html: String,
    },

    /// Editor/export panel switched
    ViewChanged { view: ViewMode },

    /// Session replaced from outside the page; refetch `/api/state`
    StateChanged,

    /// Full page reload
    Reload,
}

/// Hub for broadcasting live messages to all connected clients.
#[derive(Debug, Clone)]
pub struct LiveHub {
    sender: broadcast::Sender<LiveMessage>,
}

impl LiveHub {
    /// Create a new live hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: LiveMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to live messages.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side script that keeps the editor page in sync.
///
/// It connects back to the serving host, so it works on any port. Preview
/// documents are only ever placed into a sandboxed iframe's `srcdoc`.
pub fn live_client_script() -> &'static str {
    r#"
(function() {
  'use strict';

  let attempts = 0;
  const maxAttempts = 10;

  function connect() {
    const scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
    const ws = new WebSocket(scheme + location.host + '/__live');

    ws.onopen = function() {
      console.log('[live] Connected');
      attempts = 0;
    };

    ws.onmessage = function(event) {
      const msg = JSON.parse(event.data);

      switch (msg.type) {
        case 'preview':
          window.dispatchEvent(new CustomEvent('linkpage:preview', { detail: msg.html }));
          break;

        case 'view_changed':
          window.dispatchEvent(new CustomEvent('linkpage:view', { detail: msg.view }));
          break;

        case 'state_changed':
          window.dispatchEvent(new CustomEvent('linkpage:state'));
          break;

        case 'reload':
          location.reload();
          break;

        case 'connected':
          console.log('[live] Server acknowledged connection');
          break;
      }
    };

    ws.onclose = function() {
      console.log('[live] Disconnected');
      if (attempts < maxAttempts) {
        attempts++;
        setTimeout(connect, 1000 * attempts);
      }
    };

    ws.onerror = function(e) {
      console.error('[live] WebSocket error:', e);
    };
  }

  connect();
})();
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = LiveHub::new();
        let mut rx = hub.subscribe();

        hub.send(LiveMessage::Preview {
            html: "<!DOCTYPE html>".to_string(),
        });

        match rx.try_recv() {
            Ok(LiveMessage::Preview { html }) => assert_eq!(html, "<!DOCTYPE html>"),
            other => panic!("Expected Preview message, got {:?}", other),
        }
    }

    #[test]
    fn send_without_subscribers_is_harmless() {
        let hub = LiveHub::new();
        hub.send(LiveMessage::Reload);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn serializes_messages() {
        let json = serde_json::to_string(&LiveMessage::ViewChanged {
            view: ViewMode::Export,
        })
        .unwrap();

        assert_eq!(json, r#"{"type":"view_changed","view":"export"}"#);

        let json = serde_json::to_string(&LiveMessage::StateChanged).unwrap();
        assert_eq!(json, r#"{"type":"state_changed"}"#);
    }
}
