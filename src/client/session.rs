use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::transport::RelayTransport;
use crate::classifier::{extract_first_url, render_message_text, Scene, SceneCatalog, Span};
use crate::error::ClientError;

/// Appended when the relay cannot be reached at all.
pub const SEND_FAILURE_TEXT: &str = "Sorry, something went wrong contacting the agent.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Agent,
            text: text.into(),
        }
    }

    pub fn spans(&self) -> Vec<Span> {
        render_message_text(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.ends_with(".mp4") || lower.ends_with(".webm") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// What the "suggested view" panel shows. A scene and a media URL are never
/// highlighted together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Scene(Scene),
    Media(String),
}

impl Highlight {
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            Highlight::Media(url) => Some(MediaKind::from_url(url)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a send was already in flight.
    Ignored,
    Replied,
    Failed,
}

/// A message accepted by [`ChatSession::begin_send`] and waiting for its reply.
#[derive(Debug)]
pub struct PendingSend {
    text: String,
}

impl PendingSend {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Conversation shown in the chat widget.
///
/// Messages are append-only. At most one send is in flight.
#[derive(Debug)]
pub struct ChatSession {
    catalog: Arc<SceneCatalog>,
    messages: Vec<Message>,
    highlight: Highlight,
    sending: bool,
}

impl ChatSession {
    pub fn new(catalog: Arc<SceneCatalog>, greeting: impl Into<String>) -> Self {
        Self {
            catalog,
            messages: vec![Message::agent(greeting)],
            highlight: Highlight::None,
            sending: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Highlight a catalog scene directly. Returns false for unknown ids.
    pub fn select_scene(&mut self, id: &str) -> bool {
        match self.catalog.get(id) {
            Some(scene) => {
                self.highlight = Highlight::Scene(scene.clone());
                true
            }
            None => false,
        }
    }

    /// Send `input` through `transport` and record the exchange.
    pub async fn send(&mut self, transport: &dyn RelayTransport, input: &str) -> SendOutcome {
        let Some(pending) = self.begin_send(input) else {
            return SendOutcome::Ignored;
        };
        let result = transport.send(pending.text()).await;
        self.finish_send(pending, result)
    }

    /// Record the user message and mark the session as sending.
    ///
    /// Returns `None` for blank input or while another send is pending.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        let text = input.trim();
        if text.is_empty() || self.sending {
            return None;
        }

        self.messages.push(Message::user(text));
        self.sending = true;

        if let Some(scene) = self.catalog.detect(text) {
            self.highlight = Highlight::Scene(scene.clone());
        }

        Some(PendingSend {
            text: text.to_string(),
        })
    }

    /// Record the relay's answer for `pending` and clear the sending flag.
    pub fn finish_send(
        &mut self,
        _pending: PendingSend,
        result: Result<String, ClientError>,
    ) -> SendOutcome {
        self.sending = false;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                error!("Failed to reach agent relay: {}", e);
                self.messages.push(Message::agent(SEND_FAILURE_TEXT));
                return SendOutcome::Failed;
            }
        };

        if let Some(url) = extract_first_url(&reply) {
            self.highlight = Highlight::Media(url);
        } else if let Some(scene) = self.catalog.detect(&reply) {
            self.highlight = Highlight::Scene(scene.clone());
        }
        self.messages.push(Message::agent(reply));

        SendOutcome::Replied
    }
}
