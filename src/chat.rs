//! Chat session view-model: the ordered message list and the submit flow.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::api::models::{FileSummary, SaveMessageRequest, Sender};

pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("nothing to send")]
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl Attachment {
    pub fn from_path(path: PathBuf) -> std::io::Result<Self> {
        let size = std::fs::metadata(&path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, size, path })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub files: Vec<Attachment>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn to_save_request(&self) -> SaveMessageRequest<'_> {
        SaveMessageRequest {
            kind: self.sender,
            content: &self.content,
            files: self
                .files
                .iter()
                .map(|f| FileSummary { name: f.name.clone(), size: f.size })
                .collect(),
            timestamp: self.timestamp,
        }
    }
}

/// A submitted user turn waiting for the assistant's reply.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user: Message,
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    in_flight: usize,
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let mut session = Self { messages: Vec::new(), in_flight: 0, next_id: 1 };
        session.push(Sender::Assistant, GREETING.to_string(), Vec::new());
        session
    }

    fn push(&mut self, sender: Sender, content: String, files: Vec<Attachment>) -> Message {
        let message = Message {
            id: self.next_id,
            sender,
            content,
            files,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Appends the user's message right away and marks a reply as pending.
    pub fn begin(&mut self, text: &str, files: Vec<Attachment>) -> Result<Turn, ChatError> {
        if text.trim().is_empty() && files.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let user = self.push(Sender::User, text.to_string(), files);
        self.in_flight += 1;
        Ok(Turn { user })
    }

    /// Settles a pending turn with exactly one assistant message.
    pub fn complete<E: std::fmt::Display>(&mut self, reply: Result<String, E>) -> Message {
        self.in_flight = self.in_flight.saturating_sub(1);
        let content = match reply {
            Ok(text) => text,
            Err(e) => {
                log::warn!("chat request failed: {e}");
                ERROR_REPLY.to_string()
            }
        };
        self.push(Sender::Assistant, content, Vec::new())
    }
}

/// Couples a shared [`ChatSession`] with the backend. `begin` runs on the UI
/// thread, `finish` on the async runtime.
#[derive(Debug, Clone)]
pub struct ChatController {
    session: Arc<Mutex<ChatSession>>,
    client: ApiClient,
}

impl ChatController {
    pub fn new(client: ApiClient) -> Self {
        Self { session: Arc::new(Mutex::new(ChatSession::new())), client }
    }

    pub fn session(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.session().messages().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.session().is_loading()
    }

    /// Mirrors `message` to the backend without waiting. Failures are only
    /// logged.
    pub fn persist(&self, message: Message) -> JoinHandle<()> {
        let client = self.client.clone();
        crate::utils::spawn_async(async move {
            if let Err(e) = client.save_message(&message.to_save_request()).await {
                log::warn!("failed to save message {}: {e}", message.id);
            }
        })
    }

    pub fn begin(&self, text: &str, files: Vec<Attachment>) -> Result<Turn, ChatError> {
        let turn = self.session().begin(text, files)?;
        self.persist(turn.user.clone());
        Ok(turn)
    }

    pub async fn finish(&self, turn: Turn) -> Message {
        let reply = self.client.call_api(&turn.user.content).await;
        let assistant = self.session().complete(reply);
        self.persist(assistant.clone());
        assistant
    }

    /// `begin` followed by `finish`, for callers already on the runtime.
    pub async fn submit(&self, text: &str, files: Vec<Attachment>) -> Result<Message, ChatError> {
        let turn = self.begin(text, files)?;
        Ok(self.finish(turn).await)
    }
}
