//! # Conversation Session State
//!
//! An owned, per-session state struct: the active document, the ordered
//! conversation, and the feedback map. Handlers receive the session by
//! reference and mutate it explicitly; there is no ambient global state.
//!
//! Feedback keys on the message's session-scoped sequence id, not its
//! content, so two responses with identical text never collide.

use crate::{chunk::estimate_words, providers::completion::ChatMessage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::NavigatorError;

/// The greeting seeded into a fresh conversation after a successful upload.
pub const GREETING: &str =
    "Your RFP is loaded. Ask a question, or generate an Executive Summary or Pipeline Data. \
Remember, this is generative AI and is experimental.";

/// An uploaded document and its extracted text. Immutable once built;
/// replaced wholesale when a new file is uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub name: String,
    pub text: String,
    pub page_count: u32,
    pub word_count: usize,
    /// Set when extraction produced implausibly little text (likely a
    /// scanned, image-only PDF).
    pub short_warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn. Never mutated or deleted after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Session-scoped sequence number, assigned at creation. Stable identity
    /// for feedback votes.
    pub id: u64,
    pub role: Role,
    pub content: String,
}

/// A binary user rating attached to an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Up,
    Down,
}

impl Verdict {
    /// The label written to the audit log.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Up => "Thumbs Up",
            Verdict::Down => "Thumbs Down",
        }
    }
}

/// The conversation lifecycle phase, derived from the session contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    DocumentLoaded,
    Active,
}

/// Per-session state: one document, one conversation, one feedback map.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub document: Option<Document>,
    pub messages: Vec<Message>,
    pub feedback: HashMap<u64, Verdict>,
    next_message_id: u64,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            document: None,
            messages: Vec::new(),
            feedback: HashMap::new(),
            next_message_id: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.document.is_none() {
            Phase::Idle
        } else if self.messages.iter().any(|m| m.role == Role::User) {
            Phase::Active
        } else {
            Phase::DocumentLoaded
        }
    }

    /// Replaces the active document. A conversation is only meaningful
    /// against one document's text, so this always clears prior messages and
    /// feedback before seeding the greeting.
    pub fn load_document(&mut self, document: Document) {
        self.document = Some(document);
        self.messages.clear();
        self.feedback.clear();
        self.push(Role::Assistant, GREETING);
    }

    fn push(&mut self, role: Role, content: impl Into<String>) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message {
            id,
            role,
            content: content.into(),
        });
        id
    }

    /// Appends a user message, returning its id.
    pub fn push_user(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::User, content)
    }

    /// Appends an assistant message, returning its id.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> u64 {
        self.push(Role::Assistant, content)
    }

    pub fn message(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Records a verdict for an assistant message. Re-rating the same
    /// message overwrites the prior verdict.
    pub fn rate(&mut self, message_id: u64, verdict: Verdict) -> Result<(), NavigatorError> {
        match self.message(message_id) {
            Some(m) if m.role == Role::Assistant => {
                self.feedback.insert(message_id, verdict);
                Ok(())
            }
            Some(_) => Err(NavigatorError::Session(format!(
                "message {message_id} is not an assistant response"
            ))),
            None => Err(NavigatorError::Session(format!(
                "unknown message id {message_id}"
            ))),
        }
    }

    /// The trailing window of conversation turns whose cumulative word
    /// estimate fits within `max_context_words`, oldest evicted first. This
    /// is the explicit bound that keeps a long-running multi-turn session
    /// from exceeding the model's input limit.
    pub fn context_window(&self, max_context_words: usize) -> Vec<ChatMessage> {
        let mut budget = max_context_words;
        let mut window: Vec<ChatMessage> = Vec::new();
        for message in self.messages.iter().rev() {
            let words = estimate_words(&message.content);
            if words > budget {
                break;
            }
            budget -= words;
            window.push(ChatMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            });
        }
        window.reverse();
        window
    }
}
