//! Scripted chat assistant.
//!
//! The bot greets the user, then answers every message with a canned reply
//! after a fixed delay. There is no model behind it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use thiserror::Error;
use uuid::Uuid;

/// First message of every conversation.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Replies picked at random.
pub const BOT_REPLIES: [&str; 5] = [
    "I understand. How else can I assist you?",
    "That's interesting! Tell me more about it.",
    "I'm here to help with any questions you have.",
    "Let me know if you need more information on that topic.",
    "I'm processing that information. Is there anything specific you'd like to know?",
];

/// Default delay before the bot answers.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// `HH:MM`, as shown next to the message.
    #[must_use]
    pub fn time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.sender, Sender::User)
    }
}

#[derive(Debug)]
struct Conversation {
    messages: Vec<ChatMessage>,
    pending: usize,
}

/// Shared conversation with the scripted bot.
#[derive(Debug, Clone)]
pub struct ChatService {
    inner: Arc<Mutex<Conversation>>,
    reply_delay: Duration,
}

impl ChatService {
    #[must_use]
    pub fn new(reply_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Conversation {
                messages: vec![ChatMessage::new(GREETING, Sender::Bot)],
                pending: 0,
            })),
            reply_delay,
        }
    }

    /// Post a user message and schedule the bot's reply.
    ///
    /// Must be called within a tokio runtime. Returns the handle of the reply
    /// task.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EmptyMessage`] if `text` is blank.
    pub fn send(&self, text: &str) -> Result<tokio::task::JoinHandle<()>, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        {
            let mut conversation = self.lock();
            conversation.messages.push(ChatMessage::new(text, Sender::User));
            conversation.pending += 1;
        }
        tracing::debug!(len = text.len(), "chat message received");

        let reply = BOT_REPLIES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(BOT_REPLIES[0]);
        let inner = Arc::clone(&self.inner);
        let delay = self.reply_delay;

        Ok(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut conversation = inner.lock().unwrap_or_else(PoisonError::into_inner);
            conversation.messages.push(ChatMessage::new(reply, Sender::Bot));
            conversation.pending = conversation.pending.saturating_sub(1);
        }))
    }

    /// Every message so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }

    /// Whether the bot is still composing a reply.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.lock().pending > 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Conversation> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}
