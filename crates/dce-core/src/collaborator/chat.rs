//! LLM chat collaborator contract.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// One item of a streamed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatChunk {
    Text(String),
    /// The model finished; no further chunks follow.
    Done,
}

pub type ChatStream = BoxStream<'static, Result<ChatChunk>>;

/// Opaque chat transport. It never sees session internals, only messages.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the messages and waits for the full reply.
    async fn get_response(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Sends the messages and yields the reply as it is generated.
    async fn stream_response(&self, messages: &[ChatMessage]) -> Result<ChatStream>;
}
