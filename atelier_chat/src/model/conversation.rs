use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use respond::Reply;

const GREETING: &str = "Hi! I'm your AI fashion assistant. I can help you with design ideas, sizing, fabric selection, and style advice. What would you like to explore today?";
const GREETING_SUGGESTIONS: [&str; 3] = [
    "Show me trending styles",
    "Help me pick colors",
    "Size guide for dresses",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    text: String,
    origin: Origin,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<Vec<String>>,
}

impl ChatMessage {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn suggestions(&self) -> Option<&[String]> {
        self.suggestions.as_deref()
    }
}

/// Append-only log for a single chat session.
#[derive(Debug, Clone, Serialize)]
pub struct ChatConversation {
    messages: Vec<ChatMessage>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for ChatConversation {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatConversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        conversation.push(
            GREETING.to_string(),
            Origin::Assistant,
            Some(GREETING_SUGGESTIONS.iter().map(|x| x.to_string()).collect()),
        );
        conversation
    }

    /// Caller is expected to have rejected blank input already.
    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(text.into(), Origin::User, None)
    }

    pub fn push_assistant(&mut self, reply: Reply) -> &ChatMessage {
        self.push(reply.text, Origin::Assistant, Some(reply.suggestions))
    }

    fn push(
        &mut self,
        text: String,
        origin: Origin,
        suggestions: Option<Vec<String>>,
    ) -> &ChatMessage {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text,
            origin,
            timestamp: Utc::now(),
            suggestions,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Suggestions of the most recent assistant message, if it carried any.
    pub fn latest_suggestions(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|x| !x.is_user())
            .and_then(|x| x.suggestions())
            .unwrap_or_default()
    }
}
