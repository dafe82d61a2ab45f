mod conversation;

pub use conversation::{ChatConversation, ChatMessage, MessageId, Origin};
