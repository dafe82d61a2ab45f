pub mod config;
pub mod controller;
pub mod logging;
pub mod model;

pub use controller::{ChatController, ComposeState};
pub use model::{ChatConversation, ChatMessage, MessageId, Origin};
