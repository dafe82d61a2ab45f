use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use respond::QuickAction;

use crate::{
    config::ChatConfig,
    model::{ChatConversation, ChatMessage, MessageId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeState {
    Idle,
    Composing,
}

#[derive(Debug, Default)]
struct ComposeStatus {
    pending: usize,
}

impl ComposeStatus {
    fn state(&self) -> ComposeState {
        if self.pending == 0 {
            ComposeState::Idle
        } else {
            ComposeState::Composing
        }
    }
}

#[derive(Debug)]
struct PendingReply {
    prompt: String,
    reply_to: MessageId,
}

/// Owns one chat session.
///
/// User messages are appended synchronously by [`ChatController::submit`];
/// replies are produced by a single composer task which waits out the
/// configured delay before each one, so replies keep the order of the
/// messages they answer. Dropping the controller (or calling
/// [`ChatController::shutdown`]) discards any reply that is still pending.
///
/// Must be created from within a tokio runtime.
pub struct ChatController {
    conversation: Arc<Mutex<ChatConversation>>,
    input: String,
    listening: bool,
    queue_tx: mpsc::UnboundedSender<PendingReply>,
    status: Arc<watch::Sender<ComposeStatus>>,
    message_tx: broadcast::Sender<ChatMessage>,
    cancel: CancellationToken,
    composer: Option<JoinHandle<()>>,
}

impl ChatController {
    pub fn new(config: &ChatConfig) -> Self {
        let conversation = Arc::new(Mutex::new(ChatConversation::new()));
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(ComposeStatus::default());
        let status = Arc::new(status);
        let (message_tx, _) = broadcast::channel(100);
        let cancel = CancellationToken::new();

        let composer = tokio::spawn(compose_replies(
            queue_rx,
            conversation.clone(),
            status.clone(),
            message_tx.clone(),
            config.compose_delay(),
            cancel.clone(),
        ));

        Self {
            conversation,
            input: String::new(),
            listening: false,
            queue_tx,
            status,
            message_tx,
            cancel,
            composer: Some(composer),
        }
    }

    /// Returns `None` without touching the conversation when `text` is blank.
    pub fn submit(&mut self, text: &str) -> Option<MessageId> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("Discarded blank submission");
            return None;
        }
        if self.cancel.is_cancelled() {
            debug!("Discarded submission after shutdown");
            return None;
        }

        let message = lock(&self.conversation).push_user(trimmed).clone();
        let reply_to = message.id();
        info!("User message #{reply_to}: `{trimmed}`");
        let _ = self.message_tx.send(message);
        self.input.clear();

        self.status.send_modify(|status| status.pending += 1);
        let request = PendingReply {
            prompt: text.to_string(),
            reply_to,
        };
        if self.queue_tx.send(request).is_err() {
            // composer is gone, nothing will ever reply
            self.status.send_modify(|status| status.pending -= 1);
        }

        Some(reply_to)
    }

    pub fn select_suggestion(&mut self, suggestion: &str) -> Option<MessageId> {
        self.submit(suggestion)
    }

    pub fn quick_action(&mut self, action: QuickAction) -> Option<MessageId> {
        self.submit(action.prompt())
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn send_input(&mut self) -> Option<MessageId> {
        let text = std::mem::take(&mut self.input);
        let sent = self.submit(&text);
        if sent.is_none() {
            self.input = text;
        }
        sent
    }

    pub fn toggle_listening(&mut self) -> bool {
        self.listening = !self.listening;
        self.listening
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn state(&self) -> ComposeState {
        self.status.borrow().state()
    }

    pub async fn wait_idle(&self) {
        let mut rx = self.status.subscribe();
        let _ = rx.wait_for(|status| status.pending == 0).await;
    }

    pub fn snapshot(&self) -> Vec<ChatMessage> {
        lock(&self.conversation).messages().to_vec()
    }

    pub fn len(&self) -> usize {
        lock(&self.conversation).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.conversation).is_empty()
    }

    pub fn latest_suggestions(&self) -> Vec<String> {
        lock(&self.conversation).latest_suggestions().to_vec()
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*lock(&self.conversation))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.message_tx.subscribe()
    }

    pub fn shutdown(&mut self) {
        {
            // composer checks the token under this lock before appending
            let _conversation = lock(&self.conversation);
            self.cancel.cancel();
        }
        if let Some(composer) = self.composer.take() {
            composer.abort();
        }
        self.status.send_modify(|status| {
            if status.pending > 0 {
                info!("Dropped {} pending replies on shutdown", status.pending);
            }
            status.pending = 0;
        });
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock(conversation: &Mutex<ChatConversation>) -> MutexGuard<'_, ChatConversation> {
    // appends are all-or-nothing, so a poisoned log is still consistent
    conversation
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn compose_replies(
    mut queue_rx: mpsc::UnboundedReceiver<PendingReply>,
    conversation: Arc<Mutex<ChatConversation>>,
    status: Arc<watch::Sender<ComposeStatus>>,
    message_tx: broadcast::Sender<ChatMessage>,
    delay: Duration,
    cancel: CancellationToken,
) {
    while let Some(PendingReply { prompt, reply_to }) = queue_rx.recv().await {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        let reply = respond::classify(&prompt);
        let message = {
            let mut conversation = lock(&conversation);
            if cancel.is_cancelled() {
                break;
            }
            conversation.push_assistant(reply).clone()
        };
        info!("Replied to #{reply_to} with #{}", message.id());

        let _ = message_tx.send(message);
        status.send_modify(|status| status.pending = status.pending.saturating_sub(1));
    }
    debug!("Composer stopped");
}
