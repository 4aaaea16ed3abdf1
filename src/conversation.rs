use crate::types::{Attachment, Message, MessageId, ReplyId, Sender};
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::watch;

pub const PLACEHOLDER_TEXT: &str = "Thinking...";

/// Text of the stand-in reply for `user_input`.
pub fn mock_reply(user_input: &str) -> String {
    format!(
        "This is a mocked response for: \"{user_input}\". You would connect your Gemini API here to provide a real answer."
    )
}

pub fn attachment_text(file: &Attachment) -> String {
    format!("📎 Attached: {} ({} KB)", file.name, round_kb(file.size_bytes))
}

/// Nearest whole KiB, halves rounding up.
fn round_kb(size_bytes: u64) -> u64 {
    size_bytes / 1024 + u64::from(size_bytes % 1024 >= 512)
}

fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    pub messages: Vec<Message>,
    /// Bumped on every mutation; the view scrolls to the newest entry when it changes.
    pub scroll_revision: u64,
}

impl Transcript {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }
}

/// A submission accepted by `submit_text`, waiting for its reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReply {
    pub id: ReplyId,
    pub user_input: String,
}

/// Phase of an outstanding reply. Resolved and cancelled replies are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyPhase {
    Pending,
    PlaceholderShown(MessageId),
}

/// Owns the transcript and the compose draft. Placeholders are tracked by
/// message id so overlapping replies only ever remove their own entry.
pub struct ConversationController {
    transcript: watch::Sender<Transcript>,
    replies: HashMap<ReplyId, ReplyPhase>,
    draft: String,
    next_message: u64,
    next_reply: u64,
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationController {
    pub fn new() -> Self {
        let (transcript, _) = watch::channel(Transcript::default());
        Self {
            transcript,
            replies: HashMap::new(),
            draft: String::new(),
            next_message: 1,
            next_reply: 1,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn submit_text(&mut self, raw: &str) -> Option<PendingReply> {
        self.draft.clear();
        let user_input = raw.trim();
        if user_input.is_empty() {
            tracing::trace!("ignoring empty submission");
            return None;
        }

        self.append(Sender::User, user_input.to_string(), false);

        let id = ReplyId(self.next_reply);
        self.next_reply += 1;
        self.replies.insert(id, ReplyPhase::Pending);
        Some(PendingReply {
            id,
            user_input: user_input.to_string(),
        })
    }

    pub fn show_placeholder(&mut self, id: ReplyId) -> Option<MessageId> {
        if self.replies.get(&id) != Some(&ReplyPhase::Pending) {
            return None;
        }
        let message = self.append(Sender::Ai, PLACEHOLDER_TEXT.to_string(), true);
        self.replies.insert(id, ReplyPhase::PlaceholderShown(message));
        Some(message)
    }

    pub fn resolve(&mut self, id: ReplyId, text: impl Into<String>) -> Option<MessageId> {
        if let ReplyPhase::PlaceholderShown(placeholder) = self.replies.remove(&id)? {
            self.remove(placeholder);
        }
        Some(self.append(Sender::Ai, text.into(), false))
    }

    pub fn cancel(&mut self, id: ReplyId) {
        if let Some(ReplyPhase::PlaceholderShown(placeholder)) = self.replies.remove(&id) {
            self.remove(placeholder);
        }
    }

    pub fn attach_files(&mut self, files: &[Attachment]) {
        for file in files {
            self.append(Sender::User, attachment_text(file), false);
        }
    }

    pub fn phase(&self, id: ReplyId) -> Option<ReplyPhase> {
        self.replies.get(&id).copied()
    }

    pub fn outstanding(&self) -> Vec<ReplyId> {
        let mut ids: Vec<ReplyId> = self.replies.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.transcript.subscribe()
    }

    fn append(&mut self, sender: Sender, text: String, placeholder: bool) -> MessageId {
        let id = MessageId(self.next_message);
        self.next_message += 1;
        self.transcript.send_modify(|transcript| {
            transcript.messages.push(Message {
                id,
                sender,
                text,
                created_at: Some(current_time()),
                placeholder,
            });
            transcript.scroll_revision += 1;
        });
        id
    }

    fn remove(&mut self, id: MessageId) {
        self.transcript.send_modify(|transcript| {
            transcript.messages.retain(|message| message.id != id);
            transcript.scroll_revision += 1;
        });
    }
}
