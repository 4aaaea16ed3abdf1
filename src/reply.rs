//! Two-phase reply sequencing.
//!
//! Each accepted submission gets a tokio task that shows the placeholder
//! after the placeholder delay and swaps in the backend's answer once it
//! arrives. Both phases are measured from the submission instant. The final
//! swap never runs before the placeholder phase of the same reply.

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::config::{ReplyPolicy, ReplyTiming};
use crate::conversation::{ConversationController, PendingReply};
use crate::types::ReplyId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::AbortHandle;
use tokio::time::Instant;

pub type SharedConversation = Arc<Mutex<ConversationController>>;

pub fn lock_conversation(
    conversation: &Mutex<ConversationController>,
) -> MutexGuard<'_, ConversationController> {
    conversation.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("conversation lock poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Runs one task per accepted submission and cancels them per the reply policy.
pub struct ReplyDriver {
    conversation: SharedConversation,
    backend: Arc<dyn CompletionBackend>,
    timing: ReplyTiming,
    policy: ReplyPolicy,
    tasks: HashMap<ReplyId, AbortHandle>,
}

impl ReplyDriver {
    pub fn new(
        conversation: SharedConversation,
        backend: Arc<dyn CompletionBackend>,
        timing: ReplyTiming,
        policy: ReplyPolicy,
    ) -> Self {
        Self {
            conversation,
            backend,
            timing,
            policy,
            tasks: HashMap::new(),
        }
    }

    /// Spawns the reply task. Must be called from within a tokio runtime.
    pub fn start(&mut self, pending: PendingReply) -> ReplyId {
        let started = Instant::now();
        self.tasks.retain(|_, handle| !handle.is_finished());
        if self.policy == ReplyPolicy::SingleFlight {
            self.cancel_all();
        }

        let id = pending.id;
        let task = tokio::spawn(run_reply(
            Arc::clone(&self.conversation),
            Arc::clone(&self.backend),
            self.timing,
            pending,
            started,
        ));
        self.tasks.insert(id, task.abort_handle());
        tracing::debug!(reply = id.0, policy = ?self.policy, "reply scheduled");
        id
    }

    pub fn cancel_all(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let mut conversation = lock_conversation(&self.conversation);
        for (id, handle) in self.tasks.drain() {
            handle.abort();
            conversation.cancel(id);
            tracing::debug!(reply = id.0, "reply cancelled");
        }
    }

    pub fn in_flight(&self) -> usize {
        self.tasks
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for ReplyDriver {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

async fn run_reply(
    conversation: SharedConversation,
    backend: Arc<dyn CompletionBackend>,
    timing: ReplyTiming,
    pending: PendingReply,
    started: Instant,
) {
    let id = pending.id;
    let request = CompletionRequest::new(pending.user_input, started);
    let placeholder = async {
        tokio::time::sleep_until(started + timing.placeholder_delay).await;
        lock_conversation(&conversation).show_placeholder(id);
    };
    let (_, completion) = tokio::join!(placeholder, backend.complete(&request));

    let text = match completion {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(reply = id.0, %err, "completion failed");
            format!("⚠️ {err}")
        }
    };
    lock_conversation(&conversation).resolve(id, text);
}
