use crate::completion::{CompletionBackend, MockBackend};
use crate::config::ShellConfig;
use crate::conversation::{ConversationController, Transcript};
use crate::nav::{NavState, NavigationController, PageSet, Viewport};
use crate::reply::{ReplyDriver, SharedConversation, lock_conversation};
use crate::storage::KeyValueStore;
use crate::theme::{ThemePreference, ThemeState};
use crate::types::{Attachment, PageId, ReplyId, ThemeMode};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Everything the UI can ask the shell to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    ThemeChosen(ThemeMode),
    SystemThemeChanged { prefers_dark: bool },
    PageRequested(PageId),
    SidebarToggled,
    DraftEdited(String),
    MessageSubmitted(String),
    FilesAttached(Vec<Attachment>),
    ViewportResized { width_px: f64 },
}

pub struct Shell {
    theme: ThemePreference,
    nav: NavigationController,
    conversation: SharedConversation,
    replies: ReplyDriver,
}

impl Shell {
    pub fn new(
        config: &ShellConfig,
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        let conversation = Arc::new(Mutex::new(ConversationController::new()));
        let viewport = Viewport {
            compact_breakpoint_px: config.compact_breakpoint_px,
            ..Viewport::default()
        };
        Self {
            theme: ThemePreference::new(store, false),
            nav: NavigationController::new(PageSet::standard(), viewport),
            replies: ReplyDriver::new(
                Arc::clone(&conversation),
                backend,
                config.timing,
                config.policy,
            ),
            conversation,
        }
    }

    /// Shell backed by the mock completion backend.
    pub fn with_mock_backend(config: &ShellConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let backend = Arc::new(MockBackend::new(config.timing.reply_delay));
        Self::new(config, store, backend)
    }

    pub fn init(&mut self) {
        self.theme.init();
        self.nav.init();
        tracing::info!(
            theme = %self.theme.state().mode,
            page = ?self.nav.state().active,
            "shell initialized"
        );
    }

    /// Routes one intent. Returns the reply id when a submission was accepted.
    pub fn dispatch(&mut self, intent: Intent) -> Option<ReplyId> {
        tracing::debug!(?intent, "dispatch");
        match intent {
            Intent::ThemeChosen(mode) => self.theme.choose(mode),
            Intent::SystemThemeChanged { prefers_dark } => {
                self.theme.on_system_preference_changed(prefers_dark)
            }
            Intent::PageRequested(page) => self.nav.switch_to(page),
            Intent::SidebarToggled => self.nav.toggle_sidebar(),
            Intent::DraftEdited(text) => self.conversation().set_draft(text),
            Intent::MessageSubmitted(text) => {
                let pending = self.conversation().submit_text(&text)?;
                return Some(self.replies.start(pending));
            }
            Intent::FilesAttached(files) => self.conversation().attach_files(&files),
            Intent::ViewportResized { width_px } => self.nav.set_viewport_width(width_px),
        }
        None
    }

    pub fn theme(&self) -> &ThemePreference {
        &self.theme
    }

    pub fn nav(&self) -> &NavigationController {
        &self.nav
    }

    pub fn conversation(&self) -> MutexGuard<'_, ConversationController> {
        lock_conversation(&self.conversation)
    }

    pub fn transcript(&self) -> Transcript {
        self.conversation().transcript()
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<ThemeState> {
        self.theme.subscribe()
    }

    pub fn subscribe_nav(&self) -> watch::Receiver<NavState> {
        self.nav.subscribe()
    }

    pub fn subscribe_transcript(&self) -> watch::Receiver<Transcript> {
        self.conversation().subscribe()
    }

    pub fn cancel_replies(&mut self) {
        self.replies.cancel_all();
    }

    pub fn replies_in_flight(&self) -> usize {
        self.replies.in_flight()
    }
}
