//! View-state coordination for a chat application shell: theme preference,
//! page navigation, and the conversation transcript with its two-phase
//! simulated reply.

pub mod completion;
pub mod config;
pub mod conversation;
pub mod markdown;
pub mod nav;
pub mod reply;
pub mod shell;
pub mod storage;
pub mod theme;
pub mod types;
#[cfg(feature = "dioxus")]
pub mod ui;

pub use config::{ReplyPolicy, ReplyTiming, ShellConfig};
pub use shell::{Intent, Shell};
pub use types::{Attachment, Message, MessageId, PageId, ReplyId, Sender, ThemeMode};
