//! Integration tests for intent dispatch across the three controllers

use chatshell::storage::{KeyValueStore, MemoryStore, THEME_KEY};
use chatshell::{Attachment, Intent, PageId, Shell, ShellConfig, ThemeMode};
use std::sync::Arc;

fn shell_with_store() -> (Arc<MemoryStore>, Shell) {
    let store = Arc::new(MemoryStore::new());
    let mut shell = Shell::with_mock_backend(&ShellConfig::default(), store.clone());
    shell.init();
    (store, shell)
}

mod dispatch_tests {
    use super::*;

    #[test]
    fn test_init_applies_defaults() {
        let (store, shell) = shell_with_store();
        assert_eq!(shell.theme().state().mode, ThemeMode::System);
        assert_eq!(shell.nav().state().active, Some(PageId::Chat));
        assert_eq!(store.get(THEME_KEY).unwrap(), Some("system".to_string()));
        assert!(shell.transcript().is_empty());
    }

    #[test]
    fn test_theme_intents() {
        let (store, mut shell) = shell_with_store();
        shell.dispatch(Intent::SystemThemeChanged { prefers_dark: true });
        assert!(shell.theme().state().dark);

        shell.dispatch(Intent::ThemeChosen(ThemeMode::Light));
        assert!(!shell.theme().state().dark);
        assert_eq!(store.get(THEME_KEY).unwrap(), Some("light".to_string()));

        shell.dispatch(Intent::SystemThemeChanged { prefers_dark: false });
        shell.dispatch(Intent::SystemThemeChanged { prefers_dark: true });
        assert!(!shell.theme().state().dark);
    }

    #[test]
    fn test_navigation_intents() {
        let (_store, mut shell) = shell_with_store();
        shell.dispatch(Intent::ViewportResized { width_px: 500.0 });
        shell.dispatch(Intent::SidebarToggled);
        assert!(shell.nav().state().sidebar_open);
        assert_eq!(shell.nav().state().active, Some(PageId::Chat));

        shell.dispatch(Intent::PageRequested(PageId::Settings));
        let nav = shell.nav().state();
        assert_eq!(nav.active, Some(PageId::Settings));
        assert_eq!(nav.title, "Settings");
        assert!(!nav.sidebar_open);
    }

    #[test]
    fn test_conversation_intents_without_runtime() {
        let (_store, mut shell) = shell_with_store();
        shell.dispatch(Intent::DraftEdited("half a tho".into()));
        assert_eq!(shell.conversation().draft(), "half a tho");

        // Whitespace is rejected before any reply task is spawned.
        assert!(shell.dispatch(Intent::MessageSubmitted("  ".into())).is_none());
        assert_eq!(shell.conversation().draft(), "");

        shell.dispatch(Intent::FilesAttached(vec![Attachment::new("a.txt", 2048)]));
        assert_eq!(shell.transcript().texts(), vec!["📎 Attached: a.txt (2 KB)"]);
    }

    #[test]
    fn test_only_submission_returns_reply_id() {
        let (_store, mut shell) = shell_with_store();
        assert!(shell.dispatch(Intent::SidebarToggled).is_none());
        assert!(shell.dispatch(Intent::ThemeChosen(ThemeMode::Dark)).is_none());
        assert!(shell.dispatch(Intent::FilesAttached(Vec::new())).is_none());
    }
}
