use crate::storage::{KeyValueStore, THEME_KEY};
use crate::types::ThemeMode;
use std::sync::Arc;
use tokio::sync::watch;

/// Resolved theme: the chosen mode plus the appearance it yields right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub dark: bool,
}

/// Resolves and persists the theme choice, following the OS preference
/// while the stored mode is `system`.
pub struct ThemePreference {
    store: Arc<dyn KeyValueStore>,
    system_dark: bool,
    state: watch::Sender<ThemeState>,
}

impl ThemePreference {
    pub fn new(store: Arc<dyn KeyValueStore>, system_dark: bool) -> Self {
        let (state, _) = watch::channel(ThemeState {
            mode: ThemeMode::System,
            dark: system_dark,
        });
        Self {
            store,
            system_dark,
            state,
        }
    }

    pub fn init(&mut self) {
        let mode = self.get_stored();
        self.apply(mode);
    }

    /// Persisted mode, `System` when missing or unreadable as a mode.
    pub fn get_stored(&self) -> ThemeMode {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                tracing::debug!(%err, "stored theme is not a mode, using system");
                ThemeMode::System
            }),
            Ok(None) => ThemeMode::System,
            Err(err) => {
                let fallback = self.state.borrow().mode;
                tracing::warn!(%err, %fallback, "theme read failed, using in-memory mode");
                fallback
            }
        }
    }

    pub fn apply(&mut self, mode: ThemeMode) {
        let dark = match mode {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => self.system_dark,
        };
        self.state.send_replace(ThemeState { mode, dark });

        // `system` is written too, so a later OS change can tell it apart from an explicit choice.
        if let Err(err) = self.store.set(THEME_KEY, mode.as_str()) {
            tracing::warn!(%err, %mode, "theme write failed, keeping in-memory mode");
        }
    }

    pub fn choose(&mut self, mode: ThemeMode) {
        tracing::debug!(%mode, "theme chosen");
        self.apply(mode);
    }

    pub fn on_system_preference_changed(&mut self, prefers_dark: bool) {
        self.system_dark = prefers_dark;
        if self.get_stored() == ThemeMode::System {
            self.apply(ThemeMode::System);
        }
    }

    pub fn system_dark(&self) -> bool {
        self.system_dark
    }

    pub fn state(&self) -> ThemeState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.state.subscribe()
    }
}

pub struct ThemeDefinition {
    pub css: &'static str,
    pub body_class: &'static str,
}

pub fn theme_definition(dark: bool) -> ThemeDefinition {
    if dark {
        ThemeDefinition {
            css: DARK_THEME,
            body_class: "shell dark",
        }
    } else {
        ThemeDefinition {
            css: LIGHT_THEME,
            body_class: "shell",
        }
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #131314;
    --color-bg-secondary: #1e1f20;
    --color-text-primary: #e3e3e3;
    --color-text-muted: #9aa0a6;
    --color-border: #3c4043;
    --color-accent: #8ab4f8;
    --color-chat-user-bg: #2b2c2f;
    --color-chat-ai-bg: transparent;
    --color-dropzone: rgba(138, 180, 248, 0.12);
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f0f4f9;
    --color-text-primary: #1f1f1f;
    --color-text-muted: #5f6368;
    --color-border: #dadce0;
    --color-accent: #0b57d0;
    --color-chat-user-bg: #e9eef6;
    --color-chat-ai-bg: transparent;
    --color-dropzone: rgba(11, 87, 208, 0.08);
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;
