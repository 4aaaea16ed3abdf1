use crate::config::ShellConfig;
use crate::conversation::Transcript;
use crate::markdown::markdown_to_html;
use crate::nav::{NavLink, NavState, PageSet};
use crate::shell::{Intent, Shell};
use crate::storage::open_store;
use crate::theme::{ThemeState, theme_definition};
use crate::types::{Attachment, Message, PageId, Sender, ThemeMode};
use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

// Reports the OS colour scheme and window width, now and on every change.
const ENVIRONMENT_WATCHER: &str = r#"
const query = window.matchMedia('(prefers-color-scheme: dark)');
dioxus.send({ kind: 'appearance', dark: query.matches });
query.addEventListener('change', (e) => dioxus.send({ kind: 'appearance', dark: e.matches }));
const report = () => dioxus.send({ kind: 'viewport', width: window.innerWidth });
report();
window.addEventListener('resize', report);
"#;

const SCROLL_TO_BOTTOM: &str = r#"
const history = document.getElementById('chat-history');
if (history) { history.scrollTop = history.scrollHeight; }
"#;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum EnvironmentEvent {
    Appearance { dark: bool },
    Viewport { width: f64 },
}

fn build_shell() -> Shell {
    let config = ShellConfig::from_env();
    let store = open_store(config.storage_dir.as_deref());
    let mut shell = Shell::with_mock_backend(&config, store);
    shell.init();
    shell
}

fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

async fn collect_attachments(files: Option<Arc<dyn FileEngine>>) -> Vec<Attachment> {
    let Some(engine) = files else {
        return Vec::new();
    };
    let mut attachments = Vec::new();
    for name in engine.files() {
        let size_bytes = engine.file_size(&name).await.unwrap_or_default();
        attachments.push(Attachment::new(name, size_bytes));
    }
    attachments
}

fn theme_glyph(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "☀",
        ThemeMode::Dark => "☾",
        ThemeMode::System => "◐",
    }
}

fn theme_hint(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::System => "Following your system appearance.",
        ThemeMode::Light => "Always light.",
        ThemeMode::Dark => "Always dark.",
    }
}

#[component]
pub fn App() -> Element {
    let mut shell = use_signal(build_shell);
    let mut theme = use_signal(|| shell.peek().theme().state());
    let mut nav = use_signal(|| shell.peek().nav().state());
    let mut transcript = use_signal(|| shell.peek().transcript());

    use_future(move || async move {
        let mut rx = shell.peek().subscribe_theme();
        while rx.changed().await.is_ok() {
            let state = *rx.borrow_and_update();
            theme.set(state);
        }
    });
    use_future(move || async move {
        let mut rx = shell.peek().subscribe_nav();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            nav.set(state);
        }
    });
    use_future(move || async move {
        let mut rx = shell.peek().subscribe_transcript();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            transcript.set(state);
        }
    });
    use_future(move || async move {
        let mut watcher = document::eval(ENVIRONMENT_WATCHER);
        while let Ok(event) = watcher.recv::<EnvironmentEvent>().await {
            let intent = match event {
                EnvironmentEvent::Appearance { dark } => {
                    Intent::SystemThemeChanged { prefers_dark: dark }
                }
                EnvironmentEvent::Viewport { width } => Intent::ViewportResized { width_px: width },
            };
            shell.write().dispatch(intent);
        }
    });

    let definition = theme_definition(theme().dark);

    rsx! {
        style { dangerous_inner_html: "{SHELL_CSS}" }
        style { dangerous_inner_html: "{definition.css}" }
        div { class: "{definition.body_class}",
            Sidebar { shell, nav_state: nav() }
            main { class: "main",
                Header { shell, nav: nav(), theme: theme() }
                ChatPage { shell, visible: nav().is_page_visible(PageId::Chat), transcript }
                StaticPage {
                    visible: nav().is_page_visible(PageId::Explore),
                    page: PageId::Explore,
                    body: "Discover prompts and ideas to start a conversation.",
                }
                StaticPage {
                    visible: nav().is_page_visible(PageId::History),
                    page: PageId::History,
                    body: "Your recent conversations will appear here.",
                }
                SettingsPage { shell, visible: nav().is_page_visible(PageId::Settings), theme: theme() }
            }
        }
    }
}

#[component]
fn Sidebar(shell: Signal<Shell>, nav_state: NavState) -> Element {
    let mut shell = shell;
    let pages: PageSet = shell.peek().nav().pages().clone();
    let links: Vec<NavLink> = pages.links.clone();
    let open_class = if nav_state.sidebar_open { "open" } else { "" };
    let settings_active = nav_state.is_page_visible(PageId::Settings);
    rsx! {
        aside { class: "sidebar {open_class}",
            nav { class: "nav",
                for link in links {
                    NavLinkItem {
                        shell,
                        page: link.page,
                        label: link.label.clone(),
                        active: nav_state.is_link_active(&pages, link.page),
                    }
                }
            }
            a {
                class: if settings_active { "settings-link current" } else { "settings-link" },
                href: "#",
                onclick: move |evt| {
                    evt.prevent_default();
                    shell.write().dispatch(Intent::PageRequested(PageId::Settings));
                },
                "⚙ Settings"
            }
        }
    }
}

#[component]
fn NavLinkItem(shell: Signal<Shell>, page: PageId, label: String, active: bool) -> Element {
    let mut shell = shell;
    rsx! {
        a {
            class: if active { "nav-link active" } else { "nav-link" },
            href: "#",
            "data-page": "{page}",
            onclick: move |evt| {
                evt.prevent_default();
                shell.write().dispatch(Intent::PageRequested(page));
            },
            span { "{label}" }
        }
    }
}

#[component]
fn Header(shell: Signal<Shell>, nav: NavState, theme: ThemeState) -> Element {
    let mut shell = shell;
    rsx! {
        header { class: "header",
            button {
                class: "menu-btn",
                r#type: "button",
                title: "Toggle sidebar",
                onclick: move |_| {
                    shell.write().dispatch(Intent::SidebarToggled);
                },
                "☰"
            }
            h1 { class: "page-title", "{nav.title}" }
            ThemeSwitcher { shell, theme }
        }
    }
}

#[component]
fn ThemeSwitcher(shell: Signal<Shell>, theme: ThemeState) -> Element {
    let mut shell = shell;
    rsx! {
        div { class: "theme-switcher",
            for mode in ThemeMode::ALL {
                button {
                    class: if theme.mode == mode { "theme-option active" } else { "theme-option" },
                    r#type: "button",
                    "data-theme": "{mode}",
                    onclick: move |_| {
                        shell.write().dispatch(Intent::ThemeChosen(mode));
                    },
                    {theme_glyph(mode)}
                }
            }
        }
    }
}

#[component]
fn ChatPage(shell: Signal<Shell>, visible: bool, transcript: Signal<Transcript>) -> Element {
    let mut shell = shell;
    let mut draft = use_signal(String::new);
    let mut dragging = use_signal(|| false);

    use_effect(move || {
        let _revision = transcript().scroll_revision;
        let _ = document::eval(SCROLL_TO_BOTTOM);
    });

    let snapshot = transcript();

    rsx! {
        section {
            id: "page-chat",
            class: if visible { "page active" } else { "page hidden" },
            div { id: "chat-history", class: "chat-history",
                for msg in snapshot.messages.iter() {
                    ChatMessageRow { key: "{msg.id.0}", message: msg.clone() }
                }
            }
            div {
                class: if dragging() { "drop-zone dragover" } else { "drop-zone" },
                ondragover: move |evt| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| dragging.set(false),
                ondrop: move |evt| async move {
                    evt.prevent_default();
                    dragging.set(false);
                    let files = collect_attachments(evt.files()).await;
                    shell.write().dispatch(Intent::FilesAttached(files));
                },
                form {
                    class: "composer",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        let text = draft();
                        shell.write().dispatch(Intent::MessageSubmitted(text));
                        draft.set(shell.peek().conversation().draft().to_string());
                    },
                    label { class: "attach-btn", r#for: "file-input", title: "Attach files", "📎" }
                    input {
                        id: "file-input",
                        class: "hidden",
                        r#type: "file",
                        multiple: true,
                        onchange: move |evt| async move {
                            let files = collect_attachments(evt.files()).await;
                            shell.write().dispatch(Intent::FilesAttached(files));
                        },
                    }
                    input {
                        id: "chat-input",
                        r#type: "text",
                        autocomplete: "off",
                        placeholder: "Enter a prompt here",
                        value: "{draft}",
                        oninput: move |evt| {
                            let value = evt.value();
                            draft.set(value.clone());
                            shell.write().dispatch(Intent::DraftEdited(value));
                        },
                    }
                    button { class: "send-btn", r#type: "submit", "➤" }
                }
            }
        }
    }
}

#[component]
fn ChatMessageRow(message: Message) -> Element {
    let sender = message.sender.as_str();
    let timestamp = format_message_timestamp(message.created_at);
    let body = match message.sender {
        Sender::Ai if message.placeholder => rsx! {
            p { class: "thinking", "{message.text}" }
        },
        Sender::Ai => rsx! {
            AiBubble { content: message.text.clone() }
        },
        Sender::User => rsx! {
            p { "{message.text}" }
        },
    };
    rsx! {
        div { class: "chat-message {sender}",
            div { class: "message-content",
                {body}
            }
            if let Some(ts) = timestamp {
                span { class: "message-timestamp", "{ts}" }
            }
        }
    }
}

#[component]
fn AiBubble(content: String) -> Element {
    let content_html = markdown_to_html(&content);
    let copy_payload = content.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                match arboard::Clipboard::new() {
                    Ok(mut cb) => {
                        if let Err(err) = cb.set_text(raw) {
                            tracing::warn!(%err, "clipboard write failed");
                        }
                    }
                    Err(err) => tracing::warn!(%err, "clipboard unavailable"),
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            {
                let _ = raw;
            }
        });
    };

    rsx! {
        div { class: "md", dangerous_inner_html: "{content_html}" }
        button { class: "action-btn", title: "Copy", onclick: on_copy, "Copy" }
    }
}

#[component]
fn SettingsPage(shell: Signal<Shell>, visible: bool, theme: ThemeState) -> Element {
    rsx! {
        section {
            id: "page-settings",
            class: if visible { "page active" } else { "page hidden" },
            div { class: "settings-section",
                h3 { class: "section-title", "Theme" }
                ThemeSwitcher { shell, theme }
                p { class: "text-muted", {theme_hint(theme.mode)} }
            }
        }
    }
}

#[component]
fn StaticPage(visible: bool, page: PageId, body: &'static str) -> Element {
    rsx! {
        section {
            id: "page-{page}",
            class: if visible { "page active" } else { "page hidden" },
            p { class: "text-muted", "{body}" }
        }
    }
}

const SHELL_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; }
.shell { display: flex; height: 100vh; }
.sidebar { width: 240px; padding: 1rem; background: var(--color-bg-secondary); display: flex; flex-direction: column; justify-content: space-between; }
.nav { display: flex; flex-direction: column; gap: 0.25rem; }
.nav-link, .settings-link { padding: 0.5rem 0.75rem; border-radius: 999px; color: inherit; text-decoration: none; }
.nav-link.active, .settings-link.current { background: var(--color-chat-user-bg); color: var(--color-accent); }
.main { flex: 1; display: flex; flex-direction: column; min-width: 0; }
.header { display: flex; align-items: center; gap: 1rem; padding: 0.75rem 1rem; border-bottom: 1px solid var(--color-border); }
.page-title { flex: 1; font-size: 1.1rem; margin: 0; }
.menu-btn { display: none; }
.theme-option { background: none; border: 1px solid var(--color-border); color: inherit; border-radius: 6px; padding: 0.25rem 0.5rem; }
.theme-option.active { border-color: var(--color-accent); color: var(--color-accent); }
.page { flex: 1; display: flex; flex-direction: column; min-height: 0; padding: 1rem; }
.page.hidden, .hidden { display: none; }
.chat-history { flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 0.75rem; }
.chat-message { max-width: 75%; }
.chat-message.user { align-self: flex-end; }
.chat-message.user .message-content { background: var(--color-chat-user-bg); border-radius: 12px; padding: 0.5rem 0.75rem; }
.chat-message.ai { align-self: flex-start; }
.thinking { color: var(--color-text-muted); font-style: italic; }
.message-timestamp { font-size: 0.75rem; color: var(--color-text-muted); }
.drop-zone { border: 1px dashed transparent; border-radius: 12px; margin-top: 0.5rem; }
.drop-zone.dragover { border-color: var(--color-accent); background: var(--color-dropzone); }
.composer { display: flex; gap: 0.5rem; align-items: center; padding: 0.5rem; }
.composer input[type=text] { flex: 1; padding: 0.6rem 0.9rem; border-radius: 999px; border: 1px solid var(--color-border); background: transparent; color: inherit; }
.attach-btn, .send-btn, .action-btn { cursor: pointer; background: none; border: none; color: inherit; }
.text-muted { color: var(--color-text-muted); }
@media (max-width: 768px) {
    .menu-btn { display: inline-block; }
    .sidebar { position: fixed; inset: 0 auto 0 0; z-index: 10; transform: translateX(-100%); transition: transform 0.2s; }
    .sidebar.open { transform: translateX(0); }
}
"#;
