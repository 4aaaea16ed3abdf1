use crate::config::DEFAULT_COMPACT_BREAKPOINT_PX;
use crate::types::PageId;
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq)]
pub struct NavLink {
    pub page: PageId,
    pub label: String,
}

/// Pages the shell can show, which of them have a sidebar link, and the
/// titles used for the ones that don't.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSet {
    pub pages: Vec<PageId>,
    pub links: Vec<NavLink>,
    pub fallback_titles: Vec<(PageId, String)>,
    pub default_page: PageId,
}

impl PageSet {
    pub fn standard() -> Self {
        let link = |page, label: &str| NavLink {
            page,
            label: label.to_string(),
        };
        Self {
            pages: PageId::ALL.to_vec(),
            links: vec![
                link(PageId::Chat, "Chat"),
                link(PageId::Explore, "Explore"),
                link(PageId::History, "History"),
            ],
            fallback_titles: vec![(PageId::Settings, "Settings".to_string())],
            default_page: PageId::Chat,
        }
    }

    pub fn link_for(&self, page: PageId) -> Option<&NavLink> {
        self.links.iter().find(|link| link.page == page)
    }

    pub fn title_for(&self, page: PageId) -> Option<&str> {
        self.link_for(page)
            .map(|link| link.label.as_str())
            .or_else(|| {
                self.fallback_titles
                    .iter()
                    .find(|(p, _)| *p == page)
                    .map(|(_, title)| title.as_str())
            })
    }
}

impl Default for PageSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub compact_breakpoint_px: f64,
}

impl Viewport {
    pub fn new(width_px: f64, compact_breakpoint_px: f64) -> Self {
        Self {
            width_px,
            compact_breakpoint_px,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.width_px <= self.compact_breakpoint_px
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, DEFAULT_COMPACT_BREAKPOINT_PX)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavState {
    /// `None` until `init` runs.
    pub active: Option<PageId>,
    pub title: String,
    pub sidebar_open: bool,
}

impl NavState {
    pub fn is_page_visible(&self, page: PageId) -> bool {
        self.active == Some(page)
    }

    /// Whether the sidebar link for `page` is highlighted.
    pub fn is_link_active(&self, pages: &PageSet, page: PageId) -> bool {
        self.is_page_visible(page) && pages.link_for(page).is_some()
    }
}

pub struct NavigationController {
    pages: PageSet,
    viewport: Viewport,
    state: watch::Sender<NavState>,
}

impl NavigationController {
    pub fn new(pages: PageSet, viewport: Viewport) -> Self {
        let (state, _) = watch::channel(NavState::default());
        Self {
            pages,
            viewport,
            state,
        }
    }

    pub fn init(&mut self) {
        self.switch_to(self.pages.default_page);
    }

    pub fn switch_to(&mut self, page: PageId) {
        let title = self.pages.title_for(page).map(str::to_string);
        if title.is_none() {
            tracing::debug!(%page, "no title for page, leaving title unchanged");
        }
        if !self.pages.pages.contains(&page) {
            tracing::debug!(%page, "switching to a page outside the configured set");
        }
        let compact = self.viewport.is_compact();

        self.state.send_modify(|state| {
            state.active = Some(page);
            if let Some(title) = title {
                state.title = title;
            }
            if compact {
                state.sidebar_open = false;
            }
        });
        tracing::debug!(%page, compact, "switched page");
    }

    pub fn toggle_sidebar(&mut self) {
        self.state
            .send_modify(|state| state.sidebar_open = !state.sidebar_open);
    }

    pub fn set_viewport_width(&mut self, width_px: f64) {
        self.viewport.width_px = width_px;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn active_link(&self) -> Option<&NavLink> {
        let active = self.state.borrow().active?;
        self.pages.link_for(active)
    }

    pub fn state(&self) -> NavState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavState> {
        self.state.subscribe()
    }
}
