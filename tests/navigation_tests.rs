//! Integration tests for page switching and the sidebar

use chatshell::PageId;
use chatshell::nav::{NavState, NavigationController, PageSet, Viewport};

fn controller(width_px: f64) -> NavigationController {
    let mut nav = NavigationController::new(PageSet::standard(), Viewport::new(width_px, 768.0));
    nav.init();
    nav
}

fn visible_pages(nav: &NavigationController) -> Vec<PageId> {
    let state = nav.state();
    PageId::ALL
        .into_iter()
        .filter(|page| state.is_page_visible(*page))
        .collect()
}

fn active_links(nav: &NavigationController) -> Vec<PageId> {
    let state = nav.state();
    PageId::ALL
        .into_iter()
        .filter(|page| state.is_link_active(nav.pages(), *page))
        .collect()
}

mod switching_tests {
    use super::*;

    #[test]
    fn test_init_shows_chat() {
        let nav = controller(1280.0);
        assert_eq!(nav.state().active, Some(PageId::Chat));
        assert_eq!(nav.state().title, "Chat");
        assert_eq!(active_links(&nav), vec![PageId::Chat]);
    }

    #[test]
    fn test_every_page_leaves_exactly_one_visible() {
        let mut nav = controller(1280.0);
        for page in PageId::ALL {
            nav.switch_to(page);
            assert_eq!(visible_pages(&nav), vec![page]);

            let expected_links: Vec<PageId> = if page == PageId::Settings {
                Vec::new()
            } else {
                vec![page]
            };
            assert_eq!(active_links(&nav), expected_links);
        }
    }

    #[test]
    fn test_titles_use_link_label_or_fallback() {
        let mut nav = controller(1280.0);
        let expected = [
            (PageId::Chat, "Chat"),
            (PageId::Explore, "Explore"),
            (PageId::History, "History"),
            (PageId::Settings, "Settings"),
        ];
        for (page, title) in expected {
            nav.switch_to(page);
            assert_eq!(nav.state().title, title);
        }
    }

    #[test]
    fn test_snapshot_answers_link_and_visibility_together() {
        let mut nav = controller(1280.0);
        nav.switch_to(PageId::Explore);
        let snapshot = nav.state();
        nav.switch_to(PageId::History);

        let pages = PageSet::standard();
        assert!(snapshot.is_page_visible(PageId::Explore));
        assert!(snapshot.is_link_active(&pages, PageId::Explore));
        assert!(!snapshot.is_link_active(&pages, PageId::History));
        assert!(!NavState::default().is_link_active(&pages, PageId::Chat));
    }

    #[test]
    fn test_switch_to_is_idempotent() {
        let mut nav = controller(1280.0);
        nav.toggle_sidebar();
        nav.switch_to(PageId::History);
        let once = nav.state();
        nav.switch_to(PageId::History);
        assert_eq!(nav.state(), once);
    }
}

mod sidebar_tests {
    use super::*;

    #[test]
    fn test_toggle_does_not_change_page() {
        let mut nav = controller(1280.0);
        nav.switch_to(PageId::Explore);
        nav.toggle_sidebar();
        assert!(nav.state().sidebar_open);
        assert_eq!(nav.state().active, Some(PageId::Explore));
        nav.toggle_sidebar();
        assert!(!nav.state().sidebar_open);
    }

    #[test]
    fn test_navigation_closes_sidebar_on_compact_viewport() {
        let mut nav = controller(768.0);
        nav.toggle_sidebar();
        assert!(nav.state().sidebar_open);

        nav.switch_to(PageId::Settings);
        assert!(!nav.state().sidebar_open);

        // Already closed stays closed.
        nav.switch_to(PageId::Settings);
        assert!(!nav.state().sidebar_open);
    }

    #[test]
    fn test_navigation_keeps_sidebar_on_wide_viewport() {
        let mut nav = controller(1024.0);
        nav.toggle_sidebar();
        nav.switch_to(PageId::History);
        assert!(nav.state().sidebar_open);
    }

    #[test]
    fn test_resize_changes_close_behaviour() {
        let mut nav = controller(1024.0);
        nav.toggle_sidebar();
        nav.set_viewport_width(400.0);
        assert!(nav.viewport().is_compact());
        nav.switch_to(PageId::Chat);
        assert!(!nav.state().sidebar_open);
    }
}

mod subscription_tests {
    use super::*;

    #[test]
    fn test_subscriber_observes_switch() {
        let mut nav = controller(1280.0);
        let mut rx = nav.subscribe();
        nav.switch_to(PageId::Settings);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().active, Some(PageId::Settings));
    }
}
