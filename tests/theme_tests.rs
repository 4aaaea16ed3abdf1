//! Integration tests for theme preference resolution and persistence

use chatshell::ThemeMode;
use chatshell::storage::{KeyValueStore, MemoryStore, THEME_KEY};
use chatshell::theme::{ThemePreference, ThemeState};
use std::sync::Arc;

fn preference(system_dark: bool) -> (Arc<MemoryStore>, ThemePreference) {
    let store = Arc::new(MemoryStore::new());
    let prefs = ThemePreference::new(store.clone(), system_dark);
    (store, prefs)
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_apply_then_get_stored_round_trips_every_mode() {
        let (_store, mut prefs) = preference(false);
        for mode in ThemeMode::ALL {
            prefs.apply(mode);
            assert_eq!(prefs.get_stored(), mode);
        }
    }

    #[test]
    fn test_missing_value_defaults_to_system() {
        let (_store, prefs) = preference(false);
        assert_eq!(prefs.get_stored(), ThemeMode::System);
    }

    #[test]
    fn test_init_writes_system_explicitly() {
        let (store, mut prefs) = preference(true);
        prefs.init();
        assert_eq!(store.get(THEME_KEY).unwrap(), Some("system".to_string()));
        assert_eq!(
            prefs.state(),
            ThemeState {
                mode: ThemeMode::System,
                dark: true
            }
        );
    }

    #[test]
    fn test_init_restores_explicit_choice() {
        let (store, mut prefs) = preference(true);
        store.set(THEME_KEY, "light").unwrap();
        prefs.init();
        assert_eq!(prefs.state().mode, ThemeMode::Light);
        assert!(!prefs.state().dark);
    }
}

mod appearance_tests {
    use super::*;

    #[test]
    fn test_explicit_modes_ignore_system_preference() {
        let (_store, mut prefs) = preference(true);
        prefs.choose(ThemeMode::Light);
        assert!(!prefs.state().dark);
        prefs.choose(ThemeMode::Dark);
        assert!(prefs.state().dark);
    }

    #[test]
    fn test_system_mode_follows_os_flips() {
        let (_store, mut prefs) = preference(false);
        prefs.choose(ThemeMode::System);
        assert!(!prefs.state().dark);

        prefs.on_system_preference_changed(true);
        assert!(prefs.state().dark);

        prefs.on_system_preference_changed(false);
        assert!(!prefs.state().dark);
        assert_eq!(prefs.get_stored(), ThemeMode::System);
    }

    #[test]
    fn test_os_flips_do_not_affect_explicit_modes() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let (_store, mut prefs) = preference(false);
            prefs.choose(mode);
            let before = prefs.state();

            prefs.on_system_preference_changed(true);
            prefs.on_system_preference_changed(false);
            prefs.on_system_preference_changed(true);

            assert_eq!(prefs.state(), before);
            assert_eq!(prefs.get_stored(), mode);
        }
    }

    #[test]
    fn test_switching_back_to_system_picks_up_latest_os_value() {
        let (_store, mut prefs) = preference(false);
        prefs.choose(ThemeMode::Light);
        prefs.on_system_preference_changed(true);
        assert!(!prefs.state().dark);

        prefs.choose(ThemeMode::System);
        assert!(prefs.state().dark);
    }
}
