//! Test application initialization
//!
//! Verifies that the app starts with correct defaults and honours the
//! colour environment variables.

use serial_test::serial;
use shelf_tui::app::{AppState, Focus, UiConfig};
use libbookshelf::SortDirection;

#[test]
fn test_app_starts_on_results() {
    let state = AppState::new();

    assert_eq!(state.focus, Focus::Results);
    assert!(!state.should_quit);
    assert!(!state.help_visible);
    assert!(state.error.is_none());
    assert!(state.form.is_none());
}

#[test]
fn test_search_starts_empty_ascending() {
    let state = AppState::new();

    assert_eq!(state.search.input, "");
    assert_eq!(state.search.query, "");
    assert_eq!(state.search.direction, SortDirection::Asc);
}

#[test]
fn test_catalog_view_starts_empty() {
    let state = AppState::new();

    assert!(state.catalog.results.is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.pagination.page(), 1);
    assert_eq!(state.pagination.page_size(), 10);
    assert!(state.selected_book().is_none());
    assert!(state.pending.is_empty());
}

#[test]
fn test_ui_config_from_file_values() {
    let file = libbookshelf::config::UiConfig {
        page_size: 4,
        tick_rate_ms: 250,
    };
    let state = AppState::with_config(UiConfig::from_config(&file));

    assert_eq!(state.config.tick_rate_ms, 250);
    assert_eq!(state.pagination.page_size(), 4);
}

#[test]
#[serial]
fn test_colors_disabled_with_no_color_env() {
    std::env::set_var("NO_COLOR", "1");
    let config = UiConfig::default();
    std::env::remove_var("NO_COLOR");

    assert!(!config.colors_enabled);
}

#[test]
#[serial]
fn test_colors_disabled_with_bookshelf_no_color_env() {
    std::env::set_var("BOOKSHELF_NO_COLOR", "1");
    let config = UiConfig::default();
    std::env::remove_var("BOOKSHELF_NO_COLOR");

    assert!(!config.colors_enabled);
}

#[test]
#[serial]
fn test_config_flag_and_api_url_override() {
    use clap::Parser;
    use shelf_tui::cli::Args;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[ui]\npage_size = 6\n\n[cache]\nttl = \"2m\"\n").unwrap();

    let args = Args::try_parse_from([
        "shelf-tui",
        "--config",
        path.to_str().unwrap(),
        "--api-url",
        "http://127.0.0.1:9000/api",
    ])
    .unwrap();
    let config = args.load_config().unwrap();

    assert_eq!(config.ui.page_size, 6);
    assert_eq!(config.cache_ttl().unwrap(), std::time::Duration::from_secs(120));
    assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api");
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    use clap::Parser;
    use shelf_tui::cli::Args;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let args = Args::try_parse_from(["shelf-tui", "--config", path.to_str().unwrap()]).unwrap();

    let error = args.load_config().unwrap_err();
    assert_eq!(error.exit_code(), 1);
}
