use std::time::Duration;

use school_portal::config::Config;
use school_portal::dashboard::Role;
use school_portal::tui::{Action, ThemeVariant};

#[test]
fn test_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.theme = ThemeVariant::Latte;
    config.default_role = Some(Role::Student);
    config.simulated_load_ms = 0;
    config.keybinds.insert("search".to_string(), "/".to_string());

    let written = config.save(Some(&path)).unwrap();
    assert_eq!(written, path);
    assert!(path.exists());

    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.dashboard_options().load_delay, Duration::ZERO);
    assert_eq!(loaded.runtime_config().binding(Action::Search).to_string(), "/");
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.dashboard_options().load_delay, Duration::from_millis(400));
}

#[test]
fn test_invalid_keybind_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[keybinds]\nquit = \"Hyper+Q\"\nteleport = \"T\"\n").unwrap();

    let runtime = Config::load(Some(&path)).unwrap().runtime_config();
    assert_eq!(runtime.binding(Action::Quit), Action::Quit.default_binding());
}
