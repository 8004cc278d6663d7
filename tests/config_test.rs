//! Integration tests for Settings config loading.
//!
//! The global layer is passed explicitly via `Settings::load_from`, so the
//! user's real `$XDG_CONFIG_HOME/tabtree/tabtree.toml` never leaks in.
//! Every load holds `ENV_LOCK`, because `TABTREE_*` variables are read from
//! the process environment and one test mutates it.

use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use tabtree::config::Settings;
use tabtree::errors::ConfigError;
use tabtree::RenderStyle;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn given_no_config_files_when_load_then_uses_defaults() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings.render, RenderStyle::default());
}

#[test]
fn given_local_config_when_load_then_overrides_specified_glyphs() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let local = r#"
[render]
branch = "|- "
vertical = "|  "
"#;
    fs::write(dir.path().join(".tabtree.toml"), local).unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings.render.branch, "|- ");
    assert_eq!(settings.render.vertical, "|  ");
    assert_eq!(settings.render.last_branch, "└─ ");
}

#[test]
fn given_global_and_local_config_when_load_then_local_wins() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("tabtree.toml");
    fs::write(&global, "[render]\nbranch = \"+- \"\nlast_branch = \"`- \"\n").unwrap();
    fs::write(dir.path().join(".tabtree.toml"), "[render]\nbranch = \"|- \"\n").unwrap();

    let settings = Settings::load_from(Some(&global), Some(dir.path())).expect("load settings");

    assert_eq!(settings.render.branch, "|- ");
    assert_eq!(settings.render.last_branch, "`- ");
}

#[test]
fn given_invalid_local_config_when_load_then_parse_error() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".tabtree.toml"), "[render\nbranch = ").unwrap();

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(".tabtree.toml"));
}

#[test]
fn given_env_override_when_load_then_env_wins() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".tabtree.toml"), "[render]\nblank = \"...\"\n").unwrap();
    std::env::set_var("TABTREE_RENDER__BLANK", "~~~");

    let settings = Settings::load_from(None, Some(dir.path()));
    std::env::remove_var("TABTREE_RENDER__BLANK");

    assert_eq!(settings.expect("load settings").render.blank, "~~~");
}

#[test]
fn given_settings_when_serialized_then_round_trips_through_local_config() {
    let _guard = env_lock();
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.render.branch = "+- ".into();
    fs::write(dir.path().join(".tabtree.toml"), settings.to_toml().unwrap()).unwrap();

    let loaded = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(loaded.render.branch, "+- ");
}
