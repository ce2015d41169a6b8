use markdownizr_settings::{
    LocalStorage, PreferencesStore, WindowBounds, WindowStateKeeper, DARK_MODE_KEY,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, WINDOW_STATE_FILE,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn theme_defaults_to_light() {
    let temp = tempdir().expect("tempdir");
    let store = PreferencesStore::load(LocalStorage::new(temp.path()));
    assert!(!store.dark_mode());
}

#[test]
fn theme_toggle_persists_string_flag() {
    let temp = tempdir().expect("tempdir");
    let storage = LocalStorage::new(temp.path());
    let mut store = PreferencesStore::load(storage.clone());

    assert!(store.toggle_dark_mode());
    assert_eq!(
        storage.get_item(DARK_MODE_KEY).expect("read").as_deref(),
        Some("true")
    );

    let reloaded = PreferencesStore::load(storage.clone());
    assert!(reloaded.dark_mode());

    let mut reloaded = reloaded;
    reloaded.save_theme(false);
    assert_eq!(
        storage.get_item(DARK_MODE_KEY).expect("read").as_deref(),
        Some("false")
    );
}

#[test]
fn theme_save_failure_is_swallowed() {
    let temp = tempdir().expect("tempdir");
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "file").expect("write blocker");
    let mut store = PreferencesStore::load(LocalStorage::new(blocker));

    store.save_theme(true);
    assert!(store.dark_mode());
}

#[test]
fn window_bounds_default_when_missing() {
    let temp = tempdir().expect("tempdir");
    let mut keeper = WindowStateKeeper::new(temp.path());
    let bounds = keeper.load_window_bounds();
    assert_eq!(bounds.width, DEFAULT_WINDOW_WIDTH);
    assert_eq!(bounds.height, DEFAULT_WINDOW_HEIGHT);
    assert_eq!(bounds.position(), None);
}

#[test]
fn window_bounds_round_trip() {
    let temp = tempdir().expect("tempdir");
    let mut keeper = WindowStateKeeper::new(temp.path());
    keeper.save_window_bounds(WindowBounds::new(1024.0, 700.0).with_position(10.0, 20.0));

    let raw = fs::read_to_string(temp.path().join(WINDOW_STATE_FILE)).expect("state file");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(parsed["bounds"]["width"], 1024.0);

    let mut reloaded = WindowStateKeeper::new(temp.path());
    let bounds = reloaded.load_window_bounds();
    assert_eq!(bounds.width, 1024.0);
    assert_eq!(bounds.height, 700.0);
    assert_eq!(bounds.position(), Some((10.0, 20.0)));
}

#[test]
fn non_numeric_width_keeps_defaults() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join(WINDOW_STATE_FILE),
        r#"{ "bounds": { "width": "wide", "height": 500 } }"#,
    )
    .expect("write state");

    let mut keeper = WindowStateKeeper::new(temp.path());
    assert_eq!(keeper.load_window_bounds(), WindowBounds::default());
}

#[test]
fn corrupt_state_file_keeps_defaults() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join(WINDOW_STATE_FILE), "{ nope").expect("write state");

    let mut keeper = WindowStateKeeper::new(temp.path());
    assert_eq!(keeper.load_window_bounds(), WindowBounds::default());
}

#[test]
fn invalid_bounds_are_not_saved() {
    let temp = tempdir().expect("tempdir");
    let mut keeper = WindowStateKeeper::new(temp.path());
    keeper.save_window_bounds(WindowBounds::new(f64::NAN, 700.0));
    assert!(!temp.path().join(WINDOW_STATE_FILE).exists());
}

#[test]
fn non_numeric_height_uses_default_height() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join(WINDOW_STATE_FILE),
        r#"{ "bounds": { "width": 1100, "height": "tall", "x": 5, "y": 6 } }"#,
    )
    .expect("write state");

    let mut keeper = WindowStateKeeper::new(temp.path());
    let bounds = keeper.load_window_bounds();
    assert_eq!(bounds.width, 1100.0);
    assert_eq!(bounds.height, DEFAULT_WINDOW_HEIGHT);
    assert_eq!(bounds.position(), Some((5.0, 6.0)));
}
