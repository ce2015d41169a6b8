use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::storage::{write_atomic, StorageError, DARK_MODE_KEY};
use crate::LocalStorage;

pub const WINDOW_STATE_FILE: &str = "window-state.json";
pub const DEFAULT_WINDOW_WIDTH: f64 = 1400.0;
pub const DEFAULT_WINDOW_HEIGHT: f64 = 900.0;
pub const MIN_WINDOW_WIDTH: f64 = 900.0;
pub const MIN_WINDOW_HEIGHT: f64 = 600.0;

#[derive(Debug)]
pub struct PreferencesStore {
    storage: LocalStorage,
    dark_mode: bool,
}

impl PreferencesStore {
    pub fn load(storage: LocalStorage) -> Self {
        let mut store = Self {
            storage,
            dark_mode: false,
        };
        store.dark_mode = store.load_theme();
        store
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn load_theme(&self) -> bool {
        match self.storage.get_item(DARK_MODE_KEY) {
            Ok(value) => value.as_deref().map(str::trim) == Some("true"),
            Err(err) => {
                warn!("Failed to load theme preference: {err}");
                false
            }
        }
    }

    pub fn save_theme(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
        let value = if dark_mode { "true" } else { "false" };
        if let Err(err) = self.storage.set_item(DARK_MODE_KEY, value) {
            error!("Failed to save theme preference: {err}");
        }
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let next = !self.dark_mode;
        self.save_theme(next);
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

fn default_height() -> f64 {
    DEFAULT_WINDOW_HEIGHT
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            x: None,
            y: None,
        }
    }
}

impl WindowBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            x: None,
            y: None,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WindowState {
    bounds: WindowBounds,
}

/// Persists the main window geometry between sessions.
#[derive(Debug)]
pub struct WindowStateKeeper {
    path: PathBuf,
    bounds: WindowBounds,
}

impl WindowStateKeeper {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(WINDOW_STATE_FILE),
            bounds: WindowBounds::default(),
        }
    }

    /// Loads saved bounds, keeping the defaults when the file is missing or malformed.
    pub fn load_window_bounds(&mut self) -> WindowBounds {
        match read_bounds(&self.path) {
            Ok(Some(bounds)) => self.bounds = bounds,
            Ok(None) => {}
            Err(err) => error!("Failed to load window state: {err}"),
        }
        self.bounds
    }

    pub fn save_window_bounds(&mut self, bounds: WindowBounds) {
        if !bounds.is_valid() {
            warn!("Invalid bounds, skipping save");
            return;
        }
        self.bounds = bounds;
        let state = WindowState { bounds };
        let payload = match serde_json::to_string_pretty(&state) {
            Ok(payload) => payload,
            Err(source) => {
                let err = StorageError::Serialize {
                    key: WINDOW_STATE_FILE.to_string(),
                    source,
                };
                error!("Failed to save window state: {err}");
                return;
            }
        };
        if let Err(err) = write_atomic(&self.path, payload.as_bytes()) {
            error!("Failed to save window state: {err}");
        }
    }
}

fn read_bounds(path: &Path) -> Result<Option<WindowBounds>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let state: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            key: WINDOW_STATE_FILE.to_string(),
            source,
        })?;
    let Some(bounds) = state.get("bounds") else {
        return Ok(None);
    };
    let number = |field: &str| bounds.get(field).and_then(serde_json::Value::as_f64);
    // Only the width decides validity; other fields fall back one by one.
    let Some(width) = number("width") else {
        return Ok(None);
    };
    Ok(Some(WindowBounds {
        width,
        height: number("height").unwrap_or(DEFAULT_WINDOW_HEIGHT),
        x: number("x"),
        y: number("y"),
    }))
}
