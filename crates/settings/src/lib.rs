pub mod history;
pub mod paths;
pub mod preferences;
pub mod storage;
mod util;

pub use history::{ConversionHistory, HistoryEntry, MAX_HISTORY, PREVIEW_CHARS};
pub use paths::{resolve_data_dir, DATA_DIR_ENV};
pub use preferences::{
    PreferencesStore, WindowBounds, WindowStateKeeper, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, WINDOW_STATE_FILE,
};
pub use storage::{HistoryStore, LocalStorage, StorageError, DARK_MODE_KEY, HISTORY_KEY};
pub use util::now_ms;
