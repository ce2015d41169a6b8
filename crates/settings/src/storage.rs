use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{ConversionHistory, HistoryEntry, MAX_HISTORY};

/// 轉換紀錄的儲存鍵。 / Storage key holding the conversion history.
pub const HISTORY_KEY: &str = "conversionHistory";

/// 深色模式的儲存鍵。 / Storage key holding the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse record {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record {key} is not a list")]
    NotAList { key: String },
    #[error("failed to serialize record {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// 是否為寫入失敗（而非讀取失敗）。 / Whether the failure happened while persisting rather than loading.
    pub fn is_persist_error(&self) -> bool {
        matches!(
            self,
            StorageError::Serialize { .. } | StorageError::Write { .. } | StorageError::CreateDir { .. }
        )
    }
}

/// 以資料夾實作的鍵值儲存，每個鍵一個檔案。 / Directory-backed key/value storage with one file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 讀取鍵值；不存在時回傳 `None`。 / Reads a value, returning `None` when the key was never written.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    /// 寫入鍵值並立即落地。 / Writes a value and flushes it to disk atomically.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        write_atomic(&self.path_for(key), value.as_bytes())
    }

    /// 移除鍵值；若存在則回傳 `true`。 / Removes a value and returns `true` if it existed.
    pub fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Write { path, source }),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

/// 管理轉換紀錄的持久化儲存。 / Provides persistence for the conversion history.
#[derive(Debug)]
pub struct HistoryStore {
    storage: LocalStorage,
    history: ConversionHistory,
}

impl HistoryStore {
    /// 從儲存載入紀錄；任何錯誤都會重設為空清單。 / Loads history, resetting to an empty list on any failure.
    pub fn load(storage: LocalStorage) -> Self {
        let history = match read_history(&storage) {
            Ok(entries) => ConversionHistory::with_entries(MAX_HISTORY, entries),
            Err(err) => {
                warn!("Failed to load conversion history, resetting: {err}");
                ConversionHistory::new(MAX_HISTORY)
            }
        };
        debug!("Loaded {} history entries", history.len());
        Self { storage, history }
    }

    /// 取得內部的紀錄清單。 / Returns the underlying history.
    pub fn history(&self) -> &ConversionHistory {
        &self.history
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.history.get(index)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// 新增紀錄並寫回；寫入失敗只記錄日誌，回傳是否成功。 / Appends an entry and persists it.
    ///
    /// A persist failure is logged and swallowed; the in-memory list stays
    /// authoritative. Returns whether the write reached durable storage.
    pub fn append(&mut self, source_text: &str, result_text: &str, now: i64) -> bool {
        self.history
            .push(HistoryEntry::new(source_text, result_text, now));
        match self.persist() {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to save history: {err}");
                false
            }
        }
    }

    /// 清空紀錄並寫回；記憶體中的清單一定會被清空。 / Clears the history, reporting a persist failure as a warning.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.history.clear();
        self.storage.set_item(HISTORY_KEY, "[]").map_err(|err| {
            error!("Failed to clear history: {err}");
            err
        })
    }

    fn persist(&self) -> Result<(), StorageError> {
        let entries: Vec<&HistoryEntry> = self.history.iter().collect();
        let payload = serde_json::to_string(&entries).map_err(|source| StorageError::Serialize {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        self.storage.set_item(HISTORY_KEY, &payload)
    }
}

fn read_history(storage: &LocalStorage) -> Result<Vec<HistoryEntry>, StorageError> {
    let Some(raw) = storage.get_item(HISTORY_KEY)? else {
        return Ok(Vec::new());
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
    let serde_json::Value::Array(items) = value else {
        return Err(StorageError::NotAList {
            key: HISTORY_KEY.to_string(),
        });
    };
    let total = items.len();
    let entries: Vec<HistoryEntry> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable history entry {index}: {err}");
                None
            }
        })
        .collect();
    if entries.len() < total {
        debug!("Kept {} of {total} stored history entries", entries.len());
    }
    Ok(entries)
}

pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data).map_err(|source| StorageError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
