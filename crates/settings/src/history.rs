use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 歷史紀錄的最大筆數。 / Maximum number of conversions kept in history.
pub const MAX_HISTORY: usize = 10;

/// 預覽文字的字元數上限。 / Number of characters kept in an entry preview.
pub const PREVIEW_CHARS: usize = 100;

/// 單筆轉換紀錄。 / A single past conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(alias = "html")]
    source_text: String,
    #[serde(alias = "markdown")]
    result_text: String,
    #[serde(default)]
    preview: String,
    #[serde(alias = "timestamp", deserialize_with = "deserialize_millis")]
    created_at: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Millis {
    Whole(i64),
    Fractional(f64),
}

/// 接受整數或浮點毫秒。 / Accepts whole or fractional millisecond timestamps.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Millis::deserialize(deserializer)? {
        Millis::Whole(millis) => millis,
        Millis::Fractional(millis) => millis as i64,
    })
}

impl HistoryEntry {
    /// 建立紀錄並計算預覽。 / Creates an entry and derives its preview.
    pub fn new(source_text: impl Into<String>, result_text: impl Into<String>, created_at: i64) -> Self {
        let result_text = result_text.into();
        Self {
            source_text: source_text.into(),
            preview: preview_of(&result_text),
            result_text,
            created_at,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// 建立時間（毫秒）。 / Creation time in milliseconds since the Unix epoch.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// 結果是否超出預覽長度。 / Whether the result is longer than its preview.
    pub fn is_truncated(&self) -> bool {
        self.result_text.chars().count() > PREVIEW_CHARS
    }

    /// 清單顯示用的標籤。 / Label used when listing the entry.
    pub fn list_label(&self) -> String {
        if self.is_truncated() {
            format!("{}...", self.preview)
        } else {
            self.preview.clone()
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = preview_of(&self.result_text);
    }
}

fn preview_of(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// 管理有上限且去重的轉換紀錄。 / Maintains a bounded, deduplicated list of conversions.
#[derive(Debug, Clone)]
pub struct ConversionHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl Default for ConversionHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl ConversionHistory {
    /// 建立指定容量的清單。 / Creates a history list with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// 依序列化資料還原並修正不變量。 / Reconstructs the list from persisted entries, restoring invariants.
    pub fn with_entries(capacity: usize, entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new(capacity);
        for mut entry in entries {
            if history.entries.len() == history.capacity {
                break;
            }
            if history.position_of(&entry.result_text).is_some() {
                continue;
            }
            entry.refresh_preview();
            history.entries.push_back(entry);
        }
        history
    }

    /// 加入新紀錄；相同結果的舊紀錄會被移除。 / Prepends an entry, dropping any older entry with the same result.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries
            .retain(|existing| existing.result_text != entry.result_text);
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// 依索引取得紀錄。 / Returns the entry at `index`, newest first.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// 清空清單。 / Clears all tracked entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 以不可變迭代器取得清單。 / Returns an iterator over the entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// 確認是否為空。 / Checks whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 目前的紀錄數。 / Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn position_of(&self, result_text: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.result_text == result_text)
    }
}
