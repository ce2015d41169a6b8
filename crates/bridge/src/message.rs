use std::path::PathBuf;

/// Messages the host sends to the UI. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    ClearAll,
    ToggleDarkMode,
    SwapPanels,
    ShowHistory,
    ClearHistory,
    LoadHtml(String),
    RequestMarkdownContent(PathBuf),
}

impl HostMessage {
    pub fn channel(&self) -> &'static str {
        match self {
            HostMessage::ClearAll => "clear-all",
            HostMessage::ToggleDarkMode => "toggle-dark-mode",
            HostMessage::SwapPanels => "swap-panels",
            HostMessage::ShowHistory => "show-history",
            HostMessage::ClearHistory => "clear-history",
            HostMessage::LoadHtml(_) => "load-html",
            HostMessage::RequestMarkdownContent(_) => "request-markdown-content",
        }
    }
}

/// Messages the UI sends to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMessage {
    SaveMarkdownContent { path: PathBuf, content: String },
}

impl UiMessage {
    pub fn channel(&self) -> &'static str {
        match self {
            UiMessage::SaveMarkdownContent { .. } => "save-markdown-content",
        }
    }
}
