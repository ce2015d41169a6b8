//! Typed message bridge between the privileged host and the isolated UI.

pub mod channel;
pub mod host;
pub mod listeners;
pub mod message;

pub use channel::{bridge, HostEndpoint, UiEndpoint};
pub use host::{
    open_html_file, quits_when_all_windows_closed, save_markdown_content, saved_file_detail,
    FileIoError, DEFAULT_SAVE_NAME, HTML_EXTENSIONS, MARKDOWN_EXTENSIONS, MAX_OPEN_BYTES,
};
pub use listeners::UiListeners;
pub use message::{HostMessage, UiMessage};
