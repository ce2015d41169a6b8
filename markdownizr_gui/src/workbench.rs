//! Panel state behind the window: input, output, history, toasts and modals.
//!
//! Nothing here touches egui, so the behaviour is testable without a window.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use markdownizr_bridge::{UiListeners, UiMessage};
use markdownizr_convert::{
    preview_blocks, ConversionPipeline, Debouncer, HtmdEngine, MarkdownEngine, Preview, TextStats,
    PASTE_DELAY,
};
use markdownizr_settings::{HistoryStore, LocalStorage, PreferencesStore};
use tracing::{debug, info, warn};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

thread_local! {
    static CONVERTING: Cell<bool> = Cell::new(false);
}

/// Whether a conversion is running on this thread. Engine panics raised
/// there are recovered by the pipeline.
pub fn is_converting() -> bool {
    CONVERTING.with(Cell::get)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    expires_at: Instant,
}

/// Destructive actions that wait for the user to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ClearAll,
    ClearHistory,
}

impl Confirmation {
    pub fn prompt(self) -> &'static str {
        match self {
            Confirmation::ClearAll => "Clear all content?",
            Confirmation::ClearHistory => "Clear all conversion history?",
        }
    }
}

pub struct Workbench<E = HtmdEngine> {
    pub input: String,
    output: String,
    stats: TextStats,
    pipeline: ConversionPipeline<E>,
    history: HistoryStore,
    preferences: PreferencesStore,
    debouncer: Debouncer,
    toast: Option<Toast>,
    confirmation: Option<Confirmation>,
    preview: Option<Preview>,
    pub show_history: bool,
    outbox: Vec<UiMessage>,
}

impl Workbench<HtmdEngine> {
    pub fn open(data_dir: &Path) -> Self {
        let storage = LocalStorage::new(data_dir);
        Self::with_engine(
            HtmdEngine::default(),
            HistoryStore::load(storage.clone()),
            PreferencesStore::load(storage),
        )
    }
}

impl<E: MarkdownEngine> Workbench<E> {
    pub fn with_engine(engine: E, history: HistoryStore, preferences: PreferencesStore) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            stats: TextStats::default(),
            pipeline: ConversionPipeline::new(engine),
            history,
            preferences,
            debouncer: Debouncer::default(),
            toast: None,
            confirmation: None,
            preview: None,
            show_history: false,
            outbox: Vec::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn stats(&self) -> TextStats {
        self.stats
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Input edited; converts after the debounce quiet period.
    pub fn input_changed(&mut self, now: Instant) {
        self.debouncer.schedule(now);
    }

    /// Content pasted into the input; converts almost immediately.
    pub fn pasted(&mut self, now: Instant) {
        self.debouncer.schedule_within(now, PASTE_DELAY);
    }

    /// Runs a due conversion and expires the toast. Returns whether a conversion ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|toast| now >= toast.expires_at) {
            self.toast = None;
        }
        if self.debouncer.poll(now) {
            self.convert();
            return true;
        }
        false
    }

    /// Time until the next scheduled state change, for repaint scheduling.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let toast = self
            .toast
            .as_ref()
            .map(|toast| toast.expires_at.saturating_duration_since(now));
        match (self.debouncer.remaining(now), toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn convert(&mut self) {
        self.debouncer.cancel();
        CONVERTING.with(|flag| flag.set(true));
        let outcome = self.pipeline.run(&self.input, &mut self.history);
        CONVERTING.with(|flag| flag.set(false));
        let failed = !outcome.is_success();
        self.output = outcome.output;
        self.stats = TextStats::of(&self.output);
        if failed {
            self.notify("Conversion failed. Check console for details.", ToastKind::Error);
        }
    }

    pub fn request(&mut self, confirmation: Confirmation) {
        self.confirmation = Some(confirmation);
    }

    pub fn confirm(&mut self) {
        match self.confirmation.take() {
            Some(Confirmation::ClearAll) => self.clear_all(),
            Some(Confirmation::ClearHistory) => self.clear_history(),
            None => {}
        }
    }

    pub fn cancel_confirmation(&mut self) {
        self.confirmation = None;
    }

    pub fn clear_all(&mut self) {
        self.debouncer.cancel();
        self.input.clear();
        self.output.clear();
        self.stats = TextStats::default();
        self.notify("Content cleared", ToastKind::Success);
    }

    pub fn swap_panels(&mut self) {
        std::mem::swap(&mut self.input, &mut self.output);
        self.stats = TextStats::of(&self.output);
        self.notify("Panels swapped!", ToastKind::Success);
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let dark = self.preferences.toggle_dark_mode();
        let label = if dark { "Dark" } else { "Light" };
        self.notify(format!("{label} mode enabled"), ToastKind::Success);
        dark
    }

    /// Text to place on the clipboard, or `None` when the output is blank.
    pub fn copy_output(&mut self) -> Option<String> {
        if self.output.trim().is_empty() {
            self.notify("Nothing to copy!", ToastKind::Error);
            return None;
        }
        self.notify("Markdown copied to clipboard!", ToastKind::Success);
        Some(self.output.clone())
    }

    pub fn open_preview(&mut self) {
        self.preview = Some(preview_blocks(&self.output));
    }

    pub fn open_history(&mut self) {
        self.show_history = true;
    }

    /// Escape closes every open modal.
    pub fn close_modals(&mut self) {
        self.preview = None;
        self.show_history = false;
        self.confirmation = None;
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn load_html(&mut self, content: &str) {
        self.input = content.to_string();
        self.convert();
        self.notify("HTML file loaded", ToastKind::Success);
    }

    pub fn load_from_history(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            warn!("No history entry at {index}");
            return false;
        };
        self.input = entry.source_text().to_string();
        self.output = entry.result_text().to_string();
        self.stats = TextStats::of(&self.output);
        self.debouncer.cancel();
        self.show_history = false;
        self.notify("Loaded from history", ToastKind::Success);
        true
    }

    pub fn clear_history(&mut self) {
        match self.history.clear() {
            Ok(()) => self.notify("History cleared", ToastKind::Success),
            Err(_) => self.notify("Failed to clear history", ToastKind::Error),
        }
    }

    /// Answers the host's save request with the current output.
    pub fn request_markdown_content(&mut self, path: &Path) {
        if self.output.trim().is_empty() {
            self.notify("No content to save", ToastKind::Error);
            return;
        }
        debug!("Sending markdown for {}", path.display());
        self.outbox.push(UiMessage::SaveMarkdownContent {
            path: PathBuf::from(path),
            content: self.output.clone(),
        });
    }

    pub fn take_outbox(&mut self) -> Vec<UiMessage> {
        std::mem::take(&mut self.outbox)
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        let message = message.into();
        info!("{message}");
        self.toast = Some(Toast {
            message,
            kind,
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }
}

/// Wires every host channel to its panel action.
pub fn ui_listeners<E: MarkdownEngine + 'static>() -> UiListeners<Workbench<E>> {
    let mut listeners = UiListeners::new();
    listeners
        .on_clear_all(|bench: &mut Workbench<E>| bench.request(Confirmation::ClearAll))
        .on_toggle_dark_mode(|bench: &mut Workbench<E>| {
            bench.toggle_dark_mode();
        })
        .on_swap_panels(|bench: &mut Workbench<E>| bench.swap_panels())
        .on_show_history(|bench: &mut Workbench<E>| bench.open_history())
        .on_clear_history(|bench: &mut Workbench<E>| bench.request(Confirmation::ClearHistory))
        .on_load_html(|bench: &mut Workbench<E>, content: &str| bench.load_html(content))
        .on_request_markdown_content(|bench: &mut Workbench<E>, path: &Path| {
            bench.request_markdown_content(path)
        });
    listeners
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdownizr_bridge::HostMessage;
    use markdownizr_convert::CONVERSION_FAILED_PLACEHOLDER;
    use std::io;
    use tempfile::{tempdir, TempDir};

    fn workbench() -> (TempDir, Workbench) {
        let dir = tempdir().unwrap();
        let bench = Workbench::open(dir.path());
        (dir, bench)
    }

    #[test]
    fn typing_converts_after_quiet_period() {
        let (_dir, mut bench) = workbench();
        let start = Instant::now();
        bench.input = "<h1>Hi</h1>".into();
        bench.input_changed(start);

        assert!(!bench.tick(start + Duration::from_millis(100)));
        assert!(bench.output().is_empty());
        assert!(bench.tick(start + Duration::from_millis(300)));
        assert_eq!(bench.output().trim(), "# Hi");
        assert_eq!(bench.history().len(), 1);
    }

    #[test]
    fn paste_converts_quickly() {
        let (_dir, mut bench) = workbench();
        let start = Instant::now();
        bench.input = "<p>pasted</p>".into();
        bench.pasted(start);
        assert!(bench.tick(start + Duration::from_millis(10)));
        assert_eq!(bench.output().trim(), "pasted");
    }

    #[test]
    fn failed_conversion_shows_placeholder() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let failing = |_: &str| -> io::Result<String> { Err(io::Error::new(io::ErrorKind::Other, "boom")) };
        let mut bench = Workbench::with_engine(
            failing,
            HistoryStore::load(storage.clone()),
            PreferencesStore::load(storage),
        );
        bench.input = "<p>x</p>".into();
        bench.convert();

        assert_eq!(bench.output(), CONVERSION_FAILED_PLACEHOLDER);
        assert_eq!(bench.toast().map(|toast| toast.kind), Some(ToastKind::Error));
        assert!(bench.history().is_empty());
    }

    #[test]
    fn copy_refuses_blank_output() {
        let (_dir, mut bench) = workbench();
        assert_eq!(bench.copy_output(), None);
        assert_eq!(bench.toast().unwrap().message, "Nothing to copy!");

        bench.input = "<b>bold</b>".into();
        bench.convert();
        assert_eq!(bench.copy_output().as_deref().map(str::trim), Some("**bold**"));
    }

    #[test]
    fn clear_all_waits_for_confirmation() {
        let (_dir, mut bench) = workbench();
        bench.input = "<p>keep</p>".into();
        bench.convert();

        bench.request(Confirmation::ClearAll);
        bench.cancel_confirmation();
        assert_eq!(bench.input, "<p>keep</p>");

        bench.request(Confirmation::ClearAll);
        bench.confirm();
        assert!(bench.input.is_empty());
        assert!(bench.output().is_empty());
        assert_eq!(bench.stats(), TextStats::default());
    }

    #[test]
    fn swap_exchanges_panels() {
        let (_dir, mut bench) = workbench();
        bench.input = "<p>one</p>".into();
        bench.convert();
        bench.swap_panels();
        assert_eq!(bench.input.trim(), "one");
        assert_eq!(bench.output(), "<p>one</p>");
    }

    #[test]
    fn history_entries_reload_both_panels() {
        let (_dir, mut bench) = workbench();
        bench.input = "<p>first</p>".into();
        bench.convert();
        bench.input = "<p>second</p>".into();
        bench.convert();
        bench.open_history();

        assert!(bench.load_from_history(1));
        assert_eq!(bench.input, "<p>first</p>");
        assert_eq!(bench.output().trim(), "first");
        assert!(!bench.show_history);
        assert!(!bench.load_from_history(9));
    }

    #[test]
    fn save_request_needs_output() {
        let (_dir, mut bench) = workbench();
        bench.request_markdown_content(Path::new("out.md"));
        assert!(bench.take_outbox().is_empty());
        assert_eq!(bench.toast().unwrap().message, "No content to save");

        bench.input = "<p>text</p>".into();
        bench.convert();
        bench.request_markdown_content(Path::new("out.md"));
        let outbox = bench.take_outbox();
        assert_eq!(outbox.len(), 1);
        let UiMessage::SaveMarkdownContent { path, content } = &outbox[0];
        assert_eq!(path, Path::new("out.md"));
        assert_eq!(content.trim(), "text");
    }

    #[test]
    fn menu_messages_reach_the_workbench() {
        let (_dir, mut bench) = workbench();
        let mut listeners = ui_listeners();

        assert!(listeners.dispatch(&mut bench, &HostMessage::LoadHtml("<strong>hi</strong>".into())));
        assert_eq!(bench.output().trim(), "**hi**");

        assert!(listeners.dispatch(&mut bench, &HostMessage::ShowHistory));
        assert!(bench.show_history);

        assert!(listeners.dispatch(&mut bench, &HostMessage::ClearHistory));
        assert_eq!(bench.confirmation(), Some(Confirmation::ClearHistory));
        bench.confirm();
        assert!(bench.history().is_empty());
    }

    #[test]
    fn theme_toggle_persists() {
        let dir = tempdir().unwrap();
        {
            let mut bench = Workbench::open(dir.path());
            assert!(!bench.dark_mode());
            assert!(bench.toggle_dark_mode());
            assert_eq!(bench.toast().unwrap().message, "Dark mode enabled");
        }
        assert!(Workbench::open(dir.path()).dark_mode());
    }

    #[test]
    fn escape_closes_everything() {
        let (_dir, mut bench) = workbench();
        bench.open_preview();
        bench.open_history();
        bench.request(Confirmation::ClearHistory);
        bench.close_modals();
        assert!(bench.preview().is_none());
        assert!(!bench.show_history);
        assert!(bench.confirmation().is_none());
    }

    #[test]
    fn toast_expires() {
        let (_dir, mut bench) = workbench();
        bench.notify("hello", ToastKind::Success);
        assert!(bench.next_wakeup(Instant::now()).is_some());
        bench.tick(Instant::now() + TOAST_DURATION + Duration::from_millis(1));
        assert!(bench.toast().is_none());
    }
}
