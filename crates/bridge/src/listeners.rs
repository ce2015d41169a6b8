use std::path::Path;

use tracing::debug;

use crate::HostMessage;

type Handler<S> = Box<dyn FnMut(&mut S)>;
type TextHandler<S> = Box<dyn FnMut(&mut S, &str)>;
type PathHandler<S> = Box<dyn FnMut(&mut S, &Path)>;

/// UI-side handler table, one slot per host channel.
///
/// Registering again replaces the previous handler.
pub struct UiListeners<S> {
    clear_all: Option<Handler<S>>,
    toggle_dark_mode: Option<Handler<S>>,
    swap_panels: Option<Handler<S>>,
    show_history: Option<Handler<S>>,
    clear_history: Option<Handler<S>>,
    load_html: Option<TextHandler<S>>,
    request_markdown_content: Option<PathHandler<S>>,
}

impl<S> Default for UiListeners<S> {
    fn default() -> Self {
        Self {
            clear_all: None,
            toggle_dark_mode: None,
            swap_panels: None,
            show_history: None,
            clear_history: None,
            load_html: None,
            request_markdown_content: None,
        }
    }
}

impl<S> UiListeners<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_clear_all(&mut self, handler: impl FnMut(&mut S) + 'static) -> &mut Self {
        self.clear_all = Some(Box::new(handler));
        self
    }

    pub fn on_toggle_dark_mode(&mut self, handler: impl FnMut(&mut S) + 'static) -> &mut Self {
        self.toggle_dark_mode = Some(Box::new(handler));
        self
    }

    pub fn on_swap_panels(&mut self, handler: impl FnMut(&mut S) + 'static) -> &mut Self {
        self.swap_panels = Some(Box::new(handler));
        self
    }

    pub fn on_show_history(&mut self, handler: impl FnMut(&mut S) + 'static) -> &mut Self {
        self.show_history = Some(Box::new(handler));
        self
    }

    pub fn on_clear_history(&mut self, handler: impl FnMut(&mut S) + 'static) -> &mut Self {
        self.clear_history = Some(Box::new(handler));
        self
    }

    pub fn on_load_html(&mut self, handler: impl FnMut(&mut S, &str) + 'static) -> &mut Self {
        self.load_html = Some(Box::new(handler));
        self
    }

    pub fn on_request_markdown_content(
        &mut self,
        handler: impl FnMut(&mut S, &Path) + 'static,
    ) -> &mut Self {
        self.request_markdown_content = Some(Box::new(handler));
        self
    }

    /// Runs the handler for `message`. Returns `false` when none is registered.
    pub fn dispatch(&mut self, state: &mut S, message: &HostMessage) -> bool {
        let handled = match message {
            HostMessage::ClearAll => call(&mut self.clear_all, state),
            HostMessage::ToggleDarkMode => call(&mut self.toggle_dark_mode, state),
            HostMessage::SwapPanels => call(&mut self.swap_panels, state),
            HostMessage::ShowHistory => call(&mut self.show_history, state),
            HostMessage::ClearHistory => call(&mut self.clear_history, state),
            HostMessage::LoadHtml(content) => match self.load_html.as_mut() {
                Some(handler) => {
                    handler(state, content);
                    true
                }
                None => false,
            },
            HostMessage::RequestMarkdownContent(path) => {
                match self.request_markdown_content.as_mut() {
                    Some(handler) => {
                        handler(state, path);
                        true
                    }
                    None => false,
                }
            }
        };
        if !handled {
            debug!("No listener for {}", message.channel());
        }
        handled
    }
}

fn call<S>(handler: &mut Option<Handler<S>>, state: &mut S) -> bool {
    match handler.as_mut() {
        Some(handler) => {
            handler(state);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Panel {
        input: String,
        dark: bool,
        saved_to: Option<PathBuf>,
    }

    #[test]
    fn unregistered_channels_are_not_handled() {
        let mut listeners = UiListeners::<Panel>::new();
        let mut panel = Panel::default();
        assert!(!listeners.dispatch(&mut panel, &HostMessage::ClearAll));
        assert!(!listeners.dispatch(&mut panel, &HostMessage::LoadHtml("x".into())));
    }

    #[test]
    fn handlers_receive_payloads() {
        let mut listeners = UiListeners::<Panel>::new();
        listeners
            .on_load_html(|panel, html| panel.input = html.to_string())
            .on_toggle_dark_mode(|panel| panel.dark = !panel.dark)
            .on_request_markdown_content(|panel, path| panel.saved_to = Some(path.to_path_buf()));

        let mut panel = Panel::default();
        assert!(listeners.dispatch(&mut panel, &HostMessage::LoadHtml("<h1>A</h1>".into())));
        assert!(listeners.dispatch(&mut panel, &HostMessage::ToggleDarkMode));
        assert!(listeners.dispatch(
            &mut panel,
            &HostMessage::RequestMarkdownContent(PathBuf::from("/tmp/out.md"))
        ));

        assert_eq!(panel.input, "<h1>A</h1>");
        assert!(panel.dark);
        assert_eq!(panel.saved_to, Some(PathBuf::from("/tmp/out.md")));
    }

    #[test]
    fn registering_again_replaces_the_handler() {
        let mut listeners = UiListeners::<Vec<&'static str>>::new();
        listeners.on_clear_all(|log| log.push("first"));
        listeners.on_clear_all(|log| log.push("second"));

        let mut log = Vec::new();
        listeners.dispatch(&mut log, &HostMessage::ClearAll);
        assert_eq!(log, vec!["second"]);
    }
}
