use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, TimeZone};
use eframe::{egui, App, Frame};
use egui::{Align, Align2, Color32, Key, KeyboardShortcut, Layout, Modifiers, RichText, TextStyle};
use markdownizr_bridge::{
    open_html_file, quits_when_all_windows_closed, save_markdown_content, saved_file_detail,
    HostEndpoint, HostMessage, UiEndpoint, UiListeners, UiMessage, DEFAULT_SAVE_NAME,
    HTML_EXTENSIONS, MARKDOWN_EXTENSIONS,
};
use markdownizr_convert::{InlineSpan, Preview, PreviewBlock, EMPTY_PREVIEW_MESSAGE};
use markdownizr_settings::{WindowBounds, WindowStateKeeper};
use once_cell::sync::Lazy;
use tracing::{debug, error, info};

use crate::workbench::{ui_listeners, Confirmation, ToastKind, Workbench};

pub const APP_TITLE: &str = "Markdownizr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuCommand {
    OpenHtml,
    SaveMarkdown,
    ClearAll,
    Quit,
    ToggleDarkMode,
    SwapPanels,
    ShowHistory,
    ClearHistory,
    About,
}

#[derive(Clone, Copy)]
struct MenuItem {
    label: &'static str,
    shortcut: Option<KeyboardShortcut>,
    command: MenuCommand,
}

impl MenuItem {
    const fn new(label: &'static str, command: MenuCommand) -> Self {
        Self {
            label,
            shortcut: None,
            command,
        }
    }

    fn with_shortcut(mut self, modifiers: Modifiers, key: Key) -> Self {
        self.shortcut = Some(KeyboardShortcut::new(modifiers, key));
        self
    }
}

struct MenuSection {
    title: &'static str,
    items: Vec<MenuItem>,
}

static MENU_STRUCTURE: Lazy<Vec<MenuSection>> = Lazy::new(|| {
    let command_shift = Modifiers::COMMAND | Modifiers::SHIFT;
    vec![
        MenuSection {
            title: "File",
            items: vec![
                MenuItem::new("Open HTML File...", MenuCommand::OpenHtml)
                    .with_shortcut(Modifiers::COMMAND, Key::O),
                MenuItem::new("Save Markdown As...", MenuCommand::SaveMarkdown)
                    .with_shortcut(Modifiers::COMMAND, Key::S),
                MenuItem::new("Clear All", MenuCommand::ClearAll)
                    .with_shortcut(Modifiers::COMMAND, Key::K),
                MenuItem::new("Quit", MenuCommand::Quit),
            ],
        },
        MenuSection {
            title: "View",
            items: vec![
                MenuItem::new("Toggle Dark Mode", MenuCommand::ToggleDarkMode)
                    .with_shortcut(Modifiers::COMMAND, Key::D),
                MenuItem::new("Swap Panels", MenuCommand::SwapPanels)
                    .with_shortcut(command_shift, Key::S),
            ],
        },
        MenuSection {
            title: "History",
            items: vec![
                MenuItem::new("Show History", MenuCommand::ShowHistory)
                    .with_shortcut(Modifiers::COMMAND, Key::H),
                MenuItem::new("Clear History", MenuCommand::ClearHistory),
            ],
        },
        MenuSection {
            title: "Help",
            items: vec![MenuItem::new("About", MenuCommand::About)],
        },
    ]
});

pub struct MarkdownizrApp {
    workbench: Workbench,
    listeners: UiListeners<Workbench>,
    host: HostEndpoint,
    ui: UiEndpoint,
    window_state: WindowStateKeeper,
    last_bounds: Option<WindowBounds>,
    applied_dark_mode: Option<bool>,
}

impl MarkdownizrApp {
    pub fn new(
        workbench: Workbench,
        (host, ui): (HostEndpoint, UiEndpoint),
        window_state: WindowStateKeeper,
    ) -> Self {
        Self {
            workbench,
            listeners: ui_listeners(),
            host,
            ui,
            window_state,
            last_bounds: None,
            applied_dark_mode: None,
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        let dark = self.workbench.dark_mode();
        if self.applied_dark_mode == Some(dark) {
            return;
        }
        ctx.set_visuals(if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        self.applied_dark_mode = Some(dark);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let convert = KeyboardShortcut::new(Modifiers::COMMAND, Key::Enter);
        if ctx.input_mut(|i| i.consume_shortcut(&convert)) {
            self.workbench.convert();
        }
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.workbench.close_modals();
        }
        // Longer modifier sets first so Ctrl+Shift+S is not taken by Ctrl+S.
        let mut items: Vec<MenuItem> = MENU_STRUCTURE
            .iter()
            .flat_map(|section| section.items.iter().copied())
            .filter(|item| item.shortcut.is_some())
            .collect();
        items.sort_by_key(|item| item.shortcut.map_or(0, |s| !s.modifiers.shift as u8));
        for item in items {
            let Some(shortcut) = item.shortcut else {
                continue;
            };
            if ctx.input_mut(|i| i.consume_shortcut(&shortcut)) {
                self.run_menu_command(ctx, item.command);
            }
        }
    }

    /// Host side of a menu action.
    fn run_menu_command(&mut self, ctx: &egui::Context, command: MenuCommand) {
        debug!("Menu command {command:?}");
        match command {
            MenuCommand::OpenHtml => self.open_html(),
            MenuCommand::SaveMarkdown => self.save_markdown(),
            MenuCommand::ClearAll => self.host.send(HostMessage::ClearAll),
            MenuCommand::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            MenuCommand::ToggleDarkMode => self.host.send(HostMessage::ToggleDarkMode),
            MenuCommand::SwapPanels => self.host.send(HostMessage::SwapPanels),
            MenuCommand::ShowHistory => self.host.send(HostMessage::ShowHistory),
            MenuCommand::ClearHistory => self.host.send(HostMessage::ClearHistory),
            MenuCommand::About => show_about_dialog(),
        }
    }

    fn open_html(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("HTML Files", HTML_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        else {
            return;
        };
        match open_html_file(&path) {
            Ok(content) => self.host.send(HostMessage::LoadHtml(content)),
            Err(err) => {
                error!("Error opening HTML file: {err}");
                show_error_dialog("Error", &err.open_dialog_message());
            }
        }
    }

    fn save_markdown(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(DEFAULT_SAVE_NAME)
            .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
            .add_filter("Text Files", &["txt"])
            .add_filter("All Files", &["*"])
            .save_file()
        {
            self.host.send(HostMessage::RequestMarkdownContent(path));
        }
    }

    /// Moves pending messages across the bridge in both directions.
    fn pump_messages(&mut self) {
        for message in self.ui.drain() {
            self.listeners.dispatch(&mut self.workbench, &message);
        }
        for message in self.workbench.take_outbox() {
            self.ui.send(message);
        }
        for message in self.host.drain() {
            match message {
                UiMessage::SaveMarkdownContent { path, content } => {
                    write_markdown(path, &content)
                }
            }
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        let mut chosen = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                for section in MENU_STRUCTURE.iter() {
                    ui.menu_button(section.title, |ui| {
                        for item in &section.items {
                            let mut button = egui::Button::new(item.label);
                            if let Some(shortcut) = &item.shortcut {
                                button = button.shortcut_text(ctx.format_shortcut(shortcut));
                            }
                            if ui.add(button).clicked() {
                                chosen = Some(item.command);
                                ui.close_menu();
                            }
                        }
                    });
                }
            });
        });
        if let Some(command) = chosen {
            self.run_menu_command(ctx, command);
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .exact_height(38.0)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    ui.label(RichText::new(APP_TITLE).strong());
                    ui.separator();
                    if ui.button("👁 Preview").clicked() {
                        self.workbench.open_preview();
                    }
                    if ui.button("📋 Copy").clicked() {
                        if let Some(text) = self.workbench.copy_output() {
                            ctx.output_mut(|o| o.copied_text = text);
                        }
                    }
                    if ui.button("🕘 History").clicked() {
                        self.workbench.open_history();
                    }
                    if ui.button("🗑 Clear").clicked() {
                        self.workbench.request(Confirmation::ClearAll);
                    }
                    if ui.button("⇄ Swap").clicked() {
                        self.workbench.swap_panels();
                    }
                    let theme_label = if self.workbench.dark_mode() {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(theme_label).clicked() {
                        self.workbench.toggle_dark_mode();
                    }
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.spacing_mut().item_spacing.x = 10.0;
                    let stats = self.workbench.stats();
                    ui.label(stats.words_label());
                    ui.separator();
                    ui.label(stats.chars_label());
                });
            });
    }

    fn show_panels(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].heading("HTML Input");
                columns[0].separator();
                let response = egui::ScrollArea::vertical()
                    .id_source("html_input")
                    .show(&mut columns[0], |ui| {
                        ui.add_sized(
                            ui.available_size(),
                            egui::TextEdit::multiline(&mut self.workbench.input)
                                .font(TextStyle::Monospace)
                                .hint_text("Paste or type HTML here..."),
                        )
                    })
                    .inner;
                if response.changed() {
                    let pasted = response.has_focus()
                        && columns[0]
                            .input(|i| i.events.iter().any(|e| matches!(e, egui::Event::Paste(_))));
                    if pasted {
                        self.workbench.pasted(now);
                    } else {
                        self.workbench.input_changed(now);
                    }
                }

                columns[1].heading("Markdown Output");
                columns[1].separator();
                egui::ScrollArea::vertical()
                    .id_source("markdown_output")
                    .show(&mut columns[1], |ui| {
                        let mut output = self.workbench.output();
                        ui.add_sized(
                            ui.available_size(),
                            egui::TextEdit::multiline(&mut output).font(TextStyle::Monospace),
                        );
                    });
            });
        });
    }

    fn show_preview_window(&mut self, ctx: &egui::Context) {
        let Some(preview) = self.workbench.preview() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Markdown Preview")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(640.0)
            .default_height(480.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| render_preview(ui, preview));
            });
        if !open {
            self.workbench.close_preview();
        }
    }

    fn show_history_window(&mut self, ctx: &egui::Context) {
        if !self.workbench.show_history {
            return;
        }
        let mut open = true;
        let mut chosen = None;
        egui::Window::new("Conversion History")
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(520.0)
            .show(ctx, |ui| {
                let history = self.workbench.history();
                if history.is_empty() {
                    ui.label(
                        RichText::new("No conversion history yet. Start converting some HTML!")
                            .italics(),
                    );
                    return;
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (index, entry) in history.iter().enumerate() {
                        let response = ui
                            .group(|ui| {
                                ui.set_width(ui.available_width());
                                ui.label(RichText::new(format_timestamp(entry.created_at())).small());
                                ui.label(entry.list_label());
                            })
                            .response
                            .interact(egui::Sense::click());
                        if response.clicked() {
                            chosen = Some(index);
                        }
                    }
                });
            });
        if let Some(index) = chosen {
            self.workbench.load_from_history(index);
        }
        if !open {
            self.workbench.show_history = false;
        }
    }

    fn show_confirmation(&mut self, ctx: &egui::Context) {
        let Some(confirmation) = self.workbench.confirmation() else {
            return;
        };
        let mut answer = None;
        egui::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(confirmation.prompt());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(false);
                    }
                });
            });
        match answer {
            Some(true) => self.workbench.confirm(),
            Some(false) => self.workbench.cancel_confirmation(),
            None => {}
        }
    }

    fn show_toast(&self, ctx: &egui::Context) {
        let Some(toast) = self.workbench.toast() else {
            return;
        };
        let fill = match toast.kind {
            ToastKind::Success => Color32::from_rgb(34, 197, 94),
            ToastKind::Error => Color32::from_rgb(239, 68, 68),
        };
        egui::Area::new("toast")
            .anchor(Align2::RIGHT_BOTTOM, [-16.0, -36.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.label(RichText::new(&toast.message).color(Color32::WHITE));
                });
            });
    }

    fn remember_bounds(&mut self, ctx: &egui::Context) {
        let (inner, outer) = ctx.input(|i| (i.viewport().inner_rect, i.viewport().outer_rect));
        if let Some(inner) = inner {
            let mut bounds = WindowBounds::new(inner.width() as f64, inner.height() as f64);
            if let Some(outer) = outer {
                bounds = bounds.with_position(outer.min.x as f64, outer.min.y as f64);
            }
            self.last_bounds = Some(bounds);
        }
    }
}

impl App for MarkdownizrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();
        self.apply_theme_if_needed(ctx);
        self.handle_shortcuts(ctx);
        self.workbench.tick(now);

        self.show_menu_bar(ctx);
        self.show_toolbar(ctx);
        self.show_status_bar(ctx);
        self.show_panels(ctx);
        self.show_preview_window(ctx);
        self.show_history_window(ctx);
        self.show_confirmation(ctx);
        self.show_toast(ctx);

        self.pump_messages();
        self.apply_theme_if_needed(ctx);
        self.remember_bounds(ctx);

        if let Some(wait) = self.workbench.next_wakeup(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(bounds) = self.last_bounds {
            self.window_state.save_window_bounds(bounds);
        }
        if quits_when_all_windows_closed(std::env::consts::OS) {
            info!("Main window closed, exiting");
        } else {
            info!("Main window closed");
        }
    }
}

fn write_markdown(path: PathBuf, content: &str) {
    match save_markdown_content(&path, content) {
        Ok(()) => {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Info)
                .set_title("Success")
                .set_description(&format!(
                    "Markdown saved successfully!\n\n{}",
                    saved_file_detail(&path)
                ))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
        Err(err) => show_error_dialog("Error", &err.save_dialog_message()),
    }
}

pub fn show_error_dialog(title: &str, message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn show_about_dialog() {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("About Markdownizr")
        .set_description(&format!(
            "Markdownizr\n\nConvert HTML to Markdown in real-time.\n\nVersion: {}\nPowered by htmd & pulldown-cmark",
            env!("CARGO_PKG_VERSION")
        ))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}

fn render_preview(ui: &mut egui::Ui, preview: &Preview) {
    let Preview::Blocks(blocks) = preview else {
        ui.label(RichText::new(EMPTY_PREVIEW_MESSAGE).italics().weak());
        return;
    };
    for block in blocks {
        match block {
            PreviewBlock::Heading { level, spans } => {
                let size = match level {
                    1 => 28.0,
                    2 => 22.0,
                    3 => 18.0,
                    _ => 16.0,
                };
                ui.horizontal_wrapped(|ui| render_spans(ui, spans, Some(size)));
            }
            PreviewBlock::Paragraph(spans) => {
                ui.horizontal_wrapped(|ui| render_spans(ui, spans, None));
            }
            PreviewBlock::CodeBlock { code, .. } => {
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(code.trim_end()).monospace());
                    });
            }
            PreviewBlock::ListItem {
                depth,
                marker,
                spans,
            } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(*depth as f32 * 18.0 + 8.0);
                    ui.label(marker.as_str());
                    render_spans(ui, spans, None);
                });
            }
            PreviewBlock::Quote(spans) => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("▌").weak());
                    render_spans(ui, spans, None);
                });
            }
            PreviewBlock::Rule => {
                ui.separator();
            }
        }
        ui.add_space(6.0);
    }
}

fn render_spans(ui: &mut egui::Ui, spans: &[InlineSpan], size: Option<f32>) {
    ui.spacing_mut().item_spacing.x = 0.0;
    for span in spans {
        let mut text = RichText::new(&span.text);
        if let Some(size) = size {
            text = text.size(size).strong();
        }
        if span.strong {
            text = text.strong();
        }
        if span.emphasis {
            text = text.italics();
        }
        if span.strikethrough {
            text = text.strikethrough();
        }
        if span.code {
            text = text.code();
        }
        match &span.link {
            Some(url) => {
                ui.hyperlink_to(text, url);
            }
            None => {
                ui.label(text);
            }
        }
    }
}
