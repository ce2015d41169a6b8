mod app;
mod workbench;

use std::panic;

use eframe::{egui, NativeOptions};
use markdownizr_bridge::bridge;
use markdownizr_settings::{resolve_data_dir, WindowStateKeeper, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use tracing::{error, info};

use crate::app::{show_error_dialog, MarkdownizrApp, APP_TITLE};
use crate::workbench::Workbench;

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if workbench::is_converting() {
            error!("Conversion engine panicked: {info}");
            return;
        }
        error!("Uncaught panic: {info}");
        default_hook(info);
        show_error_dialog("Unexpected Error", &format!("An error occurred: {info}"));
    }));
}

fn main() -> eframe::Result<()> {
    init_logging();
    install_panic_hook();

    let data_dir = resolve_data_dir(None);
    info!("Starting Markdownizr with data in {}", data_dir.display());

    let mut window_state = WindowStateKeeper::new(&data_dir);
    let bounds = window_state.load_window_bounds();
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size([bounds.width as f32, bounds.height as f32])
        .with_min_inner_size([MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32]);
    if let Some((x, y)) = bounds.position() {
        viewport = viewport.with_position([x as f32, y as f32]);
    }
    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    let workbench = Workbench::open(&data_dir);
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Box::new(MarkdownizrApp::new(workbench, bridge(), window_state))),
    )
}
