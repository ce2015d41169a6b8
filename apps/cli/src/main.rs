use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, TimeZone};
use clap::{Args, Parser, Subcommand};
use markdownizr_bridge::{open_html_file, save_markdown_content};
use markdownizr_convert::{
    render_html, ConversionPipeline, HtmdEngine, TextStats, EMPTY_PREVIEW_MESSAGE,
};
use markdownizr_settings::{
    resolve_data_dir, HistoryStore, LocalStorage, PreferencesStore, WindowStateKeeper,
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "markdownizr-cli",
    about = "Convert HTML to Markdown and manage Markdownizr data",
    author,
    version
)]
struct Cli {
    /// 資料目錄；預設為使用者資料夾。 / Data directory (defaults to the per-user data dir).
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 將 HTML 轉為 Markdown。 / Convert HTML to Markdown.
    Convert(ConvertArgs),
    /// 將 Markdown 轉為 HTML 預覽。 / Render Markdown to an HTML preview.
    Preview(PreviewArgs),
    /// 檢視或清除轉換紀錄。 / Inspect or clear the conversion history.
    #[command(subcommand)]
    History(HistoryCommand),
    /// 檢視或切換深色模式。 / Show or change the dark-mode preference.
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// 檢視儲存的視窗大小。 / Inspect the saved window geometry.
    #[command(subcommand)]
    Window(WindowCommand),
}

#[derive(Args)]
struct ConvertArgs {
    /// HTML 輸入檔；省略時讀取標準輸入。 / HTML input file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// 寫入 Markdown 的檔案；省略時輸出至標準輸出。 / File to write the Markdown to; prints to stdout when omitted.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// 不寫入轉換紀錄。 / Do not record the conversion in history.
    #[arg(long)]
    no_history: bool,

    /// 在標準錯誤輸出字數統計。 / Print character and word counts to stderr.
    #[arg(long)]
    stats: bool,
}

#[derive(Args)]
struct PreviewArgs {
    /// Markdown 輸入檔；省略時讀取標準輸入。 / Markdown input file; reads stdin when omitted.
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// 列出紀錄（最新在前）。 / List entries, newest first.
    List,
    /// 顯示單筆紀錄。 / Print one entry.
    Show {
        index: usize,
        /// 顯示原始 HTML 而非 Markdown。 / Print the source HTML instead of the Markdown.
        #[arg(long)]
        source: bool,
    },
    /// 清除所有紀錄。 / Remove every entry.
    Clear,
}

#[derive(Subcommand)]
enum ThemeCommand {
    /// 顯示目前的主題。 / Print the current theme.
    Show,
    /// 切換為深色模式。 / Switch to dark mode.
    Dark,
    /// 切換為淺色模式。 / Switch to light mode.
    Light,
    /// 在深淺色之間切換。 / Flip between dark and light.
    Toggle,
}

#[derive(Subcommand)]
enum WindowCommand {
    /// 以 JSON 顯示視窗位置與大小。 / Print the saved bounds as JSON.
    Show,
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli { data_dir, command } = Cli::parse();
    let data_dir = resolve_data_dir(data_dir);
    debug!("Using data directory {}", data_dir.display());
    match command {
        Commands::Convert(args) => execute_convert(args, &data_dir),
        Commands::Preview(args) => execute_preview(args),
        Commands::History(command) => execute_history_command(command, &data_dir),
        Commands::Theme(command) => execute_theme_command(command, &data_dir),
        Commands::Window(WindowCommand::Show) => show_window(&data_dir),
    }
}

fn execute_convert(args: ConvertArgs, data_dir: &Path) -> Result<()> {
    let html = match &args.input {
        Some(path) => open_html_file(path)?,
        None => read_stdin()?,
    };

    let pipeline: ConversionPipeline<HtmdEngine> = ConversionPipeline::default();
    let markdown = if args.no_history {
        pipeline.convert(&html)?
    } else {
        let mut history = HistoryStore::load(LocalStorage::new(data_dir));
        let outcome = pipeline.run(&html, &mut history);
        if let Some(err) = outcome.error {
            return Err(anyhow!(err).context("conversion failed"));
        }
        outcome.output
    };

    if args.stats {
        let stats = TextStats::of(&markdown);
        eprintln!("{}, {}", stats.chars_label(), stats.words_label());
    }

    match &args.output {
        Some(path) => {
            save_markdown_content(path, &markdown)?;
            println!("Saved Markdown to {}", path.display());
        }
        None => write_stdout(&markdown)?,
    }
    Ok(())
}

fn execute_preview(args: PreviewArgs) -> Result<()> {
    let markdown = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => read_stdin()?,
    };
    if markdown.trim().is_empty() {
        println!("<p class=\"empty\">{EMPTY_PREVIEW_MESSAGE}</p>");
        return Ok(());
    }
    write_stdout(&render_html(&markdown))
}

fn execute_history_command(command: HistoryCommand, data_dir: &Path) -> Result<()> {
    let mut history = HistoryStore::load(LocalStorage::new(data_dir));
    match command {
        HistoryCommand::List => {
            if history.is_empty() {
                println!("No conversion history yet.");
                return Ok(());
            }
            for (index, entry) in history.iter().enumerate() {
                println!(
                    "{index}\t{}\t{}",
                    format_timestamp(entry.created_at()),
                    entry.list_label().replace('\n', " ")
                );
            }
        }
        HistoryCommand::Show { index, source } => {
            let Some(entry) = history.get(index) else {
                bail!(
                    "no history entry at index {index} ({} recorded)",
                    history.len()
                );
            };
            let text = if source {
                entry.source_text()
            } else {
                entry.result_text()
            };
            write_stdout(text)?;
        }
        HistoryCommand::Clear => match history.clear() {
            Ok(()) => println!("History cleared"),
            Err(err) => eprintln!("Warning: failed to clear history: {err}"),
        },
    }
    Ok(())
}

fn execute_theme_command(command: ThemeCommand, data_dir: &Path) -> Result<()> {
    let mut preferences = PreferencesStore::load(LocalStorage::new(data_dir));
    let dark = match command {
        ThemeCommand::Show => preferences.dark_mode(),
        ThemeCommand::Dark => {
            preferences.save_theme(true);
            true
        }
        ThemeCommand::Light => {
            preferences.save_theme(false);
            false
        }
        ThemeCommand::Toggle => preferences.toggle_dark_mode(),
    };
    println!("{}", if dark { "dark" } else { "light" });
    Ok(())
}

fn show_window(data_dir: &Path) -> Result<()> {
    let mut keeper = WindowStateKeeper::new(data_dir);
    let bounds = keeper.load_window_bounds();
    let payload =
        serde_json::to_string_pretty(&bounds).context("failed to serialize window bounds")?;
    println!("{payload}");
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read standard input")?;
    Ok(buffer)
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("failed to write output")?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").context("failed to write output")?;
    }
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
