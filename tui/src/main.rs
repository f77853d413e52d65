//! bihua TUI Entry Point
//!
//! Launches the terminal stroke-order tutor.
//!
//! Usage:
//!   bihua
//!
//! Configuration is read from `~/.config/bihua/config.toml`; `GEMINI_API_KEY`
//! (or `API_KEY`) supplies the model credential.

use std::fs;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use bihua_tui::{App, TutorClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("❌ Error: bihua requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up logging (stdout belongs to the TUI)
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let config = tutor_core::load_config().context("Failed to load configuration")?;
    tracing::info!(
        source = ?config.source(),
        model = %config.model,
        "Configuration loaded"
    );
    if config.api_key.is_empty() {
        tracing::warn!("No API key configured; lookups will show the fallback record");
    }
    let client = TutorClient::from_config(&config)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let size = crossterm::terminal::size()?;
    let mut app = App::new(client, size);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Show goodbye message after TUI closes
    if let Some(goodbye) = app.goodbye() {
        println!("\n\x1b[32m汉字笔画:\x1b[0m {goodbye}\n");
    }

    // Propagate any errors
    result
}

/// Log to `<data dir>/bihua/bihua.log`
fn init_logging() -> anyhow::Result<()> {
    let dir = dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|d| d.join("bihua"))
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join("bihua.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::from_default_env()
        .add_directive("bihua=info".parse()?)
        .add_directive("bihua_tui=info".parse()?)
        .add_directive("tutor_core=info".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    tracing::info!(log = %path.display(), "bihua starting");
    Ok(())
}
