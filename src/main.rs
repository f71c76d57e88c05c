mod api;
mod app;
mod config;
mod mac;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::app::App;
use crate::config::Config;

/// Terminal client for batch MAC address lookups against a device
/// inventory service.
#[derive(Debug, Parser)]
#[command(name = "macquery", version, about)]
struct Args {
    /// Path to the config file (default: <config-dir>/macquery/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the inventory service base URL
    #[arg(long)]
    server: Option<String>,

    /// Append logs to this file (RUST_LOG controls the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// The TUI owns the terminal, so logs go to a file or nowhere.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_server_override(args.server);
    info!(server = %config.server.base_url, "starting up");

    let client = Arc::new(ApiClient::new(&config.server.base_url, config.timeout())?);
    let mut app = App::new(client, config.lookup.validate_format);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Put the terminal back even when the app loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
