mod api;
mod app;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod runtime;
mod store;
mod time_utils;
mod timesheet;
mod token_store;
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::EverhourConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use everhour::{ApiToken, EverhourClient};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::info;

use crate::api::{DevBackend, TimeTrackingApi};
use crate::store::{MemoryStore, SharedStore};
use crate::timesheet::Command;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env.everhour
    dotenvy::from_filename(".env.everhour").ok();

    let cli = Cli::parse();
    let cfg = EverhourConfig::load()?;
    logging::init_tracing(&EverhourConfig::log_path()?, &cfg.log_level)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let client = build_client(&cfg)?;
            if !client.has_token() {
                eprintln!(
                    "No API token configured. Run `everhour-tui set-token` or set {}.",
                    token_store::TOKEN_ENV
                );
                return Ok(());
            }
            let store = bootstrap::open_state_store()?;
            run_tui(&cfg, Box::new(client), store).await?;
        }
        Commands::Dev => {
            println!("🔧 Dev mode: using in-memory data, nothing is sent to Everhour");
            let store: SharedStore = Arc::new(MemoryStore::new());
            run_tui(&cfg, Box::new(DevBackend::new()), store).await?;
        }
        Commands::SetToken => {
            let input = rpassword::prompt_password("Everhour API token: ")
                .context("Failed to read token")?;
            let token = ApiToken::parse(&input)?;
            token_store::save_token(&token)?;
            println!(
                "Token saved to {}",
                EverhourConfig::token_path()?.display()
            );
        }
        Commands::ClearToken => {
            token_store::clear_token()?;
            println!("Token removed.");
        }
        Commands::Link { project_id } => {
            run_headless(&cfg, Command::LinkWorkspace { project_id }).await?;
        }
        Commands::Toggle { task_id } => {
            run_headless(&cfg, Command::ToggleTimer { task_id }).await?;
        }
        Commands::ConfigPath => {
            let path = EverhourConfig::ensure_exists()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn build_client(cfg: &EverhourConfig) -> Result<EverhourClient> {
    let token = token_store::load_token()?;
    EverhourClient::new(&cfg.api_url, token).context("Failed to create Everhour client")
}

async fn run_tui(
    cfg: &EverhourConfig,
    api: Box<dyn TimeTrackingApi>,
    store: SharedStore,
) -> Result<()> {
    let handler = bootstrap::build_handler(cfg, api, store)?;
    let mut app = app::App::new(handler);
    info!("starting terminal UI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// One command without the UI; notices go to stdout/stderr.
async fn run_headless(cfg: &EverhourConfig, command: Command) -> Result<()> {
    let client = build_client(cfg)?;
    let store = bootstrap::open_state_store()?;
    let mut handler = bootstrap::build_handler(cfg, Box::new(client), store)?;

    handler.load_initial().await;
    let mut failed = false;
    for notice in handler.drain_notices() {
        eprintln!("{}", notice.message);
        failed = true;
    }
    if failed {
        bail!("Could not load Everhour data");
    }

    handler.handle(command).await;
    let mut failed = false;
    for notice in handler.drain_notices() {
        if notice.is_error() {
            eprintln!("{}", notice.message);
            failed = true;
        } else {
            println!("{}", notice.message);
        }
    }
    if failed {
        bail!("Command failed");
    }
    Ok(())
}
