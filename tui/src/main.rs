//! Cosmos Entry Point
//!
//! Launches the terminal portfolio.
//!
//! Usage:
//!   cosmos [OPTIONS]
//!
//! Options:
//!   --config <PATH>    Config file (default: ~/.config/cosmos/cosmos.toml)
//!   --fps <N>          Frame rate
//!   --log-file <PATH>  Write logs here (RUST_LOG filters, default warn)
//!   --seed <N>         Fixed particle seed

use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cosmos_tui::App;
use orchestrator_core::{load_config, load_config_from_path, Catalog, ConfigOverrides, CosmosConfig};

/// Terminal portfolio with warp transitions between galleries
#[derive(Parser, Debug)]
#[command(name = "cosmos", version, about)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Frame rate
    #[arg(long, value_name = "N")]
    fps: Option<u32>,

    /// Write logs to this file instead of discarding them
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Seed for the particle fields
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to a file only
    init_logging(args.log_file.as_ref())?;

    let config = resolve_config(&args)?;
    let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())
        .context("failed to load the content catalog")?;

    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: cosmos requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or over SSH with the -t flag.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    terminal.hide_cursor()?;

    let result = run_app(&mut terminal, &config, catalog).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &CosmosConfig,
    catalog: Catalog,
) -> anyhow::Result<()> {
    let mut app = App::new(config, catalog)?;
    app.run(terminal).await
}

/// File, environment and CLI layers, highest priority last
fn resolve_config(args: &Args) -> anyhow::Result<CosmosConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            load_config_from_path(Some(path.clone()))?
        }
        None => load_config()?,
    };

    let overrides = ConfigOverrides {
        fps: args.fps,
        seed: args.seed,
        catalog_path: None,
    };
    overrides.apply(&mut config);
    config.validate()?;

    tracing::info!(source = %config.source(), fps = config.fps, "Configuration loaded");
    Ok(config)
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    Ok(())
}
