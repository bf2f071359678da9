use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::thread_rng;

use pong::compute::init_state;
use pong::display::terminal::{restore_terminal, TerminalSurface};
use pong::game;
use pong::settings::{default_settings_path, Settings};

/// Two-paddle Pong in the terminal.
///
/// W / S move the left paddle, ↑ / ↓ the right one (unless the AI plays it).
/// Esc or Q quits.
#[derive(Parser)]
#[command(name = "pong")]
struct Cli {
    /// Settings file (defaults to data/settings.toml next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log; stdout belongs to the game screen
    #[arg(long, default_value = "pong.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    tracing::info!("Initializing");

    // Settings are resolved before the terminal is touched, so a bad file
    // leaves the shell exactly as it was.
    let settings_path = cli.config.unwrap_or_else(default_settings_path);
    let settings = Settings::load(&settings_path).context("failed to load settings")?;
    tracing::info!(
        width = settings.screen.width,
        height = settings.screen.height,
        fps = settings.screen.fps,
        ai = settings.ai.on,
        "Screen dimensions {} x {}",
        settings.screen.width,
        settings.screen.height
    );

    // Restore the terminal before the panic message prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let mut rng = thread_rng();
    let mut state = init_state(&settings, &mut rng);

    let report = {
        let mut surface = TerminalSurface::acquire().context("failed to initialize terminal")?;
        tracing::info!("Initialization complete");
        game::run(&mut surface, &mut state, &settings, &mut rng).context("game loop aborted")?
    };

    tracing::info!(frames = report.frames, "Exited cleanly");
    Ok(())
}
