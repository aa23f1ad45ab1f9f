//! Planboard - main entry point
//!
//! Parses the command line, wires the board to its storage backend and
//! either runs the TUI or one of the headless commands.

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use planboard::app::App;
use planboard::board::{Board, NoticeLevel};
use planboard::catalog::{Catalog, Categories};
use planboard::cli::{Cli, Commands};
use planboard::config_file::BoardConfig;
use planboard::export;
use planboard::persistence::{FileStore, KeyValueStore, MemoryStore};
use planboard::types::{SceneId, SubsetId};

type Storage = Box<dyn KeyValueStore>;

/// Initialize tracing; the TUI owns the terminal, so interactive sessions log
/// to a file in the data directory
fn init_tracing(cli: &Cli, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
        return Ok(());
    }

    if cli.ephemeral {
        // Nothing may touch the disk and stderr belongs to the TUI
        return Ok(());
    }

    fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", cli.data_dir))?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(cli.log_file())
        .with_context(|| format!("Failed to open log file {:?}", cli.log_file()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let interactive = matches!(cli.command, None | Some(Commands::Run));
    init_tracing(&cli, interactive)?;
    info!("Planboard starting up");
    debug!("Data directory: {:?}", cli.data_dir);

    match &cli.command {
        None | Some(Commands::Run) => run_tui(&cli)?,
        Some(Commands::Show { scene, subset }) => show_layout(&cli, *scene, subset.as_deref())?,
        Some(Commands::Reset) => reset_board(&cli)?,
        Some(Commands::Export { dir }) => {
            let dir = dir.clone().unwrap_or_else(|| cli.export_dir());
            export_layout(&cli, &dir)?;
        }
        Some(Commands::ValidateCatalog { catalog }) => {
            info!("Validating catalog file: {:?}", catalog);
            match Catalog::load_from_file(catalog) {
                Ok(loaded) => {
                    let board = Board::open(loaded, Default::default(), MemoryStore::new());
                    let subsets: Vec<String> =
                        board.subsets().iter().map(|s| s.to_string()).collect();
                    println!(
                        "✓ Catalog is valid: {} cards in sets {}",
                        board.catalog().len(),
                        subsets.join(", ")
                    );
                }
                Err(e) => {
                    error!("Catalog validation failed: {:#}", e);
                    eprintln!("✗ Catalog validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<BoardConfig> {
    let path = cli.config_file();
    let config = BoardConfig::load_or_default(&path)?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {:?}", path))?;
    Ok(config)
}

fn load_catalog(cli: &Cli) -> Result<Catalog> {
    match &cli.catalog {
        Some(path) => Catalog::load_from_file(path),
        None => Ok(Catalog::builtin()?),
    }
}

fn load_categories(cli: &Cli) -> Result<Categories> {
    match &cli.categories {
        Some(path) => Categories::load_from_file(path),
        None => Ok(Categories::builtin()?),
    }
}

fn open_storage(cli: &Cli) -> Result<Storage> {
    if cli.ephemeral {
        info!("Ephemeral session, state is kept in memory only");
        return Ok(Box::new(MemoryStore::new()));
    }
    let path = cli.state_file();
    let store = FileStore::open(&path)
        .with_context(|| format!("Failed to open board state {:?}", path))?;
    Ok(Box::new(store))
}

fn open_board(cli: &Cli, config: &BoardConfig) -> Result<Board<Storage>> {
    let catalog = load_catalog(cli)?;
    let storage = open_storage(cli)?;
    Ok(Board::open(catalog, config.canvas, storage))
}

/// Fail a headless command if the board could not persist its change
fn ensure_saved(board: &mut Board<Storage>) -> Result<()> {
    if let Some(notice) = board.take_notice() {
        if notice.level == NoticeLevel::Warning {
            anyhow::bail!(notice.message);
        }
    }
    Ok(())
}

/// Run the interactive board
fn run_tui(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let categories = load_categories(cli)?;
    let board = open_board(cli, &config)?;
    let mut app = App::new(board, config, categories, cli.export_dir());

    debug!("Initializing terminal for TUI mode");
    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| app.run(&mut terminal).map_err(Into::into));

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);

    result
}

fn show_layout(cli: &Cli, scene: SceneId, subset: Option<&str>) -> Result<()> {
    let config = load_config(cli)?;
    let mut board = open_board(cli, &config)?;
    if let Some(name) = subset {
        board.select_subset(&SubsetId::new(name))?;
    }

    let label = if board.identifier().is_empty() {
        "(no label)"
    } else {
        board.identifier()
    };
    println!("{} | set '{}' | {}", scene.title(), board.active_subset(), label);

    let placed = board.placed_cards(scene);
    if placed.is_empty() {
        println!("  no cards picked");
    }
    for card in &placed {
        println!(
            "  {:>6}  ({:>7.1}, {:>7.1})  z={:<4} {}",
            card.id, card.position.x, card.position.y, card.paint_order, card.text
        );
    }
    println!("  {} picked, {} left", board.picked_count(), board.unpicked_count());
    Ok(())
}

fn reset_board(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let mut board = open_board(cli, &config)?;
    board.reset();
    ensure_saved(&mut board)?;
    println!("✓ Board reset to catalog defaults");
    Ok(())
}

fn export_layout(cli: &Cli, dir: &std::path::Path) -> Result<()> {
    let config = load_config(cli)?;
    let categories = load_categories(cli)?;
    let board = open_board(cli, &config)?;
    let paths = export::export_scenes(
        &board,
        &categories,
        |scene| config.areas(scene).to_vec(),
        dir,
        Local::now(),
    )?;
    for path in paths {
        println!("✓ {}", path.display());
    }
    Ok(())
}
