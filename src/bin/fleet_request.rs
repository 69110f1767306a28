use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fleet_request::error::{FleetError, Result};
use fleet_request::event::{Event, EventHandler};
use fleet_request::request::{RequestAction, RequestConfig, ServiceRequestApp};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fleet-request")]
#[command(author, version, about = "File a service request for a fleet vehicle")]
struct Args {
    /// Path to config file (default: ~/.config/fleet-request/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Validate and log requests without writing them
    #[arg(long)]
    dryrun: bool,

    /// Directory that receives submitted requests as JSON
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting fleet-request");
        }
    }

    // Load config before touching the terminal so parse errors print normally
    let mut config = match args.config {
        Some(ref path) => RequestConfig::load_from(path)?,
        None => RequestConfig::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable config: {e}");
            RequestConfig::default()
        }),
    };

    // Flags override config
    if args.dryrun {
        config.general.dryrun = true;
    }
    if let Some(dir) = args.output_dir {
        config.submission.output_dir = dir;
    }

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    let result = run_wizard(&mut terminal, config).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("fleet-request error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| FleetError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| FleetError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| FleetError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| FleetError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)
        .map_err(|e| FleetError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: RequestConfig,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);

    let mut app = ServiceRequestApp::new(config);

    loop {
        terminal
            .draw(|frame| fleet_request::request::ui::draw(frame, &app))
            .map_err(|e| FleetError::Terminal(e.to_string()))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => match app.handle_key(key) {
                    Some(RequestAction::Submit) => app.submit(),
                    Some(RequestAction::Exit) => break,
                    None => {}
                },
                Event::Resize => {}
                Event::Tick => app.tick(),
            }
        }

        if app.should_exit {
            break;
        }
    }

    info!("fleet-request exiting");
    Ok(())
}
