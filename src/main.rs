//! Workspace setup - terminal form for a workspace's initial configuration
//!
//! Collects the admin email, the anonymous data collection preference and
//! the security check result, then hands them to the workspace service.

mod app;
mod config;
mod messages;
mod security;
mod state;
mod ui;
mod workspace;

use anyhow::Result;
use app::App;
use config::SetupConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for terminal input before checking background events
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Log to a file so output doesn't land on the alternate screen
fn log_file() -> Option<File> {
    let dir = ProjectDirs::from("io", "workspace-setup", "workspace-setup")?
        .data_dir()
        .to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    File::options()
        .create(true)
        .append(true)
        .open(dir.join("workspace-setup.log"))
        .ok()
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "workspace_setup=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match log_file() {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = SetupConfig::load()?;
    let mut app = App::new(&config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply results from the security check and submissions
        app.drain_events();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // event::poll blocks; keep it off the async workers
        let ready = tokio::task::block_in_place(|| event::poll(POLL_INTERVAL))?;
        if ready {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                // Resizes are picked up by the next draw
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
