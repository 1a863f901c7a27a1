// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::error;

use vulnx::core::models::ScanProfile;
use vulnx::core::orchestrator::ScanEvent;
use vulnx::core::store::FindingStore;

mod app;
mod cli;
mod ui;

use app::{App, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = cli::Cli::parse();
    vulnx::logging::initialize_logging(cli.verbose)?;

    if let Err(e) = cli::run_command(cli).await {
        error!("{e:?}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

/// Drives the live dashboard until the user quits. Returns `true` when the
/// scan completed before the dashboard was closed.
pub async fn run_dashboard(
    target: &str,
    profile: ScanProfile,
    store: Arc<FindingStore>,
    mut events: UnboundedReceiver<ScanEvent>,
) -> Result<bool> {
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(target, profile, store);
    let outcome = event_loop(&mut terminal, &mut app, &mut events).await;

    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    outcome?;

    Ok(matches!(app.state, AppState::Finished))
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    events: &mut UnboundedReceiver<ScanEvent>,
) -> Result<()> {
    while !app.should_quit {
        loop {
            match events.try_recv() {
                Ok(event) => app.apply(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Up => app.scroll_up(),
                        KeyCode::Down => app.scroll_down(),
                        _ => {}
                    }
                }
            }
        }
        app.on_tick();
        // Let the scan task make progress between frames.
        tokio::task::yield_now().await;
    }
    Ok(())
}
