//! Main event loop for the terminal UI.
//!
//! Sets up the terminal in raw mode (optionally with an alternate screen
//! and mouse capture), runs the draw-and-poll loop, and restores the
//! terminal on exit.

use std::io;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use popchat_client::ChatController;

use crate::TuiConfig;
use crate::app::{AppAction, TuiApp};
use crate::error::{Result, TuiError};
use crate::ui;

/// Run the terminal UI event loop.
///
/// This function takes ownership of the terminal for the duration of the
/// session.  It enables raw mode and, per `config`, switches to an
/// alternate screen buffer and captures the mouse.
///
/// # Errors
///
/// Returns a [`TuiError`] if terminal setup, drawing, or event handling
/// fails.
pub async fn run_tui(controller: ChatController, config: TuiConfig) -> Result<()> {
    // Set up the terminal.
    crossterm::terminal::enable_raw_mode()
        .map_err(|e| TuiError::Terminal(format!("failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    if config.alternate_screen {
        execute!(stdout, EnterAlternateScreen)?;
    }
    if config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = TuiApp::new(controller, &config);

    tracing::info!(mouse = config.mouse, "TUI event loop started");

    // Main event loop.
    let result = event_loop(&mut terminal, &mut app).await;

    // Restore the terminal regardless of whether the loop succeeded.
    crossterm::terminal::disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    if config.alternate_screen {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    tracing::info!("TUI event loop ended");

    result
}

/// The inner event loop, separated so terminal cleanup always runs.
async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_viewport(size.width, size.height);

        // Draw the current state.
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll with a short timeout so finished requests are picked up
        // promptly.
        if event::poll(std::time::Duration::from_millis(50))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    app.set_viewport(width, height);
                    AppAction::Continue
                }
                _ => AppAction::Continue,
            };
            if action == AppAction::Quit {
                break;
            }
        }

        // Apply results from background requests.
        app.check_events();
        tokio::task::yield_now().await;
    }

    Ok(())
}
