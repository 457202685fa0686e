//! Terminal user interface: the thin consumer of the view state.
//!
//! The UI owns nothing but presentation concerns (cursor row, detail
//! scroll). It reads `ViewState` snapshots from the coordinator and
//! requests changes through the two mutators; all fetch sequencing lives
//! in `sync`.
//!
//! # Module Structure
//!
//! - `mod` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Pane rendering

mod input;
mod render;

use crate::sync::{Coordinator, FetchEvent};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use input::handle_input;
use render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Presentation-only state: which row the cursor is on and how far the
/// detail pane is scrolled. Kept separate from `ViewState`: the cursor is
/// not a selection until the user confirms it.
pub struct UiState {
    pub cursor: usize,
    pub detail_scroll: u16,
    pub needs_redraw: bool,
}

impl UiState {
    fn new() -> Self {
        Self {
            cursor: 0,
            detail_scroll: 0,
            needs_redraw: true,
        }
    }

    /// Keep the cursor inside the committed list after it was replaced.
    fn clamp_cursor(&mut self, list_len: usize) {
        if list_len == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(list_len - 1);
        }
    }
}

/// Runs the TUI event loop.
///
/// Uses `tokio::select!` to multiplex terminal input, fetch completions
/// from the coordinator's event channel, and shutdown signals. All state
/// mutation happens here, on the one task that owns both the coordinator
/// and the receiver.
///
/// Installs a panic hook that restores terminal state before unwinding,
/// so the terminal is not left in raw mode on panic.
pub async fn run(
    coordinator: &mut Coordinator,
    mut event_rx: mpsc::Receiver<FetchEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut ui = UiState::new();

    // Signal handlers for graceful shutdown (Unix only)
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if ui.needs_redraw {
            terminal.draw(|f| render(f, coordinator.view(), &ui))?;
            ui.needs_redraw = false;
        }

        // Drain all pending fetch events before waiting again, so a burst
        // of completions lands in one redraw instead of one frame each.
        while let Ok(event) = event_rx.try_recv() {
            apply_event(coordinator, &mut ui, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        ui.needs_redraw = true;
                        match handle_input(coordinator, &mut ui, key.code, key.modifiers) {
                            Action::Quit => break,
                            Action::Continue => {}
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        ui.needs_redraw = true;
                    }
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                apply_event(coordinator, &mut ui, event);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Hand a fetch completion to the coordinator and adjust presentation
/// state to the (possibly) new snapshot.
fn apply_event(coordinator: &mut Coordinator, ui: &mut UiState, event: FetchEvent) {
    let was_detail = matches!(event, FetchEvent::DetailLoaded { .. });
    coordinator.handle_event(event);
    ui.clamp_cursor(coordinator.view().list.articles().len());
    if was_detail {
        ui.detail_scroll = 0;
    }
    ui.needs_redraw = true;
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
