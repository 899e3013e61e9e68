// TUI renderer - ratatui-based terminal user interface
//
// Single window, top to bottom:
// - input form: one labeled text field per feature, in schema order
// - read-only prediction result area
// - status line: key help, or the current validation error

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use std::io;

mod form_widget;
mod result_widget;

pub use form_widget::render_form;
pub use result_widget::{render_result, render_status};

use super::PredictorApp;

/// Owns the terminal and restores it on shutdown, drop, and panic.
pub struct TuiRenderer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    is_active: bool,
}

impl TuiRenderer {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            is_active: true,
        })
    }

    /// Draw one frame of the predictor UI.
    pub fn render(&mut self, app: &PredictorApp) -> Result<()> {
        self.terminal
            .draw(|frame| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Min(4),    // Input form (scrolls when tall)
                        Constraint::Length(4), // Prediction result
                        Constraint::Length(1), // Status / key help
                    ])
                    .split(frame.area());

                render_form(frame, chunks[0], app);
                render_result(frame, chunks[1], app);
                render_status(frame, chunks[2], app);
            })
            .context("Failed to draw frame")?;

        Ok(())
    }

    /// Restore the terminal state.
    pub fn shutdown(mut self) -> Result<()> {
        if self.is_active {
            self.is_active = false;
            disable_raw_mode().context("Failed to disable raw mode")?;
            execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
                .context("Failed to leave alternate screen")?;
        }
        Ok(())
    }
}

impl Drop for TuiRenderer {
    fn drop(&mut self) {
        // Ensure the terminal is restored even on early return
        if self.is_active {
            let _ = disable_raw_mode();
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        }
    }
}
