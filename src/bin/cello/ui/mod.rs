//! TUI rendering for the cello tuner
//!
//! Everything drawn here is read from the `Binder` each frame.

mod header;
mod intervals;
mod strings;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use cello_tuner::{
    binder::Binder,
    engine::{AudioBackend, Clock},
};

use header::render_header;
use intervals::render_intervals;
use strings::render_strings;
use transport::render_transport;

const HELP: &str =
    " [↑↓] String  [Enter] Listen  [Space] Hold  [1-3] Fifth  [P] Sequence  [S] Stop  [←→] A4  [F] Fifth mode  [Q] Quit";

/// Color for controls that cannot make sound right now.
pub(crate) const DISABLED: Color = Color::DarkGray;

pub fn render<B: AudioBackend, C: Clock>(frame: &mut Frame, binder: &Binder<B, C>, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Instrument + reference
            Constraint::Length(8), // String table
            Constraint::Length(3), // Fifths
            Constraint::Length(3), // Transport
            Constraint::Min(1),    // Help / notice
        ])
        .split(frame.area());

    render_header(frame, chunks[0], binder);
    render_strings(frame, chunks[1], binder, selected);
    render_intervals(frame, chunks[2], binder);
    render_transport(frame, chunks[3], binder);

    let footer = match binder.notice() {
        Some(notice) => Paragraph::new(format!(" {notice}")).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, chunks[4]);
}
