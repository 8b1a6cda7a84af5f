//! Fifth buttons between neighbouring strings

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cello_tuner::{
    binder::Binder,
    engine::{AudioBackend, Clock},
};

use super::DISABLED;

pub fn render_intervals<B: AudioBackend, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    binder: &Binder<B, C>,
) {
    let style = if binder.sound_enabled() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(DISABLED)
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, interval) in binder.intervals().iter().enumerate() {
        spans.push(Span::styled(format!("[{}] {}", i + 1, interval.label), style));
        spans.push(Span::raw("   "));
    }

    let title = if binder.is_interval_sounding() {
        format!(" Fifths ({}) - sounding ", binder.fifth_mode())
    } else {
        format!(" Fifths ({}) ", binder.fifth_mode())
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
