//! Instrument chip and reference pitch selector

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Tabs},
    Frame,
};

use cello_tuner::{
    binder::{Binder, INSTRUMENT_NAME},
    engine::{AudioBackend, Clock},
};

pub fn render_header<B: AudioBackend, C: Clock>(frame: &mut Frame, area: Rect, binder: &Binder<B, C>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(20)])
        .split(area);

    // Only one instrument; the chip is informational
    let chip = Tabs::new(vec![INSTRUMENT_NAME])
        .select(0)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(chip, chunks[0]);

    let options = binder.reference_options();
    let titles: Vec<String> = options.iter().map(|o| o.label()).collect();
    let mut tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!(" Reference: {} ", binder.reference_label()))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED));

    if let Some(idx) = binder.selected_reference_index() {
        tabs = tabs.select(idx);
    }
    frame.render_widget(tabs, chunks[1]);
}
