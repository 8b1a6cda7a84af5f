//! String table: name, frequency and the two per-string actions

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use cello_tuner::{
    binder::{Binder, LISTEN_LABEL},
    engine::{AudioBackend, Clock},
};

use super::DISABLED;

pub fn render_strings<B: AudioBackend, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    binder: &Binder<B, C>,
    selected: usize,
) {
    let enabled = binder.sound_enabled();
    let action_style = if enabled {
        Style::default()
    } else {
        Style::default().fg(DISABLED)
    };

    let rows: Vec<Row> = binder
        .rows()
        .iter()
        .map(|row| {
            let held = binder.is_held(row.id());
            let hold_style = if held && enabled {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                action_style
            };

            Row::new(vec![
                Cell::from(row.string.name),
                Cell::from(row.frequency_text()),
                Cell::from(format!("[{LISTEN_LABEL}]")).style(action_style),
                Cell::from(format!("[{}]", binder.hold_label(row.id()))).style(hold_style),
            ])
        })
        .collect();

    let title = binder
        .rows()
        .get(selected)
        .map(|row| format!(" Strings - {} ", row.string.label))
        .unwrap_or_else(|| " Strings ".to_string());

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(12),
        ],
    )
    .header(
        Row::new(vec!["String", "Frequency", "Listen", "Hold"])
            .style(Style::default().fg(Color::DarkGray))
            .bottom_margin(1),
    )
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}
