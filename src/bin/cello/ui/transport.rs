//! Transport bar: sequence, stop, fifth mode

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cello_tuner::{
    binder::Binder,
    engine::{AudioBackend, Clock, FifthMode},
};

use super::DISABLED;

pub fn render_transport<B: AudioBackend, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    binder: &Binder<B, C>,
) {
    let block = Block::default().title(" Transport ").borders(Borders::ALL);

    let (play_symbol, play_style) = if !binder.sound_enabled() {
        ("▶", Style::default().fg(DISABLED))
    } else if binder.is_sequence_playing() {
        ("▶", Style::default().fg(Color::Green))
    } else {
        ("▷", Style::default().fg(Color::White))
    };

    let mode_span = |mode: FifthMode| {
        let style = if binder.fifth_mode() == mode {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!(" {} ", mode.label()), style)
    };

    let line = Line::from(vec![
        Span::styled(format!(" {play_symbol} [P] Play sequence  "), play_style),
        Span::styled("■ [S] Stop  ", Style::default().fg(Color::Yellow)),
        Span::styled("  [F] Fifths: ", Style::default().fg(Color::DarkGray)),
        mode_span(FifthMode::Tempered),
        Span::raw(" "),
        mode_span(FifthMode::Pure),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
