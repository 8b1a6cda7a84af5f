//! Event loop and key bindings.

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use cello_tuner::{
    binder::{Binder, Command},
    engine::{AudioBackend, Clock},
};

use crate::ui;

pub struct App<B: AudioBackend, C: Clock> {
    binder: Binder<B, C>,
    /// Highlighted row of the string table
    selected: usize,
    should_quit: bool,
}

impl<B: AudioBackend, C: Clock> App<B, C> {
    pub fn new(binder: Binder<B, C>) -> Self {
        Self {
            binder,
            selected: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            // Fire due sequence notes before drawing their effect
            self.binder.tick();

            terminal.draw(|frame| ui::render(frame, &self.binder, self.selected))?;

            // ~60fps keeps sequence timing within a frame
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.binder.dispatch(Command::StopAll);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        let rows = self.binder.rows().len();

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(rows.saturating_sub(1));
            }
            _ => {
                if let Some(command) = self.command_for(key) {
                    self.binder.dispatch(command);
                }
            }
        }
    }

    fn command_for(&self, key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Enter | KeyCode::Char('l') => Some(Command::Listen(self.selected)),
            KeyCode::Char(' ') | KeyCode::Char('h') => Some(Command::ToggleHold(self.selected)),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                (index < self.binder.intervals().len()).then_some(Command::PlayInterval(index))
            }
            KeyCode::Char('p') => Some(Command::PlaySequence),
            KeyCode::Char('s') => Some(Command::StopAll),
            KeyCode::Left => self.binder.neighbour_reference(-1).map(Command::SelectReference),
            KeyCode::Right => self.binder.neighbour_reference(1).map(Command::SelectReference),
            KeyCode::Char('f') => Some(Command::SelectFifthMode(self.binder.fifth_mode().toggled())),
            _ => None,
        }
    }
}
