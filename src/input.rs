use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use tracing::trace;

/// what a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// keep the current expression, like saving it to a shareable link
    Submit,
    NextExample,
    Quit,
}

impl Command {
    /// map a terminal key event; `None` for keys tixy does not use
    pub fn from_key(key: KeyEvent) -> Option<Command> {
        let command = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => return None,
            KeyCode::Char(character) => Command::Insert(character),
            KeyCode::Backspace => Command::Backspace,
            KeyCode::Delete => Command::Delete,
            KeyCode::Left => Command::Left,
            KeyCode::Right => Command::Right,
            KeyCode::Home => Command::Home,
            KeyCode::End => Command::End,
            KeyCode::Enter => Command::Submit,
            KeyCode::Tab => Command::NextExample,
            KeyCode::Esc => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// reads key presses
pub trait Input {
    /// every command that arrived since the last call, without blocking
    fn read_commands(&mut self) -> Result<Vec<Command>, io::Error>;
}

/// simple implementation of Input, reading terminal events with crossterm.
/// raw mode is owned by the display
pub struct StdinInput;

impl StdinInput {
    pub fn new() -> Self {
        StdinInput
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for StdinInput {
    fn read_commands(&mut self) -> Result<Vec<Command>, io::Error> {
        let mut commands = Vec::new();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(key) => match Command::from_key(key) {
                    Some(command) => commands.push(command),
                    None => trace!(?key, "ignored key"),
                },
                event => trace!(?event, "ignored event"),
            }
        }
        Ok(commands)
    }
}

/// dummy Input implementation for testing: hands out one batch per call,
/// then nothing
pub struct DummyInput {
    batches: VecDeque<Vec<Command>>,
}

impl DummyInput {
    pub fn new(batches: Vec<Vec<Command>>) -> Self {
        DummyInput {
            batches: batches.into(),
        }
    }

    /// one batch typing `text`
    pub fn typing(text: &str) -> Vec<Command> {
        text.chars().map(Command::Insert).collect()
    }
}

impl Input for DummyInput {
    fn read_commands(&mut self) -> Result<Vec<Command>, io::Error> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
