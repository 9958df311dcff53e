use tracing::debug;

use crate::compiler::compile;
use crate::error::CompileError;
use crate::input::Command;
use crate::slot::EvaluatorSlot;

/// longer code still runs, it is only flagged
pub const LENGTH_LIMIT: usize = 32;

/// the source text, its cursor, and the compile step that follows every edit
pub struct Editor {
    text: String,
    // in chars, not bytes
    cursor: usize,
    slot: EvaluatorSlot,
    compile_error: Option<CompileError>,
}

impl Editor {
    pub fn new(slot: EvaluatorSlot, text: &str) -> Self {
        let mut editor = Editor {
            text: String::new(),
            cursor: 0,
            slot,
            compile_error: None,
        };
        editor.set_text(text);
        editor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_over_limit(&self) -> bool {
        self.text.chars().count() > LENGTH_LIMIT
    }

    /// why the current text has no evaluator, if it has none
    pub fn compile_error(&self) -> Option<&CompileError> {
        self.compile_error.as_ref()
    }

    /// replace the whole text, e.g. with an example or an imported snippet
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.cursor = self.text.chars().count();
        self.recompile();
    }

    /// apply an editing command; returns whether the text changed
    pub fn apply(&mut self, command: Command) -> bool {
        let length = self.text.chars().count();
        match command {
            Command::Insert(character) => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, character);
                self.cursor += 1;
            }
            Command::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
            }
            Command::Delete if self.cursor < length => {
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
            }
            Command::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                return false;
            }
            Command::Right => {
                self.cursor = (self.cursor + 1).min(length);
                return false;
            }
            Command::Home => {
                self.cursor = 0;
                return false;
            }
            Command::End => {
                self.cursor = length;
                return false;
            }
            _ => return false,
        }
        self.recompile();
        true
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn recompile(&mut self) {
        match compile(&self.text) {
            Ok(evaluator) => {
                self.compile_error = None;
                self.slot.install(Some(evaluator));
            }
            Err(error) => {
                debug!(source = %self.text, %error, "expression does not compile");
                self.compile_error = Some(error);
                self.slot.install(None);
            }
        }
    }
}
