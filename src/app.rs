//! one loop: read keys, edit and recompile, render, draw, wait for the tick
use std::io;
use std::time::Instant;

use tracing::{debug, info};

use crate::catalog;
use crate::clock::Ticker;
use crate::display::{Display, Panel};
use crate::editor::Editor;
use crate::error::ImportError;
use crate::input::{Command, Input};
use crate::render::{RenderLoop, State};
use crate::slot::EvaluatorSlot;

/// shown when the code is not one of the examples
pub const HINTS: [&str; 2] = ["hit \"enter\" to keep this code", "\"tab\" for more examples"];

pub struct App<'a> {
    editor: Editor,
    render: RenderLoop,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    // replaces the comment until the text changes
    notice: Option<[String; 2]>,
    submitted: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(source: &str, display: &'a mut dyn Display, input: &'a mut dyn Input) -> Self {
        let slot = EvaluatorSlot::new();
        App {
            editor: Editor::new(slot.clone(), source),
            render: RenderLoop::new(slot),
            display,
            input,
            notice: None,
            submitted: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn state(&self) -> State {
        self.render.state()
    }

    /// the last code kept with enter
    pub fn submitted(&self) -> Option<&str> {
        self.submitted.as_deref()
    }

    pub fn report_import_error(&mut self, error: &ImportError) {
        self.notice = Some([
            String::from("// could not load snippet"),
            format!("// {error}"),
        ]);
    }

    pub fn panel(&self) -> Panel {
        let code = self.editor.text();
        let comment = match (&self.notice, catalog::annotation(code)) {
            (Some(notice), _) => notice.clone(),
            (None, Some(annotation)) => catalog::comment_lines(annotation),
            (None, None) => HINTS.map(|hint| format!("// {hint}")),
        };
        Panel {
            code: code.to_owned(),
            cursor: self.editor.cursor(),
            over_limit: self.editor.is_over_limit(),
            comment,
        }
    }

    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Submit => {
                info!(code = %self.editor.text(), "submitted");
                self.submitted = Some(self.editor.text().to_owned());
            }
            Command::NextExample => {
                if let Some(example) = catalog::next(self.editor.text()) {
                    debug!(code = example.code, "next example");
                    self.editor.set_text(example.code);
                    self.notice = None;
                }
            }
            command => {
                if self.editor.apply(command) {
                    self.notice = None;
                }
            }
        }
        true
    }

    /// one iteration of the loop at `now`; false once the user quits
    pub fn tick(&mut self, now: Instant) -> Result<bool, io::Error> {
        for command in self.input.read_commands()? {
            if !self.handle(command) {
                return Ok(false);
            }
        }
        let frame = self.render.step(now);
        self.display.draw(frame.as_ref(), &self.panel())?;
        Ok(true)
    }

    pub fn run(&mut self, fps: u32) -> Result<(), io::Error> {
        let mut ticker = Ticker::new(fps);
        debug!(period = ?ticker.period(), "starting render loop");
        loop {
            let now = ticker.wait();
            if !self.tick(now)? {
                return Ok(());
            }
        }
    }
}
