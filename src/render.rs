//! per-frame evaluation of the grid
//!
//! `render_frame` is the pure part: one evaluator, one `t`, 256 glyphs.
//! `RenderLoop` adds the state between frames, which is only the animation
//! clock and a handle on the evaluator slot. Time is passed in, so nothing
//! here sleeps or touches the terminal.
use std::time::Instant;

use tracing::trace;

use crate::clock::AnimationClock;
use crate::compiler::{Evaluator, Value};
use crate::error::EvalError;
use crate::grid::{self, Cell, Glyph, CELLS};
use crate::slot::EvaluatorSlot;

/// numeric coercion of an evaluation result; a failed cell is NaN
pub fn coerce(result: &Result<Value, EvalError>) -> f64 {
    match result {
        Ok(value) => value.to_number(),
        Err(_) => f64::NAN,
    }
}

/// everything needed to paint one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub t: f64,
    glyphs: [Glyph; CELLS],
    /// how many cells failed to evaluate
    pub failed: usize,
    /// the first failure, for diagnostics
    pub error: Option<EvalError>,
}

impl Frame {
    pub fn glyph(&self, index: usize) -> Glyph {
        self.glyphs[index]
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> Glyph {
        self.glyphs[y * grid::COUNT + x]
    }

    /// every cell with its glyph, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Glyph)> + '_ {
        grid::cells().map(move |cell| (cell, self.glyphs[cell.index]))
    }
}

/// evaluate every cell at time `t`
pub fn render_frame(evaluator: &Evaluator, t: f64) -> Frame {
    let mut frame = Frame {
        t,
        glyphs: [Glyph::EMPTY; CELLS],
        failed: 0,
        error: None,
    };
    for cell in grid::cells() {
        let result = evaluator.call(t, cell.index as f64, cell.x as f64, cell.y as f64);
        frame.glyphs[cell.index] = Glyph::from_value(coerce(&result));
        if let Err(error) = result {
            frame.failed += 1;
            if frame.error.is_none() {
                frame.error = Some(error);
            }
        }
    }
    frame
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// no usable evaluator, nothing is painted
    Idle,
    Active,
}

pub struct RenderLoop {
    slot: EvaluatorSlot,
    clock: AnimationClock,
}

impl RenderLoop {
    pub fn new(slot: EvaluatorSlot) -> Self {
        RenderLoop {
            slot,
            clock: AnimationClock::new(),
        }
    }

    pub fn state(&self) -> State {
        if self.slot.is_active() {
            State::Active
        } else {
            State::Idle
        }
    }

    /// advance one frame. `None` while idle
    pub fn step(&mut self, now: Instant) -> Option<Frame> {
        let snapshot = self.slot.read();
        let evaluator = snapshot.evaluator?;
        let t = self.clock.elapsed(snapshot.generation, now);
        let frame = render_frame(&evaluator, t);
        trace!(t, failed = frame.failed, "rendered frame");
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::grid::Tone;
    use std::time::Duration;

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(&Ok(Value::Number(2.5))), 2.5);
        assert_eq!(coerce(&Ok(Value::Bool(true))), 1.0);
        assert!(coerce(&Ok(Value::Undefined)).is_nan());
        assert!(coerce(&Err(EvalError::UnknownName("q".into()))).is_nan());
    }

    #[test]
    fn test_frame_uses_cell_coordinates() {
        let e = compile("x / 16 - y / 16").unwrap();
        let frame = render_frame(&e, 0.0);
        assert_eq!(frame.glyph_at(0, 0), Glyph::EMPTY);
        assert_eq!(frame.glyph_at(8, 0), Glyph { radius: 4.0, tone: Tone::Neutral });
        assert_eq!(frame.glyph_at(0, 8), Glyph { radius: 4.0, tone: Tone::Accent });
        assert_eq!(frame.glyph(8), frame.glyph_at(8, 0));
    }

    #[test]
    fn test_index_counts_row_major() {
        let e = compile("i == 17").unwrap();
        let frame = render_frame(&e, 0.0);
        let visible = frame
            .iter()
            .filter(|(_, glyph)| glyph.is_visible())
            .map(|(cell, _)| (cell.x, cell.y))
            .collect::<Vec<_>>();
        assert_eq!(visible, vec![(1, 1)]);
    }

    #[test]
    fn test_failed_cells_are_isolated() {
        let e = compile("x < 8 ? 1 : missing").unwrap();
        let frame = render_frame(&e, 0.0);
        assert_eq!(frame.failed, 128);
        assert_eq!(frame.error, Some(EvalError::UnknownName("missing".into())));
        assert_eq!(frame.glyph_at(7, 3).radius, 8.0);
        assert_eq!(frame.glyph_at(8, 3), Glyph::EMPTY);
    }

    #[test]
    fn test_idle_without_evaluator() {
        let slot = EvaluatorSlot::new();
        let mut render = RenderLoop::new(slot.clone());
        assert_eq!(render.state(), State::Idle);
        assert!(render.step(Instant::now()).is_none());
        slot.install(compile(")(").ok());
        assert!(render.step(Instant::now()).is_none());
    }

    #[test]
    fn test_time_restarts_on_install() {
        let slot = EvaluatorSlot::new();
        let mut render = RenderLoop::new(slot.clone());
        let start = Instant::now();
        slot.install(compile("t").ok());
        assert_eq!(render.state(), State::Active);
        assert_eq!(render.step(start).unwrap().t, 0.0);
        let frame = render.step(start + Duration::from_millis(500)).unwrap();
        assert!((frame.t - 0.5).abs() < 1e-9);
        assert_eq!(frame.glyph(0).radius, 4.0);

        slot.install(compile("t * 2").ok());
        let frame = render.step(start + Duration::from_secs(2)).unwrap();
        assert_eq!(frame.t, 0.0);
    }
}
