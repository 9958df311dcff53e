//! tixy: a 16x16 grid of dots animated by a tiny expression of `t`, `i`,
//! `x` and `y`, in the terminal
//!
//! ## Design
//!
//! * whatever the user types is compiled on every keystroke; bad input is
//!   never fatal, it only leaves the grid empty
//! * a compiled expression is a tree that gets walked once per cell per
//!   frame, with every name resolved up front
//! * evaluation failures are values, one per cell, so a single bad cell
//!   cannot take the frame down
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * input device, with trait for reading key-presses
//! * time restarts at 0 whenever a new evaluator is installed
//!
//! Model
//!
//! App
//!  |-- display, input, config
//!  |-- editor(slot)
//!  |    `-- on every edit: compile(text) -> slot.install(evaluator or none)
//!  |-- render loop(slot)
//!  |    |-- snapshot = slot.read()
//!  |    |-- t = clock.elapsed(snapshot.generation)
//!  |    `-- frame = 256 x glyph(evaluator(t, i, x, y))
//!  `-- main loop
//!       |-- commands = input.read_commands()
//!       |-- apply them to the editor
//!       |-- display.draw(frame, panel)
//!       `-- ticker.wait()
pub mod app;
pub mod catalog;
pub mod clock;
pub mod compiler;
pub mod config;
pub mod display;
pub mod editor;
pub mod error;
pub mod grid;
pub mod input;
pub mod logging;
pub mod math;
pub mod parser;
pub mod render;
pub mod slot;
pub mod snippet;
