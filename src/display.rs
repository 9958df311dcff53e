use std::io;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use tracing::debug;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::text::{Span, Spans};
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders, Paragraph};
use tui::Terminal;

use crate::editor::LENGTH_LIMIT;
use crate::grid::{Glyph, Tone, WIDTH};
use crate::render::Frame;

/// the text side of the screen: the editor line and the two comment lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub code: String,
    /// in chars
    pub cursor: usize,
    pub over_limit: bool,
    pub comment: [String; 2],
}

/// Display is used by the app to put frames and the panel on the screen. It
/// should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Display {
    /// draw one frame; `None` leaves the grid empty
    fn draw(&mut self, frame: Option<&Frame>, panel: &Panel) -> Result<(), io::Error>;
}

// how finely glyphs are rasterised onto the surface
#[derive(Debug, Clone, Copy, PartialEq)]
struct Surface {
    step: f64,
}

impl Surface {
    // braille packs 2x4 dots into each terminal cell
    const DOTS_X: f64 = 2.0;
    const DOTS_Y: f64 = 4.0;

    fn new(step: f64) -> Self {
        Surface {
            step: step.max(1.0),
        }
    }

    /// one sample per braille dot of a canvas this many cells big
    fn fit(columns: u16, rows: u16) -> Self {
        let across = WIDTH / (f64::from(columns.max(1)) * Self::DOTS_X);
        let down = WIDTH / (f64::from(rows.max(1)) * Self::DOTS_Y);
        Surface::new(across.max(down))
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, WIDTH]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-WIDTH, 0.0]
    }

    /// every sample inside the disc of `glyph` centred on `(cx, cy)`; the
    /// centre is always one of them
    fn disc(&self, (cx, cy): (f64, f64), glyph: Glyph) -> impl Iterator<Item = (f64, f64)> {
        let step = self.step;
        let radius = glyph.radius;
        let reach = (radius / step).floor() as i64;
        let side = 2 * reach + 1;
        let mut count = if glyph.is_visible() { side * side } else { 0 };
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let dx = (count % side - reach) as f64 * step;
                let dy = (count / side - reach) as f64 * step;
                if dx * dx + dy * dy <= radius * radius {
                    return Some((
                        cx + dx,         // x
                        -1.0 * (cy + dy), // y, the surface grows downwards
                    ));
                }
            }
            None
        })
    }

    fn tone_points(&self, frame: &Frame, tone: Tone) -> Vec<(f64, f64)> {
        frame
            .iter()
            .filter(|(_, glyph)| glyph.tone == tone && glyph.is_visible())
            .flat_map(|(cell, glyph)| self.disc(cell.centre(), glyph))
            .collect()
    }
}

fn colour(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::White,
        Tone::Accent => Color::Red,
    }
}

/// the grid plus panel in a terminal, rendered using TUI and crossterm
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TermDisplay {
    pub fn new() -> Result<TermDisplay, io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(TermDisplay { terminal })
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        if let Err(error) = disable_raw_mode()
            .and_then(|_| execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show))
        {
            debug!(%error, "could not restore the terminal");
        }
    }
}

/// terminal column of the text cursor inside a bordered box, kept on the
/// last inner column however long the text gets
fn cursor_column(area: Rect, cursor: usize) -> u16 {
    let offset = u16::try_from(cursor).unwrap_or(u16::MAX);
    let last = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(offset).min(last)
}

// editor box plus two comment lines under the canvas
const PANEL_ROWS: u16 = 5;

impl Display for TermDisplay {
    fn draw(&mut self, frame: Option<&Frame>, panel: &Panel) -> Result<(), io::Error> {
        self.terminal.draw(|f| {
            let size = f.size();
            // a square canvas is twice as wide as it is tall in cells
            let rows = size.height.saturating_sub(PANEL_ROWS).max(3);
            let columns = rows.saturating_mul(2).min(size.width).max(3);
            let rows = rows.min(columns / 2 + 1);
            let canvas_area = Rect::new(0, 0, columns, rows).intersection(size);
            let surface = Surface::fit(columns.saturating_sub(2), rows.saturating_sub(2));

            let (neutral, accent) = match frame {
                Some(frame) => (
                    surface.tone_points(frame, Tone::Neutral),
                    surface.tone_points(frame, Tone::Accent),
                ),
                None => (Vec::new(), Vec::new()),
            };
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("tixy")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(surface.x_bounds())
                .y_bounds(surface.y_bounds())
                .marker(Marker::Braille)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &neutral,
                        color: colour(Tone::Neutral),
                    });
                    ctx.draw(&Points {
                        coords: &accent,
                        color: colour(Tone::Accent),
                    });
                });
            f.render_widget(canvas, canvas_area);

            let bottom = size.y + size.height;
            let editor_y = rows.min(bottom.saturating_sub(1));
            let editor_area = Rect::new(0, editor_y, columns, 3).intersection(size);
            let (title, border) = if panel.over_limit {
                (format!("{} chars max", LENGTH_LIMIT), Style::default().fg(Color::Red))
            } else {
                (String::from("code"), Style::default())
            };
            let editor = Paragraph::new(panel.code.as_str()).block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            f.render_widget(editor, editor_area);
            f.set_cursor(
                cursor_column(editor_area, panel.cursor),
                editor_area.y.saturating_add(1),
            );

            let comment_y = editor_area.y + editor_area.height;
            if comment_y < bottom {
                let comment = Paragraph::new(
                    panel
                        .comment
                        .iter()
                        .map(|line| Spans::from(Span::styled(line.as_str(), Style::default().fg(Color::Gray))))
                        .collect::<Vec<_>>(),
                );
                let comment_area = Rect::new(0, comment_y, columns, 2).intersection(size);
                f.render_widget(comment, comment_area);
            }
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines: keeps everything it was asked
/// to draw
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: Vec<Option<Frame>>,
    pub panels: Vec<Panel>,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay::default()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last().and_then(Option::as_ref)
    }

    pub fn last_panel(&self) -> Option<&Panel> {
        self.panels.last()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: Option<&Frame>, panel: &Panel) -> Result<(), io::Error> {
        self.frames.push(frame.cloned());
        self.panels.push(panel.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::render::render_frame;

    // Surface tests
    #[test]
    fn test_bounds() {
        let s = Surface::new(1.0);
        assert_eq!(s.x_bounds(), [0.0, 271.0]);
        assert_eq!(s.y_bounds(), [-271.0, 0.0]);
    }

    #[test]
    fn test_step_never_below_one() {
        assert_eq!(Surface::new(0.2).step, 1.0);
        assert_eq!(Surface::fit(1000, 1000).step, 1.0);
    }

    #[test]
    fn test_fit_uses_the_tighter_axis() {
        // 34 columns give 68 dots across, 17 rows give 68 dots down
        let s = Surface::fit(34, 17);
        assert!((s.step - 271.0 / 68.0).abs() < 1e-9);
        let s = Surface::fit(100, 17);
        assert!((s.step - 271.0 / 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_invisible_glyph_has_no_points() {
        let s = Surface::new(1.0);
        assert_eq!(s.disc((8.0, 8.0), Glyph::EMPTY).count(), 0);
    }

    #[test]
    fn test_tiny_glyph_keeps_its_centre() {
        let s = Surface::new(4.0);
        let glyph = Glyph::from_value(0.01);
        assert_eq!(s.disc((8.0, 8.0), glyph).collect::<Vec<_>>(), vec![(8.0, -8.0)]);
    }

    #[test]
    fn test_disc_stays_inside_radius() {
        let s = Surface::new(1.0);
        let glyph = Glyph::from_value(1.0);
        let points = s.disc((8.0, 8.0), glyph).collect::<Vec<_>>();
        // lattice points with dx*dx + dy*dy <= 64
        assert_eq!(points.len(), 197);
        for (x, y) in points {
            let (dx, dy) = (x - 8.0, -y - 8.0);
            assert!(dx * dx + dy * dy <= 64.0);
        }
    }

    #[test]
    fn test_tone_points_split_by_tone() {
        let s = Surface::new(8.0);
        let frame = render_frame(&compile("i == 0 ? 1 : i == 1 ? -1 : 0").unwrap(), 0.0);
        let neutral = s.tone_points(&frame, Tone::Neutral);
        let accent = s.tone_points(&frame, Tone::Accent);
        assert!(neutral.contains(&(8.0, -8.0)));
        assert!(accent.contains(&(25.0, -8.0)));
        assert!(neutral.iter().all(|(x, _)| *x <= 16.0));
        assert!(accent.iter().all(|(x, _)| *x >= 17.0 && *x <= 33.0));
    }

    #[test]
    fn test_cursor_column() {
        let area = Rect::new(2, 5, 40, 3);
        assert_eq!(cursor_column(area, 0), 3);
        assert_eq!(cursor_column(area, 3), 6);
        assert_eq!(cursor_column(area, 500), 40);
        assert_eq!(cursor_column(area, 70_000), 40);
        assert_eq!(cursor_column(area, usize::MAX), 40);
    }

    // DummyDisplay tests
    #[test]
    fn test_dummy_records() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let frame = render_frame(&compile("x").unwrap(), 0.0);
        let panel = Panel {
            code: String::from("x"),
            cursor: 1,
            ..Panel::default()
        };
        d.draw(None, &panel)?;
        d.draw(Some(&frame), &panel)?;
        assert_eq!(d.frames.len(), 2);
        assert!(d.frames[0].is_none());
        assert_eq!(d.last_frame().map(|f| f.t), Some(0.0));
        assert_eq!(d.last_panel(), Some(&panel));
        Ok(())
    }

    #[test]
    #[ignore]
    // NB. needs a real terminal
    fn test_term_display_draws() -> Result<(), io::Error> {
        let mut d = TermDisplay::new()?;
        let frame = render_frame(&compile("sin(t + i)").unwrap(), 0.0);
        d.draw(Some(&frame), &Panel::default())
    }
}
