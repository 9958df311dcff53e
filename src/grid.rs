//! grid geometry and the mapping from a cell's value to its glyph

/// dots per side
pub const COUNT: usize = 16;
/// number of cells
pub const CELLS: usize = COUNT * COUNT;
/// diameter of a fully saturated dot
pub const SIZE: f64 = 16.0;
/// gap between neighbouring cells
pub const SPACING: f64 = 1.0;
/// side of the drawing surface: 16 * (16 + 1) - 1 = 271
pub const WIDTH: f64 = COUNT as f64 * (SIZE + SPACING) - SPACING;
/// largest radius a glyph can have
pub const MAX_RADIUS: f64 = SIZE / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// zero and positive values
    Neutral,
    /// negative values
    Accent,
}

/// one grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub index: usize,
    pub x: usize,
    pub y: usize,
}

impl Cell {
    /// centre of the cell on the drawing surface
    pub fn centre(&self) -> (f64, f64) {
        (
            self.x as f64 * (SIZE + SPACING) + SIZE / 2.0,
            self.y as f64 * (SIZE + SPACING) + SIZE / 2.0,
        )
    }
}

/// every cell in row-major order, index counting up from 0
pub fn cells() -> impl Iterator<Item = Cell> {
    (0..CELLS).map(|index| Cell {
        index,
        x: index % COUNT,
        y: index / COUNT,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub radius: f64,
    pub tone: Tone,
}

impl Glyph {
    /// nothing to draw
    pub const EMPTY: Glyph = Glyph {
        radius: 0.0,
        tone: Tone::Neutral,
    };

    /// radius is `min(|v|, 1) * SIZE / 2`, accent iff `v < 0`. NaN draws
    /// nothing
    pub fn from_value(value: f64) -> Glyph {
        if value.is_nan() {
            return Glyph::EMPTY;
        }
        Glyph {
            radius: value.abs().min(1.0) * MAX_RADIUS,
            tone: if value < 0.0 {
                Tone::Accent
            } else {
                Tone::Neutral
            },
        }
    }

    pub fn is_visible(&self) -> bool {
        self.radius > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        assert_eq!(CELLS, 256);
        assert_eq!(WIDTH, 271.0);
        assert_eq!(MAX_RADIUS, 8.0);
    }

    #[test]
    fn test_cells_are_row_major() {
        let cells = cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), 256);
        assert_eq!(cells[0], Cell { index: 0, x: 0, y: 0 });
        assert_eq!(cells[17], Cell { index: 17, x: 1, y: 1 });
        assert_eq!(cells[255], Cell { index: 255, x: 15, y: 15 });
        for cell in cells {
            assert_eq!(cell.index, cell.y * COUNT + cell.x);
        }
    }

    #[test]
    fn test_centres() {
        let mut cells = cells();
        assert_eq!(cells.next().map(|c| c.centre()), Some((8.0, 8.0)));
        assert_eq!(cells.last().map(|c| c.centre()), Some((263.0, 263.0)));
        // the last dot touches the far edge when saturated
        assert_eq!(263.0 + MAX_RADIUS, WIDTH);
    }

    #[test]
    fn test_glyph_scales_and_saturates() {
        assert_eq!(Glyph::from_value(0.5), Glyph { radius: 4.0, tone: Tone::Neutral });
        assert_eq!(Glyph::from_value(-0.25), Glyph { radius: 2.0, tone: Tone::Accent });
        assert_eq!(Glyph::from_value(3.0), Glyph { radius: 8.0, tone: Tone::Neutral });
        assert_eq!(Glyph::from_value(-5.0), Glyph { radius: 8.0, tone: Tone::Accent });
    }

    #[test]
    fn test_glyph_edge_values() {
        assert_eq!(Glyph::from_value(f64::INFINITY), Glyph { radius: 8.0, tone: Tone::Neutral });
        assert_eq!(Glyph::from_value(f64::NEG_INFINITY), Glyph { radius: 8.0, tone: Tone::Accent });
        assert_eq!(Glyph::from_value(f64::NAN), Glyph::EMPTY);
        assert_eq!(Glyph::from_value(-0.0), Glyph::EMPTY);
        assert!(!Glyph::from_value(0.0).is_visible());
    }
}
