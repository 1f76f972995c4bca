//! The display [`Grid`]: a 2D buffer of styled [`Cell`]s, plus frame
//! diffing ([`compute_frame`]) used by the application loop to flush only
//! the cells that changed.

use crate::geom::{Point, Range};
use crate::style::{Color, Style};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A styled character cell on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// A blank cell painted with background `bg`.
    #[inline]
    pub const fn filled(bg: Color) -> Self {
        Self {
            ch: ' ',
            style: Style {
                fg: Color::DEFAULT,
                bg,
                attrs: crate::style::AttrMask::NONE,
            },
        }
    }

    /// Set the character (builder).
    #[inline]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    /// Set the style (builder).
    #[inline]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A 2D grid of display [`Cell`]s, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the grid as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside this grid's bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Read the cell at `p`. Returns `Cell::default()` if `p` is outside
    /// bounds.
    pub fn at(&self, p: Point) -> Cell {
        self.bounds
            .index_of(p)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    /// Set the cell at `p`. No-op if `p` is outside bounds.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.bounds.index_of(p) {
            self.cells[i] = cell;
        }
    }

    /// Fill every cell in the grid with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `text` starting at `p`, one character per cell, clipped to the
    /// grid. Returns the number of cells written.
    pub fn write_text(&mut self, p: Point, text: &str, style: Style) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(i as i32, 0);
            if !self.contains(q) {
                break;
            }
            self.set(q, Cell { ch, style });
            written += 1;
        }
        written
    }

    /// Copy every cell of `src` into `self`. Both grids must have the same
    /// size; otherwise the overlapping top-left area is copied.
    pub fn copy_from(&mut self, src: &Grid) {
        if self.bounds == src.bounds {
            self.cells.copy_from_slice(&src.cells);
            return;
        }
        for p in self.bounds.intersect(src.bounds) {
            self.set(p, src.at(p));
        }
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two same-sized grids.
///
/// Returns a [`Frame`] containing only the cells that differ.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let bounds = curr.bounds();
    let cells = curr
        .iter()
        .filter(|&(p, c)| prev.at(p) != c)
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: bounds.width(),
        height: bounds.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_new_and_at() {
        let g = Grid::new(4, 3);
        assert_eq!(g.size(), Point::new(4, 3));
        assert_eq!(g.at(Point::new(0, 0)), Cell::default());
    }

    #[test]
    fn grid_set_and_get() {
        let mut g = Grid::new(4, 3);
        let c = Cell::default().with_char('X');
        g.set(Point::new(2, 1), c);
        assert_eq!(g.at(Point::new(2, 1)).ch, 'X');
        // out of bounds is ignored and reads as default
        g.set(Point::new(10, 10), c);
        assert_eq!(g.at(Point::new(10, 10)), Cell::default());
    }

    #[test]
    fn grid_fill() {
        let mut g = Grid::new(3, 2);
        g.fill(Cell::filled(Color::from_rgb(1, 2, 3)));
        for (_, cell) in g.iter() {
            assert_eq!(cell.style.bg, Color::from_rgb(1, 2, 3));
        }
    }

    #[test]
    fn write_text_clips_at_edge() {
        let mut g = Grid::new(5, 1);
        let n = g.write_text(Point::new(2, 0), "abcdef", Style::default());
        assert_eq!(n, 3);
        assert_eq!(g.at(Point::new(4, 0)).ch, 'c');
    }

    #[test]
    fn copy_from_same_size() {
        let mut a = Grid::new(3, 2);
        let mut b = Grid::new(3, 2);
        b.set(Point::new(1, 1), Cell::default().with_char('#'));
        a.copy_from(&b);
        assert_eq!(a, b);
    }

    #[test]
    fn compute_frame_diff() {
        let a = Grid::new(3, 2);
        let mut b = Grid::new(3, 2);
        b.set(Point::new(1, 0), Cell::default().with_char('A'));
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(frame.cells[0].cell.ch, 'A');
        assert!(compute_frame(&b, &b).cells.is_empty());
    }
}
