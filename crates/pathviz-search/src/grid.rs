//! The grid model: one [`Cell`] of search state per grid position.

use pathviz_core::{Point, Range};
use rand::{Rng, RngExt};

use crate::error::SearchError;
use crate::neighbors::{Connectivity, Neighbors};

/// Sentinel cost meaning "not reached yet".
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Semantic state of a cell. Display colours are derived from this by the
/// renderer and are never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Unvisited,
    Wall,
    Frontier,
    Visited,
    Path,
}

/// Per-position search record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub state: CellState,
    /// Cumulative cost from the start, [`UNREACHABLE`] until reached.
    pub cost: f64,
    /// Estimated remaining cost to the goal (A* only).
    pub heuristic: f64,
    /// `cost + heuristic` (A* only).
    pub priority: f64,
    /// Predecessor on the best known path. Points at the cell itself until
    /// the cell is reached.
    pub parent: Point,
}

impl Cell {
    fn unvisited(at: Point) -> Self {
        Self {
            state: CellState::Unvisited,
            cost: UNREACHABLE,
            heuristic: 0.0,
            priority: 0.0,
            parent: at,
        }
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.state == CellState::Wall
    }

    /// Whether the search has assigned this cell a finite cost.
    #[inline]
    pub fn is_reached(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Counts of cells per state, taken after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub walls: usize,
    pub frontier: usize,
    pub visited: usize,
    pub path: usize,
}

/// A `rows × cols` grid of search [`Cell`]s, stored row-major.
///
/// Walls are painted before a search; during a run only the search engine
/// mutates cells.
#[derive(Debug, Clone)]
pub struct SearchGrid {
    cells: Vec<Cell>,
    bounds: Range,
}

impl SearchGrid {
    /// Allocate a grid of default (unvisited, unreachable) cells.
    pub fn new(rows: i32, cols: i32) -> Result<Self, SearchError> {
        if rows <= 0 || cols <= 0 {
            return Err(SearchError::EmptyGrid { rows, cols });
        }
        let bounds = Range::with_dims(rows, cols);
        let cells = bounds.iter().map(Cell::unvisited).collect();
        Ok(Self { cells, bounds })
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.bounds.width()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Whether `0 <= row < rows` and `0 <= col < cols`.
    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// In-bounds neighbors of `p` in the fixed clockwise order.
    #[inline]
    pub fn neighbors(&self, p: Point, connectivity: Connectivity) -> Neighbors {
        Neighbors::new(p, connectivity, self.bounds)
    }

    pub fn get(&self, p: Point) -> Option<&Cell> {
        self.bounds.index_of(p).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, p: Point) -> Option<&mut Cell> {
        self.bounds.index_of(p).map(move |i| &mut self.cells[i])
    }

    /// Mark `p` as a wall and reset its cost. No-op out of bounds.
    pub fn set_wall(&mut self, p: Point) {
        if let Some(c) = self.get_mut(p) {
            *c = Cell::unvisited(p);
            c.state = CellState::Wall;
        }
    }

    /// Turn a wall back into an open cell. No-op out of bounds.
    pub fn clear_wall(&mut self, p: Point) {
        if let Some(c) = self.get_mut(p) {
            if c.is_wall() {
                *c = Cell::unvisited(p);
            }
        }
    }

    /// Whether `p` is a wall. Out-of-bounds points are not walls.
    #[inline]
    pub fn is_wall(&self, p: Point) -> bool {
        self.get(p).is_some_and(Cell::is_wall)
    }

    /// Positions of all walls, row-major.
    pub fn walls(&self) -> impl Iterator<Item = Point> + '_ {
        self.iter().filter(|(_, c)| c.is_wall()).map(|(p, _)| p)
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        for (i, c) in self.cells.iter_mut().enumerate() {
            if c.is_wall() {
                *c = Cell::unvisited(self.bounds.point_at(i));
            }
        }
    }

    /// Turn each open cell into a wall with probability `density`, leaving
    /// the cells in `keep` untouched. Returns the number of walls added.
    ///
    /// Densities outside `0.0..=1.0` are clamped; NaN adds no walls.
    pub fn scatter_walls<R: Rng>(&mut self, rng: &mut R, density: f64, keep: &[Point]) -> usize {
        if density.is_nan() {
            return 0;
        }
        let density = density.clamp(0.0, 1.0);
        let mut added = 0;
        for p in self.bounds {
            if keep.contains(&p) || self.is_wall(p) {
                continue;
            }
            if rng.random_bool(density) {
                self.set_wall(p);
                added += 1;
            }
        }
        added
    }

    /// Restore every non-wall cell to its default search state.
    pub fn reset_search_state(&mut self) {
        for (i, c) in self.cells.iter_mut().enumerate() {
            if !c.is_wall() {
                *c = Cell::unvisited(self.bounds.point_at(i));
            }
        }
    }

    /// Validate a start/goal pair against this grid.
    pub fn check_endpoints(&self, start: Point, goal: Point) -> Result<(), SearchError> {
        for (which, p) in [("start", start), ("goal", goal)] {
            if !self.in_bounds(p) {
                return Err(SearchError::OutOfBounds {
                    which,
                    pos: p,
                    rows: self.rows(),
                    cols: self.cols(),
                });
            }
            if self.is_wall(p) {
                return Err(SearchError::OnWall { which, pos: p });
            }
        }
        if start == goal {
            return Err(SearchError::SameEndpoints(start));
        }
        Ok(())
    }

    /// Row-major iterator over `(Point, &Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter())
    }

    /// Tally cells by state.
    pub fn stats(&self) -> SearchStats {
        let mut s = SearchStats::default();
        for c in &self.cells {
            match c.state {
                CellState::Wall => s.walls += 1,
                CellState::Frontier => s.frontier += 1,
                CellState::Visited => s.visited += 1,
                CellState::Path => s.path += 1,
                CellState::Unvisited => {}
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn new_grid_is_unvisited_and_self_parented() {
        let g = SearchGrid::new(3, 4).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 4);
        assert_eq!(g.len(), 12);
        for (p, c) in g.iter() {
            assert_eq!(c.state, CellState::Unvisited);
            assert_eq!(c.cost, UNREACHABLE);
            assert_eq!(c.parent, p);
        }
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            SearchGrid::new(0, 5),
            Err(SearchError::EmptyGrid { rows: 0, cols: 5 })
        ));
        assert!(SearchGrid::new(5, -1).is_err());
    }

    #[test]
    fn in_bounds_uses_rows_and_cols() {
        let g = SearchGrid::new(2, 5).unwrap();
        assert!(g.in_bounds(Point::at(1, 4)));
        assert!(!g.in_bounds(Point::at(2, 0)));
        assert!(!g.in_bounds(Point::at(0, 5)));
        assert!(!g.in_bounds(Point::at(-1, 0)));
    }

    #[test]
    fn set_wall_resets_cost_and_ignores_out_of_bounds() {
        let mut g = SearchGrid::new(3, 3).unwrap();
        g.get_mut(Point::at(1, 1)).unwrap().cost = 2.0;
        g.set_wall(Point::at(1, 1));
        let c = g.get(Point::at(1, 1)).unwrap();
        assert!(c.is_wall());
        assert_eq!(c.cost, UNREACHABLE);

        g.set_wall(Point::at(7, 7));
        assert_eq!(g.walls().count(), 1);
    }

    #[test]
    fn clear_wall_and_clear_walls() {
        let mut g = SearchGrid::new(3, 3).unwrap();
        g.set_wall(Point::at(0, 1));
        g.set_wall(Point::at(2, 2));
        g.clear_wall(Point::at(0, 1));
        assert!(!g.is_wall(Point::at(0, 1)));
        assert!(g.is_wall(Point::at(2, 2)));
        g.clear_walls();
        assert_eq!(g.walls().count(), 0);
    }

    #[test]
    fn reset_keeps_walls() {
        let mut g = SearchGrid::new(2, 2).unwrap();
        g.set_wall(Point::at(0, 1));
        {
            let c = g.get_mut(Point::at(1, 1)).unwrap();
            c.state = CellState::Visited;
            c.cost = 3.0;
            c.parent = Point::at(0, 0);
        }
        g.reset_search_state();
        assert!(g.is_wall(Point::at(0, 1)));
        let c = g.get(Point::at(1, 1)).unwrap();
        assert_eq!(c.state, CellState::Unvisited);
        assert_eq!(c.parent, Point::at(1, 1));
        assert!(!c.is_reached());
    }

    #[test]
    fn check_endpoints_rejects_bad_pairs() {
        let mut g = SearchGrid::new(3, 3).unwrap();
        g.set_wall(Point::at(1, 1));
        assert!(g.check_endpoints(Point::at(0, 0), Point::at(2, 2)).is_ok());
        assert!(matches!(
            g.check_endpoints(Point::at(0, 0), Point::at(3, 0)),
            Err(SearchError::OutOfBounds { which: "goal", .. })
        ));
        assert!(matches!(
            g.check_endpoints(Point::at(1, 1), Point::at(0, 0)),
            Err(SearchError::OnWall { which: "start", .. })
        ));
        assert!(matches!(
            g.check_endpoints(Point::at(2, 0), Point::at(2, 0)),
            Err(SearchError::SameEndpoints(_))
        ));
    }

    #[test]
    fn scatter_walls_respects_keep_and_seed() {
        let keep = [Point::at(0, 0), Point::at(9, 9)];
        let mut a = SearchGrid::new(10, 10).unwrap();
        let mut b = SearchGrid::new(10, 10).unwrap();
        let na = a.scatter_walls(&mut StdRng::seed_from_u64(7), 1.0, &keep);
        let nb = b.scatter_walls(&mut StdRng::seed_from_u64(7), 1.0, &keep);
        assert_eq!(na, 98);
        assert_eq!(na, nb);
        assert!(!a.is_wall(keep[0]));
        assert!(!a.is_wall(keep[1]));

        let mut c = SearchGrid::new(10, 10).unwrap();
        assert_eq!(c.scatter_walls(&mut StdRng::seed_from_u64(7), 0.0, &keep), 0);
    }

    #[test]
    fn scatter_walls_tolerates_odd_densities() {
        let mut g = SearchGrid::new(4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(g.scatter_walls(&mut rng, f64::NAN, &[]), 0);
        assert_eq!(g.scatter_walls(&mut rng, -0.5, &[]), 0);
        assert_eq!(g.walls().count(), 0);
        assert_eq!(g.scatter_walls(&mut rng, 3.0, &[]), 16);
    }

    #[test]
    fn stats_tally_states() {
        let mut g = SearchGrid::new(2, 2).unwrap();
        g.set_wall(Point::at(0, 0));
        g.get_mut(Point::at(0, 1)).unwrap().state = CellState::Visited;
        g.get_mut(Point::at(1, 0)).unwrap().state = CellState::Frontier;
        let s = g.stats();
        assert_eq!(
            s,
            SearchStats {
                walls: 1,
                frontier: 1,
                visited: 1,
                path: 0
            }
        );
    }
}
