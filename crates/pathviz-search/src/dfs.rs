use pathviz_core::Point;

use crate::events::{ColorTag, EventSink, VisualizationEvent};
use crate::grid::{CellState, SearchGrid};
use crate::neighbors::Connectivity;
use crate::strategy::SearchStrategy;

/// Depth-first search over 4-connected cells.
///
/// Stops as soon as the goal is pushed, without waiting to pop it, so the
/// goal never receives a `Visited` event. Paths are valid but not
/// shortest. A cell still on the frontier can be pushed again by a later
/// neighbor, which re-parents it; this keeps the traversal truly
/// depth-first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dfs;

impl SearchStrategy for Dfs {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn connectivity(&self) -> Connectivity {
        Connectivity::Four
    }

    fn explore<S: EventSink + ?Sized>(
        &self,
        grid: &mut SearchGrid,
        start: Point,
        goal: Point,
        sink: &mut S,
    ) {
        let mut stack: Vec<Point> = vec![start];
        if let Some(c) = grid.get_mut(start) {
            c.cost = 0.0;
            c.state = CellState::Frontier;
        }
        sink.emit(VisualizationEvent::new(start, ColorTag::Frontier));

        'search: while let Some(cur) = stack.pop() {
            let Some(cell) = grid.get_mut(cur) else {
                continue;
            };
            if cell.is_wall() || cell.state == CellState::Visited {
                continue;
            }
            cell.state = CellState::Visited;
            let cur_cost = cell.cost;
            sink.emit(VisualizationEvent::new(cur, ColorTag::Visited));

            if cur == goal {
                break;
            }

            for n in grid.neighbors(cur, self.connectivity()) {
                let Some(nc) = grid.get_mut(n) else {
                    continue;
                };
                if nc.is_wall() || nc.state == CellState::Visited {
                    continue;
                }
                nc.parent = cur;
                nc.cost = cur_cost + 1.0;
                let discovered = nc.state == CellState::Unvisited;
                if discovered {
                    nc.state = CellState::Frontier;
                }
                stack.push(n);
                if discovered {
                    sink.emit(VisualizationEvent::new(n, ColorTag::Frontier));
                }
                if n == goal {
                    break 'search;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PathResult;

    fn run(grid: &mut SearchGrid, start: Point, goal: Point) -> (PathResult, Vec<VisualizationEvent>) {
        let mut events = Vec::new();
        let r = Dfs.run(grid, start, goal, &mut events).unwrap();
        (r, events)
    }

    #[test]
    fn finds_a_valid_path() {
        let mut g = SearchGrid::new(5, 5).unwrap();
        let (r, _) = run(&mut g, Point::at(0, 0), Point::at(4, 4));
        let path = r.path().unwrap();
        assert_eq!(path.start(), Some(Point::at(0, 0)));
        assert_eq!(path.goal(), Some(Point::at(4, 4)));
        for w in path.cells().windows(2) {
            assert_eq!(crate::manhattan(w[0], w[1]), 1);
        }
        assert_eq!(path.cost(), path.steps() as f64);
    }

    #[test]
    fn goal_found_as_neighbor_is_never_visited() {
        let mut g = SearchGrid::new(3, 3).unwrap();
        let goal = Point::at(0, 1);
        let (r, events) = run(&mut g, Point::at(0, 0), goal);
        assert!(r.is_found());
        assert!(
            !events
                .iter()
                .any(|e| e.pos == goal && e.tag == ColorTag::Visited)
        );
        // Frontier, then Path, then Endpoint for the goal.
        let goal_tags: Vec<_> = events.iter().filter(|e| e.pos == goal).map(|e| e.tag).collect();
        assert_eq!(
            goal_tags,
            vec![ColorTag::Frontier, ColorTag::Path, ColorTag::Endpoint]
        );
    }

    #[test]
    fn dives_along_last_pushed_neighbor() {
        // From (0,0) the neighbors are pushed E then S, so S (1,0) is popped
        // first and the search runs down the first column.
        let mut g = SearchGrid::new(4, 4).unwrap();
        let (_, events) = run(&mut g, Point::at(0, 0), Point::at(3, 3));
        let visited: Vec<_> = events
            .iter()
            .filter(|e| e.tag == ColorTag::Visited)
            .map(|e| e.pos)
            .take(4)
            .collect();
        assert_eq!(
            visited,
            vec![Point::at(0, 0), Point::at(1, 0), Point::at(2, 0), Point::at(3, 0)]
        );
    }

    #[test]
    fn each_cell_visited_at_most_once() {
        let mut g = SearchGrid::new(6, 6).unwrap();
        g.set_wall(Point::at(2, 2));
        g.set_wall(Point::at(3, 3));
        let (_, events) = run(&mut g, Point::at(0, 0), Point::at(5, 5));
        let mut seen = std::collections::HashSet::new();
        for e in events.iter().filter(|e| e.tag == ColorTag::Visited) {
            assert!(seen.insert(e.pos));
        }
    }
}
