use std::collections::VecDeque;

use pathviz_core::Point;

use crate::events::{ColorTag, EventSink, VisualizationEvent};
use crate::grid::{CellState, SearchGrid};
use crate::neighbors::Connectivity;
use crate::strategy::SearchStrategy;

/// Breadth-first search over 4-connected cells.
///
/// Finds a path with the fewest moves. Each cell's `cost` is its edge
/// distance from the start.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bfs {
    /// Emit a `Visited` event whenever an already-reached neighbor is seen
    /// again. Purely cosmetic; cell state does not change.
    pub revisit_events: bool,
}

impl SearchStrategy for Bfs {
    fn name(&self) -> &'static str {
        "bfs"
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
        let mut queue: VecDeque<Point> = VecDeque::new();

        if let Some(c) = grid.get_mut(start) {
            c.cost = 0.0;
            c.state = CellState::Frontier;
        }
        sink.emit(VisualizationEvent::new(start, ColorTag::Frontier));
        queue.push_back(start);

        while let Some(cur) = queue.pop_front() {
            let Some(cell) = grid.get_mut(cur) else {
                continue;
            };
            if cell.state == CellState::Visited {
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
                if nc.is_wall() {
                    continue;
                }
                if nc.is_reached() {
                    if self.revisit_events {
                        sink.emit(VisualizationEvent::new(n, ColorTag::Visited));
                    }
                    continue;
                }
                nc.cost = cur_cost + 1.0;
                nc.parent = cur;
                nc.state = CellState::Frontier;
                queue.push_back(n);
                sink.emit(VisualizationEvent::new(n, ColorTag::Frontier));
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
        let r = Bfs::default().run(grid, start, goal, &mut events).unwrap();
        (r, events)
    }

    #[test]
    fn open_grid_shortest_is_manhattan() {
        let mut g = SearchGrid::new(5, 5).unwrap();
        let (r, _) = run(&mut g, Point::at(0, 0), Point::at(4, 4));
        let path = r.path().unwrap();
        assert_eq!(path.steps(), 8);
        assert_eq!(path.cost(), 8.0);
    }

    #[test]
    fn first_events_follow_neighbor_order() {
        let mut g = SearchGrid::new(3, 3).unwrap();
        let (_, events) = run(&mut g, Point::at(1, 1), Point::at(2, 2));
        let head: Vec<_> = events.iter().take(6).copied().collect();
        assert_eq!(
            head,
            vec![
                VisualizationEvent::new(Point::at(1, 1), ColorTag::Frontier),
                VisualizationEvent::new(Point::at(1, 1), ColorTag::Visited),
                VisualizationEvent::new(Point::at(0, 1), ColorTag::Frontier),
                VisualizationEvent::new(Point::at(1, 2), ColorTag::Frontier),
                VisualizationEvent::new(Point::at(2, 1), ColorTag::Frontier),
                VisualizationEvent::new(Point::at(1, 0), ColorTag::Frontier),
            ]
        );
    }

    #[test]
    fn one_frontier_event_per_cell() {
        let mut g = SearchGrid::new(6, 6).unwrap();
        let (_, events) = run(&mut g, Point::at(0, 0), Point::at(5, 5));
        let mut seen = std::collections::HashSet::new();
        for e in events.iter().filter(|e| e.tag == ColorTag::Frontier) {
            assert!(seen.insert(e.pos), "duplicate frontier event for {}", e.pos);
        }
    }

    #[test]
    fn routes_around_a_wall() {
        // . # .
        // . # .
        // . . .
        let mut g = SearchGrid::new(3, 3).unwrap();
        g.set_wall(Point::at(0, 1));
        g.set_wall(Point::at(1, 1));
        let (r, _) = run(&mut g, Point::at(0, 0), Point::at(0, 2));
        let path = r.path().unwrap();
        assert_eq!(path.steps(), 6);
        assert!(!path.cells().contains(&Point::at(1, 1)));
    }

    #[test]
    fn revisit_events_are_optional_and_cosmetic() {
        let mut plain = SearchGrid::new(4, 4).unwrap();
        let mut noisy = SearchGrid::new(4, 4).unwrap();
        let (start, goal) = (Point::at(0, 0), Point::at(3, 3));

        let mut quiet_events = Vec::<VisualizationEvent>::new();
        let a = Bfs::default()
            .run(&mut plain, start, goal, &mut quiet_events)
            .unwrap();
        let mut loud_events = Vec::<VisualizationEvent>::new();
        let b = Bfs {
            revisit_events: true,
        }
        .run(&mut noisy, start, goal, &mut loud_events)
        .unwrap();

        assert_eq!(a, b);
        assert!(loud_events.len() > quiet_events.len());
        let authoritative: Vec<_> = loud_events
            .iter()
            .filter(|e| e.tag != ColorTag::Visited)
            .collect();
        let expected: Vec<_> = quiet_events
            .iter()
            .filter(|e| e.tag != ColorTag::Visited)
            .collect();
        assert_eq!(authoritative, expected);
    }
}
