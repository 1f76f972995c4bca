use pathviz_core::Point;

use crate::distance::{octile, step_cost};
use crate::events::{ColorTag, EventSink, VisualizationEvent};
use crate::frontier::PriorityFrontier;
use crate::grid::{CellState, SearchGrid};
use crate::neighbors::Connectivity;
use crate::strategy::SearchStrategy;

/// A* over 8-connected cells with the octile heuristic.
///
/// The open list tolerates duplicates: improving a cell pushes a fresh
/// entry and stale ones are skipped when popped (lazy deletion). A cell is
/// closed once popped, which is final because octile distance is
/// consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Astar;

impl SearchStrategy for Astar {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn connectivity(&self) -> Connectivity {
        Connectivity::Eight
    }

    fn explore<S: EventSink + ?Sized>(
        &self,
        grid: &mut SearchGrid,
        start: Point,
        goal: Point,
        sink: &mut S,
    ) {
        let mut open: PriorityFrontier<Point> = PriorityFrontier::new();

        if let Some(c) = grid.get_mut(start) {
            c.cost = 0.0;
            c.heuristic = octile(start, goal);
            c.priority = c.heuristic;
            c.state = CellState::Frontier;
            open.push(start, c.priority);
        }
        sink.emit(VisualizationEvent::new(start, ColorTag::Frontier));

        while let Some((cur, _)) = open.pop() {
            let Some(cell) = grid.get_mut(cur) else {
                continue;
            };
            // Skip stale entries.
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
                if nc.is_wall() || nc.state == CellState::Visited {
                    continue;
                }
                let tentative = cur_cost + step_cost(cur, n);
                if nc.is_reached() && tentative >= nc.cost {
                    continue;
                }
                nc.cost = tentative;
                nc.parent = cur;
                nc.heuristic = octile(n, goal);
                nc.priority = tentative + nc.heuristic;
                nc.state = CellState::Frontier;
                open.push(n, nc.priority);
                sink.emit(VisualizationEvent::new(n, ColorTag::Frontier));
            }
        }
    }
}
