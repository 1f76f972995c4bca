use pathviz_core::Point;

use crate::events::{ColorTag, EventSink, VisualizationEvent};
use crate::grid::{CellState, SearchGrid};
use crate::strategy::{Path, PathResult};

/// Reconstruct the path ending at `goal` by following parent links, emit
/// `Path` events from goal back towards start, then `Endpoint` events for
/// both ends.
///
/// An unreached goal, or a parent chain that never arrives at `start`,
/// yields [`PathResult::NotFound`] and no `Path` events at all.
pub(crate) fn backtrack<S: EventSink + ?Sized>(
    grid: &mut SearchGrid,
    start: Point,
    goal: Point,
    sink: &mut S,
) -> PathResult {
    let result = match parent_chain(grid, start, goal) {
        Some(chain) => {
            for &p in chain.iter().take(chain.len() - 1) {
                sink.emit(VisualizationEvent::new(p, ColorTag::Path));
            }
            for &p in &chain {
                if let Some(c) = grid.get_mut(p) {
                    c.state = CellState::Path;
                }
            }
            let cost = grid.get(goal).map_or(f64::INFINITY, |c| c.cost);
            let mut cells = chain;
            cells.reverse();
            PathResult::Found(Path::new(cells, cost))
        }
        None => PathResult::NotFound,
    };

    sink.emit(VisualizationEvent::new(start, ColorTag::Endpoint));
    sink.emit(VisualizationEvent::new(goal, ColorTag::Endpoint));
    result
}

/// Cells from `goal` to `start` inclusive, or `None` if `goal` was never
/// reached. The walk is bounded by the cell count, so a corrupted parent
/// map cannot loop forever.
fn parent_chain(grid: &SearchGrid, start: Point, goal: Point) -> Option<Vec<Point>> {
    if !grid.get(goal)?.is_reached() {
        return None;
    }
    let mut chain = vec![goal];
    let mut cur = goal;
    while cur != start {
        let parent = grid.get(cur)?.parent;
        if parent == cur || chain.len() >= grid.len() {
            log::warn!("parent chain from {goal} broke at {cur} before reaching {start}");
            return None;
        }
        chain.push(parent);
        cur = parent;
    }
    Some(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(grid: &mut SearchGrid, p: Point, parent: Point, cost: f64) {
        let c = grid.get_mut(p).unwrap();
        c.parent = parent;
        c.cost = cost;
    }

    #[test]
    fn emits_path_then_endpoints() {
        let mut g = SearchGrid::new(1, 3).unwrap();
        let (a, b, c) = (Point::at(0, 0), Point::at(0, 1), Point::at(0, 2));
        link(&mut g, a, a, 0.0);
        link(&mut g, b, a, 1.0);
        link(&mut g, c, b, 2.0);

        let mut events: Vec<VisualizationEvent> = Vec::new();
        let r = backtrack(&mut g, a, c, &mut events);

        let path = r.path().unwrap();
        assert_eq!(path.cells(), &[a, b, c]);
        assert_eq!(path.cost(), 2.0);
        assert_eq!(
            events,
            vec![
                VisualizationEvent::new(c, ColorTag::Path),
                VisualizationEvent::new(b, ColorTag::Path),
                VisualizationEvent::new(a, ColorTag::Endpoint),
                VisualizationEvent::new(c, ColorTag::Endpoint),
            ]
        );
        assert!(g.iter().all(|(_, cell)| cell.state == CellState::Path));
    }

    #[test]
    fn unreached_goal_has_no_path_events() {
        let mut g = SearchGrid::new(2, 2).unwrap();
        let start = Point::at(0, 0);
        let goal = Point::at(1, 1);
        link(&mut g, start, start, 0.0);

        let mut events: Vec<VisualizationEvent> = Vec::new();
        assert_eq!(backtrack(&mut g, start, goal, &mut events), PathResult::NotFound);
        assert!(events.iter().all(|e| e.tag == ColorTag::Endpoint));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn cyclic_parents_are_rejected() {
        let mut g = SearchGrid::new(1, 3).unwrap();
        let (a, b, c) = (Point::at(0, 0), Point::at(0, 1), Point::at(0, 2));
        link(&mut g, b, c, 1.0);
        link(&mut g, c, b, 2.0);

        let mut events: Vec<VisualizationEvent> = Vec::new();
        assert_eq!(backtrack(&mut g, a, c, &mut events), PathResult::NotFound);
        assert!(!events.iter().any(|e| e.tag == ColorTag::Path));
    }
}
