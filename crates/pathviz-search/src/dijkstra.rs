use pathviz_core::Point;

use crate::distance::step_cost;
use crate::frontier::PriorityFrontier;
use crate::grid::{SearchGrid, UNREACHABLE};
use crate::neighbors::Connectivity;

/// Exact single-source shortest-path costs over the open cells of `grid`.
///
/// Moves have the same weights the searches use: 1 orthogonally, √2
/// diagonally. The result is indexed like [`SearchGrid::bounds`];
/// unreachable cells and walls hold [`UNREACHABLE`]. Search state on
/// `grid` is only read for walls, so this can be called before or after a
/// run to check what it found.
pub fn dijkstra_costs(grid: &SearchGrid, source: Point, connectivity: Connectivity) -> Vec<f64> {
    let bounds = grid.bounds();
    let mut dist = vec![UNREACHABLE; grid.len()];
    let Some(si) = bounds.index_of(source) else {
        return dist;
    };
    if grid.is_wall(source) {
        return dist;
    }

    let mut closed = vec![false; grid.len()];
    let mut open = PriorityFrontier::new();
    dist[si] = 0.0;
    open.push(source, 0.0);

    while let Some((cur, d)) = open.pop() {
        let Some(ci) = bounds.index_of(cur) else {
            continue;
        };
        if closed[ci] {
            continue;
        }
        closed[ci] = true;

        for n in grid.neighbors(cur, connectivity) {
            if grid.is_wall(n) {
                continue;
            }
            let Some(ni) = bounds.index_of(n) else {
                continue;
            };
            let nd = d + step_cost(cur, n);
            if nd < dist[ni] {
                dist[ni] = nd;
                open.push(n, nd);
            }
        }
    }
    dist
}
