use std::f64::consts::SQRT_2;

use pathviz_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Octile distance: diagonal steps cost √2, orthogonal steps cost 1.
///
/// Admissible and consistent for 8-connected grids with those step costs.
#[inline]
pub fn octile(a: Point, b: Point) -> f64 {
    let dx = (a.y - b.y).abs();
    let dy = (a.x - b.x).abs();
    f64::from(dx.min(dy)) * SQRT_2 + f64::from((dx - dy).abs())
}

/// Cost of moving between adjacent cells: 1 for an orthogonal step, √2 for
/// a diagonal one.
#[inline]
pub fn step_cost(a: Point, b: Point) -> f64 {
    if manhattan(a, b) == 1 { 1.0 } else { SQRT_2 }
}
