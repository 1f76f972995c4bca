//! Error type for the search engine.

use pathviz_core::Point;
use thiserror::Error;

/// Contract violations rejected before a search starts, plus worker
/// failures. Running out of frontier is not an error: it is reported as
/// [`PathResult::NotFound`](crate::PathResult::NotFound).
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    EmptyGrid { rows: i32, cols: i32 },

    #[error("{which} {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        which: &'static str,
        pos: Point,
        rows: i32,
        cols: i32,
    },

    #[error("{which} {pos} is a wall")]
    OnWall { which: &'static str, pos: Point },

    #[error("start and goal are both {0}")]
    SameEndpoints(Point),

    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("search worker panicked")]
    WorkerPanicked,
}
