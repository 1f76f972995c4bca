//! Errors raised while assembling a session, before any search runs.

use pathviz_core::Point;
use thiserror::Error;

use crate::config::GridSize;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown grid size {0:?} (expected small, medium or large)")]
    UnknownSize(String),

    #[error("{which} {pos} is outside the {size} grid")]
    OutOfBounds {
        which: &'static str,
        pos: Point,
        size: GridSize,
    },

    #[error("start and goal must differ, both are {0}")]
    SameEndpoints(Point),

    #[error("invalid coordinate {0:?} (expected row,col)")]
    BadCoordinate(String),

    #[error("wall density must be within 0.0..=1.0, got {0}")]
    BadDensity(f64),

    #[error("events per frame must be at least 1")]
    ZeroEventsPerFrame,
}
