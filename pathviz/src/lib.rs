//! pathviz: paint walls on a grid and watch BFS, DFS or A* find a path.
//!
//! The search itself lives in `pathviz-search`; this crate holds the
//! configuration layer and the [`Visualizer`] model driven by the
//! `pathviz-core` application loop.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod palette;

pub use cli::Cli;
pub use config::{FileConfig, GridSize, SessionConfig, Settings};
pub use error::ConfigError;
pub use model::{Phase, Tile, Visualizer};
pub use palette::Palette;
