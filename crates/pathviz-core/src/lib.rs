//! **pathviz-core**: terminal-agnostic building blocks for the pathfinding
//! visualizer.
//!
//! This crate provides geometry primitives shared with the search engine,
//! styled display cells, a display grid with frame diffing, input messages,
//! and the Elm-architecture application loop that drives a renderer.

pub mod app;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use geom::{Point, Range};
pub use grid::{Cell, Frame, FrameCell, Grid};
pub use messages::*;
pub use style::{AttrMask, Color, Style};
