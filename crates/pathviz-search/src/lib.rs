//! Step-by-step grid search for visualization.
//!
//! A [`SearchGrid`] holds walls and per-cell search state. Each strategy
//! walks it from a start to a goal and reports every state change as a
//! [`VisualizationEvent`] through an [`EventSink`]:
//!
//! - **BFS** over 4-connected cells ([`Bfs`]), shortest in move count
//! - **DFS** over 4-connected cells ([`Dfs`]), any path
//! - **A\*** over 8-connected cells ([`Astar`]), shortest in octile cost
//!
//! After exploring, the path is reconstructed from parent links and
//! emitted as `Path` events, followed by `Endpoint` events for both ends.
//!
//! Pick a strategy at runtime with [`Algorithm`], and run it off the UI
//! thread with [`SearchTask`], which streams events over a channel.
//!
//! # Event contract
//!
//! | Tag | Meaning |
//! |---|---|
//! | `Frontier` | cell discovered and queued |
//! | `Visited` | cell taken off the frontier and expanded |
//! | `Path` | cell on the reconstructed path, goal first |
//! | `Endpoint` | start or goal, always the last two events |

mod astar;
mod backtrack;
mod bfs;
mod dfs;
mod dijkstra;
mod distance;
mod error;
mod events;
mod frontier;
mod grid;
mod neighbors;
mod strategy;
mod task;

pub use astar::Astar;
pub use bfs::Bfs;
pub use dfs::Dfs;
pub use dijkstra::dijkstra_costs;
pub use distance::{chebyshev, manhattan, octile, step_cost};
pub use error::SearchError;
pub use events::{ColorTag, EventReceiver, EventSender, EventSink, VisualizationEvent, event_channel};
pub use frontier::PriorityFrontier;
pub use grid::{Cell, CellState, SearchGrid, SearchStats, UNREACHABLE};
pub use neighbors::{Connectivity, Neighbors};
pub use strategy::{Algorithm, ParseAlgorithmError, Path, PathResult, SearchOptions, SearchStrategy};
pub use task::{SearchOutcome, SearchTask};
