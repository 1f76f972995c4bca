//! The shared search contract: [`SearchStrategy`], [`Algorithm`],
//! [`PathResult`].

use std::fmt;
use std::str::FromStr;

use pathviz_core::Point;
use thiserror::Error;

use crate::astar::Astar;
use crate::backtrack::backtrack;
use crate::bfs::Bfs;
use crate::dfs::Dfs;
use crate::error::SearchError;
use crate::events::{EventSink, VisualizationEvent};
use crate::grid::SearchGrid;
use crate::neighbors::Connectivity;

/// A reconstructed path from start to goal, both included.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<Point>,
    cost: f64,
}

impl Path {
    pub(crate) fn new(cells: Vec<Point>, cost: f64) -> Self {
        Self { cells, cost }
    }

    /// The cells in order, start first.
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// Total cost: edge count for BFS/DFS, octile cost for A*.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of moves (edges) along the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Point> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Point> {
        self.cells.last().copied()
    }
}

/// Terminal outcome of a search run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathResult {
    Found(Path),
    /// The frontier was exhausted without reaching the goal.
    NotFound,
}

impl PathResult {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(p) => Some(p),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Knobs shared by every strategy. Passed explicitly, never global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    /// BFS only: emit a non-authoritative `Visited` event each time an
    /// already-reached neighbor is examined again.
    pub revisit_events: bool,
}

/// Forwards to an inner sink and counts what went through.
struct Counting<'a, S: EventSink + ?Sized> {
    inner: &'a mut S,
    count: usize,
}

impl<S: EventSink + ?Sized> EventSink for Counting<'_, S> {
    fn emit(&mut self, event: VisualizationEvent) {
        self.count += 1;
        self.inner.emit(event);
    }
}

/// A traversal strategy over a [`SearchGrid`].
///
/// Implementors provide [`explore`](SearchStrategy::explore), which walks
/// the grid and records costs and parents. [`run`](SearchStrategy::run)
/// wraps it with endpoint validation, state reset and path backtracking.
pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    fn connectivity(&self) -> Connectivity;

    /// Traverse from `start` until `goal` is reached or the frontier is
    /// exhausted, emitting `Frontier` and `Visited` events. Endpoints have
    /// already been validated and the grid reset.
    fn explore<S: EventSink + ?Sized>(
        &self,
        grid: &mut SearchGrid,
        start: Point,
        goal: Point,
        sink: &mut S,
    );

    /// Run the full search: validate, explore, then backtrack from `goal`.
    fn run<S: EventSink + ?Sized>(
        &self,
        grid: &mut SearchGrid,
        start: Point,
        goal: Point,
        sink: &mut S,
    ) -> Result<PathResult, SearchError> {
        grid.check_endpoints(start, goal)?;
        grid.reset_search_state();

        let mut counted = Counting {
            inner: sink,
            count: 0,
        };
        self.explore(grid, start, goal, &mut counted);
        let result = backtrack(grid, start, goal, &mut counted);

        let stats = grid.stats();
        match &result {
            PathResult::Found(p) => log::info!(
                "{}: path {} -> {} with {} steps, cost {:.3}",
                self.name(),
                start,
                goal,
                p.steps(),
                p.cost()
            ),
            PathResult::NotFound => log::info!("{}: no path {} -> {}", self.name(), start, goal),
        }
        log::debug!(
            "{}: {} events, {} visited, {} left on frontier",
            self.name(),
            counted.count,
            stats.visited,
            stats.frontier
        );
        Ok(result)
    }
}

/// Which strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "bfs", alias = "BFS"))]
    Bfs,
    #[cfg_attr(feature = "serde", serde(rename = "dfs", alias = "DFS"))]
    Dfs,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "astar", alias = "a-star", alias = "A-Star", alias = "a*")
    )]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Self::Bfs, Self::Dfs, Self::AStar];

    pub fn connectivity(self) -> Connectivity {
        match self {
            Self::Bfs => Bfs::default().connectivity(),
            Self::Dfs => Dfs.connectivity(),
            Self::AStar => Astar.connectivity(),
        }
    }

    /// Run this algorithm. See [`SearchStrategy::run`].
    pub fn run<S: EventSink + ?Sized>(
        self,
        grid: &mut SearchGrid,
        start: Point,
        goal: Point,
        options: SearchOptions,
        sink: &mut S,
    ) -> Result<PathResult, SearchError> {
        match self {
            Self::Bfs => Bfs {
                revisit_events: options.revisit_events,
            }
            .run(grid, start, goal, sink),
            Self::Dfs => Dfs.run(grid, start, goal, sink),
            Self::AStar => Astar.run(grid, start, goal, sink),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::AStar => "A*",
        })
    }
}

/// Unrecognised algorithm name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown algorithm {0:?} (expected bfs, dfs or astar)")]
pub struct ParseAlgorithmError(String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "astar" | "a-star" | "a*" => Ok(Self::AStar),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}
