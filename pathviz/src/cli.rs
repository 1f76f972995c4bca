use std::path::PathBuf;

use clap::Parser;
use pathviz_core::Point;
use pathviz_search::Algorithm;

use crate::config::{FileConfig, GridSize, parse_coord};
use crate::error::ConfigError;

/// Watch BFS, DFS or A* explore a grid you paint walls on.
///
/// Drag with the left mouse button to paint walls, `r` to scatter random
/// walls, `c` to clear them, Space or Enter to search, `q` or Esc to quit.
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// TOML configuration file. Flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grid size: small (10), medium (25) or large (40).
    #[arg(short, long)]
    pub size: Option<GridSize>,

    /// Search algorithm: bfs, dfs or astar.
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Start cell as row,col.
    #[arg(long, value_parser = parse_coord)]
    pub start: Option<Point>,

    /// Goal cell as row,col.
    #[arg(long, value_parser = parse_coord)]
    pub goal: Option<Point>,

    /// Maximum search events drawn per frame.
    #[arg(short, long)]
    pub events_per_frame: Option<usize>,

    /// Milliseconds between frames.
    #[arg(long)]
    pub frame_ms: Option<u64>,

    /// Scatter random walls at this density (0.0 to 1.0) on startup.
    #[arg(short, long)]
    pub walls: Option<f64>,

    /// Seed for random walls.
    #[arg(long)]
    pub seed: Option<u64>,

    /// BFS: also flash cells that are seen again after being reached.
    #[arg(long)]
    pub revisit_events: bool,

    /// Where to write logs; the terminal is taken by the grid.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load the config file if one was given, then layer the flags on top.
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let mut file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        self.apply(&mut file);
        Ok(file)
    }

    fn apply(self, file: &mut FileConfig) {
        if let Some(size) = self.size {
            file.size = Some(size);
            // A different size invalidates endpoints inherited from the file
            // unless they are given again.
            if self.start.is_none() {
                file.start = None;
            }
            if self.goal.is_none() {
                file.goal = None;
            }
        }
        if let Some(a) = self.algorithm {
            file.algorithm = Some(a);
        }
        if let Some(p) = self.start {
            file.start = Some([p.row(), p.col()]);
        }
        if let Some(p) = self.goal {
            file.goal = Some([p.row(), p.col()]);
        }
        if self.events_per_frame.is_some() {
            file.events_per_frame = self.events_per_frame;
        }
        if self.frame_ms.is_some() {
            file.frame_ms = self.frame_ms;
        }
        if self.walls.is_some() {
            file.walls = self.walls;
        }
        if self.seed.is_some() {
            file.seed = self.seed;
        }
        if self.revisit_events {
            file.revisit_events = Some(true);
        }
        if self.log_file.is_some() {
            file.log_file = self.log_file;
        }
    }
}
