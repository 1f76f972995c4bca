//! Session configuration: grid size, algorithm, endpoints, plus the
//! renderer knobs.
//!
//! Values come from an optional TOML file, then CLI flags override them.
//! Everything is checked in [`FileConfig::resolve`] before the search
//! engine sees it.
//!
//! ```toml
//! size = "medium"
//! algorithm = "astar"
//! start = [0, 0]        # row, col
//! goal = [24, 24]
//! events_per_frame = 8
//! walls = 0.25          # scatter walls at startup
//! seed = 7
//!
//! [palette]
//! wall = [120, 120, 120]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use pathviz_core::Point;
use pathviz_core::style::Color;
use pathviz_search::{Algorithm, SearchOptions};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::palette::Palette;

pub const DEFAULT_EVENTS_PER_FRAME: usize = 8;
pub const DEFAULT_FRAME_MS: u64 = 16;
/// Density used by the `r` key when none was configured.
pub const DEFAULT_WALL_DENSITY: f64 = 0.3;
pub const DEFAULT_LOG_FILE: &str = "pathviz.log";

/// The three grid presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Cells per side.
    pub fn cells(self) -> i32 {
        match self {
            Self::Small => 10,
            Self::Medium => 25,
            Self::Large => 40,
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.cells();
        write!(f, "{n}x{n}")
    }
}

impl FromStr for GridSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "s" | "10" => Ok(Self::Small),
            "medium" | "m" | "25" => Ok(Self::Medium),
            "large" | "l" | "40" => Ok(Self::Large),
            _ => Err(ConfigError::UnknownSize(s.to_string())),
        }
    }
}

/// Parse `row,col` into a [`Point`].
pub fn parse_coord(s: &str) -> Result<Point, ConfigError> {
    let bad = || ConfigError::BadCoordinate(s.to_string());
    let (row, col) = s.split_once(',').ok_or_else(bad)?;
    let row = row.trim().parse::<i32>().map_err(|_| bad())?;
    let col = col.trim().parse::<i32>().map_err(|_| bad())?;
    Ok(Point::at(row, col))
}

/// What the user picked: grid size, algorithm and endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub size: GridSize,
    pub algorithm: Algorithm,
    pub start: Point,
    pub goal: Point,
}

impl SessionConfig {
    /// Start in the top-left corner, goal in the bottom-right.
    pub fn new(size: GridSize, algorithm: Algorithm) -> Self {
        let last = size.cells() - 1;
        Self {
            size,
            algorithm,
            start: Point::at(0, 0),
            goal: Point::at(last, last),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.size.cells();
        for (which, pos) in [("start", self.start), ("goal", self.goal)] {
            if !(0..n).contains(&pos.row()) || !(0..n).contains(&pos.col()) {
                return Err(ConfigError::OutOfBounds {
                    which,
                    pos,
                    size: self.size,
                });
            }
        }
        if self.start == self.goal {
            return Err(ConfigError::SameEndpoints(self.start));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(GridSize::default(), Algorithm::default())
    }
}

/// `[palette]` table; each entry is `[r, g, b]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub frontier: Option<[u8; 3]>,
    pub visited: Option<[u8; 3]>,
    pub path: Option<[u8; 3]>,
    pub endpoint: Option<[u8; 3]>,
    pub wall: Option<[u8; 3]>,
    pub empty: Option<[u8; 3]>,
}

impl PaletteConfig {
    pub fn apply(&self, palette: &mut Palette) {
        let slots = [
            (self.frontier, &mut palette.frontier),
            (self.visited, &mut palette.visited),
            (self.path, &mut palette.path),
            (self.endpoint, &mut palette.endpoint),
            (self.wall, &mut palette.wall),
            (self.empty, &mut palette.empty),
        ];
        for (rgb, slot) in slots {
            if let Some(rgb) = rgb {
                *slot = Color::from(rgb);
            }
        }
    }
}

/// Raw configuration as read from a file or assembled from flags. Every
/// field is optional; [`resolve`](FileConfig::resolve) fills in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub size: Option<GridSize>,
    pub algorithm: Option<Algorithm>,
    /// `[row, col]`.
    pub start: Option<[i32; 2]>,
    pub goal: Option<[i32; 2]>,
    pub events_per_frame: Option<usize>,
    pub frame_ms: Option<u64>,
    pub walls: Option<f64>,
    pub seed: Option<u64>,
    pub revisit_events: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub palette: PaletteConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply defaults and check everything.
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let size = self.size.unwrap_or_default();
        let mut session = SessionConfig::new(size, self.algorithm.unwrap_or_default());
        if let Some([row, col]) = self.start {
            session.start = Point::at(row, col);
        }
        if let Some([row, col]) = self.goal {
            session.goal = Point::at(row, col);
        }
        session.validate()?;

        let events_per_frame = self.events_per_frame.unwrap_or(DEFAULT_EVENTS_PER_FRAME);
        if events_per_frame == 0 {
            return Err(ConfigError::ZeroEventsPerFrame);
        }
        match self.walls {
            Some(d) if !(0.0..=1.0).contains(&d) => return Err(ConfigError::BadDensity(d)),
            _ => {}
        }

        let mut palette = Palette::default();
        self.palette.apply(&mut palette);

        Ok(Settings {
            session,
            options: SearchOptions {
                revisit_events: self.revisit_events.unwrap_or(false),
            },
            events_per_frame,
            frame_interval: Duration::from_millis(self.frame_ms.unwrap_or(DEFAULT_FRAME_MS)),
            wall_density: self.walls,
            seed: self.seed,
            log_file: self
                .log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            palette,
        })
    }
}

/// Fully resolved, validated settings for one run of the program.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub session: SessionConfig,
    pub options: SearchOptions,
    /// Upper bound on events applied per presentation frame.
    pub events_per_frame: usize,
    pub frame_interval: Duration,
    /// Scatter walls at this density on startup.
    pub wall_density: Option<f64>,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            options: SearchOptions::default(),
            events_per_frame: DEFAULT_EVENTS_PER_FRAME,
            frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
            wall_density: None,
            seed: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            palette: Palette::default(),
        }
    }
}
