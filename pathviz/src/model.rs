//! The visualizer: wall painting, launching a search, and replaying its
//! events a few at a time.

use pathviz_core::{
    Cell, Point,
    app::{Effect, Model},
    grid::Grid,
    messages::{Key, MouseAction, Msg},
    style::{AttrMask, Style},
};
use pathviz_search::{
    ColorTag, PathResult, SearchError, SearchGrid, SearchTask, VisualizationEvent,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{DEFAULT_WALL_DENSITY, Settings};
use crate::palette::{BG_BAR, FG_EMPH, FG_TEXT};

/// Screen row of the first grid row; row 0 is the header.
const GRID_TOP: i32 = 1;
/// Terminal columns per grid cell, which keeps cells roughly square.
const CELL_WIDTH: i32 = 2;
const MIN_WIDTH: i32 = 64;

const HELP_PAINT: &str = "drag: walls  r: random  c: clear  space: search  q: quit";
const HELP_SEARCH: &str = "searching...  q: quit";
const HELP_DONE: &str = "enter: edit again  q: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting walls.
    Painting,
    /// A search is running or its events are still being replayed.
    Searching,
    /// Every event has been shown.
    Done,
}

/// What a cell currently looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    /// Last event tag seen for the cell.
    Tag(ColorTag),
}

pub struct Visualizer {
    settings: Settings,
    /// `None` while a worker owns it.
    grid: Option<SearchGrid>,
    tiles: Vec<Tile>,
    phase: Phase,
    task: Option<SearchTask>,
    painting: bool,
    rng: StdRng,
    result: Option<PathResult>,
    status: String,
    applied: usize,
}

impl Visualizer {
    pub fn new(settings: Settings) -> Result<Self, SearchError> {
        let n = settings.session.size.cells();
        let grid = SearchGrid::new(n, n)?;
        let seed = settings.seed.unwrap_or_else(|| {
            use rand::RngExt;
            rand::rng().random()
        });
        log::info!(
            "session: {} {} grid, start {}, goal {}, seed {seed}",
            settings.session.algorithm,
            settings.session.size,
            settings.session.start,
            settings.session.goal
        );

        let mut vis = Self {
            tiles: vec![Tile::Empty; grid.len()],
            grid: Some(grid),
            phase: Phase::Painting,
            task: None,
            painting: false,
            rng: StdRng::seed_from_u64(seed),
            result: None,
            status: String::new(),
            applied: 0,
            settings,
        };
        if let Some(density) = vis.settings.wall_density {
            vis.scatter(density);
        }
        vis.refresh_tiles();
        Ok(vis)
    }

    /// Screen size needed to show the grid plus the header and status rows.
    pub fn screen_size(&self) -> (i32, i32) {
        let n = self.settings.session.size.cells();
        ((n * CELL_WIDTH).max(MIN_WIDTH), n + GRID_TOP + 2)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&PathResult> {
        self.result.as_ref()
    }

    /// The wall/search grid, unless a worker currently holds it.
    pub fn grid(&self) -> Option<&SearchGrid> {
        self.grid.as_ref()
    }

    pub fn tile(&self, p: Point) -> Option<Tile> {
        let n = self.settings.session.size.cells();
        if !(0..n).contains(&p.row()) || !(0..n).contains(&p.col()) {
            return None;
        }
        self.tiles.get((p.row() * n + p.col()) as usize).copied()
    }

    fn tile_mut(&mut self, p: Point) -> Option<&mut Tile> {
        let n = self.settings.session.size.cells();
        if !(0..n).contains(&p.row()) || !(0..n).contains(&p.col()) {
            return None;
        }
        self.tiles.get_mut((p.row() * n + p.col()) as usize)
    }

    /// Grid cell under a screen position.
    fn cell_at(&self, screen: Point) -> Option<Point> {
        if screen.x < 0 || screen.y < GRID_TOP {
            return None;
        }
        let p = Point::at(screen.y - GRID_TOP, screen.x / CELL_WIDTH);
        self.tile(p).map(|_| p)
    }

    fn is_endpoint(&self, p: Point) -> bool {
        p == self.settings.session.start || p == self.settings.session.goal
    }

    /// Rebuild tiles from the walls, with both endpoints highlighted.
    fn refresh_tiles(&mut self) {
        let Some(grid) = &self.grid else {
            return;
        };
        for (t, (_, cell)) in self.tiles.iter_mut().zip(grid.iter()) {
            *t = if cell.is_wall() { Tile::Wall } else { Tile::Empty };
        }
        let (start, goal) = (self.settings.session.start, self.settings.session.goal);
        for p in [start, goal] {
            if let Some(t) = self.tile_mut(p) {
                *t = Tile::Tag(ColorTag::Endpoint);
            }
        }
    }

    // -------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------

    fn paint(&mut self, screen: Point) {
        let Some(p) = self.cell_at(screen) else {
            return;
        };
        if self.is_endpoint(p) {
            return;
        }
        let Some(grid) = &mut self.grid else {
            return;
        };
        if !grid.is_wall(p) {
            grid.set_wall(p);
            log::trace!("wall at {p}");
        }
        if let Some(t) = self.tile_mut(p) {
            *t = Tile::Wall;
        }
    }

    fn scatter(&mut self, density: f64) {
        let keep = [self.settings.session.start, self.settings.session.goal];
        if let Some(grid) = &mut self.grid {
            let added = grid.scatter_walls(&mut self.rng, density, &keep);
            log::debug!("scattered {added} walls at density {density}");
        }
    }

    fn clear(&mut self) {
        if let Some(grid) = &mut self.grid {
            grid.clear_walls();
        }
        self.refresh_tiles();
    }

    fn update_painting(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Mouse { action, pos } => match action {
                MouseAction::Main => {
                    self.painting = true;
                    self.paint(pos);
                }
                MouseAction::Drag | MouseAction::Move if self.painting => self.paint(pos),
                MouseAction::Release => self.painting = false,
                _ => {}
            },
            Msg::KeyDown { key } => match key {
                Key::Char('c') => self.clear(),
                Key::Char('r') => {
                    let density = self.settings.wall_density.unwrap_or(DEFAULT_WALL_DENSITY);
                    self.scatter(density);
                    self.refresh_tiles();
                }
                Key::Space | Key::Enter => self.launch(),
                _ => {}
            },
            _ => {}
        }
        None
    }

    // -------------------------------------------------------------------
    // Searching
    // -------------------------------------------------------------------

    fn launch(&mut self) {
        let Some(grid) = self.grid.take() else {
            return;
        };
        let session = self.settings.session;
        // Keep the grid if the endpoints are rejected.
        if let Err(e) = grid.check_endpoints(session.start, session.goal) {
            log::error!("cannot start search: {e}");
            self.status = e.to_string();
            self.grid = Some(grid);
            return;
        }
        match SearchTask::spawn(
            session.algorithm,
            grid,
            session.start,
            session.goal,
            self.settings.options,
        ) {
            Ok(task) => {
                self.painting = false;
                self.applied = 0;
                self.result = None;
                self.task = Some(task);
                self.phase = Phase::Searching;
                self.status = format!("{} running", session.algorithm);
            }
            Err(e) => {
                log::error!("cannot start search: {e}");
                self.status = e.to_string();
                self.finish();
            }
        }
    }

    fn apply(&mut self, event: VisualizationEvent) {
        if let Some(t) = self.tile_mut(event.pos) {
            *t = Tile::Tag(event.tag);
        }
        self.applied += 1;
    }

    /// Replay up to one frame's worth of events, then collect the outcome
    /// once the stream is exhausted.
    fn tick_search(&mut self) {
        let Some(task) = &mut self.task else {
            return;
        };
        let batch = task.events().drain(self.settings.events_per_frame);
        let drained = task.events().is_finished();
        for e in batch {
            self.apply(e);
        }
        if !drained {
            return;
        }

        let Some(task) = &mut self.task else {
            return;
        };
        let algorithm = task.algorithm();
        match task.try_finish() {
            None => {}
            Some(Ok(outcome)) => {
                self.status = match &outcome.result {
                    PathResult::Found(path) => format!(
                        "{algorithm}: path of {} steps, cost {:.3} ({} events)",
                        path.steps(),
                        path.cost(),
                        self.applied
                    ),
                    PathResult::NotFound => {
                        format!("{algorithm}: no path ({} events)", self.applied)
                    }
                };
                self.grid = Some(outcome.grid);
                self.result = Some(outcome.result);
                self.finish();
            }
            Some(Err(e)) => {
                log::error!("search failed: {e}");
                self.status = e.to_string();
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.task = None;
        self.phase = Phase::Done;
        log::info!("{}", self.status);
    }

    fn update_done(&mut self, msg: Msg) -> Option<Effect> {
        if let Msg::KeyDown {
            key: Key::Enter | Key::Space,
        } = msg
        {
            // A failed worker or spawn loses the grid; start over from an
            // empty one.
            if self.grid.is_none() {
                let n = self.settings.session.size.cells();
                self.grid = SearchGrid::new(n, n).ok();
            }
            if let Some(grid) = &mut self.grid {
                grid.reset_search_state();
            }
            self.refresh_tiles();
            self.status.clear();
            self.phase = Phase::Painting;
        }
        None
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    fn tile_color(&self, tile: Tile) -> pathviz_core::Color {
        let palette = &self.settings.palette;
        match tile {
            Tile::Empty => palette.empty,
            Tile::Wall => palette.wall,
            Tile::Tag(tag) => palette.tag(tag),
        }
    }

    fn draw_bar(&self, grid: &mut Grid, y: i32, text: &str, style: Style) {
        for x in 0..grid.width() {
            grid.set(Point::new(x, y), Cell::default().with_style(style));
        }
        grid.write_text(Point::new(1, y), text, style);
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Quit
            | Msg::KeyDown {
                key: Key::Escape | Key::Char('q'),
            } => return Some(Effect::End),
            Msg::Screen { width, height } => {
                log::debug!("screen resized to {width}x{height}");
                return None;
            }
            _ => {}
        }
        match self.phase {
            Phase::Painting => self.update_painting(msg),
            Phase::Searching => {
                if msg == Msg::Tick {
                    self.tick_search();
                }
                None
            }
            Phase::Done => self.update_done(msg),
        }
    }

    fn draw(&self, grid: &mut Grid) {
        grid.fill(Cell::default());
        let s = &self.settings.session;
        let header = format!(
            "pathviz  {}  {}  start {}  goal {}",
            s.algorithm, s.size, s.start, s.goal
        );
        let bar = Style::default().with_fg(FG_EMPH).with_bg(BG_BAR);
        self.draw_bar(grid, 0, &header, bar.with_attrs(AttrMask::BOLD));

        let n = s.size.cells();
        for row in 0..n {
            for col in 0..n {
                let p = Point::at(row, col);
                let Some(tile) = self.tile(p) else {
                    continue;
                };
                let cell = Cell::filled(self.tile_color(tile));
                for dx in 0..CELL_WIDTH {
                    grid.set(Point::new(col * CELL_WIDTH + dx, GRID_TOP + row), cell);
                }
            }
        }

        let help = match self.phase {
            Phase::Painting => HELP_PAINT,
            Phase::Searching => HELP_SEARCH,
            Phase::Done => HELP_DONE,
        };
        let status_style = Style::default().with_fg(FG_TEXT);
        grid.write_text(Point::new(0, GRID_TOP + n), &self.status, status_style);
        self.draw_bar(grid, GRID_TOP + n + 1, help, bar);
    }
}
