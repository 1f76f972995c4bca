//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! Every iteration of the loop polls the driver for input, appends a
//! [`Msg::Tick`], feeds all pending messages to the model, redraws, and
//! flushes only the cells that changed since the previous frame. Models
//! that consume work produced elsewhere (such as a background search) do
//! their draining on `Tick`, so presentation never waits on the producer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::grid::{Frame, Grid, compute_frame};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`.
    ///
    /// Implementations wait at most one frame interval and must return
    /// promptly once `ctx.is_done()` becomes `true`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the screen.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Borrow the model (e.g. to inspect the final state after `run`).
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Enters the event loop: poll → tick → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End`, a `Msg::Quit` is
    ///    processed, or the driver fails.
    ///
    /// The driver is always closed before returning.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        log::debug!("app started ({}x{})", self.width, self.height);

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev_grid = Grid::new(self.width, self.height);
        let mut curr_grid = Grid::new(self.width, self.height);

        let result = self.event_loop(&ctx, &tx, &rx, &mut prev_grid, &mut curr_grid);
        self.driver.close();
        log::debug!("app stopped");
        result
    }

    fn event_loop(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        rx: &Receiver<Msg>,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // The initial frame is drawn from Init alone.
        self.process_pending(rx, ctx, prev_grid, curr_grid)?;

        while !ctx.is_done() {
            if let Err(e) = self.driver.poll_msgs(ctx, tx) {
                ctx.cancel();
                return Err(e);
            }
            if ctx.is_done() {
                break;
            }
            tx.send(Msg::Tick).ok();
            self.process_pending(rx, ctx, prev_grid, curr_grid)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            let quit = msg == Msg::Quit;
            if let Some(Effect::End) = self.model.update(msg) {
                ctx.cancel();
                return Ok(());
            }
            if quit {
                ctx.cancel();
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr_grid);
            let frame = compute_frame(prev_grid, curr_grid);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev_grid.copy_from(curr_grid);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::grid::Cell;
    use crate::messages::Key;

    /// Counts ticks and ends after `stop_after` of them.
    struct Counter {
        ticks: usize,
        stop_after: usize,
        saw_init: bool,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::Init => self.saw_init = true,
                Msg::Tick => {
                    self.ticks += 1;
                    if self.ticks >= self.stop_after {
                        return Some(Effect::End);
                    }
                }
                Msg::KeyDown { key: Key::Char('q') } => return Some(Effect::End),
                _ => {}
            }
            None
        }

        fn draw(&self, grid: &mut Grid) {
            grid.set(
                Point::new(0, 0),
                Cell::default().with_char(char::from(b'0' + (self.ticks % 10) as u8)),
            );
        }
    }

    /// Replays a fixed script, one message per poll.
    #[derive(Default)]
    struct ScriptDriver {
        script: Vec<Msg>,
        flushed: Vec<Frame>,
        closed: bool,
    }

    impl Driver for ScriptDriver {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.script.reverse();
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: &Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if let Some(msg) = self.script.pop() {
                tx.send(msg).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.flushed.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn ticks_until_model_ends() {
        let mut app = App::new(AppConfig {
            model: Counter {
                ticks: 0,
                stop_after: 3,
                saw_init: false,
            },
            driver: ScriptDriver::default(),
            width: 2,
            height: 1,
        });
        app.run().unwrap();
        assert!(app.model().saw_init);
        assert_eq!(app.model().ticks, 3);
        assert!(app.driver.closed);
        // Init frame plus the first two ticks; the third tick ends the loop.
        assert_eq!(app.driver.flushed.len(), 3);
        assert!(app.driver.flushed.iter().all(|f| f.cells.len() == 1));
    }

    #[test]
    fn quit_message_stops_loop() {
        let mut app = App::new(AppConfig {
            model: Counter {
                ticks: 0,
                stop_after: usize::MAX,
                saw_init: false,
            },
            driver: ScriptDriver {
                script: vec![Msg::Tick, Msg::Quit],
                ..Default::default()
            },
            width: 1,
            height: 1,
        });
        app.run().unwrap();
        assert!(app.driver.closed);
        assert!(app.model().ticks >= 1);
    }

    #[test]
    fn key_effect_end_stops_loop() {
        let mut app = App::new(AppConfig {
            model: Counter {
                ticks: 0,
                stop_after: usize::MAX,
                saw_init: false,
            },
            driver: ScriptDriver {
                script: vec![Msg::key(Key::Char('q'))],
                ..Default::default()
            },
            width: 1,
            height: 1,
        });
        app.run().unwrap();
        assert_eq!(app.model().ticks, 0);
    }
}
