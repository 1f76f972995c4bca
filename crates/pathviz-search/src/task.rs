//! Running a search on a worker thread while the caller consumes events.

use std::thread::{self, JoinHandle};

use pathviz_core::Point;

use crate::error::SearchError;
use crate::events::{EventReceiver, event_channel};
use crate::grid::SearchGrid;
use crate::strategy::{Algorithm, PathResult, SearchOptions};

/// What a finished worker hands back: the grid with its final search state
/// and the path result.
#[derive(Debug)]
pub struct SearchOutcome {
    pub grid: SearchGrid,
    pub result: PathResult,
}

/// A search running on its own thread.
///
/// The grid is moved into the worker for the duration of the run and
/// returned in the [`SearchOutcome`]. Events stream through
/// [`events`](SearchTask::events) as they are produced; the worker never
/// blocks on a slow consumer.
#[derive(Debug)]
pub struct SearchTask {
    algorithm: Algorithm,
    events: EventReceiver,
    handle: Option<JoinHandle<Result<SearchOutcome, SearchError>>>,
}

impl SearchTask {
    /// Validate the endpoints and start `algorithm` on a new thread.
    ///
    /// Invalid endpoints are rejected here, before any thread is spawned.
    pub fn spawn(
        algorithm: Algorithm,
        mut grid: SearchGrid,
        start: Point,
        goal: Point,
        options: SearchOptions,
    ) -> Result<Self, SearchError> {
        grid.check_endpoints(start, goal)?;

        let (mut tx, events) = event_channel();
        let handle = thread::Builder::new()
            .name("pathviz-search".into())
            .spawn(move || -> Result<SearchOutcome, SearchError> {
                let result = algorithm.run(&mut grid, start, goal, options, &mut tx)?;
                log::trace!("worker sent {} events", tx.sent());
                Ok(SearchOutcome { grid, result })
            })?;

        log::debug!("spawned {algorithm} search {start} -> {goal}");
        Ok(Self {
            algorithm,
            events,
            handle: Some(handle),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The event stream. Drain it from the UI thread.
    pub fn events(&mut self) -> &mut EventReceiver {
        &mut self.events
    }

    /// Whether the worker thread has exited. Events may still be queued.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Collect the outcome if the worker is done, without blocking.
    ///
    /// Returns `None` while the worker runs, and also after the outcome has
    /// already been taken.
    pub fn try_finish(&mut self) -> Option<Result<SearchOutcome, SearchError>> {
        if !self.handle.as_ref()?.is_finished() {
            return None;
        }
        self.handle.take().map(join)
    }

    /// Block until the worker exits and return its outcome.
    pub fn wait(mut self) -> Result<SearchOutcome, SearchError> {
        match self.handle.take() {
            Some(h) => join(h),
            None => Err(SearchError::WorkerPanicked),
        }
    }
}

fn join(handle: JoinHandle<Result<SearchOutcome, SearchError>>) -> Result<SearchOutcome, SearchError> {
    handle.join().unwrap_or_else(|_| {
        log::error!("search worker panicked");
        Err(SearchError::WorkerPanicked)
    })
}
