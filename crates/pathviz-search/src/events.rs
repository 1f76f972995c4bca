//! Visualization events and the channel that carries them from the search
//! engine to the renderer.
//!
//! The channel is unbounded: the producer never blocks or drops an event
//! because the consumer is slow. Events arrive in exactly the order they
//! were emitted, and a later event for a cell supersedes an earlier one.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use pathviz_core::Point;

/// What happened to a cell, as far as the renderer is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorTag {
    /// Discovered, not yet finalized.
    Frontier,
    /// Finalized / explored.
    Visited,
    /// On the reconstructed path.
    Path,
    /// The start or the goal.
    Endpoint,
}

/// An immutable `(row, col, tag)` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualizationEvent {
    pub pos: Point,
    pub tag: ColorTag,
}

impl VisualizationEvent {
    #[inline]
    pub const fn new(pos: Point, tag: ColorTag) -> Self {
        Self { pos, tag }
    }

    #[inline]
    pub const fn row(&self) -> i32 {
        self.pos.row()
    }

    #[inline]
    pub const fn col(&self) -> i32 {
        self.pos.col()
    }
}

/// Destination for events produced by a search.
pub trait EventSink {
    fn emit(&mut self, event: VisualizationEvent);
}

impl EventSink for Vec<VisualizationEvent> {
    #[inline]
    fn emit(&mut self, event: VisualizationEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn emit(&mut self, event: VisualizationEvent) {
        (**self).emit(event);
    }
}

/// Create a connected sender/receiver pair.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        EventSender {
            tx,
            sent: 0,
            hung_up: false,
        },
        EventReceiver {
            rx,
            pending: None,
            disconnected: false,
        },
    )
}

/// Producer half of the event channel.
#[derive(Debug)]
pub struct EventSender {
    tx: Sender<VisualizationEvent>,
    sent: u64,
    hung_up: bool,
}

impl EventSender {
    /// Number of events accepted so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl EventSink for EventSender {
    fn emit(&mut self, event: VisualizationEvent) {
        if self.hung_up {
            return;
        }
        match self.tx.send(event) {
            Ok(()) => self.sent += 1,
            Err(_) => {
                // Quitting drops the receiver mid-search; finishing the
                // run quietly is all that is left to do.
                log::debug!("event receiver dropped after {} events", self.sent);
                self.hung_up = true;
            }
        }
    }
}

/// Consumer half of the event channel. All methods are non-blocking.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<VisualizationEvent>,
    pending: Option<VisualizationEvent>,
    disconnected: bool,
}

impl EventReceiver {
    /// Next queued event, or `None` if nothing is available right now.
    pub fn try_next(&mut self) -> Option<VisualizationEvent> {
        if let Some(e) = self.pending.take() {
            return Some(e);
        }
        match self.rx.try_recv() {
            Ok(e) => Some(e),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.disconnected = true;
                None
            }
        }
    }

    /// Up to `max` queued events, in order.
    pub fn drain(&mut self, max: usize) -> Vec<VisualizationEvent> {
        let mut out = Vec::new();
        while out.len() < max {
            match self.try_next() {
                Some(e) => out.push(e),
                None => break,
            }
        }
        out
    }

    /// Whether the producer has hung up and every event has been consumed.
    pub fn is_finished(&mut self) -> bool {
        if self.pending.is_none() && !self.disconnected {
            match self.rx.try_recv() {
                Ok(e) => self.pending = Some(e),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.disconnected = true,
            }
        }
        self.pending.is_none() && self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(row: i32, col: i32, tag: ColorTag) -> VisualizationEvent {
        VisualizationEvent::new(Point::at(row, col), tag)
    }

    #[test]
    fn row_col_accessors() {
        let e = ev(3, 8, ColorTag::Path);
        assert_eq!(e.row(), 3);
        assert_eq!(e.col(), 8);
    }

    #[test]
    fn preserves_order_without_loss() {
        let (mut tx, mut rx) = event_channel();
        let sent: Vec<_> = (0..1000)
            .map(|i| ev(i / 40, i % 40, ColorTag::Frontier))
            .collect();
        for &e in &sent {
            tx.emit(e);
        }
        assert_eq!(tx.sent(), 1000);
        drop(tx);

        let mut got = Vec::new();
        while !rx.is_finished() {
            got.extend(rx.drain(64));
        }
        assert_eq!(got, sent);
    }

    #[test]
    fn drain_respects_budget() {
        let (mut tx, mut rx) = event_channel();
        for i in 0..10 {
            tx.emit(ev(0, i, ColorTag::Visited));
        }
        assert_eq!(rx.drain(4).len(), 4);
        assert_eq!(rx.drain(100).len(), 6);
        assert!(rx.drain(100).is_empty());
        assert!(!rx.is_finished());
        drop(tx);
        assert!(rx.is_finished());
    }

    #[test]
    fn is_finished_does_not_lose_lookahead() {
        let (mut tx, mut rx) = event_channel();
        tx.emit(ev(1, 1, ColorTag::Endpoint));
        drop(tx);
        assert!(!rx.is_finished());
        assert_eq!(rx.try_next(), Some(ev(1, 1, ColorTag::Endpoint)));
        assert!(rx.is_finished());
    }

    #[test]
    fn sender_survives_dropped_receiver() {
        let (mut tx, rx) = event_channel();
        drop(rx);
        tx.emit(ev(0, 0, ColorTag::Path));
        tx.emit(ev(0, 1, ColorTag::Path));
        assert_eq!(tx.sent(), 0);
    }

    #[test]
    fn vec_sink_collects_through_reference() {
        fn emit_twice<S: EventSink>(mut sink: S) {
            sink.emit(ev(0, 0, ColorTag::Frontier));
            sink.emit(ev(0, 0, ColorTag::Visited));
        }
        let mut v: Vec<VisualizationEvent> = Vec::new();
        emit_twice(&mut v);
        assert_eq!(v, vec![ev(0, 0, ColorTag::Frontier), ev(0, 0, ColorTag::Visited)]);
    }
}
