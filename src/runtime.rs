use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the grid runner
#[derive(Clone, Debug)]
pub enum GridEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GridEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GridEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GridEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let sent = match event::read() {
                // release/repeat reports would trigger a second reload
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(GridEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(GridEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(error = %err, "terminal event stream closed");
                    break;
                }
            };
            if sent.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GridEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GridEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker; in the grid it sets how often a watched file is polled
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for headless tests
pub struct TestEventSource {
    rx: Receiver<GridEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GridEvent>) -> Self {
        Self { rx }
    }
}

impl GridEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GridEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the grid one event/tick at a time
pub struct Runner<E: GridEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: GridEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> GridEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GridEvent::Tick,
        }
    }

    /// Feed events to `handle` until it breaks out of the loop or fails.
    pub fn run<F, Err>(&self, mut handle: F) -> Result<(), Err>
    where
        F: FnMut(GridEvent) -> Result<ControlFlow<()>, Err>,
    {
        loop {
            if let ControlFlow::Break(()) = handle(self.step())? {
                return Ok(());
            }
        }
    }
}
