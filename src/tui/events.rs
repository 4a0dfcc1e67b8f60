//! TUI event handling.
//!
//! One channel carries everything the main loop reacts to: terminal
//! input, periodic ticks, and completed store operations. The store
//! worker gets a clone of the sender so its responses arrive through the
//! same channel as keystrokes and never require the UI to block.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::store::StoreResponse;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Terminal tick (for spinner/status updates).
    Tick,
    /// Key press event.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// A store operation finished.
    Store(StoreResponse),
}

/// Event handler using channels.
pub struct EventHandler {
    /// Event receiver.
    rx: mpsc::Receiver<Event>,
    /// Sender, cloned for the store worker.
    tx: mpsc::Sender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        // Terminal input pump.
        thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    // Release/repeat events arrive on some platforms.
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        if event_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => {
                        if event_tx.send(Event::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }

            if event_tx.send(Event::Tick).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Get the next event, blocking until one arrives.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }

    /// Sender for feeding events from other threads (the store worker).
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }
}
