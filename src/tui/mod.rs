//! Terminal user interface.
//!
//! The UI is a synchronous event loop over a single channel: keyboard
//! input, ticks, and store-worker responses all arrive as [`events::Event`]
//! values, and every transition lives in [`state::AppState`] where it can
//! be tested without a terminal.

mod app;
mod components;
mod events;
mod state;
mod theme;

pub use app::{run, Options};
pub use theme::{available_themes, Theme};
