//! tabgaze: CLI/TUI viewer and editor for schemaless cloud key-value table stores.
//!
//! Connect with a credential, browse tables, view rows with ad-hoc
//! content-type detection, sort and filter, edit and delete. The heart of
//! the crate is the classification pipeline: every cell value is
//! classified as JSON, CSV, a Unix timestamp, or plain text, and JSON is
//! re-rendered through a round-trip-exact token highlighter.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tabgaze::classify::{classify, ContentKind};
//!
//! let cell = json!("{\"plan\": \"pro\"}");
//! let classified = classify(&cell, Some("profile"));
//! assert_eq!(classified.kind, ContentKind::Json);
//!
//! let epoch = json!(1_700_000_000_000_i64);
//! let classified = classify(&epoch, Some("createdAt"));
//! assert_eq!(classified.display, "2023-11-14T22:13:20.000Z");
//! ```
//!
//! # Architecture
//!
//! - [`classify`]: ordered-rule content classifier (the precedence
//!   JSON → timestamp → CSV → text is load-bearing)
//! - [`highlight`]: JSON pretty-print tokenizer; token concatenation
//!   reproduces the serialized text exactly
//! - [`model`]: schemaless row model and deterministic column derivation
//! - [`view`]: sort state, nulls-last natural-order comparator, and the
//!   fetch-generation guard against stale responses
//! - [`store`]: the table-store boundary — client trait, local backends,
//!   credential persistence port, and the background worker
//! - [`cli`] / [`tui`]: the two front ends
//! - [`config`], [`error`], [`util`]: the usual support cast

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod model;
pub mod store;
pub mod tui;
pub mod util;
pub mod view;

// Re-export commonly used types at the crate root
pub use error::{Result, TabgazeError};
pub use model::TableRow;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::classify::{classify, Classified, ContentKind, Payload};
    pub use crate::error::{Result, TabgazeError};
    pub use crate::highlight::{highlight, Token, TokenStyle};
    pub use crate::model::{derive_columns, TableRow};
    pub use crate::store::{Credential, TableStore};
    pub use crate::view::{SortDirection, SortState};
}
