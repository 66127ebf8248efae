#![deny(missing_docs)]

//! # Goforge Core
//!
//! Source-mutation engine for the goforge scaffolder: parses generated Go
//! files, locates structural anchors (import lists, the string-keyed app
//! registry literal, the `core.New(...)` call), appends new entries, and
//! re-emits canonical source text.
//!
//! The crate is pure text-in/text-out; all filesystem I/O belongs to callers.

/// Shared error types.
pub mod error;

/// Go syntax layer: lexer, document model, parser, canonical printer.
pub mod syntax;

/// Anchor location over the document model.
pub mod locator;

/// Structural append edits at a located anchor.
pub mod mutator;

/// High-level registration workflows over source text.
pub mod patcher;

pub use error::{AppError, AppResult};
pub use locator::{locate, NodeHandle, Pattern};
pub use mutator::{append_call_arg, append_import, append_map_entry};
pub use patcher::{register_app, register_module};
pub use syntax::parser::parse;
pub use syntax::printer::print;
