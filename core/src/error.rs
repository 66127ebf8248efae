#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Malformed input source. Fatal to the whole mutation run; nothing
    /// downstream executes and no output is produced.
    #[display("Parse Error at {line}:{col}: {message}")]
    Parse {
        /// 1-based line of the offending token.
        line: u32,
        /// 1-based column of the offending token.
        col: u32,
        /// Human-readable cause.
        message: String,
    },

    /// An expected anchor node is missing from the document. Signals the
    /// target file was hand-edited into an incompatible shape or never
    /// properly scaffolded.
    #[from(ignore)]
    #[display("Anchor Not Found: {_0}")]
    AnchorNotFound(String),

    /// A mutation was applied to a node of the wrong shape. Should be
    /// unreachable while the locator and mutator stay in sync; treated as
    /// a programming-error-class failure, not a recoverable user error.
    #[from(ignore)]
    #[display("Anchor Mismatch: {_0}")]
    AnchorMismatch(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
