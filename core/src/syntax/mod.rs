#![deny(missing_docs)]

//! # Go Syntax Layer
//!
//! Everything that turns bytes into the Document Model and back:
//!
//! - **lexer**: logos raw tokens + semicolon insertion + comment side list.
//! - **ast**: the closed tagged-variant document model.
//! - **parser**: recursive descent over the token vector.
//! - **printer**: canonical, idempotent formatting.

/// Document model types.
pub mod ast;

/// Tokenizer.
pub mod lexer;

/// Recursive-descent parser.
pub mod parser;

/// Canonical printer.
pub mod printer;
