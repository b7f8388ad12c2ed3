//! Common data structures for Lumen.
//!
//! This crate provides the source-location types every other crate attaches
//! to parsed expression fragments:
//! - `BytePos`: an offset into the expression text
//! - `Span`: a half-open range of the expression text

mod span;

pub use span::{BytePos, Span};
