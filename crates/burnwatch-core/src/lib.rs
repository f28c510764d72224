//! Foundational low-level utilities shared across burnwatch crates.
//!
//! Provides the atomic file-write helper used for threshold-state persistence
//! and the Markdown text helpers shared by alert and command rendering.

pub mod atomic_io;
pub mod text_utils;

pub use atomic_io::write_text_atomic;
pub use text_utils::{escape_markdown, format_grouped_number};
