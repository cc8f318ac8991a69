//! `mdshelf-markdown` renders Markdown for the terminal.
//!
//! Three layers:
//!
//! - [`theme`]: light/dark style palettes shared by the renderer and app chrome.
//! - [`render`]: one Markdown chunk -> styled, width-wrapped [`ratatui`] lines.
//! - [`chunk_view`]: a virtualized viewer over a document's chunk sequence,
//!   rendering lazily with estimated-then-measured chunk heights.
//!
//! The crate knows nothing about files or persistence; it consumes the chunk
//! sequences produced by `mdshelf-core`.

pub mod chunk_view;
pub mod render;
pub mod theme;
pub mod viewport;
