//! `mdshelf-core` is the UI-independent half of mdshelf: documents, chunking,
//! file intake, library state, and persisted storage.
//!
//! The split mirrors the app's data flow:
//!
//! - [`intake`]: user-supplied files -> validated, decoded [`document::Document`]s
//!   (all-or-nothing per batch).
//! - [`chunker`]: one document body -> render-sized chunks for the virtualized
//!   viewer.
//! - [`library`]: the flat, order-preserving document list plus selection.
//! - [`storage`]: the JSON state directory rewritten on every mutation.
//!
//! Nothing in this crate touches a terminal; the `mdshelf` binary wires these
//! pieces into its event loop.

pub mod chunker;
pub mod document;
pub mod intake;
pub mod library;
pub mod storage;
