//! # sprig-core
//!
//! The document core of a pixel-art animation editor: a sprite model
//! (frames, layers, cels, tags) whose every mutation is an undoable
//! command, recorded by a per-document edit log with transactions,
//! undo/redo, and change notification. Presentation concerns live behind
//! the [`render::Renderer`] capability and are not part of this crate.

pub mod commands;
pub mod geom;
pub mod history;
pub mod id;
pub mod notify;
pub mod playback;
pub mod render;
pub mod state;

pub use id::UniqueId;
