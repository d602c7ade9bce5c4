//! # Document state
//!
//! The entities a sprite document is made of. All mutation funnels through
//! [`crate::commands`]; this module only exposes reads and document setup.

pub mod layer;
pub mod palette;
pub mod sprite;

pub use layer::{Cel, Layer, LayerId};
pub use palette::{Color, Palette};
pub use sprite::{Frame, FrameTag, Sprite, SpriteId, TagId};
