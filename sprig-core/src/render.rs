//! # Renderer boundary
//!
//! Compositing is an external collaborator; the core only defines the
//! capability it consumes. A renderer instance is owned by whoever drives
//! the presentation layer and passed in explicitly — there is no global
//! render engine. Failures come back as error kinds, never panics, so the
//! caller can degrade (skip the repaint) instead of unwinding.

use crate::geom::Rect;
use crate::state::Sprite;

/// Scale factor applied when projecting sprite pixels onto the target.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Projection {
    pub scale: f32,
}
impl Projection {
    pub const IDENTITY: Self = Self { scale: 1.0 };
    /// Sprite-space length to target-space, rounded to whole pixels.
    #[must_use]
    pub fn apply(&self, length: u32) -> u32 {
        (length as f32 * self.scale).round() as u32
    }
}
impl Default for Projection {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("frame index out of range")]
    FrameOutOfRange,
    #[error("target buffer too small: need {needed} bytes, got {got}")]
    TargetTooSmall { needed: usize, got: usize },
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Produces pixel output for one frame of a sprite into a caller-provided
/// RGBA buffer covering `target`. Implementations may read the sprite
/// concurrently while the mutation thread is idle, and must not mutate it.
pub trait Renderer {
    fn render(
        &mut self,
        sprite: &Sprite,
        frame: usize,
        target: Rect,
        projection: Projection,
        buffer: &mut [u8],
    ) -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills the target with opaque black; just enough renderer to pin the
    /// boundary contract.
    struct Flat;
    impl Renderer for Flat {
        fn render(
            &mut self,
            sprite: &Sprite,
            frame: usize,
            target: Rect,
            _projection: Projection,
            buffer: &mut [u8],
        ) -> Result<(), RenderError> {
            if frame >= sprite.frame_count() {
                return Err(RenderError::FrameOutOfRange);
            }
            let needed = target.area() as usize * 4;
            if buffer.len() < needed {
                return Err(RenderError::TargetTooSmall {
                    needed,
                    got: buffer.len(),
                });
            }
            for pixel in buffer[..needed].chunks_exact_mut(4) {
                pixel.copy_from_slice(&[0, 0, 0, 255]);
            }
            Ok(())
        }
    }

    #[test]
    fn errors_are_reported_not_panicked() {
        let sprite = Sprite::new(4, 4);
        let mut renderer = Flat;
        let target = Rect::new(0, 0, 4, 4);
        let mut tiny = [0u8; 8];
        assert_eq!(
            renderer.render(&sprite, 0, target, Projection::IDENTITY, &mut tiny),
            Err(RenderError::TargetTooSmall { needed: 64, got: 8 })
        );
        assert_eq!(
            renderer.render(&sprite, 5, target, Projection::IDENTITY, &mut [0; 64]),
            Err(RenderError::FrameOutOfRange)
        );
        let mut buffer = [0u8; 64];
        renderer
            .render(&sprite, 0, target, Projection::IDENTITY, &mut buffer)
            .unwrap();
        assert!(buffer.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn projection_rounds_to_whole_pixels() {
        let projection = Projection { scale: 1.5 };
        assert_eq!(projection.apply(3), 5);
        assert_eq!(Projection::IDENTITY.apply(7), 7);
    }
}
