//! # Tag-scoped playback
//!
//! Preview playback runs over the tag enclosing the current frame, or the
//! whole sprite when no tag applies. This module is pure frame arithmetic;
//! actually drawing the frames is the renderer collaborator's job.

use crate::state::{FrameTag, Sprite};

/// The first tag whose range contains `frame`, in tag-list order.
#[must_use]
pub fn tag_containing(sprite: &Sprite, frame: usize) -> Option<&FrameTag> {
    sprite.tags().iter().find(|tag| tag.contains(frame))
}

/// A closed range of frames that playback loops over.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PlaybackRange {
    pub from: usize,
    pub to: usize,
}

impl PlaybackRange {
    /// The range playback should loop for a sprite positioned at `frame`:
    /// the enclosing tag's range, or every frame if no tag contains it.
    #[must_use]
    pub fn scoped(sprite: &Sprite, frame: usize) -> Self {
        match tag_containing(sprite, frame) {
            Some(tag) => Self {
                from: tag.from,
                to: tag.to,
            },
            None => Self {
                from: 0,
                to: sprite.frame_count() - 1,
            },
        }
    }
    /// Iterate the frame indices of the range in display order.
    pub fn frames(&self) -> impl Iterator<Item = usize> {
        self.from..=self.to
    }
    /// The frame shown after `current`, wrapping at the end of the range.
    /// A `current` outside the range re-enters at the start.
    #[must_use]
    pub fn next_frame(&self, current: usize) -> usize {
        if current < self.from || current >= self.to {
            self.from
        } else {
            current + 1
        }
    }
    /// Total display time of one loop, in milliseconds.
    #[must_use]
    pub fn duration_ms(&self, sprite: &Sprite) -> u64 {
        self.frames()
            .filter_map(|frame| sprite.frame(frame))
            .map(|frame| u64::from(frame.duration_ms))
            .sum()
    }
}
