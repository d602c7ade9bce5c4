//! # Change notification
//!
//! After the edit log commits, undoes, or redoes a sequence, it broadcasts
//! what changed to registered observers (presentation refresh, persistence
//! dirty flags). Notifications are fire-and-forget and are *not* part of the
//! undo contract: nothing here is recorded or reversible, and sinks must not
//! re-enter the log.

use crate::state::{LayerId, SpriteId};

/// What aspect of the document a command touched.
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display)]
pub enum ChangeKind {
    FrameAdded,
    FrameRemoved,
    FrameDuration,
    FrameRoot,
    Pivot,
    Cel,
    Tag,
}

/// The semantic delta of one applied command.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Change {
    pub kind: ChangeKind,
    /// Affected frame range `[from, to]`, if the change is frame-scoped.
    pub frames: Option<(usize, usize)>,
    /// Affected layer, if the change is layer-scoped.
    pub layer: Option<LayerId>,
}
impl Change {
    #[must_use]
    pub fn sprite(kind: ChangeKind) -> Self {
        Self {
            kind,
            frames: None,
            layer: None,
        }
    }
    #[must_use]
    pub fn frame(kind: ChangeKind, frame: usize) -> Self {
        Self {
            kind,
            frames: Some((frame, frame)),
            layer: None,
        }
    }
    #[must_use]
    pub fn cel(layer: LayerId, frame: usize) -> Self {
        Self {
            kind: ChangeKind::Cel,
            frames: Some((frame, frame)),
            layer: Some(layer),
        }
    }
}

/// Whether the broadcast batch was applied forward or reverted. Reverts
/// report the same affected ranges as the original application.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Applied,
    Reverted,
}

/// Observer of committed changes. Must not call back into the edit log.
pub trait ChangeSink {
    fn on_change(&mut self, sprite: SpriteId, direction: Direction, changes: &[Change]);
}
