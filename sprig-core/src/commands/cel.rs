//! Cel content commands.

use crate::commands::{CommandError, Edit};
use crate::notify::Change;
use crate::state::{Cel, LayerId, Sprite};

/// Replace the cel of one layer at one frame: create (`None` → `Some`),
/// overwrite, or clear (`Some` → `None`). The old content is captured
/// wholesale so undo restores pixels bit-for-bit.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCel {
    layer: LayerId,
    frame: usize,
    from: Option<Cel>,
    to: Option<Cel>,
}

impl SetCel {
    pub fn new(
        sprite: &Sprite,
        layer: LayerId,
        frame: usize,
        to: Option<Cel>,
    ) -> Result<Self, CommandError> {
        if frame >= sprite.frame_count() {
            return Err(CommandError::UnknownResource);
        }
        let from = sprite
            .layer(layer)
            .ok_or(CommandError::UnknownResource)?
            .cel(frame)
            .cloned();
        if from == to {
            return Err(CommandError::NoOp);
        }
        Ok(Self {
            layer,
            frame,
            from,
            to,
        })
    }
    /// Build from already-captured endpoints. Used by structural frame
    /// commands during discovery, where the endpoints are known by
    /// construction.
    pub(crate) fn from_parts(
        layer: LayerId,
        frame: usize,
        from: Option<Cel>,
        to: Option<Cel>,
    ) -> Self {
        Self {
            layer,
            frame,
            from,
            to,
        }
    }

    fn swap(
        sprite: &mut Sprite,
        layer: LayerId,
        frame: usize,
        expect: &Option<Cel>,
        replacement: &Option<Cel>,
    ) -> Result<(), CommandError> {
        let slot = sprite
            .layer_mut(layer)
            .ok_or(CommandError::UnknownResource)?
            .cel_mut(frame)
            .ok_or(CommandError::UnknownResource)?;
        if slot != expect {
            return Err(CommandError::MismatchedState);
        }
        *slot = replacement.clone();
        sprite.bump_version();
        Ok(())
    }
}

impl Edit for SetCel {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::swap(sprite, self.layer, self.frame, &self.from, &self.to)
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::swap(sprite, self.layer, self.frame, &self.to, &self.from)
    }
    fn mem_size(&self) -> usize {
        let cel_heap = |cel: &Option<Cel>| cel.as_ref().map_or(0, Cel::heap_size);
        std::mem::size_of::<Self>() + cel_heap(&self.from) + cel_heap(&self.to)
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change::cel(self.layer, self.frame));
    }
}
