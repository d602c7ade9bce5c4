//! Sprite-scalar commands.

use crate::commands::{CommandError, Edit};
use crate::geom::PointF;
use crate::notify::{Change, ChangeKind};
use crate::state::Sprite;

/// Move the sprite's pivot. The pivot is a scalar field with no structural
/// dependents, so old and new values are the whole captured state.
#[derive(Debug, Clone, PartialEq)]
pub struct SetPivot {
    from: PointF,
    to: PointF,
}

impl SetPivot {
    /// Capture the old pivot at construction.
    pub fn new(sprite: &Sprite, to: PointF) -> Result<Self, CommandError> {
        let from = sprite.pivot();
        if from == to {
            return Err(CommandError::NoOp);
        }
        Ok(Self { from, to })
    }
    #[must_use]
    pub fn to(&self) -> PointF {
        self.to
    }
}

impl Edit for SetPivot {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        if sprite.pivot() != self.from {
            return Err(CommandError::MismatchedState);
        }
        sprite.set_pivot(self.to);
        sprite.bump_version();
        Ok(())
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        if sprite.pivot() != self.to {
            return Err(CommandError::MismatchedState);
        }
        sprite.set_pivot(self.from);
        sprite.bump_version();
        Ok(())
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change::sprite(ChangeKind::Pivot));
    }
}
