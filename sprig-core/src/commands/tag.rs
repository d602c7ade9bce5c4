//! Frame tag commands.
//!
//! Tags are named closed ranges `[from, to]` over frame indices. Structural
//! frame commands also emit these as sub-commands when removal forces a tag
//! to shift, shrink, or disappear (the clamp-and-shift policy).

use crate::commands::{CommandError, Edit};
use crate::notify::{Change, ChangeKind};
use crate::state::{FrameTag, Sprite, TagId};

/// Create a tag over an existing frame range.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTag {
    tag: FrameTag,
}

impl AddTag {
    pub fn new(
        sprite: &Sprite,
        name: impl Into<String>,
        from: usize,
        to: usize,
    ) -> Result<Self, CommandError> {
        if to >= sprite.frame_count() {
            return Err(CommandError::InvalidRange);
        }
        let tag = FrameTag::new(name, from, to).ok_or(CommandError::InvalidRange)?;
        Ok(Self { tag })
    }
    #[must_use]
    pub fn id(&self) -> TagId {
        self.tag.id
    }
}

impl Edit for AddTag {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        if sprite.tag(self.tag.id).is_some() {
            return Err(CommandError::MismatchedState);
        }
        if self.tag.to >= sprite.frame_count() {
            return Err(CommandError::InvalidRange);
        }
        sprite.push_tag(self.tag.clone());
        sprite.bump_version();
        Ok(())
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        let position = sprite
            .tag_position(self.tag.id)
            .ok_or(CommandError::UnknownResource)?;
        if sprite.tags()[position] != self.tag {
            return Err(CommandError::MismatchedState);
        }
        sprite.remove_tag_at(position);
        sprite.bump_version();
        Ok(())
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.tag.name.capacity()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change {
            kind: ChangeKind::Tag,
            frames: Some((self.tag.from, self.tag.to)),
            layer: None,
        });
    }
}

/// Delete a tag, capturing a full snapshot (and its position in the tag
/// list) so undo restores it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveTag {
    tag: FrameTag,
    position: usize,
}

impl RemoveTag {
    pub fn new(sprite: &Sprite, id: TagId) -> Result<Self, CommandError> {
        let position = sprite.tag_position(id).ok_or(CommandError::UnknownResource)?;
        Ok(Self {
            tag: sprite.tags()[position].clone(),
            position,
        })
    }
    pub(crate) fn from_parts(tag: FrameTag, position: usize) -> Self {
        Self { tag, position }
    }
}

impl Edit for RemoveTag {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        let position = sprite
            .tag_position(self.tag.id)
            .ok_or(CommandError::UnknownResource)?;
        if sprite.tags()[position] != self.tag {
            return Err(CommandError::MismatchedState);
        }
        sprite.remove_tag_at(position);
        sprite.bump_version();
        Ok(())
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        if sprite.tag(self.tag.id).is_some() {
            return Err(CommandError::MismatchedState);
        }
        let position = self.position.min(sprite.tags().len());
        sprite.insert_tag_at(position, self.tag.clone());
        sprite.bump_version();
        Ok(())
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.tag.name.capacity()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change {
            kind: ChangeKind::Tag,
            frames: Some((self.tag.from, self.tag.to)),
            layer: None,
        });
    }
}

/// Retarget a tag's frame range, old and new captured symmetrically.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTagRange {
    target: TagId,
    from: (usize, usize),
    to: (usize, usize),
}

impl SetTagRange {
    pub fn new(sprite: &Sprite, target: TagId, to: (usize, usize)) -> Result<Self, CommandError> {
        let tag = sprite.tag(target).ok_or(CommandError::UnknownResource)?;
        if to.0 > to.1 || to.1 >= sprite.frame_count() {
            return Err(CommandError::InvalidRange);
        }
        let from = (tag.from, tag.to);
        if from == to {
            return Err(CommandError::NoOp);
        }
        Ok(Self { target, from, to })
    }
    pub(crate) fn from_parts(target: TagId, from: (usize, usize), to: (usize, usize)) -> Self {
        Self { target, from, to }
    }

    fn retarget(
        sprite: &mut Sprite,
        target: TagId,
        expect: (usize, usize),
        replacement: (usize, usize),
    ) -> Result<(), CommandError> {
        let tag = sprite.tag_mut(target).ok_or(CommandError::UnknownResource)?;
        if (tag.from, tag.to) != expect {
            return Err(CommandError::MismatchedState);
        }
        tag.from = replacement.0;
        tag.to = replacement.1;
        sprite.bump_version();
        Ok(())
    }
}

impl Edit for SetTagRange {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::retarget(sprite, self.target, self.from, self.to)
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::retarget(sprite, self.target, self.to, self.from)
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        let lo = self.from.0.min(self.to.0);
        let hi = self.from.1.max(self.to.1);
        out.push(Change {
            kind: ChangeKind::Tag,
            frames: Some((lo, hi)),
            layer: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Frame;

    fn three_frame_sprite() -> Sprite {
        let mut sprite = Sprite::new(4, 4);
        sprite.insert_frame_at(1, Frame::default());
        sprite.insert_frame_at(2, Frame::default());
        sprite
    }

    #[test]
    fn add_and_remove_round_trip() {
        let mut sprite = three_frame_sprite();
        let mut add = AddTag::new(&sprite, "walk", 0, 2).unwrap();
        add.execute(&mut sprite).unwrap();
        let id = add.id();
        assert!(sprite.tag(id).unwrap().contains(1));

        let mut remove = RemoveTag::new(&sprite, id).unwrap();
        remove.execute(&mut sprite).unwrap();
        assert!(sprite.tag(id).is_none());
        remove.undo(&mut sprite).unwrap();
        assert_eq!(sprite.tag(id).unwrap().to, 2);
        add.undo(&mut sprite).unwrap();
        assert!(sprite.tags().is_empty());
    }

    #[test]
    fn range_beyond_frames_rejected() {
        let sprite = three_frame_sprite();
        assert_eq!(
            AddTag::new(&sprite, "oops", 1, 3).unwrap_err(),
            CommandError::InvalidRange
        );
    }

    #[test]
    fn retarget_restores_old_range() {
        let mut sprite = three_frame_sprite();
        let mut add = AddTag::new(&sprite, "walk", 1, 2).unwrap();
        add.execute(&mut sprite).unwrap();

        let mut retarget = SetTagRange::new(&sprite, add.id(), (0, 1)).unwrap();
        retarget.execute(&mut sprite).unwrap();
        assert_eq!(sprite.tag(add.id()).unwrap().from, 0);
        retarget.undo(&mut sprite).unwrap();
        let tag = sprite.tag(add.id()).unwrap();
        assert_eq!((tag.from, tag.to), (1, 2));
    }
}
