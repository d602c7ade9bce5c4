//! Structural and per-frame commands.
//!
//! `RemoveFrame` is the involved one: removing a frame also has to remove
//! every layer's cel at that index and fix up tag ranges, and all of it must
//! come back bit-for-bit on undo. That bookkeeping is recorded into an
//! internal [`CommandSequence`] the first time the command executes; redo
//! replays the recording without re-discovering anything.

use crate::commands::{CommandError, CommandSequence, Edit, RemoveTag, SetCel, SetTagRange};
use crate::geom::Point;
use crate::notify::{Change, ChangeKind};
use crate::state::{Frame, Palette, Sprite};

/// Remove one frame, shifting every later frame index down by one.
///
/// Rejected for the sole remaining frame: a sprite always retains at least
/// one. Frame metadata (duration, root position, palette) is captured at
/// construction; affected cels and tags are discovered on first execute.
#[derive(Debug)]
pub struct RemoveFrame {
    frame: usize,
    duration_ms: u32,
    root_position: Point,
    palette: Palette,
    /// Cel removals and tag adjustments, recorded on first execute.
    seq: CommandSequence,
    first_time: bool,
}

impl RemoveFrame {
    pub fn new(sprite: &Sprite, frame: usize) -> Result<Self, CommandError> {
        let captured = sprite.frame(frame).ok_or(CommandError::UnknownResource)?;
        if sprite.frame_count() == 1 {
            return Err(CommandError::LastFrame);
        }
        Ok(Self {
            frame,
            duration_ms: captured.duration_ms,
            root_position: captured.root_position,
            palette: captured.palette.clone(),
            seq: CommandSequence::new(),
            first_time: true,
        })
    }

    /// Record cel removals and tag adjustments into the internal sequence.
    /// Only reads the sprite; the recorded commands do the mutating.
    fn discover(&mut self, sprite: &Sprite) -> Result<(), CommandError> {
        for layer in sprite.layers() {
            if let Some(cel) = layer.cel(self.frame) {
                self.seq
                    .add(SetCel::from_parts(layer.id, self.frame, Some(cel.clone()), None))?;
            }
        }
        // Clamp-and-shift: tags past the frame slide down, tags containing
        // it shrink, tags covering only this frame disappear.
        let mut dead = Vec::new();
        for (position, tag) in sprite.tags().iter().enumerate() {
            if tag.from > self.frame {
                self.seq.add(SetTagRange::from_parts(
                    tag.id,
                    (tag.from, tag.to),
                    (tag.from - 1, tag.to - 1),
                ))?;
            } else if tag.contains(self.frame) {
                if tag.len() == 1 {
                    dead.push((tag.clone(), position));
                } else {
                    self.seq.add(SetTagRange::from_parts(
                        tag.id,
                        (tag.from, tag.to),
                        (tag.from, tag.to - 1),
                    ))?;
                }
            }
        }
        // Descending position order keeps earlier removals from shifting
        // the positions of later ones.
        for (tag, position) in dead.into_iter().rev() {
            self.seq.add(RemoveTag::from_parts(tag, position))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn recorded_len(&self) -> usize {
        self.seq.len()
    }
}

impl Edit for RemoveFrame {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        let current = sprite.frame(self.frame).ok_or(CommandError::UnknownResource)?;
        if sprite.frame_count() == 1 {
            return Err(CommandError::LastFrame);
        }
        if current.duration_ms != self.duration_ms
            || current.root_position != self.root_position
            || current.palette != self.palette
        {
            return Err(CommandError::MismatchedState);
        }
        if self.first_time {
            self.discover(sprite)?;
            self.first_time = false;
        }
        // Clear cels and fix tags while the frame's slots still exist, then
        // drop the slot itself.
        self.seq.execute_all(sprite).map_err(|(_, err)| err)?;
        sprite.remove_frame_at(self.frame);
        sprite.bump_version();
        Ok(())
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        if self.frame > sprite.frame_count() {
            return Err(CommandError::MismatchedState);
        }
        sprite.insert_frame_at(
            self.frame,
            Frame {
                duration_ms: self.duration_ms,
                root_position: self.root_position,
                palette: self.palette.clone(),
            },
        );
        sprite.bump_version();
        // Restore cels into the re-inserted slots and revert tag ranges, in
        // exact reverse of the recording.
        self.seq.undo_all(sprite).map_err(|(_, err)| err)
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.palette.heap_size()
            + (self.seq.mem_size() - std::mem::size_of::<CommandSequence>())
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change::frame(ChangeKind::FrameRemoved, self.frame));
    }
}

/// Insert an empty frame at an index, shifting later frames up.
///
/// Tag fixes on insertion are a pure function of the index (shift tags at or
/// after it, grow tags strictly spanning it), so no discovery pass is
/// needed; execute and undo compute the shifts directly.
#[derive(Debug, Clone, PartialEq)]
pub struct AddFrame {
    index: usize,
    duration_ms: u32,
}

impl AddFrame {
    pub fn new(sprite: &Sprite, index: usize, duration_ms: u32) -> Result<Self, CommandError> {
        if index > sprite.frame_count() {
            return Err(CommandError::UnknownResource);
        }
        Ok(Self { index, duration_ms })
    }
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Edit for AddFrame {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        if self.index > sprite.frame_count() {
            return Err(CommandError::MismatchedState);
        }
        sprite.insert_frame_at(
            self.index,
            Frame {
                duration_ms: self.duration_ms,
                ..Frame::default()
            },
        );
        let index = self.index;
        for tag in sprite.tags_mut() {
            if tag.from >= index {
                tag.from += 1;
                tag.to += 1;
            } else if tag.to >= index {
                tag.to += 1;
            }
        }
        sprite.bump_version();
        Ok(())
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        let frame = sprite.frame(self.index).ok_or(CommandError::MismatchedState)?;
        let expected = Frame {
            duration_ms: self.duration_ms,
            ..Frame::default()
        };
        if *frame != expected {
            return Err(CommandError::MismatchedState);
        }
        // Content drawn into the new frame must have been undone first.
        if sprite.layers().iter().any(|l| l.cel(self.index).is_some()) {
            return Err(CommandError::MismatchedState);
        }
        sprite.remove_frame_at(self.index);
        let index = self.index;
        for tag in sprite.tags_mut() {
            if tag.from > index {
                tag.from -= 1;
                tag.to -= 1;
            } else if tag.to > index {
                tag.to -= 1;
            }
        }
        sprite.bump_version();
        Ok(())
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change::frame(ChangeKind::FrameAdded, self.index));
    }
}

/// Change one frame's display duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFrameDuration {
    frame: usize,
    from: u32,
    to: u32,
}

impl SetFrameDuration {
    pub fn new(sprite: &Sprite, frame: usize, to: u32) -> Result<Self, CommandError> {
        let from = sprite
            .frame(frame)
            .ok_or(CommandError::UnknownResource)?
            .duration_ms;
        if from == to {
            return Err(CommandError::NoOp);
        }
        Ok(Self { frame, from, to })
    }

    fn set(
        sprite: &mut Sprite,
        frame: usize,
        expect: u32,
        replacement: u32,
    ) -> Result<(), CommandError> {
        let frame = sprite.frame_mut(frame).ok_or(CommandError::UnknownResource)?;
        if frame.duration_ms != expect {
            return Err(CommandError::MismatchedState);
        }
        frame.duration_ms = replacement;
        sprite.bump_version();
        Ok(())
    }
}

impl Edit for SetFrameDuration {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::set(sprite, self.frame, self.from, self.to)
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::set(sprite, self.frame, self.to, self.from)
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change::frame(ChangeKind::FrameDuration, self.frame));
    }
}

/// Move one frame's root position offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFrameRoot {
    frame: usize,
    from: Point,
    to: Point,
}

impl SetFrameRoot {
    pub fn new(sprite: &Sprite, frame: usize, to: Point) -> Result<Self, CommandError> {
        let from = sprite
            .frame(frame)
            .ok_or(CommandError::UnknownResource)?
            .root_position;
        if from == to {
            return Err(CommandError::NoOp);
        }
        Ok(Self { frame, from, to })
    }

    fn set(
        sprite: &mut Sprite,
        frame: usize,
        expect: Point,
        replacement: Point,
    ) -> Result<(), CommandError> {
        let frame = sprite.frame_mut(frame).ok_or(CommandError::UnknownResource)?;
        if frame.root_position != expect {
            return Err(CommandError::MismatchedState);
        }
        frame.root_position = replacement;
        sprite.bump_version();
        Ok(())
    }
}

impl Edit for SetFrameRoot {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::set(sprite, self.frame, self.from, self.to)
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        Self::set(sprite, self.frame, self.to, self.from)
    }
    fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        out.push(Change::frame(ChangeKind::FrameRoot, self.frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::AddTag;
    use crate::state::{Cel, Color, LayerId};

    /// Sprite with three frames of distinct durations/roots, two layers,
    /// and cels on frames 0 and 1 of the ink layer.
    fn fixture() -> (Sprite, LayerId, LayerId) {
        let mut sprite = Sprite::new(4, 4);
        sprite.insert_frame_at(1, Frame::default());
        sprite.insert_frame_at(2, Frame::default());
        for (i, (duration, x)) in [(100, 0), (150, 3), (200, -2)].into_iter().enumerate() {
            let frame = sprite.frame_mut(i).unwrap();
            frame.duration_ms = duration;
            frame.root_position = Point::new(x, x * 2);
            frame.palette.push(Color::rgba(i as u8, 0, 0, 255));
        }
        let bg = sprite.add_layer("bg");
        let ink = sprite.add_layer("ink");
        for frame in 0..2 {
            let mut cel = Cel::empty(Point::ZERO, 2, 2);
            cel.pixels_mut()[frame] = Color::rgba(255, frame as u8, 0, 255);
            *sprite.layer_mut(ink).unwrap().cel_mut(frame).unwrap() = Some(cel);
        }
        (sprite, bg, ink)
    }

    /// Everything observable about a sprite, for bit-for-bit comparison.
    fn snapshot(sprite: &Sprite) -> (Vec<Frame>, Vec<Vec<Option<Cel>>>, Vec<(usize, usize)>) {
        let frames = sprite.frames().to_vec();
        let cels = sprite
            .layers()
            .iter()
            .map(|layer| {
                (0..sprite.frame_count())
                    .map(|f| layer.cel(f).cloned())
                    .collect()
            })
            .collect();
        let tags = sprite.tags().iter().map(|t| (t.from, t.to)).collect();
        (frames, cels, tags)
    }

    #[test]
    fn remove_then_undo_restores_bit_for_bit() {
        let (mut sprite, _bg, ink) = fixture();
        let before = snapshot(&sprite);
        let v0 = sprite.version();

        let mut cmd = RemoveFrame::new(&sprite, 1).unwrap();
        cmd.execute(&mut sprite).unwrap();
        assert_eq!(sprite.frame_count(), 2);
        assert_eq!(sprite.frame(1).unwrap().duration_ms, 200);
        // The ink cel that lived on frame 1 is gone; frame 0's survives.
        assert!(sprite.cel(ink, 1).is_none());
        assert!(sprite.cel(ink, 0).is_some());
        // One cel removal recorded, plus the structural step.
        assert_eq!(sprite.version(), v0 + 2);

        cmd.undo(&mut sprite).unwrap();
        assert_eq!(snapshot(&sprite), before);
    }

    #[test]
    fn removing_sole_frame_is_rejected() {
        let mut sprite = Sprite::new(4, 4);
        let version = sprite.version();
        assert_eq!(
            RemoveFrame::new(&sprite, 0).unwrap_err(),
            CommandError::LastFrame
        );
        // Also rejected at execute time if frames dwindled since capture.
        let mut cmd = {
            let two = {
                let mut s = Sprite::new(4, 4);
                s.insert_frame_at(1, Frame::default());
                s
            };
            RemoveFrame::new(&two, 0).unwrap()
        };
        assert!(cmd.execute(&mut sprite).is_err());
        assert_eq!(sprite.version(), version);
    }

    #[test]
    fn tag_clamps_when_inner_frame_removed() {
        // Frames [d0, d1, d2], tag [1, 2]; removing frame 1 leaves
        // [d0, d2] and the tag clamped to [1, 1].
        let (mut sprite, _, _) = fixture();
        AddTag::new(&sprite, "walk", 1, 2)
            .unwrap()
            .execute(&mut sprite)
            .unwrap();

        let mut cmd = RemoveFrame::new(&sprite, 1).unwrap();
        cmd.execute(&mut sprite).unwrap();
        let tag = &sprite.tags()[0];
        assert_eq!((tag.from, tag.to), (1, 1));

        cmd.undo(&mut sprite).unwrap();
        let tag = &sprite.tags()[0];
        assert_eq!((tag.from, tag.to), (1, 2));
    }

    #[test]
    fn tag_past_removed_frame_shifts_down() {
        let (mut sprite, _, _) = fixture();
        AddTag::new(&sprite, "tail", 2, 2)
            .unwrap()
            .execute(&mut sprite)
            .unwrap();

        let mut cmd = RemoveFrame::new(&sprite, 0).unwrap();
        cmd.execute(&mut sprite).unwrap();
        let tag = &sprite.tags()[0];
        assert_eq!((tag.from, tag.to), (1, 1));
    }

    #[test]
    fn single_frame_tag_dies_with_its_frame() {
        let (mut sprite, _, _) = fixture();
        let mut add = AddTag::new(&sprite, "blink", 1, 1).unwrap();
        add.execute(&mut sprite).unwrap();

        let mut cmd = RemoveFrame::new(&sprite, 1).unwrap();
        cmd.execute(&mut sprite).unwrap();
        assert!(sprite.tag(add.id()).is_none());

        cmd.undo(&mut sprite).unwrap();
        let tag = sprite.tag(add.id()).unwrap();
        assert_eq!((tag.from, tag.to), (1, 1));
        assert_eq!(tag.name, "blink");
    }

    #[test]
    fn redo_replays_captured_cels() {
        let (mut sprite, _, _) = fixture();
        let mut cmd = RemoveFrame::new(&sprite, 1).unwrap();
        cmd.execute(&mut sprite).unwrap();
        let recorded = cmd.recorded_len();
        let after = snapshot(&sprite);

        cmd.undo(&mut sprite).unwrap();
        cmd.redo(&mut sprite).unwrap();
        assert_eq!(snapshot(&sprite), after);
        // Redo replayed the recording; discovery did not run again.
        assert_eq!(cmd.recorded_len(), recorded);
    }

    #[test]
    fn add_frame_shifts_and_grows_tags() {
        let (mut sprite, _, _) = fixture();
        let mut spanning = AddTag::new(&sprite, "span", 0, 2).unwrap();
        let mut tail = AddTag::new(&sprite, "tail", 2, 2).unwrap();
        spanning.execute(&mut sprite).unwrap();
        tail.execute(&mut sprite).unwrap();

        let mut cmd = AddFrame::new(&sprite, 1, 75).unwrap();
        cmd.execute(&mut sprite).unwrap();
        assert_eq!(sprite.frame_count(), 4);
        assert_eq!(sprite.frame(1).unwrap().duration_ms, 75);
        let span = sprite.tag(spanning.id()).unwrap();
        // Insertion inside the closed range grows it.
        assert_eq!((span.from, span.to), (0, 3));
        let tail_tag = sprite.tag(tail.id()).unwrap();
        assert_eq!((tail_tag.from, tail_tag.to), (3, 3));

        cmd.undo(&mut sprite).unwrap();
        assert_eq!(sprite.frame_count(), 3);
        let span = sprite.tag(spanning.id()).unwrap();
        assert_eq!((span.from, span.to), (0, 2));
        let tail_tag = sprite.tag(tail.id()).unwrap();
        assert_eq!((tail_tag.from, tail_tag.to), (2, 2));
    }

    #[test]
    fn duration_and_root_round_trip() {
        let (mut sprite, _, _) = fixture();
        let mut duration = SetFrameDuration::new(&sprite, 2, 999).unwrap();
        let mut root = SetFrameRoot::new(&sprite, 2, Point::new(7, -7)).unwrap();
        duration.execute(&mut sprite).unwrap();
        root.execute(&mut sprite).unwrap();
        assert_eq!(sprite.frame(2).unwrap().duration_ms, 999);
        assert_eq!(sprite.frame(2).unwrap().root_position, Point::new(7, -7));

        root.undo(&mut sprite).unwrap();
        duration.undo(&mut sprite).unwrap();
        assert_eq!(sprite.frame(2).unwrap().duration_ms, 200);
        assert_eq!(sprite.frame(2).unwrap().root_position, Point::new(-2, -4));
    }
}
