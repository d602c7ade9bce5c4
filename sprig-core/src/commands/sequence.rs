//! Ordered, reversible composites of commands.

use crate::commands::{Command, CommandError, Edit};
use crate::notify::Change;
use crate::state::Sprite;

/// An ordered list of commands executed as one reversible unit.
///
/// Appending is only legal before the first execution; a sequence seals
/// itself once run. Execution is fail-fast: the first failing child aborts
/// with the already-applied prefix left in place — partial rollback is the
/// caller's (the edit log's) problem, since a half-applied sequence has no
/// safe generic inverse. Undo runs children in exact reverse order.
#[derive(Debug, Default)]
pub struct CommandSequence {
    commands: Vec<Command>,
    sealed: bool,
}

impl CommandSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Append a command. Fails with [`CommandError::Sealed`] once the
    /// sequence has been executed.
    pub fn add(&mut self, command: impl Into<Command>) -> Result<(), CommandError> {
        if self.sealed {
            return Err(CommandError::Sealed);
        }
        self.commands.push(command.into());
        Ok(())
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Run every child in insertion order, sealing the sequence. On failure
    /// reports how many children were applied before the abort, so the
    /// caller can account for the half-applied prefix (the sprite version
    /// advanced by exactly that count).
    pub(crate) fn execute_all(
        &mut self,
        sprite: &mut Sprite,
    ) -> Result<(), (usize, CommandError)> {
        self.sealed = true;
        for (applied, command) in self.commands.iter_mut().enumerate() {
            command.execute(sprite).map_err(|err| (applied, err))?;
        }
        Ok(())
    }
    /// Undo every child in exact reverse order of execution.
    pub(crate) fn undo_all(&mut self, sprite: &mut Sprite) -> Result<(), (usize, CommandError)> {
        for (reverted, command) in self.commands.iter_mut().rev().enumerate() {
            command.undo(sprite).map_err(|err| (reverted, err))?;
        }
        Ok(())
    }
    pub(crate) fn redo_all(&mut self, sprite: &mut Sprite) -> Result<(), (usize, CommandError)> {
        for (applied, command) in self.commands.iter_mut().enumerate() {
            command.redo(sprite).map_err(|err| (applied, err))?;
        }
        Ok(())
    }
}

impl Edit for CommandSequence {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        self.execute_all(sprite).map_err(|(_, err)| err)
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        self.undo_all(sprite).map_err(|(_, err)| err)
    }
    fn redo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        self.redo_all(sprite).map_err(|(_, err)| err)
    }
    fn mem_size(&self) -> usize {
        // Fixed overhead plus the sum of the children's footprints.
        std::mem::size_of::<Self>()
            + self.commands.capacity() * std::mem::size_of::<Command>()
            + self
                .commands
                .iter()
                .map(|c| c.mem_size() - std::mem::size_of::<Command>())
                .sum::<usize>()
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        for command in &self.commands {
            command.changes(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SetFrameDuration;
    use crate::state::Sprite;

    #[test]
    fn add_after_execute_is_rejected() {
        let mut sprite = Sprite::new(8, 8);
        let mut seq = CommandSequence::new();
        seq.add(SetFrameDuration::new(&sprite, 0, 250).unwrap())
            .unwrap();
        seq.execute(&mut sprite).unwrap();

        let late = SetFrameDuration::new(&sprite, 0, 500).unwrap();
        assert_eq!(seq.add(late), Err(CommandError::Sealed));
    }

    #[test]
    fn undo_inverts_in_reverse_order() {
        // Three duration edits on the same frame: each captures the value
        // the previous one left behind, so anything but strict-reverse undo
        // trips a MismatchedState.
        let mut sprite = Sprite::new(8, 8);
        let mut seq = CommandSequence::new();
        let mut shadow = Sprite::new(8, 8);
        for target in [200, 300, 400] {
            let cmd = SetFrameDuration::new(&shadow, 0, target).unwrap();
            // Keep the shadow sprite in step so each command captures the
            // previous command's result as its old value.
            let mut probe = SetFrameDuration::new(&shadow, 0, target).unwrap();
            probe.execute(&mut shadow).unwrap();
            seq.add(cmd).unwrap();
        }
        seq.execute(&mut sprite).unwrap();
        assert_eq!(sprite.frame(0).unwrap().duration_ms, 400);

        seq.undo(&mut sprite).unwrap();
        assert_eq!(
            sprite.frame(0).unwrap().duration_ms,
            crate::state::sprite::DEFAULT_FRAME_DURATION_MS
        );
    }

    #[test]
    fn failure_reports_applied_prefix() {
        let mut sprite = Sprite::new(8, 8);
        let good = SetFrameDuration::new(&sprite, 0, 250).unwrap();
        // Valid at construction time, invalidated before execution by
        // building it against a wider sprite.
        let wide = {
            let mut s = Sprite::new(8, 8);
            s.insert_frame_at(1, crate::state::Frame::default());
            SetFrameDuration::new(&s, 1, 250).unwrap()
        };
        let mut seq = CommandSequence::new();
        seq.add(good).unwrap();
        seq.add(wide).unwrap();

        let before = sprite.version();
        let err = seq.execute_all(&mut sprite).unwrap_err();
        assert_eq!(err, (1, CommandError::UnknownResource));
        // Version delta equals the applied prefix length.
        assert_eq!(sprite.version(), before + 1);
    }

    #[test]
    fn nested_sequences_invert_as_a_unit() {
        let mut sprite = Sprite::new(8, 8);
        let mut inner = CommandSequence::new();
        inner
            .add(SetFrameDuration::new(&sprite, 0, 200).unwrap())
            .unwrap();
        let mut outer = CommandSequence::new();
        outer.add(inner).unwrap();
        assert!(outer.iter().next().unwrap().sequence().is_some());

        outer.execute(&mut sprite).unwrap();
        assert_eq!(sprite.frame(0).unwrap().duration_ms, 200);
        outer.undo(&mut sprite).unwrap();
        assert_eq!(
            sprite.frame(0).unwrap().duration_ms,
            crate::state::sprite::DEFAULT_FRAME_DURATION_MS
        );
    }

    #[test]
    fn mem_size_sums_children() {
        let sprite = Sprite::new(8, 8);
        let mut seq = CommandSequence::new();
        let lone = SetFrameDuration::new(&sprite, 0, 250).unwrap();
        let lone_size =
            Command::from(SetFrameDuration::new(&sprite, 0, 250).unwrap()).mem_size();
        seq.add(lone).unwrap();
        assert!(seq.mem_size() >= std::mem::size_of::<CommandSequence>() + lone_size);
    }
}
