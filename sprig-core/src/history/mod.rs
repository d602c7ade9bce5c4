//! # Edit log
//!
//! The per-document transaction history. Callers open a transaction with
//! [`EditLog::begin`], accumulate commands, and [`EditLog::commit`]; the log
//! executes the accumulated sequence against the sprite, records it on the
//! done stack, and broadcasts the change set to observers. Undo and redo
//! move sequences between the done and undone stacks. Any new commit
//! discards the entire undone stack — there is no branching history.
//!
//! The log owns every executed sequence (and with it each command's
//! captured undo data) until the sequence is evicted by the optional memory
//! budget or the document closes.

use crate::commands::{Command, CommandError, CommandSequence, Edit};
use crate::notify::{Change, ChangeSink, Direction};
use crate::state::Sprite;

#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("a transaction is already recording")]
    TransactionOpen,
    #[error("no transaction is recording")]
    NotRecording,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    /// A command failed partway through a sequence. The already-applied
    /// prefix remains applied; the sprite version advanced by exactly
    /// `applied`, which is how callers detect the half-applied state.
    #[error("command {applied} of the sequence failed: {source}")]
    CommandFailed {
        applied: usize,
        source: CommandError,
    },
}

pub struct EditLog {
    done: Vec<CommandSequence>,
    undone: Vec<CommandSequence>,
    recording: Option<CommandSequence>,
    /// Count of committed top-level sequences. +1 per commit, untouched by
    /// undo/redo.
    revision: u64,
    /// Byte cap over retained sequences, or None for unbounded.
    memory_budget: Option<usize>,
    sinks: Vec<Box<dyn ChangeSink>>,
}

impl Default for EditLog {
    fn default() -> Self {
        Self {
            done: Vec::new(),
            undone: Vec::new(),
            recording: None,
            revision: 0,
            memory_budget: None,
            sinks: Vec::new(),
        }
    }
}

impl EditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
    /// Committed-sequence counter: exactly +1 per successful [`Self::commit`].
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
    /// Retained footprint of both stacks, in bytes.
    #[must_use]
    pub fn mem_size(&self) -> usize {
        self.done
            .iter()
            .chain(self.undone.iter())
            .map(Edit::mem_size)
            .sum()
    }
    /// Cap the retained footprint. When a commit pushes the log over the
    /// cap, the oldest done entries are evicted (never the most recent one);
    /// evicted edits become permanently non-undoable.
    pub fn set_memory_budget(&mut self, budget: Option<usize>) {
        self.memory_budget = budget;
        self.enforce_budget();
    }
    /// Register a post-commit observer.
    pub fn subscribe(&mut self, sink: Box<dyn ChangeSink>) {
        self.sinks.push(sink);
    }

    /// Open a transaction. No nesting at the log level: composition happens
    /// inside the recorded sequence, not by stacking transactions.
    pub fn begin(&mut self) -> Result<(), LogError> {
        if self.recording.is_some() {
            return Err(LogError::TransactionOpen);
        }
        self.recording = Some(CommandSequence::new());
        Ok(())
    }
    /// Append a command to the recording transaction.
    pub fn push(&mut self, command: impl Into<Command>) -> Result<(), LogError> {
        let seq = self.recording.as_mut().ok_or(LogError::NotRecording)?;
        // Unsealed while recording, so add cannot fail.
        seq.add(command).map_err(|source| LogError::CommandFailed {
            applied: 0,
            source,
        })
    }
    /// Discard the recording transaction without executing anything.
    pub fn rollback(&mut self) -> Result<(), LogError> {
        let seq = self.recording.take().ok_or(LogError::NotRecording)?;
        log::trace!("rolled back transaction of {} command(s)", seq.len());
        Ok(())
    }
    /// Execute the recorded sequence, record it, truncate the redo stack,
    /// and notify observers.
    ///
    /// A mid-sequence failure is fatal for the transaction: the applied
    /// prefix stays applied (there is no safe generic inverse for a
    /// half-applied sequence), the sequence is dropped, and the error
    /// reports how far execution got.
    pub fn commit(&mut self, sprite: &mut Sprite) -> Result<(), LogError> {
        let mut seq = self.recording.take().ok_or(LogError::NotRecording)?;
        if seq.is_empty() {
            // Nothing accumulated; back to Clean without touching history.
            return Ok(());
        }
        log::trace!("committing sequence of {} command(s)", seq.len());
        seq.execute_all(sprite)
            .map_err(|(applied, source)| LogError::CommandFailed { applied, source })?;

        let changes = collect_changes(&seq);
        self.done.push(seq);
        self.undone.clear();
        self.revision += 1;
        self.enforce_budget();
        self.broadcast(sprite, Direction::Applied, &changes);
        Ok(())
    }
    /// Convenience: a single-command transaction.
    pub fn apply(&mut self, sprite: &mut Sprite, command: impl Into<Command>) -> Result<(), LogError> {
        self.begin()?;
        self.push(command)?;
        self.commit(sprite)
    }

    /// Revert the most recent committed sequence.
    pub fn undo(&mut self, sprite: &mut Sprite) -> Result<(), LogError> {
        if self.recording.is_some() {
            return Err(LogError::TransactionOpen);
        }
        let mut seq = self.done.pop().ok_or(LogError::NothingToUndo)?;
        seq.undo_all(sprite)
            .map_err(|(applied, source)| LogError::CommandFailed { applied, source })?;
        let changes = collect_changes(&seq);
        self.undone.push(seq);
        self.broadcast(sprite, Direction::Reverted, &changes);
        Ok(())
    }
    /// Re-apply the most recently undone sequence, replaying captured
    /// state. Only valid while no commit intervened since the undo.
    pub fn redo(&mut self, sprite: &mut Sprite) -> Result<(), LogError> {
        if self.recording.is_some() {
            return Err(LogError::TransactionOpen);
        }
        let mut seq = self.undone.pop().ok_or(LogError::NothingToRedo)?;
        seq.redo_all(sprite)
            .map_err(|(applied, source)| LogError::CommandFailed { applied, source })?;
        let changes = collect_changes(&seq);
        self.done.push(seq);
        self.broadcast(sprite, Direction::Applied, &changes);
        Ok(())
    }

    fn enforce_budget(&mut self) {
        let Some(budget) = self.memory_budget else {
            return;
        };
        // Oldest first, always keeping the most recent entry so the latest
        // edit stays undoable no matter how large it is.
        while self.mem_size() > budget && self.done.len() > 1 {
            let evicted = self.done.remove(0);
            log::debug!(
                "undo budget exceeded, evicting oldest sequence ({})",
                human_bytes::human_bytes(evicted.mem_size() as f64)
            );
        }
    }
    fn broadcast(&mut self, sprite: &Sprite, direction: Direction, changes: &[Change]) {
        let id = sprite.id();
        for change in changes {
            log::trace!("{direction:?} {} on {id:?}", change.kind);
        }
        for sink in &mut self.sinks {
            sink.on_change(id, direction, changes);
        }
    }
}

fn collect_changes(seq: &CommandSequence) -> smallvec::SmallVec<[Change; 1]> {
    let mut changes = smallvec::SmallVec::new();
    seq.changes(&mut changes);
    changes
}
