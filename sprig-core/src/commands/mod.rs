//! # Commands
//!
//! Commands are the only way the document is modified once it has an edit
//! history. Each command is an atomic, reversible unit: it holds exactly the
//! state needed to invert itself, verifies that captured state against the
//! document before mutating, and bumps the sprite version exactly once per
//! successful execute and once per undo.
//!
//! Commands are tagged variants of [`Command`], each with its own
//! captured-state struct, dispatched through the [`Edit`] capability by the
//! edit log. Composition happens with [`sequence::CommandSequence`], which
//! is itself a command.

pub mod cel;
pub mod frame;
pub mod sequence;
pub mod sprite;
pub mod tag;

pub use cel::SetCel;
pub use frame::{AddFrame, RemoveFrame, SetFrameDuration, SetFrameRoot};
pub use sequence::CommandSequence;
pub use sprite::SetPivot;
pub use tag::{AddTag, RemoveTag, SetTagRange};

use crate::notify::Change;
use crate::state::Sprite;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("command constructed for a state that does not match the current state")]
    MismatchedState,
    #[error("resource referenced by the command is not found")]
    UnknownResource,
    #[error("command makes no changes")]
    NoOp,
    #[error("a sprite must retain at least one frame")]
    LastFrame,
    #[error("frame range is inverted or out of bounds")]
    InvalidRange,
    #[error("sequence has already been executed")]
    Sealed,
}

/// The reversible-edit capability. The edit log drives every command
/// through this interface; concrete variants never dispatch each other
/// directly.
///
/// Contract: a failed `execute` or `undo` leaves the document (and its
/// version) untouched. `undo` is only meaningful after a matching,
/// successful `execute`. `redo` replays previously captured state and
/// must not re-capture.
pub trait Edit {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError>;
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError>;
    fn redo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        self.execute(sprite)
    }
    /// Approximate retained footprint in bytes, for the log's memory
    /// budget.
    fn mem_size(&self) -> usize;
    /// Append the semantic delta of this edit for post-commit broadcast.
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>);
}

#[derive(Debug)]
pub enum Command {
    AddFrame(AddFrame),
    RemoveFrame(RemoveFrame),
    SetFrameDuration(SetFrameDuration),
    SetFrameRoot(SetFrameRoot),
    SetPivot(SetPivot),
    SetCel(SetCel),
    AddTag(AddTag),
    RemoveTag(RemoveTag),
    SetTagRange(SetTagRange),
    /// Nested composition.
    Sequence(CommandSequence),
}

macro_rules! each_variant {
    ($self:expr, $inner:pat => $body:expr) => {
        match $self {
            Command::AddFrame($inner) => $body,
            Command::RemoveFrame($inner) => $body,
            Command::SetFrameDuration($inner) => $body,
            Command::SetFrameRoot($inner) => $body,
            Command::SetPivot($inner) => $body,
            Command::SetCel($inner) => $body,
            Command::AddTag($inner) => $body,
            Command::RemoveTag($inner) => $body,
            Command::SetTagRange($inner) => $body,
            Command::Sequence($inner) => $body,
        }
    };
}

impl Edit for Command {
    fn execute(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        each_variant!(self, inner => inner.execute(sprite))
    }
    fn undo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        each_variant!(self, inner => inner.undo(sprite))
    }
    fn redo(&mut self, sprite: &mut Sprite) -> Result<(), CommandError> {
        each_variant!(self, inner => inner.redo(sprite))
    }
    fn mem_size(&self) -> usize {
        // Count the full enum width once, plus whatever the variant holds
        // on the heap.
        std::mem::size_of::<Self>()
            + each_variant!(self, inner => inner.mem_size() - std::mem::size_of_val(inner))
    }
    fn changes(&self, out: &mut smallvec::SmallVec<[Change; 1]>) {
        each_variant!(self, inner => inner.changes(out));
    }
}

impl Command {
    #[must_use]
    pub fn remove_frame(&self) -> Option<&RemoveFrame> {
        match self {
            Self::RemoveFrame(c) => Some(c),
            _ => None,
        }
    }
    #[must_use]
    pub fn set_pivot(&self) -> Option<&SetPivot> {
        match self {
            Self::SetPivot(c) => Some(c),
            _ => None,
        }
    }
    #[must_use]
    pub fn sequence(&self) -> Option<&CommandSequence> {
        match self {
            Self::Sequence(c) => Some(c),
            _ => None,
        }
    }
}

macro_rules! command_from {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(impl From<$ty> for Command {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        })+
    };
}
command_from!(
    AddFrame(AddFrame),
    RemoveFrame(RemoveFrame),
    SetFrameDuration(SetFrameDuration),
    SetFrameRoot(SetFrameRoot),
    SetPivot(SetPivot),
    SetCel(SetCel),
    AddTag(AddTag),
    RemoveTag(RemoveTag),
    SetTagRange(SetTagRange),
    Sequence(CommandSequence),
);
