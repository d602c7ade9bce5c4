//! # Sprite document
//!
//! The root of the document model: an ordered frame list, a set of layers,
//! named frame tags, and a pivot. Every committed mutation bumps the
//! sprite's version counter exactly once per applied command, which is what
//! observers use for dirty-tracking and cache invalidation.
//!
//! Mutation goes through commands: the structural primitives here are
//! crate-private, reachable only from the command applier. The public
//! surface of this module is read access plus document *setup* (initial
//! frames and layers as loaded from a file), which happens before any edit
//! history exists.

use crate::geom::{Point, PointF};
use crate::state::layer::{Cel, Layer, LayerId};
use crate::state::palette::Palette;

pub type SpriteId = crate::id::UniqueId<Sprite>;
pub type TagId = crate::id::UniqueId<FrameTag>;

/// Default frame duration in display milliseconds.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// One time-indexed slot of the animation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    /// Display duration, milliseconds.
    pub duration_ms: u32,
    /// Offset applied when compositing this frame relative to the stage.
    pub root_position: Point,
    /// Each frame owns its palette.
    pub palette: Palette,
}
impl Default for Frame {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_FRAME_DURATION_MS,
            root_position: Point::ZERO,
            palette: Palette::default(),
        }
    }
}

/// A named, closed range `[from, to]` of frame indices.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FrameTag {
    pub id: TagId,
    pub name: String,
    pub from: usize,
    pub to: usize,
}
impl FrameTag {
    /// Construct a tag over `[from, to]`. None if the range is inverted.
    #[must_use]
    pub fn new(name: impl Into<String>, from: usize, to: usize) -> Option<Self> {
        (from <= to).then(|| Self {
            id: TagId::new(),
            name: name.into(),
            from,
            to,
        })
    }
    #[must_use]
    pub fn contains(&self, frame: usize) -> bool {
        self.from <= frame && frame <= self.to
    }
    /// Number of frames covered. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to - self.from + 1
    }
}

pub struct Sprite {
    id: SpriteId,
    /// Canvas size in pixels.
    pub width: u32,
    pub height: u32,
    frames: Vec<Frame>,
    layers: Vec<Layer>,
    tags: Vec<FrameTag>,
    pivot: PointF,
    version: u64,
}

// Public read access and document setup.
impl Sprite {
    /// A new sprite with a single default frame. A sprite always retains at
    /// least one frame.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: SpriteId::new(),
            width,
            height,
            frames: vec![Frame::default()],
            layers: Vec::new(),
            tags: Vec::new(),
            pivot: PointF::ZERO,
            version: 0,
        }
    }
    #[must_use]
    pub fn id(&self) -> SpriteId {
        self.id
    }
    /// Monotone mutation counter. Strictly increases on every applied
    /// command (execute and undo alike), never repeats.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
    #[must_use]
    pub fn pivot(&self) -> PointF {
        self.pivot
    }
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
    // O(n), like every by-ID lookup here. Layer and tag counts are small.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }
    #[must_use]
    pub fn tags(&self) -> &[FrameTag] {
        &self.tags
    }
    #[must_use]
    pub fn tag(&self, id: TagId) -> Option<&FrameTag> {
        self.tags.iter().find(|tag| tag.id == id)
    }
    /// The cel of one layer at one frame.
    #[must_use]
    pub fn cel(&self, layer: LayerId, frame: usize) -> Option<&Cel> {
        self.layer(layer)?.cel(frame)
    }

    /// Document setup: append a layer with empty cel slots for every
    /// existing frame. Part of loading, not of the edit history.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let layer = Layer::new(name.into(), self.frames.len());
        let id = layer.id;
        self.layers.push(layer);
        self.bump_version();
        id
    }
}

// Crate-private structural primitives for the command applier. Each
// primitive keeps the frame/slot alignment invariant: every layer has
// exactly one cel slot per frame.
impl Sprite {
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
    pub(crate) fn set_pivot(&mut self, pivot: PointF) {
        self.pivot = pivot;
    }
    pub(crate) fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index)
    }
    pub(crate) fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }
    /// Remove frame `index` and its slot in every layer, shifting later
    /// indices down by one. Caller has already emptied the slots.
    pub(crate) fn remove_frame_at(&mut self, index: usize) -> Frame {
        for layer in &mut self.layers {
            layer.remove_slot(index);
        }
        self.frames.remove(index)
    }
    /// Re-insert a frame at `index` with an empty slot in every layer,
    /// shifting later indices up by one.
    pub(crate) fn insert_frame_at(&mut self, index: usize, frame: Frame) {
        for layer in &mut self.layers {
            layer.insert_slot(index);
        }
        self.frames.insert(index, frame);
    }
    pub(crate) fn tag_mut(&mut self, id: TagId) -> Option<&mut FrameTag> {
        self.tags.iter_mut().find(|tag| tag.id == id)
    }
    pub(crate) fn tags_mut(&mut self) -> impl Iterator<Item = &mut FrameTag> {
        self.tags.iter_mut()
    }
    pub(crate) fn tag_position(&self, id: TagId) -> Option<usize> {
        self.tags.iter().position(|tag| tag.id == id)
    }
    pub(crate) fn push_tag(&mut self, tag: FrameTag) {
        self.tags.push(tag);
    }
    pub(crate) fn remove_tag_at(&mut self, index: usize) -> FrameTag {
        self.tags.remove(index)
    }
    pub(crate) fn insert_tag_at(&mut self, index: usize, tag: FrameTag) {
        self.tags.insert(index, tag);
    }
}
