//! # Layers and cels
//!
//! A [`Layer`] owns one optional [`Cel`] per frame of the sprite. The slot
//! vector is kept index-aligned with the sprite's frame list at all times;
//! structural frame commands insert or remove a slot in *every* layer in the
//! same operation that edits the frame list, so `cels.len()` always equals
//! the sprite's frame count.

use crate::geom::Point;
use crate::state::palette::Color;

pub type LayerId = crate::id::UniqueId<Layer>;

/// The pixel content of one layer at one frame.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Cel {
    /// Offset of the cel's top-left corner within the sprite canvas.
    pub origin: Point,
    pub width: u32,
    pub height: u32,
    /// `width * height` pixels, row-major.
    pixels: Vec<Color>,
}
impl Cel {
    /// Create a cel from its pixels. Fails (returns None) if the pixel count
    /// does not match the dimensions.
    #[must_use]
    pub fn new(origin: Point, width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        if pixels.len() as u64 != u64::from(width) * u64::from(height) {
            return None;
        }
        Some(Self {
            origin,
            width,
            height,
            pixels,
        })
    }
    /// A cel filled with transparent pixels.
    #[must_use]
    pub fn empty(origin: Point, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width as usize) * (height as usize)],
        }
    }
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }
    /// Raw RGBA byte view, for the renderer boundary.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
    /// Heap footprint, for command memory accounting.
    #[must_use]
    pub(crate) fn heap_size(&self) -> usize {
        self.pixels.capacity() * std::mem::size_of::<Color>()
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// One slot per sprite frame, index-aligned with the frame list.
    cels: Vec<Option<Cel>>,
}
// Public read access.
impl Layer {
    /// The cel at a frame index, or None if the slot is empty or out of
    /// range.
    #[must_use]
    pub fn cel(&self, frame: usize) -> Option<&Cel> {
        self.cels.get(frame)?.as_ref()
    }
    /// Iterate `(frame index, cel)` over the occupied slots.
    pub fn iter_cels(&self) -> impl Iterator<Item = (usize, &Cel)> {
        self.cels
            .iter()
            .enumerate()
            .filter_map(|(frame, slot)| Some((frame, slot.as_ref()?)))
    }
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.cels.len()
    }
}
// Private structural access for the command applier.
impl Layer {
    pub(crate) fn new(name: String, frame_count: usize) -> Self {
        Self {
            id: LayerId::new(),
            name,
            cels: vec![None; frame_count],
        }
    }
    pub(crate) fn cel_mut(&mut self, frame: usize) -> Option<&mut Option<Cel>> {
        self.cels.get_mut(frame)
    }
    /// Remove the slot for a frame entirely, shifting later slots down.
    pub(crate) fn remove_slot(&mut self, frame: usize) -> Option<Cel> {
        self.cels.remove(frame)
    }
    /// Insert an empty slot for a new frame, shifting later slots up.
    pub(crate) fn insert_slot(&mut self, frame: usize) {
        self.cels.insert(frame, None);
    }
}
