//! Per-frame color palettes.

/// An RGBA color, 8 bits per channel, unassociated alpha.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Debug, Hash, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The ordered colors of one frame. Each frame owns its own palette, so
/// structural frame commands capture and restore palettes wholesale.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Palette {
    colors: Vec<Color>,
}
impl Palette {
    /// Add a new color, returning its index.
    pub fn push(&mut self, color: Color) -> usize {
        self.colors.push(color);
        self.colors.len() - 1
    }
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Color> {
        self.colors.get(idx).copied()
    }
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Color> {
        self.colors.get_mut(idx)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
    /// Heap footprint, for command memory accounting.
    #[must_use]
    pub(crate) fn heap_size(&self) -> usize {
        self.colors.capacity() * std::mem::size_of::<Color>()
    }
}
impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}
