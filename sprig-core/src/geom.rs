//! Geometry primitives shared by the document model and the renderer
//! boundary: integer points for frame root positions, float points for the
//! pivot, and pixel rectangles for render targets.

/// An integer 2D point. Frame root positions live on the pixel grid.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Debug, bytemuck::Pod, bytemuck::Zeroable, Hash,
)]
#[repr(C)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}
impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A float 2D point. The sprite pivot is unrestricted (may sit outside the
/// canvas, between pixels, anywhere).
#[derive(Copy, Clone, Default, PartialEq, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}
impl PointF {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        Self {
            // Lossless for any coordinate a sprite can actually have.
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}

/// An axis-aligned pixel rectangle, origin at the top-left.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Rect {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}
impl Rect {
    #[must_use]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
    /// Area in pixels.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
