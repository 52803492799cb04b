use super::Point;

/// Surface size in physical pixels.
///
/// Pointer events arrive in the same pixel space (top-left origin, +Y down);
/// `to_clip` maps them into clip space (center origin, +Y up).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a surface position to clip space.
    #[inline]
    pub fn to_clip(self, x: f32, y: f32) -> Point {
        Point::new(
            (x / self.width) * 2.0 - 1.0,
            (y / self.height) * -2.0 + 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_clip_extremes() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_clip(0.0, 0.0), Point::new(-1.0, 1.0));
        assert_eq!(vp.to_clip(800.0, 600.0), Point::new(1.0, -1.0));
        assert_eq!(vp.to_clip(400.0, 300.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn zero_size_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(!Viewport::new(10.0, f32::NAN).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
