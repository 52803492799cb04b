/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Pipelines blend with `One, OneMinusSrcAlpha`, so the value uploaded to
/// `u_color` is used verbatim by the fragment stage.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    /// Fixed background used by `PrimitiveRenderer::clear`.
    pub const BACKGROUND: Color = Color::from_premul(0.9, 0.9, 0.9, 1.0);

    pub const RED: Color = Color::from_premul(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::from_premul(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::from_premul(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Same hue with a new straight alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        let (r, g, b, _) = self.to_straight();
        Self::from_straight(r, g, b, a)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.to_array(), [0.5, 0.25, 0.0, 0.5]);
    }

    #[test]
    fn with_alpha_keeps_hue() {
        let c = Color::from_straight(0.8, 0.2, 1.0, 1.0).with_alpha(0.5);
        let (r, g, b, a) = c.to_straight();
        assert!((r - 0.8).abs() < 1e-6);
        assert!((g - 0.2).abs() < 1e-6);
        assert!((b - 1.0).abs() < 1e-6);
        assert_eq!(a, 0.5);
    }

    #[test]
    fn transparent_to_straight_is_zero() {
        assert_eq!(Color::transparent().to_straight(), (0.0, 0.0, 0.0, 0.0));
    }
}
