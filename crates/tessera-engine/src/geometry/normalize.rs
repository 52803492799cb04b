use crate::coords::Point;

use super::GeometryError;

/// Fraction of the clip domain used by normalized geometry (10% margin).
pub const NORMALIZE_MARGIN: f64 = 0.9;

/// Fitted mapping from source coordinates into the display domain.
///
/// The bounding box of the fitted set is centered on the origin and uniformly
/// scaled so its longer side spans `2 × NORMALIZE_MARGIN`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Normalizer {
    translate: [f64; 2],
    scale: f64,
}

impl Normalizer {
    /// Fits the normalizer to `points`.
    pub fn fit(points: &[[f64; 2]]) -> Result<Self, GeometryError> {
        if points.is_empty() {
            return Err(GeometryError::Empty);
        }

        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for (index, &[x, y]) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(GeometryError::NonFinite { index });
            }
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let width = max_x - min_x;
        let height = max_y - min_y;
        if width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::Degenerate { width, height });
        }

        let scale = (2.0 / width).min(2.0 / height) * NORMALIZE_MARGIN;
        if !scale.is_finite() {
            // Extents so small that 2/extent overflows.
            return Err(GeometryError::Degenerate { width, height });
        }

        Ok(Self {
            translate: [-(min_x + max_x) / 2.0, -(min_y + max_y) / 2.0],
            scale,
        })
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    #[inline]
    pub fn apply(&self, [x, y]: [f64; 2]) -> Point {
        Point::new(
            ((x + self.translate[0]) * self.scale) as f32,
            ((y + self.translate[1]) * self.scale) as f32,
        )
    }

    pub fn apply_all(&self, points: &[[f64; 2]]) -> Vec<Point> {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}

/// Maps `points` into the centered, aspect-preserving display domain.
pub fn normalize(points: &[[f64; 2]]) -> Result<Vec<Point>, GeometryError> {
    let n = Normalizer::fit(points)?;
    Ok(n.apply_all(points))
}
