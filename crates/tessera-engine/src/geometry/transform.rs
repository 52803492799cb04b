use core::ops::Mul;

use crate::coords::Point;

/// 3×3 homogeneous 2D affine transform, column-major (`cols[c][r]`).
///
/// Composition follows the usual matrix convention: in `a * b` the right-hand
/// operand is applied to a point first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    cols: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn from_cols(cols: [[f32; 3]; 3]) -> Self {
        Self { cols }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self {
            cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [tx, ty, 1.0]],
        }
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            cols: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Pan + zoom view transform.
    ///
    /// Points are scaled about the origin first, then translated. Swapping the
    /// order moves the visual center of zoom.
    #[inline]
    pub fn pan_zoom(pan_x: f32, pan_y: f32, zoom: f32) -> Self {
        Self::multiply(&Self::translation(pan_x, pan_y), &Self::scaling(zoom, zoom))
    }

    pub fn multiply(a: &Mat3, b: &Mat3) -> Mat3 {
        let mut out = [[0.0f32; 3]; 3];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, v) in col.iter_mut().enumerate() {
                *v = a.cols[0][r] * b.cols[c][0]
                    + a.cols[1][r] * b.cols[c][1]
                    + a.cols[2][r] * b.cols[c][2];
            }
        }
        Mat3 { cols: out }
    }

    #[inline]
    pub fn cols(&self) -> &[[f32; 3]; 3] {
        &self.cols
    }

    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        let m = &self.cols;
        let x = m[0][0] * p.x + m[1][0] * p.y + m[2][0];
        let y = m[0][1] * p.x + m[1][1] * p.y + m[2][1];
        let w = m[0][2] * p.x + m[1][2] * p.y + m[2][2];
        if w == 1.0 { Point::new(x, y) } else { Point::new(x / w, y / w) }
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        let m = &self.cols;
        m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2])
            - m[1][0] * (m[0][1] * m[2][2] - m[2][1] * m[0][2])
            + m[2][0] * (m[0][1] * m[1][2] - m[1][1] * m[0][2])
    }

    /// Returns the inverse, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat3> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m = &self.cols;
        let inv = 1.0 / det;

        // Adjugate (transpose of the cofactor matrix), column-major.
        let cols = [
            [
                (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * inv,
                (m[2][1] * m[0][2] - m[0][1] * m[2][2]) * inv,
                (m[0][1] * m[1][2] - m[1][1] * m[0][2]) * inv,
            ],
            [
                (m[2][0] * m[1][2] - m[1][0] * m[2][2]) * inv,
                (m[0][0] * m[2][2] - m[2][0] * m[0][2]) * inv,
                (m[1][0] * m[0][2] - m[0][0] * m[1][2]) * inv,
            ],
            [
                (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * inv,
                (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * inv,
                (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * inv,
            ],
        ];
        Some(Mat3 { cols })
    }

    /// Column layout of a WGSL `mat3x3<f32>` uniform: each column padded to 16 bytes.
    #[inline]
    pub fn to_uniform(&self) -> [[f32; 4]; 3] {
        let m = &self.cols;
        [
            [m[0][0], m[0][1], m[0][2], 0.0],
            [m[1][0], m[1][1], m[1][2], 0.0],
            [m[2][0], m[2][1], m[2][2], 0.0],
        ]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;
    #[inline]
    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::multiply(&self, &rhs)
    }
}

impl Mul<Point> for Mat3 {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: Point) -> Point {
        self.transform_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn identity_is_neutral() {
        let m = Mat3::translation(3.0, -2.0) * Mat3::scaling(0.5, 4.0);
        assert_eq!(Mat3::identity() * m, m);
        assert_eq!(m * Mat3::identity(), m);
        assert_eq!(Mat3::identity().transform_point(Point::new(1.5, -7.0)), Point::new(1.5, -7.0));
    }

    #[test]
    fn scale_then_translate() {
        let m = Mat3::multiply(&Mat3::translation(5.0, 0.0), &Mat3::scaling(2.0, 2.0));
        assert_eq!(m.transform_point(Point::new(1.0, 0.0)), Point::new(7.0, 0.0));
    }

    #[test]
    fn multiplication_is_not_commutative() {
        let t = Mat3::translation(5.0, 0.0);
        let s = Mat3::scaling(2.0, 2.0);
        assert_eq!((s * t).transform_point(Point::new(1.0, 0.0)), Point::new(12.0, 0.0));
        assert_ne!(t * s, s * t);
    }

    #[test]
    fn pan_zoom_matches_explicit_composition() {
        let m = Mat3::pan_zoom(0.25, -0.5, 3.0);
        let expected = Mat3::translation(0.25, -0.5) * Mat3::scaling(3.0, 3.0);
        assert_eq!(m, expected);
        // Origin only moves by the pan.
        assert_eq!(m.transform_point(Point::zero()), Point::new(0.25, -0.5));
    }

    #[test]
    fn non_uniform_scaling() {
        let m = Mat3::scaling(2.0, -3.0);
        assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(2.0, -3.0));
    }

    #[test]
    fn inverse_round_trips() {
        let m = Mat3::pan_zoom(0.3, -1.2, 1.7);
        let inv = m.inverse().expect("invertible");
        let p = Point::new(0.42, -0.17);
        assert!(approx(inv.transform_point(m.transform_point(p)), p));
        let id = m * inv;
        for c in 0..3 {
            for r in 0..3 {
                let want = if c == r { 1.0 } else { 0.0 };
                assert!((id.cols()[c][r] - want).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat3::scaling(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn uniform_layout_pads_columns() {
        let u = Mat3::translation(7.0, 8.0).to_uniform();
        assert_eq!(u[2], [7.0, 8.0, 1.0, 0.0]);
        assert_eq!(u[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
