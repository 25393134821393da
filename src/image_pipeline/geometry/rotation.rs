use nalgebra::{Matrix2, Matrix2x3, Point2, Vector2};

/// 2×3 affine matrix mapping `[x, y, 1]` to a rotated `[x', y']`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub Matrix2x3<f64>);

/// Rotation by `angle_deg` degrees about the image origin `(0, 0)` with unit
/// scale.
///
/// Positive angles turn the image counter-clockwise as displayed (y axis
/// pointing down):
///
/// ```text
/// [  cos θ   sin θ   0 ]
/// [ -sin θ   cos θ   0 ]
/// ```
pub fn build_rotation(angle_deg: f64) -> RotationMatrix {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    RotationMatrix(Matrix2x3::new(
        cos, sin, 0.0,
        -sin, cos, 0.0,
    ))
}

impl RotationMatrix {
    pub fn identity() -> Self {
        build_rotation(0.0)
    }

    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let m = &self.0;
        Point2::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
        )
    }

    /// Inverse affine map, `None` if the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let linear: Matrix2<f64> = self.0.fixed_view::<2, 2>(0, 0).into_owned();
        let translation: Vector2<f64> = self.0.column(2).into_owned();
        let inv = linear.try_inverse()?;
        let t = -(inv * translation);
        Some(RotationMatrix(Matrix2x3::new(
            inv[(0, 0)], inv[(0, 1)], t.x,
            inv[(1, 0)], inv[(1, 1)], t.y,
        )))
    }
}
