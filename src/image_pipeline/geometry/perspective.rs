//! Four-point planar homography.

use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::config::{CalibrationPoint, Quad};

/// Below this `|w|` a projected point is treated as lying at infinity.
const W_EPS: f64 = 1e-12;

/// Relative tolerance on twice the signed triangle area of three corners.
const COLLINEAR_EPS: f64 = 1e-9;

/// 3×3 projective matrix normalised so that `h[(2, 2)] == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveMatrix(pub Matrix3<f64>);

impl PerspectiveMatrix {
    pub fn identity() -> Self {
        PerspectiveMatrix(Matrix3::identity())
    }

    /// `H * [x, y, 1]^T` dehomogenised, `None` when the point maps to infinity.
    pub fn project(&self, p: Point2<f64>) -> Option<Point2<f64>> {
        let v = self.0 * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= W_EPS {
            return None;
        }
        let out = Point2::new(v[0] / w, v[1] / w);
        (out.x.is_finite() && out.y.is_finite()).then_some(out)
    }

    pub fn inverse(&self) -> Option<Self> {
        let inv = self.0.try_inverse()?;
        let scale = inv[(2, 2)];
        if scale.abs() > W_EPS {
            Some(PerspectiveMatrix(inv / scale))
        } else {
            Some(PerspectiveMatrix(inv))
        }
    }
}

/// Homography mapping each corner of `src` onto the matching corner of `dst`.
///
/// Solves the 8×8 linear system obtained by fixing `h22 = 1`:
///
/// ```text
/// u = (h00 x + h01 y + h02) / (h20 x + h21 y + 1)
/// v = (h10 x + h11 y + h12) / (h20 x + h21 y + 1)
/// ```
///
/// Fails with `DegenerateQuad` when three corners of either quad are
/// collinear (which includes coincident corners) or the system is singular.
pub fn build_perspective(src: &Quad, dst: &Quad) -> Result<PerspectiveMatrix> {
    check_quad(src, "source")?;
    check_quad(dst, "destination")?;

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = (dst[i].x, dst[i].y);

        a[(i, 0)] = x;
        a[(i, 1)] = y;
        a[(i, 2)] = 1.0;
        a[(i, 6)] = -x * u;
        a[(i, 7)] = -y * u;
        b[i] = u;

        a[(i + 4, 3)] = x;
        a[(i + 4, 4)] = y;
        a[(i + 4, 5)] = 1.0;
        a[(i + 4, 6)] = -x * v;
        a[(i + 4, 7)] = -y * v;
        b[i + 4] = v;
    }

    let h = a
        .lu()
        .solve(&b)
        .filter(|h| h.iter().all(|c| c.is_finite()))
        .ok_or_else(|| {
            CorrectionError::DegenerateQuad(format!(
                "singular correspondence {} -> {}",
                describe(src),
                describe(dst)
            ))
        })?;

    Ok(PerspectiveMatrix(Matrix3::new(
        h[0], h[1], h[2],
        h[3], h[4], h[5],
        h[6], h[7], 1.0,
    )))
}

fn check_quad(quad: &Quad, which: &str) -> Result<()> {
    let extent = quad
        .iter()
        .flat_map(|p| [p.x.abs(), p.y.abs()])
        .fold(1.0_f64, f64::max);
    let tolerance = COLLINEAR_EPS * extent * extent;

    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    for [i, j, k] in TRIPLES {
        if twice_area(quad[i], quad[j], quad[k]).abs() <= tolerance {
            return Err(CorrectionError::DegenerateQuad(format!(
                "{} points {} are collinear or coincident",
                which,
                describe(quad)
            )));
        }
    }
    Ok(())
}

fn twice_area(a: CalibrationPoint, b: CalibrationPoint, c: CalibrationPoint) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn describe(quad: &Quad) -> String {
    quad.iter()
        .map(|p| format!("({}, {})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
