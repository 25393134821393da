use nalgebra::Point2;
use tracing::{debug, info, instrument};

use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::common::types::PixelCoord;
use crate::image_pipeline::config::{CameraRole, CameraRoleConfig};
use crate::image_pipeline::geometry::perspective::{build_perspective, PerspectiveMatrix};
use crate::image_pipeline::geometry::rotation::{build_rotation, RotationMatrix};
use crate::image_pipeline::geometry::warp::warp_nearest;
use crate::image_pipeline::hot_pixels::{FlatHotPixel, HotPixel};
use crate::image_pipeline::raster::GrayImage;

/// Rotation followed by perspective correction for one camera.
///
/// Built once per role and shared by the raster and point paths, so both
/// always see the same matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPair {
    pub role: CameraRole,
    pub rotation: RotationMatrix,
    pub perspective: PerspectiveMatrix,
}

impl TransformPair {
    pub fn from_config(config: &CameraRoleConfig) -> Result<Self> {
        let rotation = build_rotation(config.rotation_deg);
        let perspective = build_perspective(&config.source, &config.dest)?;
        debug!(role = %config.role, ?rotation, ?perspective, "Transform built");
        Ok(Self { role: config.role, rotation, perspective })
    }

    /// Raw-frame point to flat-frame point, without rounding.
    pub fn project(&self, p: Point2<f64>) -> Option<Point2<f64>> {
        self.perspective.project(self.rotation.apply(p))
    }

    #[instrument(skip_all, fields(role = %self.role, width = image.width(), height = image.height()))]
    pub fn apply_to_image(&self, image: &GrayImage) -> Result<GrayImage> {
        apply_to_image(image, &self.rotation, &self.perspective)
    }

    pub fn apply_to_points(&self, points: &[Point2<f64>]) -> Result<Vec<PixelCoord>> {
        apply_to_points(points, &self.rotation, &self.perspective)
    }

    /// Attaches each hot pixel's flat-frame coordinate, keeping input order.
    ///
    /// Pixels the perspective sends to infinity get no flat coordinate.
    #[instrument(skip_all, fields(role = %self.role, count = hot.len()))]
    pub fn locate_hot_pixels(&self, hot: &[HotPixel]) -> Vec<FlatHotPixel> {
        let located: Vec<FlatHotPixel> = hot
            .iter()
            .map(|&original| {
                let p = Point2::new(original.coord.x as f64, original.coord.y as f64);
                let flat = self
                    .project(p)
                    .map(|q| PixelCoord::new(q.x.round() as i64, q.y.round() as i64));
                FlatHotPixel { original, flat }
            })
            .collect();
        let undefined = located.iter().filter(|h| h.flat.is_none()).count();
        if undefined > 0 {
            debug!(undefined, "Hot pixels mapped to infinity");
        }
        located
    }
}

/// Warps `image` by `rotation`, then warps the result by `perspective`.
///
/// Both steps keep the input canvas size; pixels pushed off the canvas are
/// lost and uncovered pixels are black.
pub fn apply_to_image(
    image: &GrayImage,
    rotation: &RotationMatrix,
    perspective: &PerspectiveMatrix,
) -> Result<GrayImage> {
    let rotation_inv = rotation
        .inverse()
        .ok_or_else(|| CorrectionError::DegenerateQuad("rotation matrix is singular".to_string()))?;
    let perspective_inv = perspective
        .inverse()
        .ok_or_else(|| CorrectionError::DegenerateQuad("perspective matrix is singular".to_string()))?;

    let rotated = {
        let _span = tracing::debug_span!("warp_rotation").entered();
        warp_nearest(image, |p| Some(rotation_inv.apply(p)))
    };
    let flat = {
        let _span = tracing::debug_span!("warp_perspective").entered();
        warp_nearest(&rotated, |p| perspective_inv.project(p))
    };
    info!(width = flat.width(), height = flat.height(), "Image transformed");
    Ok(flat)
}

/// Applies the same rotation then perspective matrices to bare points and
/// rounds each result to the nearest pixel.
///
/// Output order matches input order. Points sent to infinity by the
/// perspective matrix are `ProjectionUndefined`.
pub fn apply_to_points(
    points: &[Point2<f64>],
    rotation: &RotationMatrix,
    perspective: &PerspectiveMatrix,
) -> Result<Vec<PixelCoord>> {
    let out = points
        .iter()
        .map(|&p| {
            perspective
                .project(rotation.apply(p))
                .map(|q| PixelCoord::new(q.x.round() as i64, q.y.round() as i64))
                .ok_or(CorrectionError::ProjectionUndefined { x: p.x, y: p.y })
        })
        .collect::<Result<Vec<_>>>()?;
    info!("{} points transformed", out.len());
    Ok(out)
}
