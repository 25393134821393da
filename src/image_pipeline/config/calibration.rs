//! Per-camera calibration parameters resolved from a [`ConfigStore`]

use std::fmt;

use tracing::debug;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::config::store::ConfigStore;

/// Camera whose image a transform applies to.
///
/// The primary camera's image is the one being repaired; the secondary
/// camera supplies replacement values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraRole {
    Primary,
    Secondary,
}

impl CameraRole {
    /// Prefix used for this role's parameter names in config files.
    pub fn config_prefix(self) -> &'static str {
        match self {
            CameraRole::Primary => "Master",
            CameraRole::Secondary => "Slave",
        }
    }
}

impl fmt::Display for CameraRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_prefix())
    }
}

/// Floating-point pixel position of a calibration feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    pub x: f64,
    pub y: f64,
}

impl CalibrationPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Quadrilateral corners in clockwise order: top-left, top-right,
/// bottom-right, bottom-left.
pub type Quad = [CalibrationPoint; 4];

/// Config-name suffixes of the corners, in [`Quad`] order.
const CORNERS: [&str; 4] = ["TopLeft", "TopRight", "BottomRight", "BottomLeft"];

/// Rotation and quad-to-quad correspondence for one camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRoleConfig {
    pub role: CameraRole,
    /// Degrees, counter-clockwise, about the image origin.
    pub rotation_deg: f64,
    pub source: Quad,
    pub dest: Quad,
}

impl CameraRoleConfig {
    /// Reads `<Prefix>Rotation` and the eight `<Prefix>{Source,Dest}<Corner>{X,Y}`
    /// parameters. Every one of them is required.
    pub fn from_store(store: &ConfigStore, role: CameraRole) -> Result<Self> {
        let prefix = role.config_prefix();
        let rotation_deg = store.require(&format!("{prefix}Rotation"))?;
        let source = read_quad(store, prefix, "Source")?;
        let dest = read_quad(store, prefix, "Dest")?;
        debug!(%role, rotation_deg, ?source, ?dest, "Calibration resolved");
        Ok(Self { role, rotation_deg, source, dest })
    }
}

fn read_quad(store: &ConfigStore, prefix: &str, kind: &str) -> Result<Quad> {
    let mut quad = [CalibrationPoint::new(0.0, 0.0); 4];
    for (point, corner) in quad.iter_mut().zip(CORNERS) {
        point.x = store.require(&format!("{prefix}{kind}{corner}X"))?;
        point.y = store.require(&format!("{prefix}{kind}{corner}Y"))?;
    }
    Ok(quad)
}

/// Everything a correction run reads from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub primary: CameraRoleConfig,
    pub secondary: CameraRoleConfig,
    /// Inclusive intensity threshold for hot pixels in the primary image.
    pub hot_pixel_threshold: f64,
    /// Percent, -100..100. Applied to the secondary flat image.
    pub secondary_brightness: f64,
    /// Percent, -100..100. Applied to the secondary flat image.
    pub secondary_contrast: f64,
}

impl Calibration {
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        Ok(Self {
            primary: CameraRoleConfig::from_store(store, CameraRole::Primary)?,
            secondary: CameraRoleConfig::from_store(store, CameraRole::Secondary)?,
            hot_pixel_threshold: store.require("MasterThresholdHotPixels")?,
            secondary_brightness: store.get("SlaveBrightness"),
            secondary_contrast: store.get("SlaveContrast"),
        })
    }

    pub fn role(&self, role: CameraRole) -> &CameraRoleConfig {
        match role {
            CameraRole::Primary => &self.primary,
            CameraRole::Secondary => &self.secondary,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::image_pipeline::common::error::CorrectionError;

    /// Config text with both roles mapping the 0..100 square onto itself.
    pub(crate) fn identity_config_text() -> String {
        let mut text = String::from("# test calibration\nMasterThresholdHotPixels=60000\n");
        for prefix in ["Master", "Slave"] {
            text.push_str(&format!("{prefix}Rotation=0\n"));
            for kind in ["Source", "Dest"] {
                for (corner, (x, y)) in CORNERS.iter().zip([(0, 0), (100, 0), (100, 100), (0, 100)]) {
                    text.push_str(&format!("{prefix}{kind}{corner}X={x}\n"));
                    text.push_str(&format!("{prefix}{kind}{corner}Y={y}\n"));
                }
            }
        }
        text
    }

    #[test]
    fn test_resolves_both_roles() {
        let mut text = identity_config_text();
        text.push_str("SlaveBrightness=5\nSlaveContrast=-20\nSlaveRotation=7.5\n");
        let store = ConfigStore::parse(&text).unwrap();
        let calibration = Calibration::from_store(&store).unwrap();

        assert_eq!(calibration.hot_pixel_threshold, 60000.0);
        assert_eq!(calibration.secondary_brightness, 5.0);
        assert_eq!(calibration.secondary_contrast, -20.0);
        // Earlier SlaveRotation=0 wins over the appended duplicate.
        assert_eq!(calibration.role(CameraRole::Secondary).rotation_deg, 0.0);
        let primary = calibration.role(CameraRole::Primary);
        assert_eq!(primary.source[1], CalibrationPoint::new(100.0, 0.0));
        assert_eq!(primary.source[2], CalibrationPoint::new(100.0, 100.0));
        assert_eq!(primary.dest[3], CalibrationPoint::new(0.0, 100.0));
    }

    #[test]
    fn test_missing_corner_is_error_not_zero() {
        let text: String = identity_config_text()
            .lines()
            .filter(|l| !l.starts_with("MasterDestBottomRightY"))
            .map(|l| format!("{l}\n"))
            .collect();
        let store = ConfigStore::parse(&text).unwrap();
        let err = Calibration::from_store(&store).unwrap_err();
        assert!(matches!(err, CorrectionError::MissingParameter(name) if name == "MasterDestBottomRightY"));
    }

    #[test]
    fn test_brightness_contrast_default_to_zero() {
        let store = ConfigStore::parse(&identity_config_text()).unwrap();
        let calibration = Calibration::from_store(&store).unwrap();
        assert_eq!(calibration.secondary_brightness, 0.0);
        assert_eq!(calibration.secondary_contrast, 0.0);
    }
}
