use nalgebra::Point2;

use crate::image_pipeline::common::error::CorrectionError;
use crate::image_pipeline::common::types::PixelCoord;
use crate::image_pipeline::config::{CalibrationPoint, CameraRole, CameraRoleConfig, Quad};
use crate::image_pipeline::geometry::{
    apply_to_image, apply_to_points, build_perspective, build_rotation, PerspectiveMatrix, RotationMatrix,
    TransformPair,
};
use crate::image_pipeline::hot_pixels::HotPixel;
use crate::image_pipeline::raster::{BitDepth, GrayImage};

const SIZE: usize = 48;

fn quad(pts: [(f64, f64); 4]) -> Quad {
    pts.map(|(x, y)| CalibrationPoint::new(x, y))
}

fn canvas_quad() -> Quad {
    let s = (SIZE - 1) as f64;
    quad([(0.0, 0.0), (s, 0.0), (s, s), (0.0, s)])
}

/// Every pixel carries its own index + 1, so a warped pixel tells where it came from.
fn labelled_image() -> GrayImage {
    GrayImage::from_fn(SIZE, SIZE, BitDepth::Sixteen, |x, y| (1 + y * SIZE + x) as u16)
}

fn source_of(label: u16) -> (i64, i64) {
    let i = label as i64 - 1;
    (i % SIZE as i64, i / SIZE as i64)
}

fn role_config(rotation_deg: f64, source: Quad, dest: Quad) -> CameraRoleConfig {
    CameraRoleConfig { role: CameraRole::Primary, rotation_deg, source, dest }
}

#[test]
fn test_identity_leaves_points_and_pixels_unchanged() {
    let pair = TransformPair::from_config(&role_config(0.0, canvas_quad(), canvas_quad())).unwrap();
    let image = labelled_image();

    let flat = pair.apply_to_image(&image).unwrap();
    assert_eq!(flat, image);

    let points: Vec<Point2<f64>> = (0..SIZE)
        .step_by(5)
        .flat_map(|y| (0..SIZE).step_by(7).map(move |x| Point2::new(x as f64, y as f64)))
        .collect();
    let mapped = pair.apply_to_points(&points).unwrap();
    for (p, q) in points.iter().zip(&mapped) {
        assert_eq!(*q, PixelCoord::new(p.x as i64, p.y as i64));
    }
}

#[test]
fn test_points_and_image_agree() {
    // Small rotation about the origin plus a mild keystone correction.
    let source = quad([(2.0, 3.0), (45.0, 1.0), (46.0, 44.0), (1.0, 46.0)]);
    let dest = quad([(0.0, 0.0), (47.0, 0.0), (47.0, 47.0), (0.0, 47.0)]);
    let pair = TransformPair::from_config(&role_config(2.0, source, dest)).unwrap();

    let image = labelled_image();
    let flat = pair.apply_to_image(&image).unwrap();

    let mut checked = 0;
    for y in (12..36).step_by(3) {
        for x in (12..36).step_by(3) {
            let q = pair.apply_to_points(&[Point2::new(x as f64, y as f64)]).unwrap()[0];
            let Some(label) = flat.get(q.x, q.y) else { continue };
            assert_ne!(label, 0, "interior point ({x}, {y}) mapped onto background");
            let (sx, sy) = source_of(label);
            assert!(
                (sx - x as i64).abs() <= 1 && (sy - y as i64).abs() <= 1,
                "point ({x}, {y}) -> {q} holds pixel ({sx}, {sy})"
            );
            checked += 1;
        }
    }
    assert!(checked > 40);
}

#[test]
fn test_free_functions_match_pair() {
    let source = quad([(0.0, 0.0), (40.0, 2.0), (42.0, 40.0), (1.0, 38.0)]);
    let dest = canvas_quad();
    let config = role_config(-3.5, source, dest);
    let pair = TransformPair::from_config(&config).unwrap();

    let rotation = build_rotation(config.rotation_deg);
    let perspective = build_perspective(&config.source, &config.dest).unwrap();
    let image = labelled_image();
    assert_eq!(
        apply_to_image(&image, &rotation, &perspective).unwrap(),
        pair.apply_to_image(&image).unwrap()
    );
    let pts = [Point2::new(10.0, 20.0), Point2::new(30.5, 5.25)];
    assert_eq!(
        apply_to_points(&pts, &rotation, &perspective).unwrap(),
        pair.apply_to_points(&pts).unwrap()
    );
}

#[test]
fn test_rotation_about_origin_moves_content_off_canvas() {
    let pair = TransformPair::from_config(&role_config(90.0, canvas_quad(), canvas_quad())).unwrap();
    // +90° sends every x > 0 to negative y: only source column 0 survives,
    // laid out along row 0.
    let flat = pair.apply_to_image(&labelled_image()).unwrap();
    for (i, &v) in flat.data().iter().enumerate() {
        let (x, y) = (i % SIZE, i / SIZE);
        if y == 0 {
            assert_eq!(v, (1 + x * SIZE) as u16);
        } else {
            assert_eq!(v, 0, "pixel ({x}, {y}) should be background");
        }
    }

    let q = pair.apply_to_points(&[Point2::new(10.0, 0.0)]).unwrap()[0];
    assert_eq!(q, PixelCoord::new(0, -10));
}

#[test]
fn test_homography_then_inverse_round_trips() {
    let source = quad([(5.0, 4.0), (90.0, 10.0), (95.0, 85.0), (2.0, 99.0)]);
    let dest = quad([(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
    let forward = build_perspective(&source, &dest).unwrap();
    let backward = build_perspective(&dest, &source).unwrap();
    let identity = build_rotation(0.0);

    let points: Vec<Point2<f64>> = (0..10)
        .map(|i| Point2::new(10.0 * i as f64 + 3.0, 97.0 - 9.0 * i as f64))
        .collect();
    let there = apply_to_points(&points, &identity, &forward).unwrap();
    let there_f: Vec<Point2<f64>> = there.iter().map(|c| Point2::new(c.x as f64, c.y as f64)).collect();
    let back = apply_to_points(&there_f, &identity, &backward).unwrap();
    for (p, b) in points.iter().zip(&back) {
        // One rounding step on the way out, one on the way back.
        assert!((b.x as f64 - p.x).abs() <= 2.0 && (b.y as f64 - p.y).abs() <= 2.0);
    }

    for p in &points {
        let q = backward.project(forward.project(*p).unwrap()).unwrap();
        approx::assert_abs_diff_eq!(q.x, p.x, epsilon = 1e-8);
        approx::assert_abs_diff_eq!(q.y, p.y, epsilon = 1e-8);
    }
}

#[test]
fn test_hot_pixels_keep_both_frames() {
    let source = canvas_quad();
    let s = (SIZE - 1) as f64;
    let dest = quad([(10.0, 10.0), (10.0 + s, 10.0), (10.0 + s, 10.0 + s), (10.0, 10.0 + s)]);
    let pair = TransformPair::from_config(&role_config(0.0, source, dest)).unwrap();

    let hot = vec![
        HotPixel { coord: PixelCoord::new(3, 4), value: 900 },
        HotPixel { coord: PixelCoord::new(0, 0), value: 1000 },
    ];
    let flat = pair.locate_hot_pixels(&hot);
    assert_eq!(flat.len(), 2);
    assert_eq!(flat[0].original, hot[0]);
    assert_eq!(flat[0].flat, Some(PixelCoord::new(13, 14)));
    assert_eq!(flat[1].original, hot[1]);
    assert_eq!(flat[1].flat, Some(PixelCoord::new(10, 10)));
}

#[test]
fn test_degenerate_config_rejected() {
    let zero = quad([(0.0, 0.0); 4]);
    let err = TransformPair::from_config(&role_config(0.0, zero, canvas_quad())).unwrap_err();
    assert!(matches!(err, CorrectionError::DegenerateQuad(_)));
}

#[test]
fn test_hot_pixel_at_infinity_has_no_flat_position() {
    // w = x - 5, so column 5 lands on the line at infinity.
    let pair = TransformPair {
        role: CameraRole::Primary,
        rotation: RotationMatrix::identity(),
        perspective: PerspectiveMatrix(nalgebra::Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, -5.0,
        )),
    };
    let hot = [
        HotPixel { coord: PixelCoord::new(5, 2), value: 65535 },
        HotPixel { coord: PixelCoord::new(6, 2), value: 65535 },
    ];
    let flat = pair.locate_hot_pixels(&hot);
    assert_eq!(flat[0].flat, None);
    assert_eq!(flat[1].flat, Some(PixelCoord::new(6, 2)));
}
