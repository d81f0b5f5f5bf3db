use glam::DVec2;
use touch_projector::homography::solve_projective;
use touch_projector::mapper::CoordinateMapper;
use touch_projector::types::{AnchorId, AnchorLayout, CalibrationError, Correspondence};

fn pairs_from(cams: [(f64, f64); 4], disps: [(f64, f64); 4]) -> Vec<Correspondence> {
    AnchorId::ORDER
        .iter()
        .enumerate()
        .map(|(i, &anchor)| Correspondence {
            anchor,
            display: DVec2::new(disps[i].0, disps[i].1),
            camera: DVec2::new(cams[i].0, cams[i].1),
        })
        .collect()
}

#[test]
fn test_solve_maps_correspondences_back() {
    let layout = AnchorLayout::default();
    let cams = [(100.0, 120.0), (520.0, 110.0), (90.0, 400.0), (530.0, 420.0)];
    let pairs: Vec<Correspondence> = AnchorId::ORDER
        .iter()
        .enumerate()
        .map(|(i, &anchor)| Correspondence {
            anchor,
            display: layout.anchor(anchor),
            camera: DVec2::new(cams[i].0, cams[i].1),
        })
        .collect();

    let transform = solve_projective(&pairs).expect("convex quad should solve");
    for c in transform.coeffs() {
        assert!(c.is_finite());
    }
    for pair in &pairs {
        let mapped = transform.apply(pair.camera).expect("denominator is bounded");
        assert!(mapped.distance(pair.display) < 1e-3);
    }
}

#[test]
fn test_solve_is_deterministic() {
    let pairs = pairs_from(
        [(10.0, 10.0), (90.0, 12.0), (11.0, 88.0), (88.0, 91.0)],
        [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)],
    );
    let t0 = solve_projective(&pairs).unwrap();
    let t1 = solve_projective(&pairs).unwrap();
    assert_eq!(t0.coeffs(), t1.coeffs());

    // mapping is deterministic too, bit for bit
    let p = DVec2::new(42.5, 17.25);
    assert_eq!(t0.apply(p), t0.apply(p));
}

#[test]
fn test_identical_camera_points_are_degenerate() {
    let pairs = pairs_from(
        [(50.0, 50.0); 4],
        [(40.0, 40.0), (1000.0, 40.0), (40.0, 740.0), (1000.0, 740.0)],
    );
    match solve_projective(&pairs) {
        Err(CalibrationError::Degenerate) => {}
        other => panic!("expected Degenerate, got {:?}", other.map(|t| t.coeffs())),
    }
}

#[test]
fn test_collinear_camera_points_are_degenerate() {
    let pairs = pairs_from(
        [(10.0, 10.0), (20.0, 20.0), (30.0, 30.0), (90.0, 12.0)],
        [(40.0, 40.0), (1000.0, 40.0), (40.0, 740.0), (1000.0, 740.0)],
    );
    assert!(matches!(
        solve_projective(&pairs),
        Err(CalibrationError::Degenerate)
    ));
}

#[test]
fn test_too_few_correspondences() {
    let pairs = pairs_from(
        [(10.0, 10.0), (90.0, 12.0), (11.0, 88.0), (88.0, 91.0)],
        [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)],
    );
    assert!(matches!(
        solve_projective(&pairs[..3]),
        Err(CalibrationError::InsufficientCorrespondences(3))
    ));
}

#[test]
fn test_end_to_end_unit_square() {
    let pairs = pairs_from(
        [(10.0, 10.0), (90.0, 12.0), (11.0, 88.0), (88.0, 91.0)],
        [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)],
    );
    let transform = solve_projective(&pairs).unwrap();
    let mapped = transform.apply(DVec2::new(50.0, 50.0)).unwrap();
    assert!(mapped.distance(DVec2::new(50.0, 50.0)) < 2.0);
}

#[test]
fn test_mapper_applies_vertical_offset() {
    let pairs = pairs_from(
        [(10.0, 10.0), (90.0, 12.0), (11.0, 88.0), (88.0, 91.0)],
        [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)],
    );
    let transform = solve_projective(&pairs).unwrap();
    let plain = transform.apply(DVec2::new(50.0, 50.0)).unwrap();
    let mapped = CoordinateMapper::with_y_offset(transform, 20.0)
        .map(DVec2::new(50.0, 50.0))
        .unwrap();
    assert_eq!(mapped.x, plain.x);
    assert_eq!(mapped.y, plain.y + 20.0);
}

#[test]
fn test_mapper_vanishing_denominator() {
    use touch_projector::homography::ProjectiveTransform;
    // a3*x + b3*y + 1 == 0 along the line x + y == 100
    let transform = ProjectiveTransform {
        a1: 1.0,
        b1: 0.0,
        c1: 0.0,
        a2: 0.0,
        b2: 1.0,
        c2: 0.0,
        a3: -0.01,
        b3: -0.01,
    };
    let mapper = CoordinateMapper::new(transform);
    assert!(mapper.map(DVec2::new(50.0, 50.0)).is_none());
    assert!(mapper.map(DVec2::new(10.0, 10.0)).is_some());
}
