use image::{Rgb, RgbImage};
use touch_projector::detection::{CentroidDetector, HsvRange};

fn black_frame(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([0, 0, 0]))
}

#[test]
fn test_centroid_of_a_red_dot() {
    let mut img = black_frame(64, 48);
    // 3x3 bright red block centered at (20, 30)
    for y in 29..=31 {
        for x in 19..=21 {
            img.put_pixel(x, y, Rgb([220, 10, 10]));
        }
    }
    let detector = CentroidDetector::default();
    let centroid = detector.detect(&img).expect("dot should be detected");
    assert!((centroid.x - 20.0).abs() < 1e-9);
    assert!((centroid.y - 30.0).abs() < 1e-9);
}

#[test]
fn test_empty_mask_yields_no_detection() {
    let img = black_frame(64, 48);
    let detector = CentroidDetector::default();
    // zero-area mask never turns into a NaN centroid
    assert!(detector.detect(&img).is_none());
}

#[test]
fn test_dim_red_is_below_the_value_floor() {
    let mut img = black_frame(16, 16);
    img.put_pixel(8, 8, Rgb([100, 5, 5]));
    let detector = CentroidDetector::default();
    assert!(detector.detect(&img).is_none());
}

#[test]
fn test_mask_marks_only_in_range_pixels() {
    let mut img = black_frame(16, 16);
    img.put_pixel(3, 4, Rgb([220, 10, 10]));
    img.put_pixel(10, 12, Rgb([10, 220, 10])); // green, out of range
    let detector = CentroidDetector::default();
    let mask = detector.mask(&img);
    assert_eq!(mask.get_pixel(3, 4)[0], 255);
    assert_eq!(mask.get_pixel(10, 12)[0], 0);
    assert_eq!(mask.get_pixel(0, 0)[0], 0);
}

#[test]
fn test_custom_range_tracks_green() {
    let mut img = black_frame(16, 16);
    img.put_pixel(10, 12, Rgb([10, 220, 10]));
    let green = HsvRange {
        h_lo: 100.0,
        h_hi: 140.0,
        s_lo: 0.5,
        s_hi: 1.0,
        v_lo: 120.0,
        v_hi: 255.0,
    };
    let detector = CentroidDetector::new(green);
    let centroid = detector.detect(&img).unwrap();
    assert_eq!(centroid.x, 10.0);
    assert_eq!(centroid.y, 12.0);
}
