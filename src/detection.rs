use glam::DVec2;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

/// HSV window a pixel must fall into to count as the pointer.
///
/// Hue is in degrees (0..360), saturation in 0..1, value in 0..255.
/// The defaults select a red laser dot: low hue, any saturation,
/// bright enough to stand out against the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub h_lo: f32,
    pub h_hi: f32,
    pub s_lo: f32,
    pub s_hi: f32,
    pub v_lo: f32,
    pub v_hi: f32,
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            h_lo: 0.0,
            h_hi: 40.0,
            s_lo: 0.0,
            s_hi: 1.0,
            v_lo: 120.0,
            v_hi: 255.0,
        }
    }
}

impl HsvRange {
    fn contains(&self, h: f32, s: f32, v: f32) -> bool {
        h >= self.h_lo
            && h <= self.h_hi
            && s >= self.s_lo
            && s <= self.s_hi
            && v >= self.v_lo
            && v <= self.v_hi
    }
}

fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

/// Finds the pointer position as the centroid of the color-thresholded
/// mask, using normalized first-order spatial moments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidDetector {
    pub range: HsvRange,
}

impl CentroidDetector {
    pub fn new(range: HsvRange) -> Self {
        Self { range }
    }

    /// Returns `None` when no pixel passes the threshold (zero-area mask),
    /// never a NaN centroid.
    pub fn detect(&self, img: &RgbImage) -> Option<DVec2> {
        let mut m00 = 0.0_f64;
        let mut m10 = 0.0_f64;
        let mut m01 = 0.0_f64;
        for (x, y, pixel) in img.enumerate_pixels() {
            let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
            if self.range.contains(h, s, v) {
                m00 += 1.0;
                m10 += x as f64;
                m01 += y as f64;
            }
        }
        if m00 == 0.0 {
            None
        } else {
            Some(DVec2::new(m10 / m00, m01 / m00))
        }
    }

    /// Binary mask of in-range pixels, for debug views.
    pub fn mask(&self, img: &RgbImage) -> GrayImage {
        GrayImage::from_fn(img.width(), img.height(), |x, y| {
            let pixel = img.get_pixel(x, y);
            let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
            if self.range.contains(h, s, v) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }
}
