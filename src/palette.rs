//! Display-side colorization of intensity frames.
//!
//! The renderer only produces scalar intensities. This module turns them into
//! RGB images with the dark-red-to-white ramp used for the animation, and can
//! trace the horizon radius on top.

use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::grid::SampleGrid;

pub const LUT_SIZE: usize = 256;

/// Anchor colors of the ramp, evenly spaced over [0, 1].
const ANCHORS: [[f64; 3]; 6] = [
    [0.0, 0.0, 0.0],                 // black
    [139.0 / 255.0, 0.0, 0.0],       // darkred
    [1.0, 0.0, 0.0],                 // red
    [1.0, 165.0 / 255.0, 0.0],       // orange
    [1.0, 1.0, 0.0],                 // yellow
    [1.0, 1.0, 1.0],                 // white
];

const OUTLINE_COLOR: [f64; 3] = [255.0, 0.0, 0.0];
const OUTLINE_ALPHA: f64 = 0.5;

/// A linear segmented colormap sampled into a lookup table.
#[derive(Clone, Debug)]
pub struct Palette {
    lut: Vec<Rgb<u8>>,
    vmin: f64,
    vmax: f64,
}

impl Palette {
    /// The black/darkred/red/orange/yellow/white ramp over `[vmin, vmax]`.
    pub fn blackhole(vmin: f64, vmax: f64) -> Self {
        let lut = (0..LUT_SIZE)
            .map(|i| {
                let t = i as f64 / (LUT_SIZE - 1) as f64;
                let color = interpolate_anchors(t);
                // truncate, as the float-to-byte ramp conversion does
                Rgb(color.map(|c| (c * 255.0) as u8))
            })
            .collect();

        Self { lut, vmin, vmax }
    }

    pub fn lut(&self) -> &[Rgb<u8>] {
        &self.lut
    }

    /// Color of a single intensity. Values outside `[vmin, vmax]` saturate.
    pub fn color(&self, value: f64) -> Rgb<u8> {
        let span = self.vmax - self.vmin;
        let t = if span > 0.0 {
            (value - self.vmin) / span
        } else {
            0.0
        };

        let index = (t * LUT_SIZE as f64).floor();
        let index = if index.is_nan() {
            0
        } else {
            index.clamp(0.0, (LUT_SIZE - 1) as f64) as usize
        };
        self.lut[index]
    }

    /// Colorize a frame with row 0 (the most negative y) at the bottom.
    pub fn colorize(&self, frame: &Array2<f64>) -> RgbImage {
        let (rows, cols) = frame.dim();
        let mut image = RgbImage::new(cols as u32, rows as u32);
        for ((row, col), &value) in frame.indexed_iter() {
            let y = (rows - 1 - row) as u32;
            image.put_pixel(col as u32, y, self.color(value));
        }
        image
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::blackhole(0.0, 2.0)
    }
}

fn interpolate_anchors(t: f64) -> [f64; 3] {
    let segments = (ANCHORS.len() - 1) as f64;
    let scaled = t.clamp(0.0, 1.0) * segments;
    let lower = (scaled.floor() as usize).min(ANCHORS.len() - 2);
    let frac = scaled - lower as f64;

    let a = ANCHORS[lower];
    let b = ANCHORS[lower + 1];
    [
        a[0] + (b[0] - a[0]) * frac,
        a[1] + (b[1] - a[1]) * frac,
        a[2] + (b[2] - a[2]) * frac,
    ]
}

/// Blend a half-transparent red circle of radius `radius` into a colorized
/// frame of `grid`. Cells within half a cell width of the circle are marked.
pub fn outline_horizon(image: &mut RgbImage, grid: &SampleGrid, radius: f64) {
    let n = grid.resolution();
    if image.width() as usize != n || image.height() as usize != n {
        log::warn!(
            "outline skipped: image {}x{} does not match grid {n}",
            image.width(),
            image.height()
        );
        return;
    }

    let cell = if n > 1 {
        2.0 * grid.extent() / (n - 1) as f64
    } else {
        2.0 * grid.extent()
    };

    for ((row, col), &r) in grid.radius().indexed_iter() {
        if (r - radius).abs() > cell * 0.5 {
            continue;
        }
        let pixel = image.get_pixel_mut(col as u32, (n - 1 - row) as u32);
        for (channel, target) in pixel.0.iter_mut().zip(OUTLINE_COLOR) {
            let blended = *channel as f64 * (1.0 - OUTLINE_ALPHA) + target * OUTLINE_ALPHA;
            *channel = blended.round() as u8;
        }
    }
}
