//! Raster primitives used by the coastline pipeline and the world composer.
//!
//! Single-channel work happens on `GrayImage`; anything that gets composited
//! carries its opacity in the alpha channel of a `GrayAlphaImage`.

use image::imageops::{self, FilterType};
use image::{GrayAlphaImage, GrayImage, Luma, LumaA};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Fill a solid disk. Pixels whose centres fall inside the circle are set;
/// anything outside the image is clipped.
pub fn fill_disk(img: &mut GrayImage, cx: f64, cy: f64, radius: f64, value: u8) {
    if radius <= 0.0 || !radius.is_finite() {
        return;
    }
    let (width, height) = img.dimensions();
    let x0 = (cx - radius).floor().max(0.0) as i64;
    let y0 = (cy - radius).floor().max(0.0) as i64;
    let x1 = (cx + radius).ceil().min(width as f64 - 1.0) as i64;
    let y1 = (cy + radius).ceil().min(height as f64 - 1.0) as i64;
    let r2 = radius * radius;

    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f64 + 0.5 - cx;
            let dy = py as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(px as u32, py as u32, Luma([value]));
            }
        }
    }

    // Disks smaller than a pixel still mark the pixel they sit in.
    let (px, py) = (cx.floor(), cy.floor());
    if px >= 0.0 && py >= 0.0 && px < width as f64 && py < height as f64 {
        img.put_pixel(px as u32, py as u32, Luma([value]));
    }
}

/// One cell of a 3x3 neighbourhood pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Any,
    On,
    Off,
}

/// A 3x3 hit-or-miss rule: where the pattern matches, the centre pixel takes
/// `output`; everywhere else it keeps its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborhoodRule {
    variants: Vec<[[Cell; 3]; 3]>,
    output: bool,
}

impl NeighborhoodRule {
    /// `pattern` is given row by row, top row first. With `rotate` the rule
    /// also matches the pattern's three quarter-turn rotations.
    pub fn new(pattern: [[Cell; 3]; 3], rotate: bool, output: bool) -> Self {
        let mut variants = vec![pattern];
        if rotate {
            for _ in 0..3 {
                let last = variants[variants.len() - 1];
                variants.push(rotate_quarter(last));
            }
        }
        Self { variants, output }
    }

    /// Background pixel with a foreground 4-neighbour becomes foreground.
    pub fn gap_fill() -> Self {
        use Cell::*;
        Self::new([[Any, On, Any], [Any, Off, Any], [Any, Any, Any]], true, true)
    }

    /// Foreground pixel with a background 4-neighbour becomes background.
    pub fn spur_trim() -> Self {
        use Cell::*;
        Self::new([[Any, Off, Any], [Any, On, Any], [Any, Any, Any]], true, false)
    }

    fn matches(&self, hood: &[[bool; 3]; 3]) -> bool {
        self.variants.iter().any(|pattern| {
            pattern.iter().zip(hood).all(|(prow, hrow)| {
                prow.iter().zip(hrow).all(|(cell, &on)| match cell {
                    Cell::Any => true,
                    Cell::On => on,
                    Cell::Off => !on,
                })
            })
        })
    }
}

fn rotate_quarter(p: [[Cell; 3]; 3]) -> [[Cell; 3]; 3] {
    let mut out = [[Cell::Any; 3]; 3];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = p[2 - c][r];
        }
    }
    out
}

/// Apply `rule` to a binary image `passes` times.
///
/// Non-zero input pixels count as foreground, pixels outside the image as
/// background. The result holds only `FOREGROUND`/`BACKGROUND`.
pub fn apply_rule(img: &GrayImage, rule: &NeighborhoodRule, passes: usize) -> GrayImage {
    let (width, height) = img.dimensions();
    let (w, h) = (width as i64, height as i64);
    let mut cells: Vec<bool> = img.pixels().map(|p| p[0] != BACKGROUND).collect();
    let mut next = cells.clone();

    let at = |cells: &[bool], x: i64, y: i64| {
        x >= 0 && y >= 0 && x < w && y < h && cells[(y * w + x) as usize]
    };

    for _ in 0..passes {
        for y in 0..h {
            for x in 0..w {
                let mut hood = [[false; 3]; 3];
                for (r, row) in hood.iter_mut().enumerate() {
                    for (c, cell) in row.iter_mut().enumerate() {
                        *cell = at(&cells, x + c as i64 - 1, y + r as i64 - 1);
                    }
                }
                let idx = (y * w + x) as usize;
                next[idx] = if rule.matches(&hood) { rule.output } else { cells[idx] };
            }
        }
        std::mem::swap(&mut cells, &mut next);
    }

    GrayImage::from_fn(width, height, |x, y| {
        let on = cells[(y as i64 * w + x as i64) as usize];
        Luma([if on { FOREGROUND } else { BACKGROUND }])
    })
}

/// Hard threshold: values below `level` become background, the rest foreground.
pub fn threshold(img: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y)[0];
        Luma([if v < level { BACKGROUND } else { FOREGROUND }])
    })
}

/// Use `alpha` as the opacity of a flat `base` intensity.
pub fn with_alpha(alpha: &GrayImage, base: u8) -> GrayAlphaImage {
    GrayAlphaImage::from_fn(alpha.width(), alpha.height(), |x, y| {
        LumaA([base, alpha.get_pixel(x, y)[0]])
    })
}

pub fn resize(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Gaussian blur with the given radius in pixels; 0 returns a copy.
pub fn blur(img: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }
    imageops::blur(img, radius as f32)
}

/// Alpha-composite `layer` onto `canvas` with its top-left corner at `(x, y)`.
/// The layer may hang off any edge.
pub fn paste(canvas: &mut GrayAlphaImage, layer: &GrayAlphaImage, x: i64, y: i64) {
    imageops::overlay(canvas, layer, x, y);
}

/// Paste on a horizontally wrapping canvas: the layer is drawn at `x` and
/// again one canvas width to either side.
pub fn paste_wrapped(canvas: &mut GrayAlphaImage, layer: &GrayAlphaImage, x: i64, y: i64) {
    let width = canvas.width() as i64;
    paste(canvas, layer, x, y);
    paste(canvas, layer, x + width, y);
    paste(canvas, layer, x - width, y);
}
