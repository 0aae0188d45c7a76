use std::path::Path;

use image::{GrayAlphaImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::drift::PointSet;
use crate::error::Result;

/// Export a mask as white land on black ocean.
pub fn export_mask(mask: &GrayAlphaImage, path: impl AsRef<Path>) -> Result<()> {
    let img: GrayImage = ImageBuffer::from_fn(mask.width(), mask.height(), |x, y| {
        let p = mask.get_pixel(x, y);
        Luma([((p[0] as u16 * p[1] as u16) / 255) as u8])
    });
    img.save(path)?;
    Ok(())
}

/// Export a height map: blue shades below the coastline, spectral colormap above.
pub fn export_heightmap(
    height_map: &GrayAlphaImage,
    coast_level: u8,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut img: RgbImage = ImageBuffer::new(height_map.width(), height_map.height());
    let coast = coast_level as f32;

    for (x, y, p) in height_map.enumerate_pixels() {
        let h = p[1] as f32;
        let color = if h < coast {
            let depth = h / coast.max(1.0);
            [20, (40.0 + 60.0 * depth) as u8, (80.0 + 100.0 * depth) as u8]
        } else {
            spectral_colormap((h - coast) / (255.0 - coast).max(1.0))
        };
        img.put_pixel(x, y, Rgb(color));
    }

    img.save(path)?;
    Ok(())
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Export the partitioned disk field, one colour per cluster.
/// `cell_px` is the pixel size of one lattice cell.
pub fn export_point_sets(
    sets: &[PointSet],
    grid_width: usize,
    grid_height: usize,
    cell_px: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let (width, height) = (grid_width as u32 * cell_px, grid_height as u32 * cell_px);
    let mut img: RgbImage = ImageBuffer::new(width, height);
    let scale = cell_px as f64;

    for (i, set) in sets.iter().enumerate() {
        let color = cluster_color(i);
        for p in &set.points {
            fill_circle(&mut img, p.x * scale, p.y * scale, p.r * scale, color);
        }
        // Mark the cluster centre.
        let (cx, cy) = (set.center.x * scale, set.center.y * scale);
        fill_circle(&mut img, cx, cy, scale * 0.15, [255, 255, 255]);
    }

    img.save(path)?;
    Ok(())
}

/// Well-separated hues via golden-ratio stepping.
fn cluster_color(index: usize) -> [u8; 3] {
    let hue = (index as f32 * 0.618_034).fract() * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [(60.0 + 195.0 * r) as u8, (60.0 + 195.0 * g) as u8, (60.0 + 195.0 * b) as u8]
}

fn fill_circle(img: &mut RgbImage, cx: f64, cy: f64, radius: f64, color: [u8; 3]) {
    if radius <= 0.0 {
        return;
    }
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = ((cx - radius).floor() as i64).max(0);
    let x1 = ((cx + radius).ceil() as i64).min(w - 1);
    let y0 = ((cy - radius).floor() as i64).max(0);
    let y1 = ((cy + radius).ceil() as i64).min(h - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
