//! Continent coastline rasterization
//!
//! Turns a continent's sparse control disks into a smooth landmass:
//!
//! 1. Splat every control disk onto a square canvas covering the continent's
//!    bounding circle.
//! 2. Resample to a fixed working resolution so the morphology kernels cover
//!    the same fraction of every continent regardless of its size.
//! 3. Close (gap fill) then open (spur trim) to merge neighbouring disks into
//!    one coastline and knock off single-pixel protrusions.
//! 4. Resample back and blur by a fixed ground distance.
//!
//! The blurred intensity is the height signal; thresholding it at the
//! midpoint gives the binary land mask.

use image::{GrayAlphaImage, GrayImage};
use tracing::debug;

use crate::config::RasterParams;
use crate::continent::Continent;
use crate::raster::{self, NeighborhoodRule, FOREGROUND};
use crate::scale::MapScale;

/// Pixel-aligned rasters for one continent.
#[derive(Clone, Debug)]
pub struct ContinentRaster {
    /// Opaque white where land, transparent elsewhere
    pub mask: GrayAlphaImage,
    /// White with the height signal (0 = ocean, 255 = highest land) as alpha
    pub height_map: GrayAlphaImage,
}

impl ContinentRaster {
    pub fn side(&self) -> u32 {
        self.mask.width()
    }
}

/// Rasterize a continent at the given scale.
pub fn rasterize(
    continent: &Continent,
    scale: MapScale,
    params: &RasterParams,
) -> crate::Result<ContinentRaster> {
    let side = scale.raster_side(continent.radius_km())?;

    let splat = splat_points(continent, side);
    let smoothed = smooth_outline(&splat, params);
    let restored = raster::resize(&smoothed, side, side);
    let blurred = raster::blur(&restored, scale.blur_radius(params.blur_km));

    let height_map = raster::with_alpha(&blurred, FOREGROUND);
    let mask = raster::with_alpha(&raster::threshold(&blurred, params.threshold), FOREGROUND);

    debug!(
        continent = continent.name(),
        side,
        points = continent.points().len(),
        "rasterized continent"
    );

    Ok(ContinentRaster { mask, height_map })
}

/// Draw every control disk onto a `side` x `side` canvas.
pub fn splat_points(continent: &Continent, side: u32) -> GrayImage {
    let size = side as f64;
    let mut canvas = GrayImage::new(side, side);
    for p in continent.points() {
        let x = (p.x + 1.0) / 2.0 * size;
        let y = (p.y + 1.0) / 2.0 * size;
        raster::fill_disk(&mut canvas, x, y, p.size * size, FOREGROUND);
    }
    canvas
}

/// Close then open at the working resolution.
fn smooth_outline(splat: &GrayImage, params: &RasterParams) -> GrayImage {
    let working = raster::resize(splat, params.working_size, params.working_size);
    let closed = raster::apply_rule(&working, &NeighborhoodRule::gap_fill(), params.closing_passes);
    raster::apply_rule(&closed, &NeighborhoodRule::spur_trim(), params.opening_passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continent::ControlPoint;
    use crate::raster::BACKGROUND;

    fn blob() -> Continent {
        Continent::from_points(
            "Blob",
            2200.0,
            vec![
                ControlPoint::new(0.0, 0.0, 0.3),
                ControlPoint::new(0.3, 0.1, 0.2),
                ControlPoint::new(-0.25, -0.2, 0.2),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_output_dimensions_match() {
        let scale = MapScale::new(50.0).unwrap();
        let raster = rasterize(&blob(), scale, &RasterParams::default()).unwrap();
        assert_eq!(raster.mask.dimensions(), (88, 88));
        assert_eq!(raster.height_map.dimensions(), (88, 88));
        assert_eq!(raster.side(), 88);
    }

    #[test]
    fn test_mask_is_binary_and_agrees_with_height() {
        let scale = MapScale::new(50.0).unwrap();
        let raster = rasterize(&blob(), scale, &RasterParams::default()).unwrap();
        for (m, h) in raster.mask.pixels().zip(raster.height_map.pixels()) {
            assert_eq!(m[0], FOREGROUND);
            assert_eq!(h[0], FOREGROUND);
            assert!(m[1] == BACKGROUND || m[1] == FOREGROUND);
            assert_eq!(m[1] == FOREGROUND, h[1] >= 128);
        }
        // Centre is land, corners are ocean.
        assert_eq!(raster.mask.get_pixel(44, 44)[1], FOREGROUND);
        assert_eq!(raster.mask.get_pixel(0, 0)[1], BACKGROUND);
        assert_eq!(raster.height_map.get_pixel(87, 87)[1], 0);
    }

    #[test]
    fn test_rethresholding_mask_is_noop() {
        let scale = MapScale::new(50.0).unwrap();
        let raster = rasterize(&blob(), scale, &RasterParams::default()).unwrap();
        let alpha = GrayImage::from_fn(raster.side(), raster.side(), |x, y| {
            image::Luma([raster.mask.get_pixel(x, y)[1]])
        });
        assert_eq!(raster::threshold(&alpha, 128), alpha);
    }

    #[test]
    fn test_splat_positions() {
        let dot = vec![ControlPoint::new(-0.5, 0.5, 0.05)];
        let c = Continent::from_points("Dot", 1000.0, dot).unwrap();
        let splat = splat_points(&c, 100);
        assert_eq!(splat.get_pixel(25, 75)[0], FOREGROUND);
        assert_eq!(splat.get_pixel(75, 25)[0], BACKGROUND);
    }

    #[test]
    fn test_too_small_for_scale() {
        let scale = MapScale::new(10_000.0).unwrap();
        assert!(rasterize(&blob(), scale, &RasterParams::default()).is_err());
    }
}
