//! Map scale configuration for rendering at different resolutions.
//!
//! Scale is kilometres per pixel: lower values give more detailed maps at the
//! cost of larger canvases.

use crate::error::{invalid, Result};

/// Render scale in kilometres per pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapScale {
    km_per_pixel: f64,
}

impl MapScale {
    pub fn new(km_per_pixel: f64) -> Result<Self> {
        if !km_per_pixel.is_finite() || km_per_pixel <= 0.0 {
            return Err(invalid(format!("scale must be positive, got {km_per_pixel} km/px")));
        }
        Ok(Self { km_per_pixel })
    }

    /// Whole-planet thumbnail (100 km/px)
    pub fn overview() -> Self {
        Self { km_per_pixel: 100.0 }
    }

    /// Default detail (10 km/px); a 40 000 km world renders 4000 px wide
    pub fn standard() -> Self {
        Self { km_per_pixel: 10.0 }
    }

    /// High detail (5 km/px)
    pub fn detailed() -> Self {
        Self { km_per_pixel: 5.0 }
    }

    pub fn km_per_pixel(&self) -> f64 {
        self.km_per_pixel
    }

    /// Convert a length in km to whole pixels, truncating towards zero.
    #[inline]
    pub fn to_pixels(&self, km: f64) -> i64 {
        (km / self.km_per_pixel) as i64
    }

    /// Canvas dimensions for a world of the given size.
    pub fn canvas_size(&self, width_km: f64, height_km: f64) -> Result<(u32, u32)> {
        let width = self.to_pixels(width_km);
        let height = self.to_pixels(height_km);
        if width <= 0 || height <= 0 {
            return Err(invalid(format!(
                "world canvas is empty at {} km/px ({width}x{height})",
                self.km_per_pixel
            )));
        }
        Ok((width as u32, height as u32))
    }

    /// Side of the square raster covering a continent's bounding circle.
    pub fn raster_side(&self, radius_km: f64) -> Result<u32> {
        let side = (2.0 * radius_km / self.km_per_pixel) as i64;
        if side <= 0 {
            return Err(invalid(format!(
                "continent of radius {radius_km} km is smaller than a pixel at {} km/px",
                self.km_per_pixel
            )));
        }
        Ok(side as u32)
    }

    /// Blur radius in pixels; 0 means no blur.
    ///
    /// Coarser scales get proportionally less pixel blur so the coastline
    /// smoothing covers the same ground distance at every zoom.
    pub fn blur_radius(&self, blur_km: f64) -> u32 {
        (blur_km / self.km_per_pixel).floor().max(0.0) as u32
    }
}

impl Default for MapScale {
    fn default() -> Self {
        Self::standard()
    }
}

/// Named scales selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ScalePreset {
    Overview,
    Standard,
    Detailed,
}

impl ScalePreset {
    pub fn to_scale(self) -> MapScale {
        match self {
            ScalePreset::Overview => MapScale::overview(),
            ScalePreset::Standard => MapScale::standard(),
            ScalePreset::Detailed => MapScale::detailed(),
        }
    }
}
