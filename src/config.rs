//! World generation configuration
//!
//! Every field has a default, so a JSON config file only needs to name the
//! values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};

/// Parameters for the packed disk field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Lattice columns
    pub grid_width: usize,
    /// Lattice rows
    pub grid_height: usize,
    /// Radius every disk starts with before growing
    pub edge_radius: f64,
    /// Maximum positional jitter on each axis, in grid units
    pub jitter: f64,
    /// Floor applied to the maximum non-overlapping radius
    pub min_radius: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 20,
            edge_radius: 0.1,
            jitter: 0.2,
            min_radius: 0.1,
        }
    }
}

/// Parameters for turning the packed field into drifting continents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftParams {
    /// Fewest cuts drawn for one world
    pub min_cuts: usize,
    /// Most cuts drawn for one world (inclusive)
    pub max_cuts: usize,
    /// Control points are pulled towards the frame centre by this factor
    pub point_inset: f64,
    /// Continent radius as a fraction of world height
    pub continent_radius_fraction: f64,
    /// Horizontal and vertical multipliers on the drift offset
    pub drift_factor: (f64, f64),
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            min_cuts: 3,
            max_cuts: 8,
            point_inset: 0.9,
            continent_radius_fraction: 0.25,
            drift_factor: (1.0, 0.5),
        }
    }
}

/// Parameters for the per-continent coastline raster pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterParams {
    /// Side of the square working canvas used for morphology
    pub working_size: u32,
    /// Gap-filling passes
    pub closing_passes: usize,
    /// Spur-removing passes
    pub opening_passes: usize,
    /// Blur radius in km; divided by the scale to get pixels
    pub blur_km: f64,
    /// Intensities at or above this become land in the mask
    pub threshold: u8,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            working_size: 200,
            closing_passes: 4,
            opening_passes: 4,
            blur_km: 100.0,
            threshold: 128,
        }
    }
}

/// Top-level world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World canvas width in km (wraps horizontally)
    pub world_width_km: f64,
    /// World canvas height in km
    pub world_height_km: f64,
    /// Random placement tries before giving up
    pub placement_attempts: usize,
    /// Fraction of the canvas kept clear on every side during random placement
    pub placement_margin: f64,
    /// Radius for continents created without an explicit one
    pub default_continent_radius_km: f64,
    /// Self-generated control points per unit of relative radius
    pub scatter_density: f64,
    pub field: FieldParams,
    pub drift: DriftParams,
    pub raster: RasterParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_width_km: 40_000.0,
            world_height_km: 20_000.0,
            placement_attempts: 100,
            placement_margin: 0.1,
            default_continent_radius_km: 2200.0,
            scatter_density: 300.0,
            field: FieldParams::default(),
            drift: DriftParams::default(),
            raster: RasterParams::default(),
        }
    }
}

impl WorldConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.world_width_km) || !positive(self.world_height_km) {
            return Err(invalid(format!(
                "world size must be positive, got {} x {} km",
                self.world_width_km, self.world_height_km
            )));
        }
        if !(0.0..0.5).contains(&self.placement_margin) {
            return Err(invalid(format!(
                "placement margin must be in [0, 0.5), got {}",
                self.placement_margin
            )));
        }
        if !positive(self.default_continent_radius_km) || !positive(self.scatter_density) {
            return Err(invalid("continent radius and scatter density must be positive"));
        }
        if self.field.grid_width == 0 || self.field.grid_height == 0 {
            return Err(invalid(format!(
                "field grid must be non-empty, got {}x{}",
                self.field.grid_width, self.field.grid_height
            )));
        }
        if !positive(self.field.edge_radius) || !positive(self.field.min_radius) {
            return Err(invalid("field radii must be positive"));
        }
        if !self.field.jitter.is_finite() || self.field.jitter < 0.0 {
            return Err(invalid(format!(
                "field jitter must be non-negative, got {}",
                self.field.jitter
            )));
        }
        if self.drift.min_cuts > self.drift.max_cuts {
            return Err(invalid(format!(
                "min_cuts ({}) exceeds max_cuts ({})",
                self.drift.min_cuts, self.drift.max_cuts
            )));
        }
        if !positive(self.drift.continent_radius_fraction) || !positive(self.drift.point_inset) {
            return Err(invalid("drift radius fraction and inset must be positive"));
        }
        if self.raster.working_size == 0 {
            return Err(invalid("raster working size must be non-zero"));
        }
        if !self.raster.blur_km.is_finite() || self.raster.blur_km < 0.0 {
            return Err(invalid(format!(
                "blur radius must be non-negative, got {}",
                self.raster.blur_km
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world_width_km, 2.0 * config.world_height_km);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "placement_attempts": 12, "field": { "grid_width": 8 } }"#;
        let config = WorldConfig::from_json(json).unwrap();
        assert_eq!(config.placement_attempts, 12);
        assert_eq!(config.field.grid_width, 8);
        assert_eq!(config.field.grid_height, 20);
        assert_eq!(config.raster, RasterParams::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = WorldConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(WorldConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(WorldConfig::from_json(r#"{ "world_height_km": 0.0 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "drift": { "min_cuts": 9 } }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "placement_margin": 0.5 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "field": { "grid_height": 0 } }"#).is_err());
        assert!(WorldConfig::from_json("not json").is_err());
    }
}
