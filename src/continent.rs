//! Continents and their control points.

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::WorldConfig;
use crate::drift::PointSet;
use crate::error::{invalid, Result};

/// A disk in a continent's own frame.
///
/// `x` and `y` lie in `[-1, 1]` across the continent's bounding square;
/// `size` is a radius in the same units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    fn validate(&self, index: usize) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() || !self.size.is_finite() {
            return Err(invalid(format!("control point {index} is not finite: {self:?}")));
        }
        if self.x.abs() > 1.0 || self.y.abs() > 1.0 {
            return Err(invalid(format!("control point {index} lies outside [-1, 1]: {self:?}")));
        }
        if self.size < 0.0 {
            return Err(invalid(format!("control point {index} has negative size {}", self.size)));
        }
        Ok(())
    }
}

/// A named landmass: a bounding radius plus the disks that shape it.
#[derive(Clone, Debug, PartialEq)]
pub struct Continent {
    name: String,
    radius_km: f64,
    points: Vec<ControlPoint>,
}

impl Continent {
    /// Build a continent, scattering a random point cloud when `points` is empty.
    pub fn new<R: Rng + ?Sized>(
        name: impl Into<String>,
        radius_km: f64,
        points: Vec<ControlPoint>,
        config: &WorldConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if points.is_empty() {
            Self::scattered(name, radius_km, config, rng)
        } else {
            Self::from_points(name, radius_km, points)
        }
    }

    /// Like [`Continent::new`], sized at the configured default radius.
    pub fn with_default_radius<R: Rng + ?Sized>(
        name: impl Into<String>,
        points: Vec<ControlPoint>,
        config: &WorldConfig,
        rng: &mut R,
    ) -> Result<Self> {
        Self::new(name, config.default_continent_radius_km, points, config, rng)
    }

    /// Build a continent from an explicit, non-empty point list.
    pub fn from_points(
        name: impl Into<String>,
        radius_km: f64,
        points: Vec<ControlPoint>,
    ) -> Result<Self> {
        validate_radius(radius_km)?;
        if points.is_empty() {
            return Err(invalid("continent needs at least one control point"));
        }
        for (i, p) in points.iter().enumerate() {
            p.validate(i)?;
        }
        Ok(Self {
            name: name.into(),
            radius_km,
            points,
        })
    }

    /// Build a continent from a random cloud clustered around its centre.
    ///
    /// The cloud's extent and point count both scale with the continent's
    /// radius relative to the world height.
    pub fn scattered<R: Rng + ?Sized>(
        name: impl Into<String>,
        radius_km: f64,
        config: &WorldConfig,
        rng: &mut R,
    ) -> Result<Self> {
        validate_radius(radius_km)?;
        let relative = radius_km / config.world_height_km;
        let count = ((config.scatter_density * relative) as usize).max(1);

        let spread = Normal::new(0.0, relative / 2.0)
            .map_err(|e| invalid(format!("scatter spread: {e}")))?;
        let sizes = Normal::new(0.0, relative / 10.0)
            .map_err(|e| invalid(format!("scatter size: {e}")))?;

        let points = (0..count)
            .map(|_| {
                let r = spread.sample(rng).rem_euclid(relative);
                let theta = rng.gen::<f64>() * TAU;
                let size = sizes.sample(rng).abs();
                ControlPoint::new(r * theta.cos(), r * theta.sin(), size)
            })
            .collect();

        Self::from_points(name, radius_km, points)
    }

    /// Turn a partitioned cluster into a continent spanning the whole field.
    ///
    /// Field coordinates map onto `[-inset, inset]` and radii are normalised
    /// by the mean grid dimension.
    pub fn from_point_set(
        name: impl Into<String>,
        radius_km: f64,
        set: &PointSet,
        grid_width: usize,
        grid_height: usize,
        inset: f64,
    ) -> Result<Self> {
        let (gw, gh) = (grid_width as f64, grid_height as f64);
        let points = set
            .points
            .iter()
            .map(|p| {
                ControlPoint::new(
                    (2.0 * p.x / gw - 1.0) * inset,
                    (2.0 * p.y / gh - 1.0) * inset,
                    2.0 * p.r / (gw + gh),
                )
            })
            .collect();
        Self::from_points(name, radius_km, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }
}

fn validate_radius(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(invalid(format!("continent radius must be positive, got {radius_km} km")));
    }
    Ok(())
}
