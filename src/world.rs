//! World container: continent placement, drift generation and rendering.
//!
//! The world wraps horizontally (east and west edges meet) but not
//! vertically. Continents are append-only and drawn in insertion order, so
//! later continents sit on top of earlier ones.

use image::GrayAlphaImage;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::coastline::{self, ContinentRaster};
use crate::config::WorldConfig;
use crate::continent::Continent;
use crate::drift::{self, Partition};
use crate::error::{invalid, Result};
use crate::raster;
use crate::scale::MapScale;

/// A continent and its centre in world km.
#[derive(Clone, Debug)]
pub struct PlacedContinent {
    pub continent: Continent,
    pub x: f64,
    pub y: f64,
}

impl PlacedContinent {
    fn clear_of(&self, other: &Continent, x: f64, y: f64) -> bool {
        let reach = self.continent.radius_km() + other.radius_km();
        (x - self.x).powi(2) + (y - self.y).powi(2) >= reach * reach
    }
}

/// Summary of a drift generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriftReport {
    pub cuts_requested: usize,
    pub cuts_applied: usize,
    pub continents: usize,
}

/// World-sized mask and height map.
#[derive(Clone, Debug)]
pub struct WorldRaster {
    pub mask: GrayAlphaImage,
    pub height_map: GrayAlphaImage,
}

pub struct World {
    pub name: String,
    config: WorldConfig,
    continents: Vec<PlacedContinent>,
}

impl World {
    pub fn new(name: impl Into<String>, config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            continents: Vec::new(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn continents(&self) -> &[PlacedContinent] {
        &self.continents
    }

    /// Whether `continent` centred at `(x, y)` keeps its bounding circle clear
    /// of every continent already placed.
    pub fn can_place(&self, continent: &Continent, x: f64, y: f64) -> bool {
        self.continents.iter().all(|placed| placed.clear_of(continent, x, y))
    }

    /// Place a continent at explicit coordinates. No overlap check is made;
    /// use [`World::can_place`] first if that matters.
    pub fn place_at(&mut self, continent: Continent, x: f64, y: f64) -> Result<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(invalid(format!(
                "placement of {} needs finite coordinates, got ({x}, {y})",
                continent.name()
            )));
        }
        debug!(continent = continent.name(), x, y, "placed continent");
        self.continents.push(PlacedContinent { continent, x, y });
        Ok(())
    }

    /// Add a continent.
    ///
    /// Explicit coordinates are always accepted. The first continent without
    /// coordinates goes to the world centre; later ones are placed by
    /// rejection sampling inside the placement margin. Returns `Ok(false)`,
    /// leaving the world untouched, when no clear spot is found.
    pub fn add_continent<R: Rng + ?Sized>(
        &mut self,
        continent: Continent,
        coords: Option<(f64, f64)>,
        rng: &mut R,
    ) -> Result<bool> {
        if let Some((x, y)) = coords {
            self.place_at(continent, x, y)?;
            return Ok(true);
        }
        if self.continents.is_empty() {
            let (x, y) = (self.config.world_width_km * 0.5, self.config.world_height_km * 0.5);
            self.place_at(continent, x, y)?;
            return Ok(true);
        }

        let margin = self.config.placement_margin;
        let span = 1.0 - 2.0 * margin;
        for attempt in 0..self.config.placement_attempts {
            let x = (rng.gen::<f64>() * span + margin) * self.config.world_width_km;
            let y = (rng.gen::<f64>() * span + margin) * self.config.world_height_km;
            if self.can_place(&continent, x, y) {
                debug!(continent = continent.name(), attempt, "found clear placement");
                self.place_at(continent, x, y)?;
                return Ok(true);
            }
        }

        warn!(
            continent = continent.name(),
            attempts = self.config.placement_attempts,
            "no clear placement found"
        );
        Ok(false)
    }

    /// Grow continents by splitting a packed disk field and drifting the
    /// pieces apart from the world centre.
    pub fn continental_drift_generation<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<DriftReport> {
        let field_params = self.config.field.clone();
        let drift_params = self.config.drift.clone();
        let (gw, gh) = (field_params.grid_width, field_params.grid_height);
        let (world_w, world_h) = (self.config.world_width_km, self.config.world_height_km);

        let points = drift::generate_point_field(&field_params, world_h, rng)?;
        let n_cuts = rng.gen_range(drift_params.min_cuts..=drift_params.max_cuts);
        let Partition {
            sets,
            cuts_requested,
            cuts_applied,
        } = drift::partition(points, gw, gh, n_cuts, rng)?;

        let radius = (world_h * drift_params.continent_radius_fraction).floor();
        let (cx, cy) = ((world_w / 2.0).floor(), (world_h / 2.0).floor());
        let (fx, fy) = drift_params.drift_factor;

        for (i, set) in sets.iter().enumerate() {
            let name = (i + 1).to_string();
            let continent =
                Continent::from_point_set(name, radius, set, gw, gh, drift_params.point_inset)?;
            let dx = set.drift.x / gw as f64 * world_w;
            let dy = set.drift.y / gh as f64 * world_h;
            self.place_at(continent, cx + dx * fx, cy + dy * fy)?;
        }

        let report = DriftReport {
            cuts_requested,
            cuts_applied,
            continents: sets.len(),
        };
        info!(
            world = %self.name,
            cuts = report.cuts_requested,
            applied = report.cuts_applied,
            continents = report.continents,
            "continental drift generation complete"
        );
        Ok(report)
    }

    /// Render the world mask and height map at `scale`.
    ///
    /// Continents are rasterized in parallel and then composited in list
    /// order, each pasted three times so it wraps across the east/west seam.
    pub fn render(&self, scale: MapScale) -> Result<WorldRaster> {
        let (width, height) =
            scale.canvas_size(self.config.world_width_km, self.config.world_height_km)?;

        let rasters: Vec<ContinentRaster> = self
            .continents
            .par_iter()
            .map(|placed| coastline::rasterize(&placed.continent, scale, &self.config.raster))
            .collect::<Result<_>>()?;

        let mut mask = GrayAlphaImage::new(width, height);
        let mut height_map = GrayAlphaImage::new(width, height);
        for (placed, raster) in self.continents.iter().zip(&rasters) {
            let r = scale.to_pixels(placed.continent.radius_km());
            let x = scale.to_pixels(placed.x) - r;
            let y = scale.to_pixels(placed.y) - r;
            raster::paste_wrapped(&mut mask, &raster.mask, x, y);
            raster::paste_wrapped(&mut height_map, &raster.height_map, x, y);
        }

        info!(
            world = %self.name,
            width,
            height,
            continents = self.continents.len(),
            km_per_pixel = scale.km_per_pixel(),
            "rendered world"
        );
        Ok(WorldRaster { mask, height_map })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continent::ControlPoint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world() -> World {
        World::new("Testworld", WorldConfig::default()).unwrap()
    }

    fn blob(name: &str, radius: f64) -> Continent {
        Continent::from_points(
            name,
            radius,
            vec![ControlPoint::new(0.0, 0.0, 0.35), ControlPoint::new(0.3, -0.2, 0.25)],
        )
        .unwrap()
    }

    fn pairwise_clear(world: &World) -> bool {
        let placed = world.continents();
        (0..placed.len()).all(|i| {
            (i + 1..placed.len()).all(|j| {
                let (a, b) = (&placed[i], &placed[j]);
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                d >= a.continent.radius_km() + b.continent.radius_km()
            })
        })
    }

    #[test]
    fn test_first_continent_goes_to_centre() {
        let mut w = world();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(w.add_continent(blob("A", 2200.0), None, &mut rng).unwrap());
        let placed = &w.continents()[0];
        assert_eq!((placed.x, placed.y), (20_000.0, 10_000.0));
    }

    #[test]
    fn test_random_placement_never_overlaps() {
        for seed in 0..5 {
            let mut w = world();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let radii = [2200.0, 1800.0, 1600.0, 3100.0, 2200.0, 1800.0, 2500.0];
            for (i, radius) in radii.into_iter().enumerate() {
                w.add_continent(blob(&i.to_string(), radius), None, &mut rng).unwrap();
            }
            assert!(w.continents().len() >= 2);
            assert!(pairwise_clear(&w));
            for placed in &w.continents()[1..] {
                assert!(placed.x >= 4000.0 && placed.x <= 36_000.0);
                assert!(placed.y >= 2000.0 && placed.y <= 18_000.0);
            }
        }
    }

    #[test]
    fn test_exhausted_placement_leaves_world_unchanged() {
        let mut w = world();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(w.add_continent(blob("Huge", 30_000.0), None, &mut rng).unwrap());
        assert!(!w.add_continent(blob("Small", 100.0), None, &mut rng).unwrap());
        assert_eq!(w.continents().len(), 1);
        assert_eq!(w.continents()[0].continent.name(), "Huge");
    }

    #[test]
    fn test_radius_sum_precheck() {
        let mut w = world();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        w.add_continent(blob("A", 2200.0), Some((10_000.0, 10_000.0)), &mut rng).unwrap();
        let b = blob("B", 1800.0);
        assert!(!w.can_place(&b, 13_000.0, 10_000.0));
        assert!(w.can_place(&b, 14_000.0, 10_000.0));
        // Explicit coordinates bypass the check.
        assert!(w.add_continent(b, Some((13_000.0, 10_000.0)), &mut rng).unwrap());
        assert_eq!(w.continents().len(), 2);
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        let mut w = world();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(w.add_continent(blob("A", 2200.0), Some((f64::NAN, 0.0)), &mut rng).is_err());
        assert!(w.continents().is_empty());
    }

    #[test]
    fn test_drift_generation() {
        let mut w = world();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let report = w.continental_drift_generation(&mut rng).unwrap();
        assert!((3..=8).contains(&report.cuts_requested));
        assert_eq!(report.continents, report.cuts_applied + 1);
        assert_eq!(w.continents().len(), report.continents);
        for (i, placed) in w.continents().iter().enumerate() {
            assert_eq!(placed.continent.name(), (i + 1).to_string());
            assert_eq!(placed.continent.radius_km(), 5000.0);
            assert!(placed.x.is_finite() && placed.y.is_finite());
        }
        let total: usize = w.continents().iter().map(|p| p.continent.points().len()).sum();
        assert_eq!(total, 800);
    }

    #[test]
    fn test_drift_generation_is_deterministic() {
        let run = || {
            let mut w = world();
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            w.continental_drift_generation(&mut rng).unwrap();
            w
        };
        let (a, b) = (run(), run());
        assert_eq!(a.continents().len(), b.continents().len());
        for (p, q) in a.continents().iter().zip(b.continents()) {
            assert_eq!(p.continent, q.continent);
            assert_eq!((p.x, p.y), (q.x, q.y));
        }
    }

    #[test]
    fn test_render_dimensions() {
        let mut w = world();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        w.add_continent(blob("A", 2200.0), None, &mut rng).unwrap();
        let out = w.render(MapScale::overview()).unwrap();
        assert_eq!(out.mask.dimensions(), (400, 200));
        assert_eq!(out.height_map.dimensions(), (400, 200));
        assert_eq!(out.mask.get_pixel(200, 100)[1], 255);
        assert_eq!(out.mask.get_pixel(0, 0)[1], 0);
    }

    #[test]
    fn test_wraparound_matches_interior_render() {
        let scale = MapScale::overview();
        let render_at = |x: f64| {
            let mut w = world();
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            w.add_continent(blob("A", 2200.0), Some((x, 10_000.0)), &mut rng).unwrap();
            w.render(scale).unwrap()
        };

        // Straddles the west seam, then the same spot one world width east.
        let west = render_at(500.0);
        let east = render_at(40_500.0);
        assert_eq!(west.mask, east.mask);
        assert_eq!(west.height_map, east.height_map);

        // Same continent fully inside the canvas: left edge at column 178.
        let inside = render_at(20_000.0);
        let side = 44;
        for i in 0..side {
            let wrapped = (-17 + i as i64).rem_euclid(400) as u32;
            for y in 0..200 {
                assert_eq!(west.mask.get_pixel(wrapped, y), inside.mask.get_pixel(178 + i, y));
                assert_eq!(
                    west.height_map.get_pixel(wrapped, y),
                    inside.height_map.get_pixel(178 + i, y)
                );
            }
        }
    }
}
