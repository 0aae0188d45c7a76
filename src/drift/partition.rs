//! Recursive "continental drift" partitioning.
//!
//! The field starts as a single live set. Each cut picks a live set by
//! weight, slices it with a pair of skewed lines through its centre, and
//! replaces it with the two halves. A cut that leaves one side empty puts the
//! set back unchanged but still spends its slot, so a run of `n` cuts yields
//! at most `n + 1` sets.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use rand::Rng;
use tracing::{debug, info};

use crate::error::{invalid, Result};

use super::types::{centroid, PointSet, Vec2, WeightedPoint};

/// Result of a single cut slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CutOutcome {
    /// The chosen set was split into two non-empty sets.
    Split { left: usize, right: usize },
    /// One side was empty; the chosen set went back to the end of the queue.
    Degenerate,
    /// No cut slots remain.
    Exhausted,
}

/// Work queue of live point sets plus the remaining cut budget.
pub struct Partitioner {
    live: Vec<PointSet>,
    total_points: usize,
    cuts_requested: usize,
    remaining: usize,
    applied: usize,
}

/// Final partition of a field.
#[derive(Clone, Debug)]
pub struct Partition {
    pub sets: Vec<PointSet>,
    pub cuts_requested: usize,
    /// Cuts that produced a split; `sets.len() == cuts_applied + 1`
    pub cuts_applied: usize,
}

impl Partitioner {
    pub fn new(
        points: Vec<WeightedPoint>,
        grid_width: usize,
        grid_height: usize,
        n_cuts: usize,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(invalid("cannot partition an empty point field"));
        }
        if grid_width == 0 || grid_height == 0 {
            return Err(invalid(format!(
                "partition grid must be non-empty, got {grid_width}x{grid_height}"
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(invalid(format!("point in slot {} has a non-finite position", p.slot)));
        }

        let total_points = points.len();
        let root = PointSet {
            points,
            center: Vec2::new(grid_width as f64 / 2.0, grid_height as f64 / 2.0),
            weight: 1.0,
            drift: Vec2::ZERO,
        };
        Ok(Self {
            live: vec![root],
            total_points,
            cuts_requested: n_cuts,
            remaining: n_cuts,
            applied: 0,
        })
    }

    pub fn live_sets(&self) -> &[PointSet] {
        &self.live
    }

    pub fn remaining_cuts(&self) -> usize {
        self.remaining
    }

    pub fn cuts_applied(&self) -> usize {
        self.applied
    }

    /// Spend one cut slot.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CutOutcome {
        if self.remaining == 0 {
            return CutOutcome::Exhausted;
        }
        self.remaining -= 1;

        let index = self.select(rng);
        let parent = self.live.remove(index);
        let center = parent.center;

        let angle = rng.gen::<f64>() * TAU;
        let skewed = angle + FRAC_PI_2 + rng.gen::<f64>() * FRAC_PI_4;
        let first = Line::through(center, angle);
        let second = Line::through(center, skewed);
        let d1 = if rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
        let d2 = if rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };

        let (left, right): (Vec<WeightedPoint>, Vec<WeightedPoint>) = parent
            .points
            .iter()
            .copied()
            .partition(|p| d1 * p.y > d1 * first.at(p.x) && d2 * p.y > d2 * second.at(p.x));

        if left.is_empty() || right.is_empty() {
            debug!(set = index, size = parent.len(), "degenerate cut, set requeued");
            self.live.push(parent);
            return CutOutcome::Degenerate;
        }

        let (left_len, right_len) = (left.len(), right.len());
        let left = self.child(left, center);
        let right = self.child(right, center);
        debug!(
            set = index,
            left = left_len,
            right = right_len,
            left_weight = left.weight,
            right_weight = right.weight,
            "cut applied"
        );
        self.live.push(left);
        self.live.push(right);
        self.applied += 1;

        CutOutcome::Split {
            left: left_len,
            right: right_len,
        }
    }

    /// Run every remaining cut slot and return the live sets.
    pub fn finish<R: Rng + ?Sized>(mut self, rng: &mut R) -> Partition {
        while self.step(rng) != CutOutcome::Exhausted {}
        info!(
            requested = self.cuts_requested,
            applied = self.applied,
            sets = self.live.len(),
            "partitioned point field"
        );
        Partition {
            sets: self.live,
            cuts_requested: self.cuts_requested,
            cuts_applied: self.applied,
        }
    }

    /// Cumulative-weight walk over the live sets.
    fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut r = rng.gen::<f64>();
        let mut i = 0;
        // The last set absorbs any floating-point shortfall in the weights.
        while i + 1 < self.live.len() && r > self.live[i].weight {
            r -= self.live[i].weight;
            i += 1;
        }
        i
    }

    fn child(&self, points: Vec<WeightedPoint>, parent_center: Vec2) -> PointSet {
        // Callers only pass non-empty sides.
        let center = centroid(&points).unwrap_or(parent_center);
        let weight = points.len() as f64 / self.total_points as f64;
        let drift = center.sub(&parent_center).scale(weight * self.cuts_requested as f64);
        PointSet {
            points,
            center,
            weight,
            drift,
        }
    }
}

/// `y = slope * x + intercept`
#[derive(Clone, Copy, Debug)]
struct Line {
    slope: f64,
    intercept: f64,
}

impl Line {
    fn through(point: Vec2, angle: f64) -> Self {
        let slope = angle.tan();
        Self {
            slope,
            intercept: point.y - slope * point.x,
        }
    }

    fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Partition a field with exactly `n_cuts` cut slots.
pub fn partition<R: Rng + ?Sized>(
    points: Vec<WeightedPoint>,
    grid_width: usize,
    grid_height: usize,
    n_cuts: usize,
    rng: &mut R,
) -> Result<Partition> {
    Ok(Partitioner::new(points, grid_width, grid_height, n_cuts)?.finish(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldParams;
    use crate::drift::field::generate_point_field;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn field(seed: u64) -> Vec<WeightedPoint> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_point_field(&FieldParams::default(), 20_000.0, &mut rng).unwrap()
    }

    fn assert_conserved(partitioner: &Partitioner, total: usize) {
        let weight: f64 = partitioner.live_sets().iter().map(|s| s.weight).sum();
        assert!((weight - 1.0).abs() < 1e-9, "weights sum to {weight}");
        let count: usize = partitioner.live_sets().iter().map(|s| s.len()).sum();
        assert_eq!(count, total);
    }

    #[test]
    fn test_weight_and_point_conservation_every_step() {
        for seed in 0..10 {
            let points = field(seed);
            let total = points.len();
            let mut rng = ChaCha8Rng::seed_from_u64(seed + 100);
            let mut partitioner = Partitioner::new(points, 40, 20, 8).unwrap();
            assert_conserved(&partitioner, total);
            while partitioner.step(&mut rng) != CutOutcome::Exhausted {
                assert_conserved(&partitioner, total);
            }
            assert_eq!(partitioner.live_sets().len(), partitioner.cuts_applied() + 1);
        }
    }

    #[test]
    fn test_every_slot_appears_once() {
        let points = field(4);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let result = partition(points, 40, 20, 6, &mut rng).unwrap();
        let mut slots: Vec<usize> = result
            .sets
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.slot))
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..800).collect::<Vec<_>>());
    }

    #[test]
    fn test_degenerate_cut_keeps_points() {
        // A single point can never land on both sides of a cut.
        let points = vec![WeightedPoint { x: 0.3, y: 0.7, r: 0.2, slot: 0 }];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut partitioner = Partitioner::new(points, 1, 1, 5).unwrap();
        for _ in 0..5 {
            assert_eq!(partitioner.step(&mut rng), CutOutcome::Degenerate);
            assert_conserved(&partitioner, 1);
        }
        assert_eq!(partitioner.step(&mut rng), CutOutcome::Exhausted);
        let result = partitioner.finish(&mut rng);
        assert_eq!(result.sets.len(), 1);
        assert_eq!(result.cuts_applied, 0);
        assert_eq!(result.cuts_requested, 5);
        assert_eq!(result.sets[0].weight, 1.0);
    }

    #[test]
    fn test_split_children_carry_centroid_and_drift() {
        let points = field(2);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let result = partition(points, 40, 20, 4, &mut rng).unwrap();
        // Once anything has split, every live set is a child of some cut.
        let children = if result.cuts_applied > 0 { &result.sets[..] } else { &result.sets[..0] };
        for set in children {
            let c = set.centroid().unwrap();
            assert!((c.x - set.center.x).abs() < 1e-9);
            assert!((c.y - set.center.y).abs() < 1e-9);
            assert!(set.drift.x.is_finite() && set.drift.y.is_finite());
        }
        assert!(result.sets.len() <= 5);
    }

    fn lattice(width: usize, height: usize) -> Vec<WeightedPoint> {
        (0..width * height)
            .map(|slot| WeightedPoint {
                x: (slot % width) as f64,
                y: (slot / width) as f64,
                r: 0.3,
                slot,
            })
            .collect()
    }

    #[test]
    fn test_child_drift_is_scaled_offset_from_parent_center() {
        let n_cuts = 3;
        let mut splits = 0;
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut partitioner = Partitioner::new(lattice(4, 4), 4, 4, n_cuts).unwrap();
            let parent_center = partitioner.live_sets()[0].center;
            assert_eq!(parent_center, Vec2::new(2.0, 2.0));

            let CutOutcome::Split { left, right } = partitioner.step(&mut rng) else {
                continue;
            };
            splits += 1;
            let children = partitioner.live_sets();
            assert_eq!(children.len(), 2);
            assert_eq!((children[0].len(), children[1].len()), (left, right));

            for child in children {
                let n = child.len() as f64;
                let cx = child.points.iter().map(|p| p.x).sum::<f64>() / n;
                let cy = child.points.iter().map(|p| p.y).sum::<f64>() / n;
                let weight = n / 16.0;
                assert_eq!(child.weight, weight);
                let expected_x = (cx - 2.0) * weight * n_cuts as f64;
                let expected_y = (cy - 2.0) * weight * n_cuts as f64;
                assert!((child.drift.x - expected_x).abs() < 1e-12, "seed {seed}");
                assert!((child.drift.y - expected_y).abs() < 1e-12, "seed {seed}");
            }
        }
        assert!(splits > 0, "no seed produced a split");
    }

    #[test]
    fn test_selection_follows_weights() {
        let mut partitioner = Partitioner::new(lattice(2, 1), 2, 1, 1).unwrap();
        let root = partitioner.live.remove(0);
        let set = |weight: f64| PointSet {
            weight,
            ..root.clone()
        };

        partitioner.live = vec![set(0.0), set(1.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..1000 {
            assert_eq!(partitioner.select(&mut rng), 1);
        }

        partitioner.live = vec![set(1.0), set(0.0)];
        for _ in 0..1000 {
            assert_eq!(partitioner.select(&mut rng), 0);
        }

        partitioner.live = vec![set(0.25), set(0.75)];
        let heavy = (0..4000).filter(|_| partitioner.select(&mut rng) == 1).count();
        assert!((2700..3300).contains(&heavy), "heavy set picked {heavy} times");
    }

    #[test]
    fn test_deterministic() {
        let run = || {
            let mut rng = ChaCha8Rng::seed_from_u64(77);
            partition(field(77), 40, 20, 7, &mut rng).unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.cuts_applied, b.cuts_applied);
        for (x, y) in a.sets.iter().zip(&b.sets) {
            assert_eq!(x.points, y.points);
            assert_eq!(x.center, y.center);
            assert_eq!(x.drift, y.drift);
            assert_eq!(x.weight, y.weight);
        }
    }

    #[test]
    fn test_rejects_empty_field() {
        assert!(Partitioner::new(Vec::new(), 4, 4, 3).is_err());
    }
}
