/// A 2D vector in grid units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn sub(&self, other: &Vec2) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// A disk in the packed field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedPoint {
    pub x: f64,
    pub y: f64,
    /// Disk radius, never negative
    pub r: f64,
    /// Row-major index of the lattice slot this disk started in.
    /// Jitter moves `x`/`y` but never changes the slot.
    pub slot: usize,
}

impl WeightedPoint {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center_distance(&self, other: &WeightedPoint) -> f64 {
        self.position().sub(&other.position()).length()
    }

    /// Largest radius this disk can take without overlapping `other`.
    pub fn max_radius(&self, other: &WeightedPoint) -> f64 {
        self.center_distance(other) - other.r
    }
}

/// A cluster of disks produced by partitioning.
#[derive(Clone, Debug)]
pub struct PointSet {
    pub points: Vec<WeightedPoint>,
    /// Centroid of the set before its most recent split
    pub center: Vec2,
    /// Fraction of all field points held by this set
    pub weight: f64,
    /// Accumulated centroid displacement from the splits that produced it
    pub drift: Vec2,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean position of the member points, or `None` for an empty set.
    pub fn centroid(&self) -> Option<Vec2> {
        centroid(&self.points)
    }
}

pub(crate) fn centroid(points: &[WeightedPoint]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| Vec2::new(acc.x + p.x, acc.y + p.y));
    Some(sum.scale(1.0 / points.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, r: f64) -> WeightedPoint {
        WeightedPoint { x, y, r, slot: 0 }
    }

    #[test]
    fn test_max_radius() {
        let a = point(0.0, 0.0, 0.1);
        let b = point(3.0, 4.0, 1.5);
        assert!((a.center_distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.max_radius(&b) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_centroid() {
        let points = [point(0.0, 0.0, 0.0), point(2.0, 4.0, 0.0)];
        assert_eq!(centroid(&points), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(centroid(&[]), None);
    }
}
