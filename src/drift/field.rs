//! Packed disk field.
//!
//! Disks start on a regular lattice and grow, in random order, to a random
//! fraction of the largest radius that keeps them clear of their 8 lattice
//! neighbours. Disks outside the inscribed ellipse are shrunk so the field
//! thins out towards its corners.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::config::FieldParams;
use crate::error::{invalid, Result};

use super::types::WeightedPoint;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Generate the packed field in lattice (row-major) order.
///
/// `radius_cap` bounds a disk that has no in-range neighbours at all, which
/// only happens for a 1x1 lattice.
pub fn generate_point_field<R: Rng + ?Sized>(
    params: &FieldParams,
    radius_cap: f64,
    rng: &mut R,
) -> Result<Vec<WeightedPoint>> {
    let (width, height) = (params.grid_width, params.grid_height);
    if width == 0 || height == 0 {
        return Err(invalid(format!("point field grid must be non-empty, got {width}x{height}")));
    }
    if !params.edge_radius.is_finite() || params.edge_radius <= 0.0 {
        return Err(invalid(format!("edge radius must be positive, got {}", params.edge_radius)));
    }

    let mut points: Vec<WeightedPoint> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| WeightedPoint {
            x: x as f64,
            y: y as f64,
            r: params.edge_radius,
            slot: x + y * width,
        })
        .collect();

    // Processing order is a permutation of slots; neighbour lookups always go
    // through `points`, so disks grown earlier constrain the ones after them.
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.shuffle(rng);

    let k = (width + height) as f64 / 2.0;
    for &idx in &order {
        let point = points[idx];
        let (sx, sy) = ((point.slot % width) as i64, (point.slot / width) as i64);

        let mut min_radius = radius_cap;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            // Plain row-major arithmetic: an offset past a row end lands on the
            // adjacent row, matching how the lattice is addressed everywhere else.
            let n = (sx + dx) + (sy + dy) * width as i64;
            if n < 0 || n >= points.len() as i64 {
                continue;
            }
            min_radius = min_radius.min(point.max_radius(&points[n as usize]));
        }
        let min_radius = min_radius.max(params.min_radius);

        let mut r = min_radius * rng.gen::<f64>();

        let d = ((2.0 * point.x / width as f64 - 1.0).powi(2)
            + (2.0 * point.y / height as f64 - 1.0).powi(2))
        .sqrt();
        if d > 1.0 {
            r /= d * k - k + 1.0;
        }

        let jx = rng.gen::<f64>() * 2.0 * params.jitter - params.jitter;
        let jy = rng.gen::<f64>() * 2.0 * params.jitter - params.jitter;

        let cell = &mut points[idx];
        cell.r = r;
        cell.x += jx;
        cell.y += jy;
    }

    let mean_radius = points.iter().map(|p| p.r).sum::<f64>() / points.len() as f64;
    info!(width, height, mean_radius, "packed point field");

    Ok(points)
}
