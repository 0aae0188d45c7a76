//! Debug tool for the drift partitioner
//! Renders the packed disk field coloured by cluster, once per cut

use landmass_generator::config::WorldConfig;
use landmass_generator::drift::{self, CutOutcome, Partitioner};
use landmass_generator::export;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 42;
const CELL_PX: u32 = 24;

fn main() -> landmass_generator::Result<()> {
    let config = WorldConfig::default();
    let (gw, gh) = (config.field.grid_width, config.field.grid_height);
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);

    println!("Packing {}x{} disk field...", gw, gh);
    let points = drift::generate_point_field(&config.field, config.world_height_km, &mut rng)?;
    let n_cuts = rng.gen_range(config.drift.min_cuts..=config.drift.max_cuts);

    let mut partitioner = Partitioner::new(points, gw, gh, n_cuts)?;
    export::export_point_sets(partitioner.live_sets(), gw, gh, CELL_PX, "drift_cut_0.png")?;

    let mut cut = 0;
    loop {
        match partitioner.step(&mut rng) {
            CutOutcome::Exhausted => break,
            CutOutcome::Degenerate => println!("  Cut {}: degenerate, requeued", cut + 1),
            CutOutcome::Split { left, right } => {
                println!("  Cut {}: {} | {} points", cut + 1, left, right)
            }
        }
        cut += 1;
        let path = format!("drift_cut_{}.png", cut);
        export::export_point_sets(partitioner.live_sets(), gw, gh, CELL_PX, &path)?;
    }

    for (i, set) in partitioner.live_sets().iter().enumerate() {
        println!(
            "  Set {}: {} points, weight {:.3}, drift ({:.2}, {:.2})",
            i + 1,
            set.len(),
            set.weight,
            set.drift.x,
            set.drift.y
        );
    }
    println!("Saved drift_cut_0.png .. drift_cut_{}.png", cut);
    Ok(())
}
