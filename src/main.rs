use clap::Parser;
use rand::Rng;
use tracing_subscriber::EnvFilter;

use landmass_generator::config::WorldConfig;
use landmass_generator::continent::Continent;
use landmass_generator::export;
use landmass_generator::scale::{MapScale, ScalePreset};
use landmass_generator::seeds::WorldSeeds;
use landmass_generator::world::World;

#[derive(Parser, Debug)]
#[command(name = "landmass_generator")]
#[command(about = "Generate continent masks and height maps for a horizontally wrapping world")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Render scale in km per pixel (lower = more detail, slower)
    #[arg(long, default_value = "10")]
    scale: f64,

    /// Named scale; overrides --scale
    #[arg(long, value_enum)]
    preset: Option<ScalePreset>,

    /// JSON config file (missing fields keep their defaults)
    #[arg(short, long)]
    config: Option<String>,

    /// Place this many self-generated continents instead of running drift generation
    #[arg(long)]
    random: Option<usize>,

    /// Give every --random continent the configured default radius
    #[arg(long)]
    default_radius: bool,

    /// World name
    #[arg(long, default_value = "World")]
    name: String,

    /// Output path for the land mask
    #[arg(long, default_value = "mask.png")]
    mask: String,

    /// Output path for the raw height map (grey with alpha)
    #[arg(long, default_value = "heightmap.png")]
    heightmap: String,

    /// Output path for a colorized height map preview
    #[arg(long)]
    preview: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> landmass_generator::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = WorldSeeds::from_master(seed);
    let config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    let scale = match args.preset {
        Some(preset) => preset.to_scale(),
        None => MapScale::new(args.scale)?,
    };

    let mut world = World::new(&args.name, config)?;
    let config = world.config().clone();

    println!("Generating world '{}' with seed: {}", world.name, seed);
    println!(
        "World size: {} x {} km at {} km/px",
        config.world_width_km,
        config.world_height_km,
        scale.km_per_pixel()
    );

    match args.random {
        Some(count) => {
            println!("Placing {} random continents...", count);
            let mut shape_rng = seeds.continents_rng();
            let mut place_rng = seeds.placement_rng();
            let mut placed = 0;
            for i in 0..count {
                let name = format!("Continent {}", i + 1);
                let continent = if args.default_radius {
                    Continent::with_default_radius(name, Vec::new(), &config, &mut shape_rng)?
                } else {
                    let radius = shape_rng.gen_range(1600.0..=3100.0);
                    Continent::new(name, radius, Vec::new(), &config, &mut shape_rng)?
                };
                if world.add_continent(continent, None, &mut place_rng)? {
                    placed += 1;
                }
            }
            println!("Placed {} of {} continents", placed, count);
        }
        None => {
            println!("Simulating continental drift...");
            let report = world.continental_drift_generation(&mut seeds.drift_rng())?;
            println!(
                "Made {} of {} cuts, {} continents",
                report.cuts_applied, report.cuts_requested, report.continents
            );
        }
    }

    println!("Rendering...");
    let raster = world.render(scale)?;

    export::export_mask(&raster.mask, &args.mask)?;
    println!("Wrote mask to {}", args.mask);
    raster.height_map.save(&args.heightmap)?;
    println!("Wrote height map to {}", args.heightmap);
    if let Some(path) = &args.preview {
        export::export_heightmap(&raster.height_map, config.raster.threshold, path)?;
        println!("Wrote preview to {}", path);
    }

    Ok(())
}
