//! Seed management for world generation
//!
//! Each generation stage draws from its own stream, so changing how one stage
//! consumes randomness leaves the others untouched.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for every generation stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Disk field packing, cut count and cut lines
    pub drift: u64,
    /// Self-generated continent point clouds
    pub continents: u64,
    /// Random continent placement
    pub placement: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            drift: derive_seed(master, "drift"),
            continents: derive_seed(master, "continents"),
            placement: derive_seed(master, "placement"),
        }
    }

    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder {
            seeds: Self::from_master(master),
        }
    }

    pub fn drift_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.drift)
    }

    pub fn continents_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.continents)
    }

    pub fn placement_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.placement)
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for overriding individual stage seeds
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn drift(mut self, seed: u64) -> Self {
        self.seeds.drift = seed;
        self
    }

    pub fn continents(mut self, seed: u64) -> Self {
        self.seeds.continents = seed;
        self
    }

    pub fn placement(mut self, seed: u64) -> Self {
        self.seeds.placement = seed;
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, drift: {}, continents: {}, placement: {} }}",
            self.master, self.drift, self.continents, self.placement,
        )
    }
}
