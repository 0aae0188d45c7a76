//! Continental landmass generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod coastline;
pub mod config;
pub mod continent;
pub mod drift;
pub mod error;
pub mod export;
pub mod raster;
pub mod scale;
pub mod seeds;
pub mod world;

pub use error::{GenError, Result};
