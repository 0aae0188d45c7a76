pub mod field;
pub mod partition;
pub mod types;

pub use field::generate_point_field;
pub use partition::{partition, CutOutcome, Partition, Partitioner};
pub use types::{PointSet, Vec2, WeightedPoint};
