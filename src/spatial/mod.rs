pub mod sampling;
pub mod sparse_hash;

pub use sampling::sample_in_disk;
pub use sparse_hash::SparseHashGrid;
