//! Graph algorithms around partitioning: traversal and network generation.

pub mod generate;
pub mod traversal;

pub use generate::NetworkGenerator;
pub use traversal::{bfs_depths, bfs_walk};
