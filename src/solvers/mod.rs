mod bfs;

pub use bfs::{distances, farthest_cell};
