#![warn(missing_docs)]

//! # vd_coloring
//!
//! A Rust library that colors the edges of a plane straight-line graph so
//! that any two edges sharing a color are non-crossing. Each color class is
//! maintained as an incrementally built vertical decomposition with a
//! point-location search structure, so every insertion attempt costs a walk
//! through the trapezoids a segment would cross instead of a scan over all
//! previously placed segments.
//!
//! Based on [`petgraph`](https://docs.rs/petgraph) for instance handling.

pub mod types;
pub mod geometry;
pub mod vertex;
pub mod segment;
pub mod decomposition;
pub mod decomposition_blocks;
pub mod input;
pub mod output;
pub mod solver;

#[cfg(test)]
mod testing;

pub use decomposition::VerticalDecomposition;
pub use segment::Segment;
pub use types::InstanceGraph;
pub use types::Orientation;
pub use vertex::Vertex;
