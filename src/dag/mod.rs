// src/dag/mod.rs

//! Graph representation and ordering.
//!
//! - [`graph`] holds a plain adjacency-list directed graph over vertex
//!   indices.
//! - [`sort`] contains topological ordering (Kahn), a post-order depth-first
//!   walk, and a cycle diagnostic.

pub mod graph;
pub mod sort;

pub use graph::{Graph, GraphParseError};
pub use sort::{dfs, find_cycle_member, sort};
