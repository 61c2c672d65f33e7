//! # Filter Graphs
//!
//! Typed filter steps (scale, setsar, trim, setpts, volume, aloop, atrim,
//! apad, amix, concat) grouped into labelled chains and rendered to the
//! encoder's `-filter_complex` syntax.

pub mod graph;

pub use graph::{Filter, FilterChain, FilterGraph};
