//! # Cover Frame Module
//!
//! Replaces the first visible frame of a rendered video with a still cover
//! image while keeping duration, resolution and audio intact.

pub mod splicer;

pub use splicer::{cover_graph, CoverFrameSplicer};
