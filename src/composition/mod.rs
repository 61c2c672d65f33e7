//! # Composition Pipeline
//!
//! Runs the optional cover splice and the optional audio mix in order and
//! describes the resulting file for the preview layer.

pub mod naming;
pub mod pipeline;

// Re-exports for convenience
pub use naming::Stage;
pub use pipeline::{
    CompositionOutput, CompositionPipeline, CompositionRequest, OutputDescriptor, VideoReference,
};
