// THEORY:
// This file is the main entry point for the `frontal_vision` library crate.
// It exposes the `FramePipeline` (and its parallel sibling) together with the
// data structures a driver needs: `PipelineConfig`, `FrameResult`, the
// `Segmenter` and `Transport` collaborator traits, and the built-in
// `ColorSegmenter`. The selection and geometry internals live in
// `core_modules` and are public for testing and reuse.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod transport;

pub use config::{BallPolicy, BlobQuery, LabThreshold, PipelineConfig};
pub use core_modules::blob::{Blob, BoundingBox};
pub use core_modules::color_segmenter::ColorSegmenter;
pub use core_modules::geometry::{Polar, ReferencePoint};
pub use error::{Result, VisionError};
pub use parallel_pipeline::ParallelFramePipeline;
pub use pipeline::{Detection, FramePipeline, FrameResult, Segmenter, Target};
pub use transport::{Transport, WriteTransport};
