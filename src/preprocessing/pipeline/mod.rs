//! Pipeline utilities for chaining transformers.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Pipeline`] | Chain named transformers sequentially |
//! | [`Block`] | Named numeric or categorical columns fed to a pipeline |

#[allow(clippy::module_inception)]
pub mod pipeline;

pub use pipeline::{
    Block, BlockData, FittedPipeline, Pipeline, PipelineParams, PipelineStepEnum, StepParams,
    UnfittedStepEnum,
};
