//! Inference-side pipeline.

pub mod predict_pipeline;

pub use predict_pipeline::{CustomData, PredictPipeline, Predictor, FIELD_COLUMNS};
