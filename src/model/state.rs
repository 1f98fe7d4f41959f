/// A marker type indicating that a model is **not yet trained**.
///
/// This phantom type is used in generic parameters (e.g., `LinearModel<Unfitted>`)
/// to enforce compile-time guarantees:
/// - Training methods (like `Trainer::fit`) require an `Unfitted` model.
/// - Inference methods (`predict_batch`) are **not available** until the model is converted to `Fitted`.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// After training, a model is converted from `Model<Unfitted>` to `Model<Fitted>`,
/// which implements [`InferenceModel`](crate::model::InferenceModel) and can be
/// persisted as an artifact. A `Fitted` model contains only inference
/// parameters: no optimizer state, loss function, or training hyperparameters.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
