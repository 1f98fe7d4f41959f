use crate::model::ParamOps;

/// Trait for gradient-based optimizers.
///
/// Training logic (`Trainer`) is kept apart from the parameter update rule,
/// so any model can be paired with any optimizer without dynamic dispatch.
///
/// # Example
/// ```rust
/// use student_performance::model::LinearParams;
/// use student_performance::optimizer::{Optimizer, SGD};
/// use ndarray::array;
///
/// let params = LinearParams { weights: array![1.0, 2.0], bias: 0.5 };
/// let grads = LinearParams { weights: array![0.1, -0.2], bias: -0.01 };
/// let updated = SGD::new(0.1).step(&params, &grads);
/// assert!((updated.weights[0] - 0.99).abs() < 1e-12);
/// ```
pub trait Optimizer<P> {
    /// Performs an optimization step:
    /// ```text
    /// params_new = params - learning_rate * gradients
    /// ```
    ///
    /// Inputs are not mutated; a new value is returned.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// ```text
/// θ ← θ - η · ∇L(θ)
/// ```
/// where `η` is the learning rate and `∇L(θ)` is the loss gradient.
/// Stateless: no momentum, no adaptive learning rate.
#[derive(Clone, Copy, Debug)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }

    /// Returns the current learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl<P: ParamOps> Optimizer<P> for SGD {
    fn step(&self, params: &P, grads: &P) -> P {
        params.add(&grads.scale(-self.lr))
    }
}
