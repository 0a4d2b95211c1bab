//! Collaborator contracts consumed by the session controller

use crate::core::{FeatureType, Result};
use crate::kernel::Kernel;
use crate::matrix::Matrix;
use std::sync::Arc;

/// Labelled feature set, one matrix row per example
pub trait FeatureSet {
    /// Storage class of the features
    fn feature_type(&self) -> FeatureType;

    /// Number of examples (matrix rows)
    fn num_examples(&self) -> usize;

    /// Number of features per example (matrix columns)
    fn num_features(&self) -> usize;

    /// Label of example `i`, +1 or -1
    ///
    /// # Panics
    /// Panics if `i >= num_examples()`
    fn label(&self, i: usize) -> i32;

    /// All labels in example order
    fn labels(&self) -> Vec<i32> {
        (0..self.num_examples()).map(|i| self.label(i)).collect()
    }

    /// Backing feature matrix
    fn matrix(&self) -> &Matrix<f64>;

    /// Whether a preprocessor has already been applied to the matrix
    fn is_preprocessed(&self) -> bool;

    /// Transform the matrix in place through `preproc`
    ///
    /// Applying to an already preprocessed set is a no-op, so the training
    /// matrix is never transformed twice across `train` and `test`.
    fn apply_preprocessor(&mut self, preproc: &dyn Preprocessor) -> Result<()>;

    /// Check if the feature set is empty
    fn is_empty(&self) -> bool {
        self.num_examples() == 0
    }
}

/// In-place feature transform fitted on training data
pub trait Preprocessor {
    /// Human-readable name used in diagnostics
    fn name(&self) -> &str;

    /// Feature type this preprocessor accepts
    fn feature_type(&self) -> FeatureType;

    /// Fit the transform against `features`
    fn init(&mut self, features: &dyn FeatureSet) -> Result<()>;

    /// Whether `init` has completed
    fn is_initialized(&self) -> bool;

    /// Transform `matrix` in place; fails if not initialized
    fn apply(&self, matrix: &mut Matrix<f64>) -> Result<()>;
}

/// SVM solver behind a session
///
/// Concrete solvers are selected by name through
/// [`BackendRegistry`](crate::backend::BackendRegistry).
pub trait Backend {
    /// Solver name used in diagnostics
    fn name(&self) -> &str;

    /// Set the regularization parameter C
    fn set_regularization(&mut self, c: f64);

    /// Install the kernel used by `fit` and `predict`
    fn set_kernel(&mut self, kernel: Arc<dyn Kernel>);

    /// Fit against labelled training features
    fn fit(&mut self, features: &dyn FeatureSet) -> Result<()>;

    /// Whether `fit` has completed successfully
    fn is_fitted(&self) -> bool;

    /// One decision value per test example
    ///
    /// `train` must be the feature set the backend was fitted on.
    fn predict(&self, train: &dyn FeatureSet, test: &dyn FeatureSet) -> Result<Vec<f64>>;
}
