//! Built-in SVMLight-style backend
//!
//! Fits with the SMO solver and keeps only the support-vector indices
//! and their alpha*y weights; prediction reads the support rows back out
//! of the training feature set it was fitted on.

use crate::core::{Backend, FeatureSet, OptimizerConfig, Result, SVMError};
use crate::kernel::{Kernel, LinearKernel};
use crate::solver::SMOSolver;
use log::{debug, info};
use std::sync::Arc;

/// Fitted decision function
#[derive(Debug, Clone)]
struct FittedModel {
    /// Training-row indices of the support vectors
    support: Vec<usize>,
    /// alpha_i * y_i, parallel to `support`
    alpha_y: Vec<f64>,
    bias: f64,
    num_examples: usize,
    num_features: usize,
}

/// SMO-backed solver registered under `LIGHT`
pub struct LightBackend {
    config: OptimizerConfig,
    kernel: Arc<dyn Kernel>,
    model: Option<FittedModel>,
}

impl LightBackend {
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            config,
            kernel: Arc::new(LinearKernel::new()),
            model: None,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Number of support vectors of the fitted model
    pub fn num_support_vectors(&self) -> Option<usize> {
        self.model.as_ref().map(|m| m.support.len())
    }

    pub fn bias(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.bias)
    }
}

impl Default for LightBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for LightBackend {
    fn name(&self) -> &str {
        "SVMLight"
    }

    fn set_regularization(&mut self, c: f64) {
        self.config.c = c;
    }

    fn set_kernel(&mut self, kernel: Arc<dyn Kernel>) {
        self.kernel = kernel;
        self.model = None;
    }

    fn fit(&mut self, features: &dyn FeatureSet) -> Result<()> {
        self.model = None;

        let labels: Vec<f64> = features.labels().into_iter().map(f64::from).collect();
        info!(
            "fitting {} examples x {} features, kernel {}, C={}",
            features.num_examples(),
            features.num_features(),
            self.kernel.name(),
            self.config.c
        );

        let solver = SMOSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(features.matrix(), &labels)?;

        if result.support_vectors.is_empty() {
            return Err(SVMError::OptimizationError(
                "solver produced no support vectors".to_string(),
            ));
        }

        let alpha_y = result
            .support_vectors
            .iter()
            .map(|&i| result.alpha[i] * labels[i])
            .collect();
        debug!(
            "fitted {} support vectors, b={:.6}",
            result.support_vectors.len(),
            result.b
        );

        self.model = Some(FittedModel {
            support: result.support_vectors,
            alpha_y,
            bias: result.b,
            num_examples: features.num_examples(),
            num_features: features.num_features(),
        });
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn predict(&self, train: &dyn FeatureSet, test: &dyn FeatureSet) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(SVMError::ModelNotTrained)?;

        if train.num_examples() != model.num_examples {
            return Err(SVMError::DimensionMismatch {
                expected: model.num_examples,
                actual: train.num_examples(),
            });
        }
        if test.num_features() != model.num_features {
            return Err(SVMError::DimensionMismatch {
                expected: model.num_features,
                actual: test.num_features(),
            });
        }

        let train_matrix = train.matrix();
        let support_rows = model
            .support
            .iter()
            .map(|&i| train_matrix.row(i))
            .collect::<Result<Vec<&[f64]>>>()?;

        let scores = test
            .matrix()
            .row_iter()
            .map(|x| {
                support_rows
                    .iter()
                    .zip(&model.alpha_y)
                    .map(|(sv, &ay)| ay * self.kernel.compute(sv, x))
                    .sum::<f64>()
                    + model.bias
            })
            .collect();

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::DenseFeatures;
    use crate::kernel::RBFKernel;

    fn separable() -> DenseFeatures {
        DenseFeatures::from_rows(
            &[
                vec![2.0, 1.0],
                vec![1.8, 1.1],
                vec![2.2, 0.9],
                vec![-2.0, -1.0],
                vec![-1.8, -1.1],
                vec![-2.2, -0.9],
            ],
            vec![1, 1, 1, -1, -1, -1],
        )
        .unwrap()
    }

    #[test]
    fn test_fit_and_predict_linear() {
        let train = separable();
        let test = DenseFeatures::from_rows(
            &[vec![1.5, 0.7], vec![-1.5, -0.7]],
            vec![1, -1],
        )
        .unwrap();

        let mut backend = LightBackend::new();
        assert!(!backend.is_fitted());
        backend.fit(&train).unwrap();
        assert!(backend.is_fitted());
        assert!(backend.num_support_vectors().unwrap() > 0);

        let scores = backend.predict(&train, &test).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > 0.0);
        assert!(scores[1] < 0.0);
    }

    #[test]
    fn test_fit_rbf() {
        let train = separable();
        let mut backend = LightBackend::new();
        backend.set_kernel(Arc::new(RBFKernel::new(0.5)));
        backend.set_regularization(10.0);
        assert_eq!(backend.config().c, 10.0);

        backend.fit(&train).unwrap();
        let scores = backend.predict(&train, &train).unwrap();
        for (score, label) in scores.iter().zip(train.labels()) {
            assert!(score * f64::from(label) > 0.0);
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let train = separable();
        let backend = LightBackend::new();
        assert!(matches!(
            backend.predict(&train, &train),
            Err(SVMError::ModelNotTrained)
        ));
    }

    #[test]
    fn test_kernel_change_discards_model() {
        let train = separable();
        let mut backend = LightBackend::new();
        backend.fit(&train).unwrap();
        backend.set_kernel(Arc::new(LinearKernel::new()));
        assert!(!backend.is_fitted());
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let train = separable();
        let wide = DenseFeatures::from_rows(&[vec![1.0, 2.0, 3.0]], vec![1]).unwrap();
        let mut backend = LightBackend::new();
        backend.fit(&train).unwrap();
        assert!(matches!(
            backend.predict(&train, &wide),
            Err(SVMError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_single_class_fit_fails() {
        let train =
            DenseFeatures::from_rows(&[vec![1.0], vec![2.0]], vec![1, 1]).unwrap();
        let mut backend = LightBackend::new();
        assert!(backend.fit(&train).is_err());
        assert!(!backend.is_fitted());
    }
}
