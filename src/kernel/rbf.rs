//! Gaussian RBF kernel over dense rows

use crate::kernel::traits::squared_distance;
use crate::kernel::Kernel;

/// K(x, y) = exp(-gamma * ||x - y||^2); selected as `rbf:<gamma>`
#[derive(Debug, Clone, Copy)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// gamma = 1 / n_features, the usual default for unscaled data
    pub fn with_auto_gamma(n_features: usize) -> Self {
        assert!(n_features > 0, "Number of features must be positive");
        Self::new(1.0 / n_features as f64)
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RBFKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (-self.gamma * squared_distance(x, y)).exp()
    }

    fn name(&self) -> String {
        format!("rbf:{}", self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rbf_identical_vectors() {
        let kernel = RBFKernel::new(0.5);
        let x = [1.0, 2.0, 3.0];
        assert_relative_eq!(kernel.compute(&x, &x), 1.0);
    }

    #[test]
    fn test_rbf_known_value() {
        let kernel = RBFKernel::new(0.5);
        let x = [1.0, 0.0];
        let y = [0.0, 1.0];

        // ||x - y||² = 2, exp(-0.5 * 2) = exp(-1)
        assert_relative_eq!(kernel.compute(&x, &y), (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_symmetry_and_range() {
        let kernel = RBFKernel::with_auto_gamma(2);
        let x = [3.0, -1.0];
        let y = [0.5, 2.0];

        let k_xy = kernel.compute(&x, &y);
        assert_eq!(k_xy, kernel.compute(&y, &x));
        assert!(k_xy > 0.0 && k_xy < 1.0);
        assert_eq!(kernel.gamma(), 0.5);
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_rbf_invalid_gamma() {
        RBFKernel::new(0.0);
    }
}
