//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! Solves the SVM dual by repeatedly optimizing pairs of Lagrange
//! multipliers. The second multiplier of each pair is chosen by the
//! maximal |E_i - E_j| heuristic.

use crate::cache::KernelCache;
use crate::core::{OptimizerConfig, Result, SVMError};
use crate::kernel::Kernel;
use crate::matrix::Matrix;
use log::debug;
use std::sync::Arc;

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Vec<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (where alpha > epsilon)
    pub support_vectors: Vec<usize>,
    /// Number of passes performed
    pub iterations: usize,
    /// Final dual objective value
    pub objective_value: f64,
}

/// SMO solver for SVM optimization
pub struct SMOSolver {
    kernel: Arc<dyn Kernel>,
    config: OptimizerConfig,
}

/// Training rows, labels and the kernel cache for one solve
struct Problem<'a> {
    x: &'a Matrix<f64>,
    y: &'a [f64],
    kernel: &'a dyn Kernel,
    cache: KernelCache,
}

impl Problem<'_> {
    fn k(&mut self, i: usize, j: usize) -> f64 {
        let (x, kernel) = (self.x, self.kernel);
        self.cache.get_or_compute(i, j, || {
            let xi = &x.as_slice()[i * x.cols()..(i + 1) * x.cols()];
            let xj = &x.as_slice()[j * x.cols()..(j + 1) * x.cols()];
            kernel.compute(xi, xj)
        })
    }

    fn len(&self) -> usize {
        self.y.len()
    }
}

impl SMOSolver {
    pub fn new(kernel: Arc<dyn Kernel>, config: OptimizerConfig) -> Self {
        Self { kernel, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Solve the dual problem for rows of `x` labelled by `y` (+1/-1)
    pub fn solve(&self, x: &Matrix<f64>, y: &[f64]) -> Result<OptimizationResult> {
        if y.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        if x.rows() != y.len() {
            return Err(SVMError::DimensionMismatch {
                expected: x.rows(),
                actual: y.len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&l| l != 1.0 && l != -1.0) {
            return Err(SVMError::InvalidLabel(bad));
        }
        if y.iter().all(|&l| l == y[0]) {
            return Err(SVMError::InvalidArgument(
                "training set needs examples of both classes".to_string(),
            ));
        }
        if !(self.config.c > 0.0) {
            return Err(SVMError::InvalidArgument(format!(
                "C must be positive, got {}",
                self.config.c
            )));
        }

        let mut problem = Problem {
            x,
            y,
            kernel: self.kernel.as_ref(),
            cache: KernelCache::for_examples(self.config.cache_size, y.len()),
        };
        let n = problem.len();

        let mut alpha = vec![0.0; n];
        // E_i = f(x_i) - y_i with f = 0 while all alphas are 0
        let mut error_cache: Vec<f64> = y.iter().map(|&l| -l).collect();

        let mut iterations = 0;
        let mut num_changed = 0;
        let mut examine_all = true;

        while (num_changed > 0 || examine_all) && iterations < self.config.max_iterations {
            num_changed = 0;

            for i in 0..n {
                let non_bound = alpha[i] > 0.0 && alpha[i] < self.config.c;
                if (examine_all || non_bound)
                    && self.examine_example(i, &mut problem, &mut alpha, &mut error_cache)
                {
                    num_changed += 1;
                }
            }

            if examine_all {
                examine_all = false;
            } else if num_changed == 0 {
                examine_all = true;
            }

            iterations += 1;
        }

        let b = self.calculate_bias(&alpha, &error_cache);
        let support_vectors: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter(|(_, &a)| a > self.config.epsilon)
            .map(|(i, _)| i)
            .collect();
        let objective_value = Self::calculate_objective(&alpha, &mut problem);

        let stats = problem.cache.stats();
        debug!(
            "SMO finished after {} passes: {} support vectors, objective {:.6}, cache hit rate {:.2}",
            iterations,
            support_vectors.len(),
            objective_value,
            stats.hit_rate()
        );

        Ok(OptimizationResult {
            alpha,
            b,
            support_vectors,
            iterations,
            objective_value,
        })
    }

    /// Try to make progress on example `i`; true if a pair was updated
    fn examine_example(
        &self,
        i: usize,
        problem: &mut Problem<'_>,
        alpha: &mut [f64],
        error_cache: &mut [f64],
    ) -> bool {
        let r_i = error_cache[i] * problem.y[i];
        let c = self.config.c;
        let eps = self.config.epsilon;

        // KKT violation: alpha_i can still grow or shrink
        if (r_i < -eps && alpha[i] < c) || (r_i > eps && alpha[i] > 0.0) {
            if let Some(j) = Self::select_second_variable(i, error_cache) {
                return self.take_step(i, j, problem, alpha, error_cache);
            }
        }
        false
    }

    /// Maximum |E_i - E_j| over j != i
    fn select_second_variable(i: usize, error_cache: &[f64]) -> Option<usize> {
        let e_i = error_cache[i];
        let mut best_j = None;
        let mut max_diff = 0.0;

        for (j, &e_j) in error_cache.iter().enumerate() {
            if j == i {
                continue;
            }
            let diff = (e_i - e_j).abs();
            if diff > max_diff {
                max_diff = diff;
                best_j = Some(j);
            }
        }

        best_j
    }

    /// Jointly optimize alpha_i and alpha_j
    fn take_step(
        &self,
        i: usize,
        j: usize,
        problem: &mut Problem<'_>,
        alpha: &mut [f64],
        error_cache: &mut [f64],
    ) -> bool {
        let c = self.config.c;
        let eps = self.config.epsilon;
        let (y_i, y_j) = (problem.y[i], problem.y[j]);
        let (alpha_i_old, alpha_j_old) = (alpha[i], alpha[j]);
        let (e_i, e_j) = (error_cache[i], error_cache[j]);

        let (low, high) = if y_i != y_j {
            let diff = alpha_j_old - alpha_i_old;
            (0.0_f64.max(diff), c.min(c + diff))
        } else {
            let sum = alpha_i_old + alpha_j_old;
            (0.0_f64.max(sum - c), c.min(sum))
        };
        if low >= high {
            return false;
        }

        let eta = problem.k(i, i) + problem.k(j, j) - 2.0 * problem.k(i, j);
        if eta <= 0.0 {
            // not positive definite along this direction
            return false;
        }

        let alpha_j_new = (alpha_j_old + y_j * (e_i - e_j) / eta).clamp(low, high);
        if (alpha_j_new - alpha_j_old).abs() < eps * (alpha_j_new + alpha_j_old + eps) {
            return false;
        }
        let alpha_i_new = alpha_i_old + y_i * y_j * (alpha_j_old - alpha_j_new);

        alpha[i] = alpha_i_new;
        alpha[j] = alpha_j_new;

        let delta_i = y_i * (alpha_i_new - alpha_i_old);
        let delta_j = y_j * (alpha_j_new - alpha_j_old);
        for (k, e_k) in error_cache.iter_mut().enumerate() {
            *e_k += delta_i * problem.k(i, k) + delta_j * problem.k(j, k);
        }

        true
    }

    /// Bias from margin support vectors, falling back to all support vectors
    fn calculate_bias(&self, alpha: &[f64], error_cache: &[f64]) -> f64 {
        let eps = self.config.epsilon;
        let c = self.config.c;

        mean_negated_error(alpha, error_cache, |a| a > eps && a < c - eps)
            .or_else(|| mean_negated_error(alpha, error_cache, |a| a > eps))
            .unwrap_or(0.0)
    }

    fn calculate_objective(alpha: &[f64], problem: &mut Problem<'_>) -> f64 {
        let mut obj: f64 = alpha.iter().sum();
        let active: Vec<usize> = (0..alpha.len()).filter(|&i| alpha[i] > 0.0).collect();

        for &i in &active {
            for &j in &active {
                let k_ij = problem.k(i, j);
                obj -= 0.5 * alpha[i] * alpha[j] * problem.y[i] * problem.y[j] * k_ij;
            }
        }
        obj
    }
}

/// -mean(E_i) over examples whose alpha satisfies `select`
fn mean_negated_error<F>(alpha: &[f64], error_cache: &[f64], select: F) -> Option<f64>
where
    F: Fn(f64) -> bool,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for (&a, &e) in alpha.iter().zip(error_cache.iter()) {
        if select(a) {
            sum += e;
            count += 1;
        }
    }
    (count > 0).then(|| -sum / count as f64)
}
