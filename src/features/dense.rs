//! Dense real-valued feature sets

use crate::core::{FeatureSet, FeatureType, Preprocessor, Result, SVMError};
use crate::matrix::Matrix;
use log::debug;

/// Labelled dense feature matrix, one row per example
#[derive(Debug, Clone)]
pub struct DenseFeatures {
    matrix: Matrix<f64>,
    labels: Vec<i32>,
    preprocessed: bool,
}

impl DenseFeatures {
    /// Pair a feature matrix with one +1/-1 label per row
    pub fn new(matrix: Matrix<f64>, labels: Vec<i32>) -> Result<Self> {
        if labels.len() != matrix.rows() {
            return Err(SVMError::DimensionMismatch {
                expected: matrix.rows(),
                actual: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&l| l != 1 && l != -1) {
            return Err(SVMError::InvalidLabel(f64::from(bad)));
        }

        Ok(Self {
            matrix,
            labels,
            preprocessed: false,
        })
    }

    /// Build from equally sized rows
    pub fn from_rows(rows: &[Vec<f64>], labels: Vec<i32>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(SVMError::DimensionMismatch {
                expected: cols,
                actual: bad.len(),
            });
        }

        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        let matrix = Matrix::from_vec(rows.len(), cols, data)?;
        Self::new(matrix, labels)
    }

    /// Count of (+1, -1) labels
    pub fn label_balance(&self) -> (usize, usize) {
        let positives = self.labels.iter().filter(|&&l| l > 0).count();
        (positives, self.labels.len() - positives)
    }
}

impl FeatureSet for DenseFeatures {
    fn feature_type(&self) -> FeatureType {
        FeatureType::DenseReal
    }

    fn num_examples(&self) -> usize {
        self.matrix.rows()
    }

    fn num_features(&self) -> usize {
        self.matrix.cols()
    }

    fn label(&self, i: usize) -> i32 {
        self.labels[i]
    }

    fn labels(&self) -> Vec<i32> {
        self.labels.clone()
    }

    fn matrix(&self) -> &Matrix<f64> {
        &self.matrix
    }

    fn is_preprocessed(&self) -> bool {
        self.preprocessed
    }

    fn apply_preprocessor(&mut self, preproc: &dyn Preprocessor) -> Result<()> {
        if self.preprocessed {
            debug!("features already preprocessed, skipping {}", preproc.name());
            return Ok(());
        }
        preproc.apply(&mut self.matrix)?;
        self.preprocessed = true;
        Ok(())
    }
}
