//! Per-column feature scaling

use crate::core::{FeatureSet, FeatureType, Preprocessor, Result, SVMError};
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feature scaling methods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMethod {
    /// Min-Max scaling to [min_val, max_val] range
    MinMax { min_val: f64, max_val: f64 },
    /// Standard (Z-score) normalization: (x - mean) / std
    #[serde(rename = "standard")]
    StandardScore,
    /// Unit scaling: x / max(|x|)
    #[serde(rename = "unit")]
    UnitScale,
}

impl Default for ScalingMethod {
    fn default() -> Self {
        Self::MinMax {
            min_val: -1.0,
            max_val: 1.0,
        }
    }
}

impl FromStr for ScalingMethod {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minmax" => Ok(Self::default()),
            "standard" => Ok(Self::StandardScore),
            "unit" => Ok(Self::UnitScale),
            _ => Err(SVMError::ParseError(format!(
                "Unknown scaling method: {s}. Use 'minmax', 'standard' or 'unit'"
            ))),
        }
    }
}

impl fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingMethod::MinMax { .. } => write!(f, "minmax"),
            ScalingMethod::StandardScore => write!(f, "standard"),
            ScalingMethod::UnitScale => write!(f, "unit"),
        }
    }
}

/// Statistics for a single feature column
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl FeatureStats {
    fn from_column<'a>(values: impl Iterator<Item = &'a f64> + Clone) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values.clone() {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / count as f64;

        let variance = if count > 1 {
            values.map(|&x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        } else {
            0.0
        };

        Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
        }
    }
}

/// Column scaler fitted on training features
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    method: ScalingMethod,
    name: String,
    stats: Option<Vec<FeatureStats>>,
}

impl FeatureScaler {
    pub fn new(method: ScalingMethod) -> Self {
        Self {
            method,
            name: format!("scaler:{method}"),
            stats: None,
        }
    }

    pub fn method(&self) -> ScalingMethod {
        self.method
    }

    /// Fitted per-column statistics, if initialized
    pub fn stats(&self) -> Option<&[FeatureStats]> {
        self.stats.as_deref()
    }

    fn scale_value(&self, value: f64, stats: &FeatureStats) -> f64 {
        match self.method {
            ScalingMethod::MinMax { min_val, max_val } => {
                if (stats.max - stats.min).abs() < 1e-12 {
                    // Constant feature
                    (min_val + max_val) / 2.0
                } else {
                    let normalized = (value - stats.min) / (stats.max - stats.min);
                    min_val + normalized * (max_val - min_val)
                }
            }
            ScalingMethod::StandardScore => {
                if stats.std < 1e-12 {
                    0.0
                } else {
                    (value - stats.mean) / stats.std
                }
            }
            ScalingMethod::UnitScale => {
                let max_abs = stats.max.abs().max(stats.min.abs());
                if max_abs < 1e-12 {
                    0.0
                } else {
                    value / max_abs
                }
            }
        }
    }
}

impl Preprocessor for FeatureScaler {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_type(&self) -> FeatureType {
        FeatureType::DenseReal
    }

    fn init(&mut self, features: &dyn FeatureSet) -> Result<()> {
        let matrix = features.matrix();
        if matrix.rows() == 0 {
            return Err(SVMError::EmptyDataset);
        }

        let cols = matrix.cols();
        let data = matrix.as_slice();
        let stats = (0..cols)
            .map(|c| FeatureStats::from_column(data.iter().skip(c).step_by(cols)))
            .collect();

        self.stats = Some(stats);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.stats.is_some()
    }

    fn apply(&self, matrix: &mut Matrix<f64>) -> Result<()> {
        let stats = self.stats.as_ref().ok_or_else(|| {
            SVMError::Unavailable(format!("preprocessor {} has not been initialized", self.name))
        })?;
        if matrix.cols() != stats.len() {
            return Err(SVMError::DimensionMismatch {
                expected: stats.len(),
                actual: matrix.cols(),
            });
        }

        for row in matrix.row_iter_mut() {
            for (value, column_stats) in row.iter_mut().zip(stats.iter()) {
                *value = self.scale_value(*value, column_stats);
            }
        }
        Ok(())
    }
}
