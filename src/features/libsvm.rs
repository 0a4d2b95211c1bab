//! LibSVM text format loader
//!
//! Each line reads `label index:value index:value ...` with 1-based
//! indices. Rows are densified into a [`DenseFeatures`] matrix.
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1

use crate::core::{Result, SVMError, SparseVector};
use crate::features::DenseFeatures;
use crate::matrix::Matrix;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a LibSVM file
///
/// With `num_features` set, the matrix gets exactly that many columns and
/// features past it are dropped; this keeps a test set aligned with the
/// training set it is evaluated against.
pub fn load_libsvm<P: AsRef<Path>>(path: P, num_features: Option<usize>) -> Result<DenseFeatures> {
    let path = path.as_ref();
    debug!("loading LibSVM features from {path:?}");
    let file = File::open(path).map_err(SVMError::IoError)?;
    parse_libsvm(BufReader::new(file), num_features)
}

/// Parse LibSVM text from any reader
pub fn parse_libsvm<R: BufRead>(reader: R, num_features: Option<usize>) -> Result<DenseFeatures> {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    let mut max_dimension = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(SVMError::IoError)?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (label, features) = parse_line(line).map_err(|e| {
            SVMError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
        })?;
        max_dimension = max_dimension.max(features.dim());
        labels.push(label);
        rows.push(features);
    }

    if rows.is_empty() {
        return Err(SVMError::EmptyDataset);
    }

    let cols = match num_features {
        Some(cols) => {
            if max_dimension > cols {
                warn!("dropping feature indices beyond {cols} (file uses up to {max_dimension})");
            }
            cols
        }
        None => max_dimension,
    };

    let mut matrix = Matrix::new(rows.len(), cols)?;
    for (dense, sparse) in matrix.row_iter_mut().zip(rows.iter()) {
        sparse.write_dense(dense);
    }

    DenseFeatures::new(matrix, labels)
}

/// Parse one line into its label and sparse features
fn parse_line(line: &str) -> Result<(i32, SparseVector)> {
    let mut parts = line.split_whitespace();

    let label_str = parts
        .next()
        .ok_or_else(|| SVMError::ParseError("Empty line".to_string()))?;
    let label = label_str
        .parse::<f64>()
        .map_err(|_| SVMError::ParseError(format!("Invalid label: {label_str}")))?;
    let label = if label > 0.0 { 1 } else { -1 };

    let mut indices = Vec::new();
    let mut values = Vec::new();

    for feature_str in parts {
        let (index, value) = feature_str
            .split_once(':')
            .ok_or_else(|| SVMError::ParseError(format!("Invalid feature format: {feature_str}")))?;

        let index = index
            .parse::<usize>()
            .map_err(|_| SVMError::ParseError(format!("Invalid feature index: {index}")))?;
        let value = value
            .parse::<f64>()
            .map_err(|_| SVMError::ParseError(format!("Invalid feature value: {value}")))?;

        if index == 0 {
            return Err(SVMError::ParseError(
                "Feature index must be positive: 0".to_string(),
            ));
        }

        indices.push(index - 1);
        values.push(value);
    }

    Ok((label, SparseVector::new(indices, values)))
}
