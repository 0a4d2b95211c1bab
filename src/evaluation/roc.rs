//! ROC sweep and break-even point selection
//!
//! Examples are ranked by descending score; the prefix of length k+1
//! classifies the top k+1 examples as positive. Entry k of the `fp`/`tp`
//! arrays holds the false- and true-positive rates of that prefix.

use crate::core::{Result, SVMError};
use crate::evaluation::format_g;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Rates along the ROC sweep plus the chosen break-even index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    /// False-positive rate after each prefix
    pub fp: Vec<f64>,
    /// True-positive rate after each prefix
    pub tp: Vec<f64>,
    /// Score of the last example in each prefix
    pub thresholds: Vec<f64>,
    /// Prefix index where `tp` and `1 - fp` are closest
    pub break_even: usize,
    /// Number of +1 labels
    pub possize: usize,
    /// Number of -1 labels
    pub negsize: usize,
}

impl RocCurve {
    /// Sweep `scores` against +1/-1 `labels`
    ///
    /// Ties keep their input order. The break-even index is the first one
    /// minimising `|tp - (1 - fp)|`. Fails with `InvalidArgument` on empty
    /// input, mismatched lengths, non-binary labels or a single-class label
    /// set.
    pub fn compute(scores: &[f64], labels: &[i32]) -> Result<Self> {
        if scores.len() != labels.len() {
            return Err(SVMError::InvalidArgument(format!(
                "{} scores for {} labels",
                scores.len(),
                labels.len()
            )));
        }
        if scores.is_empty() {
            return Err(SVMError::InvalidArgument(
                "ROC sweep needs at least one example".to_string(),
            ));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l != 1 && l != -1) {
            return Err(SVMError::InvalidArgument(format!(
                "ROC labels must be +1 or -1, got {bad}"
            )));
        }

        let possize = labels.iter().filter(|&&l| l == 1).count();
        let negsize = labels.len() - possize;
        if possize == 0 || negsize == 0 {
            return Err(SVMError::InvalidArgument(format!(
                "ROC sweep needs both classes (positives: {possize}, negatives: {negsize})"
            )));
        }

        // sort_by is stable, so equal scores keep their original order
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let n = order.len();
        let mut fp = Vec::with_capacity(n);
        let mut tp = Vec::with_capacity(n);
        let mut thresholds = Vec::with_capacity(n);
        let (mut true_pos, mut false_pos) = (0usize, 0usize);

        for &idx in &order {
            if labels[idx] == 1 {
                true_pos += 1;
            } else {
                false_pos += 1;
            }
            tp.push(true_pos as f64 / possize as f64);
            fp.push(false_pos as f64 / negsize as f64);
            thresholds.push(scores[idx]);
        }

        let mut break_even = 0;
        let mut best = f64::INFINITY;
        for (k, (&t, &f)) in tp.iter().zip(fp.iter()).enumerate() {
            let diff = (t - (1.0 - f)).abs();
            if diff < best {
                best = diff;
                break_even = k;
            }
        }

        Ok(Self {
            fp,
            tp,
            thresholds,
            break_even,
            possize,
            negsize,
        })
    }

    /// Number of sweep steps (= number of examples)
    pub fn len(&self) -> usize {
        self.tp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tp.is_empty()
    }

    /// (fp rate, tp rate) at the break-even index
    pub fn break_even_rates(&self) -> (f64, f64) {
        (self.fp[self.break_even], self.tp[self.break_even])
    }

    /// Area under the curve by the trapezoidal rule, starting at (0, 0)
    pub fn auc(&self) -> f64 {
        let mut area = 0.0;
        let (mut prev_fp, mut prev_tp) = (0.0, 0.0);
        for (&f, &t) in self.fp.iter().zip(self.tp.iter()) {
            area += (f - prev_fp) * (t + prev_tp) / 2.0;
            prev_fp = f;
            prev_tp = t;
        }
        area
    }

    /// One `fp<TAB>tp<TAB>threshold` row per sweep step
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for ((f, t), threshold) in self.fp.iter().zip(&self.tp).zip(&self.thresholds) {
            writeln!(writer, "{:.6}\t{:.6}\t{}", f, t, format_g(*threshold, 8, true))?;
        }
        Ok(())
    }
}
