//! Per-run evaluation report

use crate::core::{sign, Result};
use crate::evaluation::{format_g, RocCurve};
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// Marker appended to result lines whose score sign disagrees with the label
pub const MISCLASSIFIED_MARKER: &str = "(*)";

/// Scores, labels and break-even aggregates of one test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scores: Vec<f64>,
    pub labels: Vec<i32>,
    /// `sign(score) != label`, per example
    pub misclassified: Vec<bool>,
    pub roc: RocCurve,
    /// `possize * tp + (1 - fp) * negsize` at the break-even index
    pub correct: f64,
    /// `fp * negsize` at the break-even index
    pub false_positives: f64,
    /// `(1 - tp) * possize` at the break-even index
    pub false_negatives: f64,
}

impl EvaluationReport {
    /// Tag sign disagreements, sweep the ROC and derive the aggregates
    pub fn new(scores: Vec<f64>, labels: Vec<i32>) -> Result<Self> {
        let roc = RocCurve::compute(&scores, &labels)?;

        let misclassified = scores
            .iter()
            .zip(labels.iter())
            .map(|(&s, &l)| sign(s) != l)
            .collect();

        let (fp, tp) = roc.break_even_rates();
        let possize = roc.possize as f64;
        let negsize = roc.negsize as f64;

        Ok(Self {
            scores,
            labels,
            misclassified,
            correct: possize * tp + (1.0 - fp) * negsize,
            false_positives: fp * negsize,
            false_negatives: (1.0 - tp) * possize,
            roc,
        })
    }

    /// Number of test examples
    pub fn total(&self) -> usize {
        self.scores.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct.round() as usize
    }

    pub fn false_positive_count(&self) -> usize {
        self.false_positives.round() as usize
    }

    pub fn false_negative_count(&self) -> usize {
        self.false_negatives.round() as usize
    }

    pub fn wrong_count(&self) -> usize {
        self.false_positive_count() + self.false_negative_count()
    }

    /// Fraction correct at the break-even point
    pub fn accuracy(&self) -> f64 {
        self.correct / self.total() as f64
    }

    /// Examples whose score sign disagrees with their label
    pub fn sign_errors(&self) -> usize {
        self.misclassified.iter().filter(|&&m| m).count()
    }

    /// 2x2 table `[[TP, FN], [FP, TN]]` at the break-even point
    pub fn confusion_matrix(&self) -> Result<Matrix<usize>> {
        let tp = self.roc.possize - self.false_negative_count();
        let tn = self.roc.negsize - self.false_positive_count();
        Matrix::from_vec(
            2,
            2,
            vec![
                tp,
                self.false_negative_count(),
                self.false_positive_count(),
                tn,
            ],
        )
    }

    /// One `%+.8g (%+d)` line per example, marked when misclassified
    pub fn write_results<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for ((score, label), &wrong) in self
            .scores
            .iter()
            .zip(&self.labels)
            .zip(&self.misclassified)
        {
            let marker = if wrong { MISCLASSIFIED_MARKER } else { "" };
            writeln!(writer, "{} ({:+}){}", format_g(*score, 8, true), label, marker)?;
        }
        Ok(())
    }

    /// ROC rows, see [`RocCurve::write`]
    pub fn write_roc<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        self.roc.write(writer)
    }

    /// Aggregate summary block
    pub fn write_summary<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fp, tp) = self.roc.break_even_rates();
        let accuracy = self.accuracy();
        writeln!(f, "classified:")?;
        writeln!(f, "\tcorrect:{}", self.correct_count())?;
        writeln!(
            f,
            "\twrong:{} (fp:{},fn:{})",
            self.wrong_count(),
            self.false_positive_count(),
            self.false_negative_count()
        )?;
        writeln!(
            f,
            "of {} samples (c:{:.6},w:{:.6},fp:{:.6},tp:{:.6})",
            self.total(),
            accuracy,
            1.0 - accuracy,
            fp,
            tp
        )
    }
}
