//! Evaluation report persistence
//!
//! Saves the outcome of a `test` run as pretty-printed JSON together with
//! the settings that produced it, so runs can be compared later.

use crate::core::{Result, SVMError};
use crate::evaluation::EvaluationReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable evaluation run
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    /// Scores, labels and the full ROC sweep
    pub report: EvaluationReport,
}

/// Where a report came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Library version used to create the report
    pub library_version: String,
    /// Backend token, e.g. `LIGHT`
    pub backend: String,
    pub kernel: String,
    pub preprocessor: Option<String>,
    /// C, if one was set explicitly
    pub regularization: Option<f64>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Break-even aggregates, duplicated for readers that skip the sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub accuracy: f64,
    pub auc: f64,
}

impl ReportMetadata {
    /// Metadata stamped with the current time
    pub fn new(backend: impl Into<String>, kernel: impl Into<String>) -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            backend: backend.into(),
            kernel: kernel.into(),
            preprocessor: None,
            regularization: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<&EvaluationReport> for ReportSummary {
    fn from(report: &EvaluationReport) -> Self {
        Self {
            total: report.total(),
            correct: report.correct_count(),
            wrong: report.wrong_count(),
            false_positives: report.false_positive_count(),
            false_negatives: report.false_negative_count(),
            accuracy: report.accuracy(),
            auc: report.roc.auc(),
        }
    }
}

impl SavedReport {
    pub fn new(metadata: ReportMetadata, report: EvaluationReport) -> Self {
        Self {
            metadata,
            summary: ReportSummary::from(&report),
            report,
        }
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load report from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        let report = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(report)
    }

    pub fn print_summary(&self) {
        println!("=== SVM Evaluation Report ===");
        println!("Backend: {}", self.metadata.backend);
        println!("Kernel: {}", self.metadata.kernel);
        if let Some(preproc) = &self.metadata.preprocessor {
            println!("Preprocessor: {preproc}");
        }
        if let Some(c) = self.metadata.regularization {
            println!("C: {c}");
        }
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Samples: {}", self.summary.total);
        println!("  Correct: {}", self.summary.correct);
        println!(
            "  Wrong:   {} (fp:{}, fn:{})",
            self.summary.wrong, self.summary.false_positives, self.summary.false_negatives
        );
        println!("  Accuracy: {:.2}%", self.summary.accuracy * 100.0);
        println!("  AUC:      {:.4}", self.summary.auc);
    }
}
