//! SVM session state machine
//!
//! `Unconfigured -> BackendSelected -> Trained`, where `Trained` is
//! re-entered on every successful retrain. Every operation reports
//! failure through [`SVMError`], whose message is the diagnostic.

use crate::backend::{BackendKind, BackendRegistry};
use crate::core::{Backend, FeatureSet, Preprocessor, Result, SVMError};
use crate::evaluation::EvaluationReport;
use crate::session::Environment;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    BackendSelected,
    Trained,
}

/// Owns the selected backend and drives training and testing
pub struct SvmSession {
    registry: BackendRegistry,
    backend: Option<Box<dyn Backend>>,
    kind: Option<BackendKind>,
    regularization: Option<f64>,
    state: SessionState,
}

impl SvmSession {
    /// Session over the default registry
    pub fn new() -> Self {
        Self::with_registry(BackendRegistry::default())
    }

    pub fn with_registry(registry: BackendRegistry) -> Self {
        Self {
            registry,
            backend: None,
            kind: None,
            regularization: None,
            state: SessionState::Unconfigured,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Kind of the selected backend
    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.kind
    }

    /// Name reported by the selected backend
    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    pub fn regularization(&self) -> Option<f64> {
        self.regularization
    }

    /// Select a backend by its exact token (`LIGHT`, `CPLEX`, `MPI`)
    ///
    /// Unknown or unregistered tokens fail and leave the current backend
    /// in place. On success the previous backend is dropped before the
    /// new one is constructed.
    pub fn select_backend(&mut self, name: &str) -> Result<()> {
        let kind = self.registry.resolve(name)?;

        if let Some(prior) = self.backend.take() {
            debug!("releasing {} object", prior.name());
        }
        self.kind = None;
        self.state = SessionState::Unconfigured;

        let backend = self.registry.build(kind)?;
        info!("created {} object", kind.description());

        self.backend = Some(backend);
        self.kind = Some(kind);
        self.state = SessionState::BackendSelected;
        Ok(())
    }

    /// Store the regularization constant C
    pub fn set_regularization(&mut self, c: f64) {
        info!("Set to C={c:.6}");
        self.regularization = Some(c);
    }

    /// Parse a C token and store it; a bad token leaves C unchanged
    pub fn parse_regularization(&mut self, token: &str) -> Result<f64> {
        let c: f64 = token
            .trim()
            .parse()
            .map_err(|e| SVMError::ParseError(format!("invalid C value {token:?}: {e}")))?;
        self.set_regularization(c);
        Ok(c)
    }

    /// Fit the selected backend on the environment's training features
    ///
    /// With a preprocessor attached, it is fitted on the training features
    /// and applied to them in place first. Nothing is touched when a
    /// precondition fails.
    pub fn train(&mut self, env: &mut Environment) -> Result<()> {
        let backend = self
            .backend
            .as_deref_mut()
            .ok_or_else(|| SVMError::Unavailable("no svm available".to_string()))?;
        let train = env
            .train_features
            .as_deref_mut()
            .ok_or_else(|| SVMError::Unavailable("no training features available".to_string()))?;

        match env.preprocessor.as_deref_mut() {
            Some(preproc) => {
                check_compatible(preproc, &[&*train])?;
                info!("using preprocessor: {}", preproc.name());

                if train.is_preprocessed() {
                    if !preproc.is_initialized() {
                        return Err(not_fitted_on_training(preproc));
                    }
                    debug!("training features already transformed by {}", preproc.name());
                } else {
                    preproc.init(&*train)?;
                    train.apply_preprocessor(&*preproc)?;
                }
            }
            None => info!("doing without preproc"),
        }

        if let Some(c) = self.regularization {
            backend.set_regularization(c);
        }
        match &env.kernel {
            Some(kernel) => backend.set_kernel(kernel.clone()),
            None => warn!("no kernel set, {} keeps its default", backend.name()),
        }

        // a failed fit leaves no usable model behind
        self.state = SessionState::BackendSelected;
        info!("starting svm training");
        backend.fit(&*train)?;

        self.state = SessionState::Trained;
        Ok(())
    }

    /// Score the test features without writing anything
    ///
    /// Both feature sets are transformed by the preprocessor fitted on the
    /// training features before the backend predicts.
    pub fn evaluate(&mut self, env: &mut Environment) -> Result<EvaluationReport> {
        let backend = self
            .backend
            .as_deref()
            .ok_or_else(|| SVMError::Unavailable("no svm available".to_string()))?;
        let train = env
            .train_features
            .as_deref_mut()
            .ok_or_else(|| SVMError::Unavailable("no training features available".to_string()))?;
        let test = env
            .test_features
            .as_deref_mut()
            .ok_or_else(|| SVMError::Unavailable("no test features available".to_string()))?;
        if self.state != SessionState::Trained {
            return Err(SVMError::ModelNotTrained);
        }

        match env.preprocessor.as_deref_mut() {
            Some(preproc) => {
                check_compatible(preproc, &[&*train, &*test])?;
                info!("using preprocessor: {}", preproc.name());

                if !preproc.is_initialized() {
                    if train.is_preprocessed() {
                        return Err(not_fitted_on_training(preproc));
                    }
                    preproc.init(&*train)?;
                }
                train.apply_preprocessor(&*preproc)?;
                test.apply_preprocessor(&*preproc)?;
            }
            None => info!("doing without preproc"),
        }

        info!("starting svm testing");
        let scores = backend.predict(&*train, &*test)?;
        if scores.len() != test.num_examples() {
            return Err(SVMError::DimensionMismatch {
                expected: test.num_examples(),
                actual: scores.len(),
            });
        }

        let report = EvaluationReport::new(scores, test.labels())?;
        for line in report.to_string().lines() {
            info!("{line}");
        }
        debug!(
            "confusion matrix [[TP, FN], [FP, TN]]:\n{}",
            report.confusion_matrix()?
        );
        Ok(report)
    }

    /// Test and write per-example results to `output` (stdout if `None`)
    /// and the ROC curve to `roc`, then print the summary block to stdout
    ///
    /// Destinations are opened only after the evaluation succeeded, so a
    /// failed precondition leaves no file behind.
    pub fn test(
        &mut self,
        env: &mut Environment,
        output: Option<&Path>,
        roc: Option<&Path>,
    ) -> Result<EvaluationReport> {
        let report = self.evaluate(env)?;

        let mut output_writer: Box<dyn Write> = match output {
            Some(path) => Box::new(BufWriter::new(open_destination(path)?)),
            None => Box::new(io::stdout().lock()),
        };
        // output_writer is dropped (and closed) if this fails
        let mut roc_writer = roc.map(open_destination).transpose()?.map(BufWriter::new);

        // the summary follows the results on stdout, or stands alone there
        let stdout = io::stdout();
        let mut summary = stdout.lock();
        write_report(
            &report,
            &mut output_writer,
            roc_writer.as_mut().map(|w| w as &mut dyn Write),
            Some(&mut summary),
        )?;
        Ok(report)
    }

    /// Like [`test`](Self::test) with caller-owned writers; the summary
    /// block is skipped when `summary` is `None`
    pub fn test_with_writers(
        &mut self,
        env: &mut Environment,
        output: &mut dyn Write,
        roc: Option<&mut dyn Write>,
        summary: Option<&mut dyn Write>,
    ) -> Result<EvaluationReport> {
        let report = self.evaluate(env)?;
        write_report(&report, output, roc, summary)?;
        Ok(report)
    }

    pub fn set_kernel(&mut self, _name: &str) -> Result<()> {
        Err(SVMError::NotImplemented("set_kernel"))
    }

    pub fn get_kernel(&self) -> Result<String> {
        Err(SVMError::NotImplemented("get_kernel"))
    }

    pub fn set_preproc(&mut self, _name: &str) -> Result<()> {
        Err(SVMError::NotImplemented("set_preproc"))
    }

    pub fn get_preproc(&self) -> Result<String> {
        Err(SVMError::NotImplemented("get_preproc"))
    }

    pub fn load_svm(&mut self, _path: &Path) -> Result<()> {
        Err(SVMError::NotImplemented("load_svm"))
    }

    pub fn save_svm(&self, _path: &Path) -> Result<()> {
        Err(SVMError::NotImplemented("save_svm"))
    }
}

impl Default for SvmSession {
    fn default() -> Self {
        Self::new()
    }
}

fn check_compatible(preproc: &dyn Preprocessor, features: &[&dyn FeatureSet]) -> Result<()> {
    for f in features {
        if f.feature_type() != preproc.feature_type() {
            return Err(SVMError::TypeMismatch(format!(
                "preprocessor {} ({}) does not fit to features ({})",
                preproc.name(),
                preproc.feature_type(),
                f.feature_type()
            )));
        }
    }
    Ok(())
}

/// A fresh preprocessor cannot be fitted on features some other one transformed
fn not_fitted_on_training(preproc: &dyn Preprocessor) -> SVMError {
    SVMError::Unavailable(format!(
        "preprocessor {} was not fitted on the training features",
        preproc.name()
    ))
}

fn open_destination(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| {
        SVMError::Unavailable(format!("could not open {} for writing: {e}", path.display()))
    })
}

fn write_report(
    report: &EvaluationReport,
    output: &mut dyn Write,
    roc: Option<&mut dyn Write>,
    summary: Option<&mut dyn Write>,
) -> Result<()> {
    report.write_results(output)?;
    output.flush()?;
    if let Some(roc) = roc {
        report.write_roc(roc)?;
        roc.flush()?;
    }
    if let Some(summary) = summary {
        report.write_summary(summary)?;
        summary.flush()?;
    }
    Ok(())
}
