//! SVM training sessions with ROC / break-even evaluation
//!
//! A session selects a solver backend by name, trains it on a labelled
//! feature set (optionally through a preprocessor) and scores a test set,
//! reporting per-example results and the break-even point of the ROC
//! sweep. Also provides the dense [`Matrix`] container the feature sets
//! are stored in.

pub mod backend;
pub mod cache;
pub mod config;
pub mod core;
pub mod evaluation;
pub mod features;
pub mod kernel;
pub mod matrix;
pub mod persistence;
pub mod preproc;
pub mod session;
pub mod solver;

// Re-export main types for convenience
pub use crate::backend::{BackendKind, BackendRegistry, LightBackend};
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::config::SessionConfig;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::evaluation::{EvaluationReport, RocCurve};
pub use crate::features::{load_libsvm, DenseFeatures};
pub use crate::kernel::{Kernel, KernelSpec, LinearKernel, PolynomialKernel, RBFKernel};
pub use crate::matrix::Matrix;
pub use crate::persistence::{ReportMetadata, SavedReport};
pub use crate::preproc::{FeatureScaler, ScalingMethod};
pub use crate::session::{Environment, SessionState, SvmSession};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
