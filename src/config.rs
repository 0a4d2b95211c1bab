//! Session configuration file
//!
//! A JSON document naming the backend, C, kernel and preprocessor, plus
//! the optimizer settings of the built-in backend. Missing fields take
//! their defaults.
//!
//! ```json
//! {
//!   "backend": "LIGHT",
//!   "c": 10.0,
//!   "kernel": { "type": "rbf", "gamma": 0.5 },
//!   "preprocessor": "standard"
//! }
//! ```

use crate::backend::BackendRegistry;
use crate::core::{OptimizerConfig, Preprocessor, Result, SVMError};
use crate::kernel::KernelSpec;
use crate::preproc::{FeatureScaler, ScalingMethod};
use crate::session::{Environment, SvmSession};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Backend token
    pub backend: String,
    /// Regularization constant; the backend default applies when unset
    pub c: Option<f64>,
    pub kernel: KernelSpec,
    pub preprocessor: Option<ScalingMethod>,
    pub optimizer: OptimizerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: "LIGHT".to_string(),
            c: None,
            kernel: KernelSpec::default(),
            preprocessor: None,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    /// Session with the configured backend selected and C applied
    pub fn build_session(&self) -> Result<SvmSession> {
        self.kernel.validate()?;
        let registry = BackendRegistry::with_optimizer_config(self.optimizer.clone());
        let mut session = SvmSession::with_registry(registry);
        session.select_backend(&self.backend)?;
        if let Some(c) = self.c {
            session.set_regularization(c);
        }
        Ok(session)
    }

    /// Attach the configured kernel and preprocessor to `env`
    ///
    /// `env` is left untouched if the kernel parameters are invalid.
    pub fn configure(&self, env: &mut Environment) -> Result<()> {
        env.set_kernel(Some(self.kernel.build()?));
        env.set_preprocessor(
            self.preprocessor
                .map(|method| Box::new(FeatureScaler::new(method)) as Box<dyn Preprocessor>),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.backend, "LIGHT");
    }

    #[test]
    fn test_full_document() {
        let config = SessionConfig::from_json(
            r#"{
                "backend": "LIGHT",
                "c": 10.0,
                "kernel": { "type": "rbf", "gamma": 0.5 },
                "preprocessor": "standard",
                "optimizer": { "c": 1.0, "epsilon": 0.01, "max_iterations": 50, "cache_size": 1024 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.c, Some(10.0));
        assert_eq!(config.kernel, KernelSpec::Rbf { gamma: 0.5 });
        assert_eq!(config.preprocessor, Some(ScalingMethod::StandardScore));
        assert_eq!(config.optimizer.max_iterations, 50);
    }

    #[test]
    fn test_minmax_preprocessor() {
        let config = SessionConfig::from_json(
            r#"{ "preprocessor": { "minmax": { "min_val": 0.0, "max_val": 1.0 } } }"#,
        )
        .unwrap();
        assert_eq!(
            config.preprocessor,
            Some(ScalingMethod::MinMax {
                min_val: 0.0,
                max_val: 1.0
            })
        );
    }

    #[test]
    fn test_build_session() {
        let mut config = SessionConfig::default();
        config.c = Some(3.0);
        let session = config.build_session().unwrap();
        assert_eq!(session.state(), SessionState::BackendSelected);
        assert_eq!(session.regularization(), Some(3.0));

        config.backend = "CPLEX".to_string();
        assert!(matches!(
            config.build_session(),
            Err(SVMError::Unavailable(_))
        ));
    }

    #[test]
    fn test_configure_environment() {
        let config = SessionConfig {
            preprocessor: Some(ScalingMethod::UnitScale),
            ..SessionConfig::default()
        };
        let mut env = Environment::new();
        config.configure(&mut env).unwrap();
        assert_eq!(env.kernel().map(|k| k.name()), Some("linear".to_string()));
        assert_eq!(env.preprocessor().map(|p| p.name()), Some("scaler:unit"));
    }

    #[test]
    fn test_invalid_kernel_rejected() {
        let config = SessionConfig::from_json(r#"{ "kernel": { "type": "rbf", "gamma": -1 } }"#)
            .unwrap();

        assert!(matches!(
            config.build_session(),
            Err(SVMError::InvalidArgument(_))
        ));

        let mut env = Environment::new();
        assert!(matches!(
            config.configure(&mut env),
            Err(SVMError::InvalidArgument(_))
        ));
        assert!(env.kernel().is_none());
        assert!(env.preprocessor().is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "backend": "MPI", "kernel": {{ "type": "poly", "degree": 2 }} }}"#).unwrap();
        let config = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend, "MPI");
        assert_eq!(config.kernel, KernelSpec::Poly { degree: 2 });
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ \"c\": \"high\" }}").unwrap();
        assert!(matches!(
            SessionConfig::from_file(file.path()),
            Err(SVMError::SerializationError(_))
        ));
    }
}
