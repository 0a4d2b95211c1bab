//! Name-to-factory registry for SVM backends
//!
//! The set of backend tokens is fixed; which of them can actually be
//! constructed depends on what has been registered. The default registry
//! only carries the built-in LIGHT solver.

use crate::backend::LightBackend;
use crate::core::{Backend, OptimizerConfig, Result, SVMError};
use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Known backend identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Light,
    Cplex,
    Mpi,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Light, BackendKind::Cplex, BackendKind::Mpi];

    /// Selection token, matched case-sensitively
    pub fn token(&self) -> &'static str {
        match self {
            BackendKind::Light => "LIGHT",
            BackendKind::Cplex => "CPLEX",
            BackendKind::Mpi => "MPI",
        }
    }

    /// Object name used in log messages
    pub fn description(&self) -> &'static str {
        match self {
            BackendKind::Light => "SVMLight",
            BackendKind::Cplex => "SVMCplex",
            BackendKind::Mpi => "SVMMPI",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for BackendKind {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        BackendKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.token() == s)
            .ok_or_else(|| SVMError::InvalidArgument(format!("unknown svm backend: {s}")))
    }
}

/// Constructor for one backend kind
pub type BackendFactory = Box<dyn Fn() -> Box<dyn Backend>>;

/// Maps backend kinds to factories
pub struct BackendRegistry {
    factories: HashMap<BackendKind, BackendFactory>,
    report_disabled: bool,
}

impl BackendRegistry {
    /// Registry with no backends at all
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            report_disabled: true,
        }
    }

    /// Registry whose LIGHT backend uses `config`
    pub fn with_optimizer_config(config: OptimizerConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(BackendKind::Light, move || {
            Box::new(LightBackend::with_config(config.clone()))
        });
        registry
    }

    /// Install or replace the factory for `kind`
    pub fn register<F>(&mut self, kind: BackendKind, factory: F)
    where
        F: Fn() -> Box<dyn Backend> + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
    }

    /// Remove `kind`; returns whether it was registered
    pub fn unregister(&mut self, kind: BackendKind) -> bool {
        self.factories.remove(&kind).is_some()
    }

    /// Whether known but unregistered kinds get their own "disabled"
    /// diagnostic (default) or the uniform unknown-backend error
    pub fn with_disabled_diagnostics(mut self, enabled: bool) -> Self {
        self.report_disabled = enabled;
        self
    }

    pub fn is_available(&self, kind: BackendKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Registered kinds in token order
    pub fn available(&self) -> Vec<BackendKind> {
        BackendKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.is_available(*kind))
            .collect()
    }

    /// Map `name` to a registered kind without constructing anything
    pub fn resolve(&self, name: &str) -> Result<BackendKind> {
        let kind: BackendKind = name.parse()?;

        if self.is_available(kind) {
            Ok(kind)
        } else if self.report_disabled {
            let message = format!("{kind} SVM disabled");
            warn!("{message}");
            Err(SVMError::Unavailable(message))
        } else {
            Err(SVMError::InvalidArgument(format!(
                "unknown svm backend: {name}"
            )))
        }
    }

    /// Construct a backend of a registered kind
    pub fn build(&self, kind: BackendKind) -> Result<Box<dyn Backend>> {
        self.factories
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| SVMError::Unavailable(format!("{kind} SVM disabled")))
    }

    /// Resolve `name` and construct its backend
    pub fn create(&self, name: &str) -> Result<(BackendKind, Box<dyn Backend>)> {
        let kind = self.resolve(name)?;
        Ok((kind, self.build(kind)?))
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_optimizer_config(OptimizerConfig::default())
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("available", &self.available())
            .field("report_disabled", &self.report_disabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert_eq!("LIGHT".parse::<BackendKind>().unwrap(), BackendKind::Light);
        assert_eq!("MPI".parse::<BackendKind>().unwrap(), BackendKind::Mpi);
        assert!("light".parse::<BackendKind>().is_err());
        assert!("LIGHT ".parse::<BackendKind>().is_err());
        assert!("".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_default_registry_has_only_light() {
        let registry = BackendRegistry::default();
        assert_eq!(registry.available(), vec![BackendKind::Light]);

        let (kind, backend) = registry.create("LIGHT").unwrap();
        assert_eq!(kind, BackendKind::Light);
        assert_eq!(backend.name(), "SVMLight");
    }

    #[test]
    fn test_disabled_backend_diagnostic() {
        let registry = BackendRegistry::default();
        match registry.create("CPLEX") {
            Err(SVMError::Unavailable(msg)) => assert_eq!(msg, "CPLEX SVM disabled"),
            other => panic!("expected Unavailable, got {:?}", other.map(|(k, _)| k)),
        }
    }

    #[test]
    fn test_uniform_unknown_error_when_diagnostics_off() {
        let registry = BackendRegistry::default().with_disabled_diagnostics(false);
        assert!(matches!(
            registry.create("MPI"),
            Err(SVMError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.create("FOO"),
            Err(SVMError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = BackendRegistry::empty();
        assert!(registry.available().is_empty());

        registry.register(BackendKind::Mpi, || Box::new(LightBackend::new()));
        assert!(registry.is_available(BackendKind::Mpi));
        assert!(registry.create("MPI").is_ok());

        assert!(registry.unregister(BackendKind::Mpi));
        assert!(!registry.unregister(BackendKind::Mpi));
        assert!(registry.create("MPI").is_err());
    }
}
