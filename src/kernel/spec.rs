//! Textual kernel selection
//!
//! Accepted forms: `linear`, `rbf`, `rbf:<gamma>`, `poly`, `poly:<degree>`.

use crate::core::{Result, SVMError};
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RBFKernel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Kernel choice as it appears on the command line or in a session file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KernelSpec {
    Linear,
    Rbf { gamma: f64 },
    Poly { degree: u32 },
}

impl Default for KernelSpec {
    fn default() -> Self {
        KernelSpec::Linear
    }
}

impl KernelSpec {
    /// Reject parameters the kernels cannot be built with
    ///
    /// Specs read through serde bypass `from_str`, so this runs again in
    /// [`build`](Self::build).
    pub fn validate(&self) -> Result<()> {
        match *self {
            KernelSpec::Rbf { gamma } if !(gamma > 0.0) => Err(SVMError::InvalidArgument(
                format!("RBF gamma must be positive, got: {gamma}"),
            )),
            KernelSpec::Poly { degree: 0 } => Err(SVMError::InvalidArgument(
                "Polynomial degree must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Instantiate the kernel
    pub fn build(&self) -> Result<Arc<dyn Kernel>> {
        self.validate()?;
        Ok(match *self {
            KernelSpec::Linear => Arc::new(LinearKernel::new()),
            KernelSpec::Rbf { gamma } => Arc::new(RBFKernel::new(gamma)),
            KernelSpec::Poly { degree } => Arc::new(PolynomialKernel::new(degree, 1.0, 1.0)),
        })
    }
}

impl FromStr for KernelSpec {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name, Some(param)),
            None => (s, None),
        };

        match (name, param) {
            ("linear", None) => Ok(KernelSpec::Linear),
            ("rbf", None) => Ok(KernelSpec::Rbf { gamma: 1.0 }),
            ("rbf", Some(p)) => {
                let gamma = p
                    .parse::<f64>()
                    .map_err(|_| SVMError::ParseError(format!("Invalid RBF gamma: {p}")))?;
                let spec = KernelSpec::Rbf { gamma };
                spec.validate()?;
                Ok(spec)
            }
            ("poly", None) => Ok(KernelSpec::Poly { degree: 3 }),
            ("poly", Some(p)) => {
                let degree = p
                    .parse::<u32>()
                    .map_err(|_| SVMError::ParseError(format!("Invalid polynomial degree: {p}")))?;
                let spec = KernelSpec::Poly { degree };
                spec.validate()?;
                Ok(spec)
            }
            _ => Err(SVMError::ParseError(format!("Unknown kernel: {s}"))),
        }
    }
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSpec::Linear => write!(f, "linear"),
            KernelSpec::Rbf { gamma } => write!(f, "rbf:{gamma}"),
            KernelSpec::Poly { degree } => write!(f, "poly:{degree}"),
        }
    }
}
