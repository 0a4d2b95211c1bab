//! Feature set implementations
//!
//! Dense labelled feature matrices and the LibSVM text loader that
//! produces them.

pub mod dense;
pub mod libsvm;

pub use self::dense::*;
pub use self::libsvm::*;
