//! Session controller: backend selection and the train/test glue
//!
//! A [`SvmSession`] owns the selected backend; the feature sets, the
//! preprocessor and the kernel it works with live in an [`Environment`]
//! supplied by the caller.

pub mod controller;
pub mod environment;

pub use self::controller::{SessionState, SvmSession};
pub use self::environment::Environment;
