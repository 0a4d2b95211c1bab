//! Built-in SVM optimizer
//!
//! Implements Sequential Minimal Optimization over dense training rows.

pub mod smo;

pub use self::smo::*;
