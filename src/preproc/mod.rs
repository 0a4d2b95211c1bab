//! Feature preprocessors

pub mod scaling;

pub use self::scaling::*;
