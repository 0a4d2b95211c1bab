//! Test-run evaluation: ROC / break-even sweep and result formatting

pub mod format;
pub mod report;
pub mod roc;

pub use self::format::*;
pub use self::report::*;
pub use self::roc::*;
