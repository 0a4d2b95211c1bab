//! Solver backends and the registry that selects them by name

pub mod light;
pub mod registry;

pub use self::light::LightBackend;
pub use self::registry::{BackendFactory, BackendKind, BackendRegistry};
