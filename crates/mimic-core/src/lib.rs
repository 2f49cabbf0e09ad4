//! Class-model provider for mimic: a caller-owned [`pool::ClassPool`] of
//! mutable [`class::ClassDefinition`]s, the statement language of their
//! bodies, and realization into invocable classes.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod utils;

pub mod ast;
pub mod class;
pub mod collections;
pub mod error;
pub mod pool;
pub mod pretty;
pub mod runtime;

// Re-export commonly used items for convenience
pub use tracing;

pub use class::{ClassDefinition, ClassHandle, ClassKind, MemberKey};
pub use pool::ClassPool;
pub use runtime::{Instance, RealizedClass};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
