//! mimic-engine: copies interfaces, fields, constructors and methods from one
//! class definition onto another.
//!
//! - creator: the `MimicCreator` and its copy procedures
//! - error: `MimicError` and the phase it failed in
//! - report: added/skipped counts per phase

pub mod creator;
pub mod error;
pub mod report;

pub use creator::*;
pub use error::*;
pub use report::*;
