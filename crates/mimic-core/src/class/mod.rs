mod definition;
mod member;

pub use definition::*;
pub use member::*;
