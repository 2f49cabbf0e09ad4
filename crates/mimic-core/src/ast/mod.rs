//! Building blocks of class definitions: names, types, values and the
//! statement language of member bodies.

mod expr;
mod ident;
mod ty;
mod value;

pub use expr::*;
pub use ident::*;
pub use ty::*;
pub use value::*;
