//! mapdef core - shared geometry and value-parsing helpers

mod error;
mod direction;
mod parsing;
mod positions;

pub use error::*;
pub use direction::*;
pub use parsing::*;
pub use positions::*;
