mod base;
mod err;

pub mod dense;

pub use base::*;
pub use err::*;
