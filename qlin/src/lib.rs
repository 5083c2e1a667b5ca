mod err;
mod types;

pub use err::*;
pub use types::*;

pub mod util;
