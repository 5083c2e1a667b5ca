mod app;
mod session;
mod workspace;
pub mod err;
pub mod utils;

pub use app::*;
