mod mat;
mod vector;
mod row_op;
mod rref;
mod alg;

pub use mat::*;
pub use vector::*;
pub use row_op::*;
pub use rref::*;
pub use alg::*;
