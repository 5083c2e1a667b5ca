use derive_more::Display;
use qlin::RationalError;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum LinAlgError { 
    #[display("{_0}")]
    Arith(RationalError),

    #[display("invalid shape: {_0}x{_1}")]
    InvalidShape(usize, usize),

    #[display("vector must have at least one component")]
    EmptyVector,

    #[display("index {index:?} out of bounds for shape {shape:?}")]
    OutOfBounds { index: (usize, usize), shape: (usize, usize) },

    #[display("index {index} out of bounds for size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[display("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch { op: &'static str, lhs: (usize, usize), rhs: (usize, usize) },

    #[display("size mismatch: {_0} vs {_1}")]
    SizeMismatch(usize, usize),

    #[display("matrix must be square, got {_0}x{_1}")]
    NotSquare(usize, usize),

    #[display("cross product requires 3-dimensional vectors, got size {_0}")]
    NotThreeDimensional(usize),

    #[display("cannot normalize the zero vector")]
    ZeroVector,

    #[display("matrix is singular")]
    Singular,
}

impl From<RationalError> for LinAlgError {
    fn from(e: RationalError) -> Self {
        LinAlgError::Arith(e)
    }
}

impl std::error::Error for LinAlgError {}

pub type LinAlgResult<T> = Result<T, LinAlgError>;
