use derive_more::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum RationalError { 
    #[display("zero denominator")]
    ZeroDenominator,

    #[display("division by zero")]
    DivisionByZero,

    #[display("integer overflow in rational arithmetic")]
    Overflow,

    #[display("cannot parse '{_0}' as a fraction")]
    Parse(String),
}

impl std::error::Error for RationalError {}
