use std::cmp;
use std::fmt::{Debug, Display};
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use std::sync::OnceLock;
use auto_impl_ops::auto_ops;
use num_integer::Integer;
use num_traits::{One, Zero};
use regex::Regex;
use crate::RationalError;

/// An exact fraction `numer / denom` of 64-bit integers.
/// 
/// Always kept in lowest terms with a positive denominator, 
/// and zero is always `0/1`. Intermediate results are computed 
/// in 128 bits and narrowed back, so arithmetic only fails when 
/// the reduced result itself does not fit.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: i64,
    denom: i64,
}

impl Rational {
    #[inline]
    const fn new_raw(numer: i64, denom: i64) -> Rational {
        Rational { numer, denom }
    }

    /// Panics if `denom` is zero. See [`Rational::try_new`].
    pub fn new(numer: i64, denom: i64) -> Rational {
        assert!(denom != 0, "{}", RationalError::ZeroDenominator);
        arith(Self::try_new(numer, denom))
    }

    pub fn try_new(numer: i64, denom: i64) -> Result<Rational, RationalError> {
        if denom == 0 { 
            return Err(RationalError::ZeroDenominator)
        }
        Self::reduced(numer as i128, denom as i128)
    }

    fn reduced(numer: i128, denom: i128) -> Result<Rational, RationalError> {
        if numer.is_zero() { 
            return Ok(Self::zero())
        }

        let g = numer.gcd(&denom); // positive
        let (mut p, mut q) = (numer / g, denom / g);

        if q < 0 { 
            p = -p;
            q = -q;
        }

        match (i64::try_from(p), i64::try_from(q)) { 
            (Ok(p), Ok(q)) => Ok(Self::new_raw(p, q)),
            _ => Err(RationalError::Overflow)
        }
    }

    #[inline]
    pub const fn numer(&self) -> i64 {
        self.numer
    }

    #[inline]
    pub const fn denom(&self) -> i64 {
        self.denom
    }

    #[inline]
    fn wide(&self) -> (i128, i128) { 
        (self.numer as i128, self.denom as i128)
    }

    pub fn is_integer(&self) -> bool { 
        self.denom == 1
    }

    pub fn is_positive(&self) -> bool { 
        self.numer > 0
    }

    pub fn is_negative(&self) -> bool { 
        self.numer < 0
    }

    pub fn signum(&self) -> i64 { 
        self.numer.signum()
    }

    pub fn abs(&self) -> Rational { 
        if self.is_negative() { 
            -self
        } else { 
            *self
        }
    }

    pub fn inv(&self) -> Option<Rational> { 
        if self.is_zero() { 
            None
        } else { 
            Some(arith(Self::reduced(self.denom as i128, self.numer as i128)))
        }
    }

    pub fn to_f64(&self) -> f64 { 
        self.numer as f64 / self.denom as f64
    }

    pub fn checked_neg(&self) -> Result<Rational, RationalError> { 
        Self::reduced(-(self.numer as i128), self.denom as i128)
    }

    /// Compares `|self|` with `|other|` without negating either.
    pub fn cmp_abs(&self, other: &Rational) -> cmp::Ordering { 
        let ((a, b), (c, d)) = (self.wide(), other.wide());
        (a.abs() * d).cmp(&(c.abs() * b))
    }

    pub fn checked_add(&self, rhs: &Rational) -> Result<Rational, RationalError> { 
        let ((a, b), (c, d)) = (self.wide(), rhs.wide());
        Self::reduced(a * d + c * b, b * d)
    }

    pub fn checked_sub(&self, rhs: &Rational) -> Result<Rational, RationalError> { 
        let ((a, b), (c, d)) = (self.wide(), rhs.wide());
        Self::reduced(a * d - c * b, b * d)
    }

    pub fn checked_mul(&self, rhs: &Rational) -> Result<Rational, RationalError> { 
        let ((a, b), (c, d)) = (self.wide(), rhs.wide());
        Self::reduced(a * c, b * d)
    }

    pub fn checked_div(&self, rhs: &Rational) -> Result<Rational, RationalError> { 
        if rhs.is_zero() { 
            return Err(RationalError::DivisionByZero)
        }
        let ((a, b), (c, d)) = (self.wide(), rhs.wide());
        Self::reduced(a * d, b * c)
    }
}

// Operators have no error channel; overflow and division by zero panic.
fn arith(res: Result<Rational, RationalError>) -> Rational { 
    match res { 
        Ok(r) => r,
        Err(e) => panic!("{e}")
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::new_raw(n, 1)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::new_raw(n as i64, 1)
    }
}

impl From<(i64, i64)> for Rational {
    fn from(pair: (i64, i64)) -> Self {
        let (p, q) = pair;
        Self::new(p, q)
    }
}

impl From<(i32, i32)> for Rational {
    fn from(pair: (i32, i32)) -> Self {
        let (p, q) = pair;
        Self::new(p as i64, q as i64)
    }
}

impl FromStr for Rational {
    type Err = RationalError;

    /// Accepts `N` or `N/D`, e.g. `-3`, `5/6`, `1/-2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let r = PATTERN.get_or_init(|| 
            Regex::new(r"^\s*([+-]?\d+)\s*(?:/\s*([+-]?\d+)\s*)?$").unwrap()
        );

        let parse_err = || RationalError::Parse(s.to_string());
        let Some(c) = r.captures(s) else { 
            return Err(parse_err())
        };

        let p = c[1].parse::<i64>().map_err(|_| parse_err())?;
        let q = match c.get(2) { 
            Some(m) => m.as_str().parse::<i64>().map_err(|_| parse_err())?,
            None => 1
        };

        Self::try_new(p, q)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

impl Debug for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() { 
            write!(f, "{}", self.numer)
        } else { 
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self::new_raw(0, 1)
    }

    fn is_zero(&self) -> bool {
        self.numer == 0
    }
}

impl One for Rational {
    fn one() -> Self {
        Self::new_raw(1, 1)
    }

    fn is_one(&self) -> bool {
        self.numer == 1 && self.denom == 1
    }
}

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $checked:ident) => {
        #[auto_ops]
        impl $trait<&Rational> for Rational {
            fn $method(&mut self, rhs: &Rational) {
                *self = arith(self.$checked(rhs));
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, checked_add);
impl_assign_op!(SubAssign, sub_assign, checked_sub);
impl_assign_op!(MulAssign, mul_assign, checked_mul);
impl_assign_op!(DivAssign, div_assign, checked_div);

impl Neg for Rational {
    type Output = Self;
    fn neg(self) -> Self::Output {
        arith(self.checked_neg())
    }
}

impl Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Self::Output {
        -*self
    }
}

macro_rules! impl_accum {
    ($trait:ident, $method:ident, $accum_method:ident, $accum_init:ident) => {
        impl $trait for Rational {
            fn $method<Iter: Iterator<Item = Self>>(iter: Iter) -> Self {
                iter.fold(Self::$accum_init(), |mut res, r| { 
                    res.$accum_method(&r);
                    res
                })
            }
        }

        impl<'a> $trait<&'a Rational> for Rational {
            fn $method<Iter: Iterator<Item = &'a Rational>>(iter: Iter) -> Self {
                iter.fold(Self::$accum_init(), |mut res, r| { 
                    res.$accum_method(r);
                    res
                })
            }
        }
    }
}

impl_accum!(Sum, sum, add_assign, zero);
impl_accum!(Product, product, mul_assign, one);

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let ((a, b), (c, d)) = (self.wide(), other.wide());
        (a * d).cmp(&(c * b))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}
