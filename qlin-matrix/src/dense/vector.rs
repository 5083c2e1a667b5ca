use std::fmt::Display;
use std::ops::{Add, AddAssign, Index, Neg, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use itertools::Itertools;
use num_traits::Zero;
use qlin::{Rational, RationalError};
use qlin::util::format::list;
use crate::{LinAlgError, LinAlgResult};

/// Scale used by [`Vector::normalize`]: components are rounded to 6 decimals.
const NORMALIZE_SCALE: i64 = 1_000_000;

/// A vector of rationals with a fixed, non-zero size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vector { 
    comps: Vec<Rational>
}

impl Vector { 
    pub fn new(comps: Vec<Rational>) -> LinAlgResult<Self> { 
        if comps.is_empty() { 
            Err(LinAlgError::EmptyVector)
        } else { 
            Ok(Self { comps })
        }
    }

    pub(crate) fn new_unchecked(comps: Vec<Rational>) -> Self { 
        debug_assert!(!comps.is_empty());
        Self { comps }
    }

    pub fn from_data<I, T>(data: I) -> LinAlgResult<Self>
    where I: IntoIterator<Item = T>, T: Into<Rational> { 
        Self::new(data.into_iter().map_into().collect())
    }

    pub fn zero(size: usize) -> LinAlgResult<Self> { 
        Self::new(vec![Rational::zero(); size])
    }

    pub fn unit(size: usize, i: usize) -> LinAlgResult<Self> { 
        if i >= size { 
            return Err(LinAlgError::IndexOutOfBounds { index: i, size })
        }
        let mut v = Self::zero(size)?;
        v.comps[i] = Rational::from(1);
        Ok(v)
    }

    pub fn size(&self) -> usize { 
        self.comps.len()
    }

    pub fn comps(&self) -> &[Rational] { 
        &self.comps
    }

    pub fn into_vec(self) -> Vec<Rational> { 
        self.comps
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rational> { 
        self.comps.iter()
    }

    pub fn get(&self, i: usize) -> LinAlgResult<&Rational> { 
        self.comps.get(i).ok_or(LinAlgError::IndexOutOfBounds { index: i, size: self.size() })
    }

    pub fn is_zero(&self) -> bool { 
        self.comps.iter().all(|a| a.is_zero())
    }

    fn check_size(&self, other: &Vector) -> LinAlgResult<()> { 
        if self.size() == other.size() { 
            Ok(())
        } else { 
            Err(LinAlgError::SizeMismatch(self.size(), other.size()))
        }
    }

    fn zip_with<F>(&self, other: &Vector, f: F) -> LinAlgResult<Vector>
    where F: Fn(&Rational, &Rational) -> Result<Rational, RationalError> { 
        self.check_size(other)?;
        let comps: Vec<_> = self.comps.iter().zip(other.comps.iter()).map(|(a, b)| f(a, b)).try_collect()?;
        Ok(Vector::new_unchecked(comps))
    }

    pub fn checked_add(&self, other: &Vector) -> LinAlgResult<Vector> { 
        self.zip_with(other, |a, b| a.checked_add(b))
    }

    pub fn checked_sub(&self, other: &Vector) -> LinAlgResult<Vector> { 
        self.zip_with(other, |a, b| a.checked_sub(b))
    }

    pub fn scale(&self, r: &Rational) -> LinAlgResult<Vector> { 
        let comps: Vec<_> = self.comps.iter().map(|a| a.checked_mul(r)).try_collect()?;
        Ok(Vector::new_unchecked(comps))
    }

    pub fn dot(&self, other: &Vector) -> LinAlgResult<Rational> { 
        self.check_size(other)?;
        let dot = self.comps.iter().zip(other.comps.iter()).try_fold(Rational::zero(), |acc, (a, b)| 
            acc.checked_add(&a.checked_mul(b)?)
        )?;
        Ok(dot)
    }

    pub fn cross(&self, other: &Vector) -> LinAlgResult<Vector> { 
        for v in [self, other] { 
            if v.size() != 3 { 
                return Err(LinAlgError::NotThreeDimensional(v.size()))
            }
        }

        let [a1, a2, a3] = [0, 1, 2].map(|i| self.comps[i]);
        let [b1, b2, b3] = [0, 1, 2].map(|i| other.comps[i]);

        // p * q - r * s
        let minor = |p: Rational, q: Rational, r: Rational, s: Rational| 
            p.checked_mul(&q)?.checked_sub(&r.checked_mul(&s)?);

        let comps = vec![
            minor(a2, b3, a3, b2)?,
            minor(a3, b1, a1, b3)?,
            minor(a1, b2, a2, b1)?,
        ];

        Ok(Vector::new_unchecked(comps))
    }

    /// Exact sum of squared components.
    pub fn norm_squared(&self) -> Rational { 
        self.comps.iter().map(|a| a * a).sum()
    }

    pub fn magnitude(&self) -> f64 { 
        self.norm_squared().to_f64().sqrt()
    }

    /// The unit vector in the direction of `self`, approximated: 
    /// the true normalization is generally irrational, so each 
    /// component is rounded to 6 decimal places.
    pub fn normalize(&self) -> LinAlgResult<Vector> { 
        if self.is_zero() { 
            return Err(LinAlgError::ZeroVector)
        }

        let mag = self.magnitude();
        let scale = NORMALIZE_SCALE as f64;

        let comps = self.comps.iter().map(|a| { 
            let x = (a.to_f64() / mag * scale).round() as i64;
            Rational::new(x, NORMALIZE_SCALE)
        }).collect();

        Ok(Vector::new_unchecked(comps))
    }

    pub fn is_orthogonal(&self, other: &Vector) -> LinAlgResult<bool> { 
        Ok(self.dot(other)?.is_zero())
    }
}

impl Index<usize> for Vector {
    type Output = Rational;
    fn index(&self, i: usize) -> &Rational {
        &self.comps[i]
    }
}

impl Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&list(self.comps.iter()))
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Vector::new_unchecked(self.comps.into_iter().map(|a| -a).collect())
    }
}

impl Neg for &Vector {
    type Output = Vector;
    fn neg(self) -> Self::Output {
        Vector::new_unchecked(self.comps.iter().map(|a| -a).collect())
    }
}

#[auto_ops]
impl AddAssign<&Vector> for Vector {
    fn add_assign(&mut self, rhs: &Self) {
        assert_eq!(self.size(), rhs.size());
        for (a, b) in self.comps.iter_mut().zip(rhs.comps.iter()) { 
            *a += b;
        }
    }
}

#[auto_ops]
impl SubAssign<&Vector> for Vector {
    fn sub_assign(&mut self, rhs: &Self) {
        assert_eq!(self.size(), rhs.size());
        for (a, b) in self.comps.iter_mut().zip(rhs.comps.iter()) { 
            *a -= b;
        }
    }
}
