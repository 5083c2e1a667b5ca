use std::fmt::Display;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Range, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use delegate::delegate;
use itertools::Itertools;
use nalgebra::DMatrix;
use num_traits::{One, Zero};
use qlin::Rational;
use qlin::util::format::grid;
use crate::{LinAlgError, LinAlgResult, MatType};
use super::Vector;

/// A dense matrix of rationals with at least one row and one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mat {
    inner: DMatrix<Rational>
}

impl MatType for Mat {
    fn shape(&self) -> (usize, usize) {
        (self.inner.nrows(), self.inner.ncols())
    }
}

impl Mat {
    fn check_shape(shape: (usize, usize)) -> LinAlgResult<()> { 
        let (m, n) = shape;
        if m == 0 || n == 0 { 
            Err(LinAlgError::InvalidShape(m, n))
        } else { 
            Ok(())
        }
    }

    pub fn zero(shape: (usize, usize)) -> LinAlgResult<Self> { 
        Self::check_shape(shape)?;
        let inner = DMatrix::from_element(shape.0, shape.1, Rational::zero());
        Ok(Self::from(inner))
    }

    pub fn id(size: usize) -> LinAlgResult<Self> { 
        Self::check_shape((size, size))?;
        let inner = DMatrix::identity(size, size);
        Ok(Self::from(inner))
    }

    /// Builds a matrix from row-major `data`.
    pub fn from_data<I, T>(shape: (usize, usize), data: I) -> LinAlgResult<Self>
    where I: IntoIterator<Item = T>, T: Into<Rational> { 
        Self::check_shape(shape)?;

        let (m, n) = shape;
        let data = data.into_iter().map_into().collect_vec();

        if data.len() != m * n { 
            return Err(LinAlgError::SizeMismatch(m * n, data.len()))
        }

        let inner = DMatrix::from_row_slice(m, n, &data);
        Ok(Self::from(inner))
    }

    pub fn from_rows<I, J, T>(rows: I) -> LinAlgResult<Self>
    where I: IntoIterator<Item = J>, J: IntoIterator<Item = T>, T: Into<Rational> { 
        let rows = rows.into_iter().map(|r| 
            r.into_iter().map_into().collect_vec()
        ).collect_vec();

        let m = rows.len();
        let n = rows.first().map(|r| r.len()).unwrap_or(0);

        if let Some(r) = rows.iter().find(|r| r.len() != n) { 
            return Err(LinAlgError::SizeMismatch(n, r.len()))
        }

        Self::from_data((m, n), rows.into_iter().flatten())
    }

    pub fn into_inner(self) -> DMatrix<Rational> {
        self.inner
    }

    /// Iterates `(i, j, a_ij)` in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Rational)> { 
        let m = self.rows();
        self.inner.iter().enumerate().map(move |(k, a)| 
            (k % m, k / m, a)
        )
    }

    fn check_index(&self, i: usize, j: usize) -> LinAlgResult<()> { 
        let (m, n) = self.shape();
        if i < m && j < n { 
            Ok(())
        } else { 
            Err(LinAlgError::OutOfBounds { index: (i, j), shape: (m, n) })
        }
    }

    pub fn get(&self, i: usize, j: usize) -> LinAlgResult<&Rational> { 
        self.check_index(i, j)?;
        Ok(&self.inner[(i, j)])
    }

    pub fn set<T>(&mut self, i: usize, j: usize, a: T) -> LinAlgResult<()>
    where T: Into<Rational> { 
        self.check_index(i, j)?;
        self.inner[(i, j)] = a.into();
        Ok(())
    }

    pub fn row_vec(&self, i: usize) -> Vector { 
        let comps = (0..self.cols()).map(|j| self[(i, j)]).collect();
        Vector::new_unchecked(comps)
    }

    pub fn col_vec(&self, j: usize) -> Vector { 
        let comps = (0..self.rows()).map(|i| self[(i, j)]).collect();
        Vector::new_unchecked(comps)
    }

    pub fn is_zero(&self) -> bool { 
        self.iter().all(|e| e.2.is_zero())
    }

    pub fn is_row_zero(&self, i: usize) -> bool { 
        (0..self.cols()).all(|j| self[(i, j)].is_zero())
    }

    pub fn is_id(&self) -> bool { 
        self.is_square() && self.iter().all(|(i, j, a)| 
            i == j && a.is_one() || 
            i != j && a.is_zero()
        )
    }

    pub fn transpose(&self) -> Mat { 
        Self::from(self.inner.transpose())
    }

    /// `[self | other]`
    pub fn augment(&self, other: &Mat) -> LinAlgResult<Mat> { 
        if self.rows() != other.rows() { 
            return Err(LinAlgError::ShapeMismatch { 
                op: "augment", 
                lhs: self.shape(), 
                rhs: other.shape() 
            })
        }

        let n = self.cols();
        let inner = DMatrix::from_fn(self.rows(), n + other.cols(), |i, j| 
            if j < n { self[(i, j)] } else { other[(i, j - n)] }
        );

        Ok(Self::from(inner))
    }

    /// `[self | b]`
    pub fn augment_vec(&self, b: &Vector) -> LinAlgResult<Mat> { 
        if self.rows() != b.size() { 
            return Err(LinAlgError::ShapeMismatch { 
                op: "augment", 
                lhs: self.shape(), 
                rhs: (b.size(), 1) 
            })
        }

        let n = self.cols();
        let inner = DMatrix::from_fn(self.rows(), n + 1, |i, j| 
            if j < n { self[(i, j)] } else { b[i] }
        );

        Ok(Self::from(inner))
    }

    pub fn submat_cols(&self, cols: Range<usize>) -> Mat { 
        let (j0, j1) = (cols.start, cols.end);
        assert!(j0 < j1 && j1 <= self.cols());

        let inner = DMatrix::from_fn(self.rows(), j1 - j0, |i, j| 
            self[(i, j0 + j)]
        );
        Self::from(inner)
    }

    pub fn checked_add(&self, rhs: &Mat) -> LinAlgResult<Mat> { 
        if self.shape() != rhs.shape() { 
            return Err(LinAlgError::ShapeMismatch { 
                op: "add", 
                lhs: self.shape(), 
                rhs: rhs.shape() 
            })
        }

        let mut res = self.clone();
        for (a, b) in res.inner.iter_mut().zip(rhs.inner.iter()) { 
            *a = a.checked_add(b)?;
        }
        Ok(res)
    }

    pub fn checked_mul(&self, rhs: &Mat) -> LinAlgResult<Mat> { 
        if self.cols() != rhs.rows() { 
            return Err(LinAlgError::ShapeMismatch { 
                op: "mul", 
                lhs: self.shape(), 
                rhs: rhs.shape() 
            })
        }

        let (m, n) = (self.rows(), rhs.cols());
        let mut res = Self::zero((m, n))?;

        for i in 0..m { 
            for j in 0..n { 
                res[(i, j)] = self.row_vec(i).dot(&rhs.col_vec(j))?;
            }
        }

        Ok(res)
    }

    /// `self * v`, each entry the dot product of a row with `v`.
    pub fn mul_vec(&self, v: &Vector) -> LinAlgResult<Vector> { 
        if self.cols() != v.size() { 
            return Err(LinAlgError::ShapeMismatch { 
                op: "mul", 
                lhs: self.shape(), 
                rhs: (v.size(), 1) 
            })
        }

        let comps: Vec<_> = (0..self.rows()).map(|i| 
            self.row_vec(i).dot(v)
        ).try_collect()?;

        Ok(Vector::new_unchecked(comps))
    }

    pub fn trace(&self) -> LinAlgResult<Rational> { 
        self.ensure_square()?;
        let trace = (0..self.rows()).try_fold(Rational::zero(), |acc, i| 
            acc.checked_add(&self[(i, i)])
        )?;
        Ok(trace)
    }

    pub(crate) fn ensure_square(&self) -> LinAlgResult<()> { 
        if self.is_square() { 
            Ok(())
        } else { 
            let (m, n) = self.shape();
            Err(LinAlgError::NotSquare(m, n))
        }
    }
}

// elementary row operations. on overflow the row is left partially updated.
impl Mat {
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.inner.swap_rows(i, j);
    }

    pub fn mul_row(&mut self, i: usize, r: &Rational) -> LinAlgResult<()> {
        for j in 0..self.cols() { 
            self.inner[(i, j)] = self.inner[(i, j)].checked_mul(r)?;
        }
        Ok(())
    }

    /// Adds `r * (row i)` to row `j`.
    pub fn add_row_to(&mut self, i: usize, j: usize, r: &Rational) -> LinAlgResult<()> { 
        for k in 0..self.cols() { 
            let a = self.inner[(i, k)].checked_mul(r)?;
            self.inner[(j, k)] = self.inner[(j, k)].checked_add(&a)?;
        }
        Ok(())
    }
}

impl From<DMatrix<Rational>> for Mat {
    fn from(inner: DMatrix<Rational>) -> Self {
        Self { inner }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = Rational;
    delegate! { 
        to self.inner { 
            fn index(&self, index: (usize, usize)) -> &Rational;
        }
    }
}

impl IndexMut<(usize, usize)> for Mat {
    delegate! { 
        to self.inner { 
            fn index_mut(&mut self, index: (usize, usize)) -> &mut Rational;
        }
    }
}

impl Display for Mat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (m, n) = self.shape();
        f.write_str(&grid(m, n, |i, j| self[(i, j)]))
    }
}

impl Neg for Mat {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Mat::from(self.inner.map(|a| -a))
    }
}

impl Neg for &Mat {
    type Output = Mat;
    fn neg(self) -> Self::Output {
        Mat::from(self.inner.map(|a| -a))
    }
}

// Operators panic on shape mismatch; use the `checked_*` forms to recover.

#[auto_ops]
impl AddAssign<&Mat> for Mat {
    fn add_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        for (a, b) in self.inner.iter_mut().zip(rhs.inner.iter()) { 
            *a += b;
        }
    }
}

#[auto_ops]
impl SubAssign<&Mat> for Mat {
    fn sub_assign(&mut self, rhs: &Self) {
        assert_eq!(self.shape(), rhs.shape());
        for (a, b) in self.inner.iter_mut().zip(rhs.inner.iter()) { 
            *a -= b;
        }
    }
}

#[auto_ops]
impl<'a, 'b> Mul<&'b Mat> for &'a Mat {
    type Output = Mat;
    fn mul(self, rhs: &'b Mat) -> Self::Output {
        match self.checked_mul(rhs) { 
            Ok(prod) => prod,
            Err(e) => panic!("{e}")
        }
    }
}
