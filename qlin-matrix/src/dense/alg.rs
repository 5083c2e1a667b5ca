use log::debug;
use num_traits::{One, Zero};
use qlin::Rational;
use crate::{LinAlgError, LinAlgResult, MatType};
use super::{Mat, Vector};

/// Outcome of [`Mat::solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution { 
    Unique(Vector),
    Inconsistent,
    Infinite { rank: usize },
}

impl Solution { 
    pub fn is_unique(&self) -> bool { 
        matches!(self, Solution::Unique(_))
    }

    pub fn unique(&self) -> Option<&Vector> { 
        match self { 
            Solution::Unique(x) => Some(x),
            _ => None
        }
    }

}

impl Mat { 
    /// Computed from the reduced form: the product of its diagonal 
    /// divided by the accumulated effect of the row operations.
    pub fn det(&self) -> LinAlgResult<Rational> { 
        self.ensure_square()?;

        let res = self.rref()?;
        let n = self.rows();
        let diag = (0..n).try_fold(Rational::one(), |acc, i| 
            acc.checked_mul(&res.result()[(i, i)])
        )?;
        let effect = res.log().det_effect()?;

        Ok(diag.checked_div(&effect)?)
    }

    pub fn rank(&self) -> LinAlgResult<usize> { 
        let res = self.rref()?;
        let r = res.result();
        Ok((0..r.rows()).filter(|&i| !r.is_row_zero(i)).count())
    }

    /// Whether `self * x = b` has at least one solution.
    pub fn is_consistent(&self, b: &Vector) -> LinAlgResult<bool> { 
        let aug = self.augment_vec(b)?;
        Ok(self.rank()? == aug.rank()?)
    }

    pub fn solve(&self, b: &Vector) -> LinAlgResult<Solution> { 
        let n = self.cols();
        let aug = self.augment_vec(b)?;
        let (red, _, pivots) = aug.into_rref()?.destruct();

        let contradiction = (0..red.rows()).any(|i| 
            (0..n).all(|j| red[(i, j)].is_zero()) && !red[(i, n)].is_zero()
        );

        if contradiction { 
            debug!("solve: inconsistent system.");
            return Ok(Solution::Inconsistent)
        }

        let rank = pivots.len();
        if rank < n { 
            debug!("solve: rank {rank} < {n}, not unique.");
            return Ok(Solution::Infinite { rank })
        }

        let comps = (0..n).map(|i| red[(i, n)]).collect();
        Ok(Solution::Unique(Vector::new_unchecked(comps)))
    }

    pub fn inv(&self) -> LinAlgResult<Mat> { 
        self.ensure_square()?;

        let n = self.rows();
        let aug = self.augment(&Mat::id(n)?)?;
        let red = aug.into_rref()?.destruct().0;

        if !red.submat_cols(0..n).is_id() { 
            return Err(LinAlgError::Singular)
        }

        Ok(red.submat_cols(n..2 * n))
    }

    /// The columns of `self` at the pivot columns recorded by its 
    /// reduction, not the reduced columns whose entries sum to 1.
    pub fn col_basis(&self) -> LinAlgResult<Vec<Vector>> { 
        let res = self.rref()?;
        Ok(res.pivots().iter().map(|&j| self.col_vec(j)).collect())
    }

    pub fn row_basis(&self) -> LinAlgResult<Vec<Vector>> { 
        self.transpose().col_basis()
    }
}
