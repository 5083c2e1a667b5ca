use derive_more::Display;
use num_traits::One;
use qlin::Rational;
use crate::LinAlgResult;
use super::Mat;

/// An elementary row operation, as recorded during row reduction.
/// 
/// Rows are 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum RowOp { 
    #[display("R{_0} <-> R{_1}")]
    Swap(usize, usize),

    #[display("{scalar} * R{row} -> R{row}")]
    Scale { row: usize, scalar: Rational },

    #[display("{scalar} * R{src} + R{dest} -> R{dest}")]
    AddMultiple { src: usize, dest: usize, scalar: Rational },
}

impl RowOp { 
    /// The factor by which this operation multiplies the determinant.
    pub fn det_effect(&self) -> Rational { 
        match self { 
            RowOp::Swap(..) => -Rational::one(),
            RowOp::Scale { scalar, .. } => *scalar,
            RowOp::AddMultiple { .. } => Rational::one(),
        }
    }

    pub fn apply(&self, target: &mut Mat) -> LinAlgResult<()> { 
        match self { 
            RowOp::Swap(i, j) => { 
                target.swap_rows(*i, *j);
                Ok(())
            },
            RowOp::Scale { row, scalar } => target.mul_row(*row, scalar),
            RowOp::AddMultiple { src, dest, scalar } => target.add_row_to(*src, *dest, scalar),
        }
    }
}

/// The ordered sequence of row operations applied by a reduction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowOpLog { 
    ops: Vec<RowOp>
}

impl RowOpLog { 
    pub fn new() -> Self { 
        Self::default()
    }

    pub fn push(&mut self, op: RowOp) { 
        self.ops.push(op)
    }

    pub fn len(&self) -> usize { 
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool { 
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[RowOp] { 
        &self.ops
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowOp> { 
        self.ops.iter()
    }

    /// Product of the determinant effects of all recorded operations.
    pub fn det_effect(&self) -> LinAlgResult<Rational> { 
        let e = self.ops.iter().try_fold(Rational::one(), |acc, op| 
            acc.checked_mul(&op.det_effect())
        )?;
        Ok(e)
    }
}

impl<'a> IntoIterator for &'a RowOpLog { 
    type Item = &'a RowOp;
    type IntoIter = std::slice::Iter<'a, RowOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl std::fmt::Display for RowOpLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for op in self.ops.iter() { 
            writeln!(f, "{op}")?;
        }
        Ok(())
    }
}
