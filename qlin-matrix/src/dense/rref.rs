use log::{debug, trace};
use num_traits::{One, Zero};
use qlin::Rational;
use crate::{LinAlgResult, MatType};
use super::{Mat, RowOp, RowOpLog};

impl Mat { 
    pub fn rref(&self) -> LinAlgResult<RrefResult> { 
        rref(self)
    }

    pub fn into_rref(self) -> LinAlgResult<RrefResult> { 
        rref_in_place(self)
    }
}

pub fn rref(target: &Mat) -> LinAlgResult<RrefResult> { 
    let copy = target.clone();
    rref_in_place(copy)
}

/// Fails only when an entry overflows during elimination.
pub fn rref_in_place(target: Mat) -> LinAlgResult<RrefResult> { 
    debug!("start rref: {:?}.", target.shape());
    trace!("\n{}", target);

    let mut calc = RrefCalc::new(target);

    calc.process()?;

    debug!("rref done, rank: {}, ops: {}.", calc.pivots.len(), calc.log.len());
    trace!("\n{}", calc.target);

    Ok(calc.result())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RrefResult { 
    result: Mat,
    log: RowOpLog,
    pivots: Vec<usize>
}

impl RrefResult { 
    pub fn result(&self) -> &Mat { 
        &self.result
    }

    /// The row operations that took the input to `result`, in order.
    pub fn log(&self) -> &RowOpLog { 
        &self.log
    }

    /// Pivot column of each nonzero row of `result`.
    pub fn pivots(&self) -> &[usize] { 
        &self.pivots
    }

    pub fn rank(&self) -> usize { 
        self.pivots.len()
    }

    pub fn destruct(self) -> (Mat, RowOpLog, Vec<usize>) { 
        (self.result, self.log, self.pivots)
    }
}

#[derive(Debug)]
pub struct RrefCalc { 
    target: Mat,
    log: RowOpLog,
    pivots: Vec<usize>
}

impl RrefCalc { 
    pub fn new(target: Mat) -> Self { 
        RrefCalc { target, log: RowOpLog::new(), pivots: vec![] }
    }

    pub fn result(self) -> RrefResult { 
        RrefResult { 
            result: self.target, 
            log: self.log, 
            pivots: self.pivots 
        }
    }

    pub fn process(&mut self) -> LinAlgResult<()> { 
        let (m, n) = self.target.shape();
        let mut i = 0;

        for j in 0..n { 
            if i >= m { break }
            if self.eliminate_step(i, j)? { 
                self.pivots.push(j);
                i += 1;
            }
        }

        Ok(())
    }

    fn eliminate_step(&mut self, i: usize, j: usize) -> LinAlgResult<bool> { 
        let Some(i_p) = self.select_pivot(i, j) else { 
            return Ok(false)
        };

        trace!("select-pivot: ({i_p}, {j})");

        if i_p != i { 
            self.apply(RowOp::Swap(i_p, i))?;
        }

        let p = self.target[(i, j)];
        if !p.is_one() { 
            // p is nonzero, selected as pivot.
            let scalar = Rational::one().checked_div(&p)?;
            self.apply(RowOp::Scale { row: i, scalar })?;
        }

        self.eliminate_col(i, j)?;

        Ok(true)
    }

    /// The row in `i..` whose entry in column `j` has the largest absolute
    /// value, the earliest one on ties. `None` if all of them are zero.
    fn select_pivot(&self, i: usize, j: usize) -> Option<usize> { 
        let m = self.target.rows();
        let mut cand: Option<(usize, Rational)> = None;

        for k in i..m { 
            let a = self.target[(k, j)];
            if a.is_zero() { 
                continue
            }
            if cand.map(|(_, b)| a.cmp_abs(&b).is_gt()).unwrap_or(true) { 
                cand = Some((k, a));
            }
        }

        cand.map(|(k, _)| k)
    }

    fn eliminate_col(&mut self, i: usize, j: usize) -> LinAlgResult<()> { 
        let m = self.target.rows();
        for k in 0..m { 
            if k == i { 
                continue
            }
            let a = self.target[(k, j)];
            if a.is_zero() { 
                continue
            }
            let scalar = a.checked_neg()?;
            self.apply(RowOp::AddMultiple { src: i, dest: k, scalar })?;
        }
        Ok(())
    }

    fn apply(&mut self, op: RowOp) -> LinAlgResult<()> { 
        trace!("{op}");
        op.apply(&mut self.target)?;
        self.log.push(op);
        Ok(())
    }
}

#[cfg(test)]
mod tests { 
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;
    use qlin::RationalError;
    use crate::LinAlgError;
    use super::*;

    fn mat<const N: usize>(shape: (usize, usize), data: [i64; N]) -> Mat { 
        Mat::from_data(shape, data).unwrap()
    }

    fn is_rref(a: &Mat, pivots: &[usize]) -> bool { 
        let (m, n) = a.shape();
        let r = pivots.len();

        pivots.iter().tuple_windows().all(|(j0, j1)| j0 < j1) && 
        (0..r).all(|i| { 
            let j = pivots[i];
            (0..j).all(|l| a[(i, l)].is_zero()) && 
            (0..m).all(|k| if k == i { a[(k, j)].is_one() } else { a[(k, j)].is_zero() })
        }) && 
        (r..m).all(|i| (0..n).all(|j| a[(i, j)].is_zero()))
    }

    #[test]
    fn swap_only() { 
        let a = mat((2, 2), [0, 1, 1, 0]);
        let res = a.rref().unwrap();

        assert_eq!(res.log().len(), 1);
        assert_eq!(res.log().to_string(), "R1 <-> R0\n");
        assert!(res.result().is_id());
        assert_eq!(res.pivots(), &[0, 1]);
    }

    #[test]
    fn log_2x2() { 
        let a = mat((2, 2), [1, 2, 3, 4]);
        let res = a.rref().unwrap();

        let log = res.log().iter().map(|op| op.to_string()).collect_vec();
        assert_eq!(log, [
            "R1 <-> R0",
            "1/3 * R0 -> R0",
            "-1/1 * R0 + R1 -> R1",
            "3/2 * R1 -> R1",
            "-4/3 * R1 + R0 -> R0",
        ]);
        assert_eq!(res.log().det_effect(), Ok(Rational::new(-1, 2)));
        assert!(res.result().is_id());
    }

    #[test]
    fn receiver_untouched() { 
        let a = mat((2, 2), [1, 2, 3, 4]);
        let _ = a.rref().unwrap();
        assert_eq!(a, mat((2, 2), [1, 2, 3, 4]));
    }

    #[test]
    fn log_is_fresh() { 
        let a = mat((2, 2), [0, 1, 1, 0]);
        let r1 = a.rref().unwrap();
        let r2 = a.rref().unwrap();
        assert_eq!(r1.log(), r2.log());

        // reducing an already reduced matrix records nothing.
        let r3 = r1.result().rref().unwrap();
        assert!(r3.log().is_empty());
    }

    #[test]
    fn skip_zero_col() { 
        let a = mat((2, 3), [0, 2, 4, 0, 1, 3]);
        let res = a.into_rref().unwrap();

        assert_eq!(res.result(), &mat((2, 3), [0, 1, 0, 0, 0, 1]));
        assert_eq!(res.pivots(), &[1, 2]);
        assert_eq!(res.rank(), 2);
    }

    #[test]
    fn pivot_tie() { 
        let a = mat((2, 1), [-3, 3]);
        let res = a.rref().unwrap();

        // |-3| == |3|: the first row is kept, no swap.
        assert_eq!(res.log().ops()[0], RowOp::Scale { row: 0, scalar: Rational::new(-1, 3) });
        assert_eq!(res.result(), &mat((2, 1), [1, 0]));
    }

    #[test]
    fn rank_deficient() { 
        let a = mat((3, 3), [1, 2, 3, 2, 4, 6, 1, 0, 1]);
        let res = a.rref().unwrap();

        assert_eq!(res.rank(), 2);
        assert!(res.result().is_row_zero(2));
        assert!(is_rref(res.result(), res.pivots()));
    }

    #[test]
    fn zero_mat() { 
        let a = Mat::zero((2, 3)).unwrap();
        let (result, log, pivots) = a.rref().unwrap().destruct();

        assert!(result.is_zero());
        assert!(log.is_empty());
        assert!(pivots.is_empty());
    }

    #[test]
    fn replay_log() { 
        let a = mat((3, 4), [2, -1, 0, 5, 1, 3, -2, 0, 4, 5, -4, 10]);
        let res = a.rref().unwrap();

        let mut b = a.clone();
        for op in res.log() { 
            op.apply(&mut b).unwrap();
        }
        assert_eq!(&b, res.result());
    }

    #[test]
    fn overflow() { 
        let a = Mat::from_data((2, 2), [i64::MAX, 1, 1, i64::MAX]).unwrap();
        assert_eq!(a.rref(), Err(LinAlgError::Arith(RationalError::Overflow)));
    }

    #[test]
    fn overflow_min_pivot() { 
        // 1 / i64::MIN has no i64 denominator.
        let a = Mat::from_data((2, 1), [1, i64::MIN]).unwrap();
        assert_eq!(a.rref(), Err(LinAlgError::Arith(RationalError::Overflow)));
    }

    #[test]
    fn random() { 
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 { 
            let m = rng.gen_range(1..=5);
            let n = rng.gen_range(1..=5);
            let data = (0..m * n).map(|_| { 
                if rng.gen_bool(0.3) { 0 } else { rng.gen_range(-9i64..=9) }
            }).collect_vec();

            let a = Mat::from_data((m, n), data).unwrap();
            let res = a.rref().unwrap();

            assert!(is_rref(res.result(), res.pivots()), "{a}");
            assert_eq!(res.result().rref().unwrap().result(), res.result());
        }
    }
}
